//! Reverse-proxy vhost for the `website` relation

use std::path::Path;

use crate::common::fs::write_if_changed;
use crate::config::{Layout, ServiceConfig};
use crate::error::Result;
use crate::render::InitSystem;
use crate::system::System;

const PROXY_SERVICE: &str = "nginx";

/// Render the nginx server block fronting the registry
pub fn render_vhost(config: &ServiceConfig, cache_dir: &Path) -> String {
    format!(
        r"server {{
    listen 80;
    server_name {server_name};

    location / {{
        proxy_pass http://127.0.0.1:{port};
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
    }}

    location /cache/ {{
        alias {cache_dir}/;
        autoindex off;
    }}
}}
",
        server_name = config.proxy_server_name(),
        port = config.port,
        cache_dir = cache_dir.display(),
    )
}

/// Write the vhost and reload nginx when it changed
pub fn configure(
    sys: &mut dyn System,
    layout: &Layout,
    config: &ServiceConfig,
    cache_dir: &Path,
) -> Result<bool> {
    let path = layout.vhost();
    let changed = write_if_changed(&path, &render_vhost(config, cache_dir))?;
    if changed {
        let init = InitSystem::detect(layout);
        sys.run(&init.reload_command(PROXY_SERVICE))?;
        tracing::info!(path = %path.display(), server_name = %config.proxy_server_name(), "vhost updated");
    }
    Ok(changed)
}
