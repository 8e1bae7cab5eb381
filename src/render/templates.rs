//! Init unit templates

use super::RenderContext;

/// systemd service unit
pub fn systemd_unit(ctx: &RenderContext) -> String {
    format!(
        r#"[Unit]
Description=npm offline registry ({registry_uri})
After=network-online.target
Wants=network-online.target

[Service]
Type=simple
User={user}
Group={group}
WorkingDirectory={working_dir}
Environment=NODE_ENV=production
Environment=HOST={host}
Environment=PORT={port}
Environment=REGISTRY_URI={registry_uri}
Environment=CACHE_DIR={cache_dir}
Environment=ENABLE_FAILOVER={enable_failover}
ExecStart={exec}
Restart=on-failure
RestartSec=5s

# Logging
StandardOutput=journal
StandardError=journal
SyslogIdentifier={service}

[Install]
WantedBy=multi-user.target
"#,
        service = ctx.service,
        user = ctx.user,
        group = ctx.group,
        working_dir = ctx.working_dir.display(),
        host = ctx.host,
        port = ctx.port,
        registry_uri = ctx.registry_uri,
        cache_dir = ctx.cache_dir.display(),
        enable_failover = ctx.enable_failover,
        exec = ctx.exec_command(),
    )
}

/// upstart job
pub fn upstart_job(ctx: &RenderContext) -> String {
    format!(
        r#"description "npm offline registry ({registry_uri})"

start on (local-filesystems and net-device-up IFACE!=lo)
stop on runlevel [!2345]

respawn
respawn limit 10 5

setuid {user}
setgid {group}
chdir {working_dir}

env NODE_ENV=production
env HOST={host}
env PORT={port}
env REGISTRY_URI={registry_uri}
env CACHE_DIR={cache_dir}
env ENABLE_FAILOVER={enable_failover}

exec {exec}
"#,
        user = ctx.user,
        group = ctx.group,
        working_dir = ctx.working_dir.display(),
        host = ctx.host,
        port = ctx.port,
        registry_uri = ctx.registry_uri,
        cache_dir = ctx.cache_dir.display(),
        enable_failover = ctx.enable_failover,
        exec = ctx.exec_command(),
    )
}
