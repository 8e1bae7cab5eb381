//! Version command implementation

use crate::config::layout::{SERVICE_NAME, SERVICE_USER};
use crate::error::Result;

/// Print the charm version and what it manages
pub fn run() -> Result<()> {
    println!("npm-registry-charm {}", env!("CARGO_PKG_VERSION"));
    println!("  Service: {SERVICE_NAME} (runs as {SERVICE_USER})");
    println!(
        "  Built with Rust {} ({})",
        env!("CARGO_PKG_RUST_VERSION"),
        if cfg!(debug_assertions) { "debug" } else { "release" }
    );
    Ok(())
}
