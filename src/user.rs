//! Service account provisioning

use std::path::Path;

use crate::error::Result;
use crate::system::{CommandSpec, System};

/// Make sure an unprivileged system account named `user` exists.
///
/// The account gets a group of the same name, `home` as its home directory
/// (not created) and no login shell. Returns `true` if the account was created.
pub fn ensure_service_user(sys: &mut dyn System, user: &str, home: &Path) -> Result<bool> {
    if sys.user_exists(user)? {
        tracing::debug!(user, "service user already exists");
        return Ok(false);
    }

    let home = home.display().to_string();
    sys.run(&CommandSpec::new("groupadd").args(["--system", "--force", user]))?;
    sys.run(&CommandSpec::new("useradd").args([
        "--system",
        "--gid",
        user,
        "--home-dir",
        home.as_str(),
        "--no-create-home",
        "--shell",
        "/usr/sbin/nologin",
        user,
    ]))?;

    tracing::info!(user, "created service user");
    Ok(true)
}
