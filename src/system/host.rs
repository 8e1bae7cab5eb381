//! [`System`] implementation backed by the real host

use std::env;
use std::os::unix::fs::{self as unix_fs, PermissionsExt};
use std::path::Path;
use std::process::{Command, Output};

use walkdir::WalkDir;

use super::{CommandSpec, System};
use crate::error::{self, Result};

/// Runs commands on the host, or only logs them in dry-run mode
#[derive(Debug, Default)]
pub struct HostSystem {
    dry_run: bool,
}

impl HostSystem {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn output(command: &CommandSpec) -> Result<Output> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }
        cmd.output()
            .map_err(|e| error::command::spawn_failed(command.to_string(), e.to_string()))
    }

    /// Look up `(uid, gid)` for a user through the name service switch
    fn lookup_ids(user: &str) -> Result<(u32, u32)> {
        let query = CommandSpec::new("getent").args(["passwd", user]);
        let output = Self::output(&query)?;
        if !output.status.success() {
            return Err(error::command::failed(
                query.to_string(),
                output.status.to_string(),
                format!("no such user '{user}'"),
            ));
        }
        parse_passwd_ids(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            error::command::failed(
                query.to_string(),
                output.status.to_string(),
                "unparseable passwd entry",
            )
        })
    }
}

/// Extract uid and gid from a `passwd(5)` line
fn parse_passwd_ids(line: &str) -> Option<(u32, u32)> {
    let mut fields = line.trim().split(':');
    let uid = fields.nth(2)?.parse().ok()?;
    let gid = fields.next()?.parse().ok()?;
    Some((uid, gid))
}

/// Regular file with at least one execute bit set
fn is_executable(path: &Path) -> bool {
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

impl System for HostSystem {
    fn run(&mut self, command: &CommandSpec) -> Result<()> {
        if self.dry_run {
            tracing::info!(command = %command, "dry run, not executing");
            return Ok(());
        }

        tracing::debug!(command = %command, cwd = ?command.cwd, "running");
        let output = Self::output(command)?;
        if !output.status.success() {
            return Err(error::command::failed(
                command.to_string(),
                output.status.to_string(),
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }

    fn has_command(&self, program: &str) -> bool {
        if self.dry_run {
            return true;
        }
        env::var_os("PATH").is_some_and(|paths| {
            env::split_paths(&paths).any(|dir| is_executable(&dir.join(program)))
        })
    }

    fn user_exists(&mut self, name: &str) -> Result<bool> {
        if self.dry_run {
            return Ok(false);
        }
        let output = Self::output(&CommandSpec::new("getent").args(["passwd", name]))?;
        Ok(output.status.success())
    }

    fn chown(&mut self, path: &Path, user: &str, recursive: bool) -> Result<()> {
        if self.dry_run {
            tracing::info!(path = %path.display(), user, recursive, "dry run, not changing ownership");
            return Ok(());
        }

        let (uid, gid) = Self::lookup_ids(user)?;
        if !recursive {
            return unix_fs::chown(path, Some(uid), Some(gid))
                .map_err(|e| error::fs::write_failed(path, e));
        }

        for entry in WalkDir::new(path) {
            let entry = entry.map_err(|e| error::fs::read_failed(path, e))?;
            unix_fs::lchown(entry.path(), Some(uid), Some(gid))
                .map_err(|e| error::fs::write_failed(entry.path(), e))?;
        }
        Ok(())
    }
}
