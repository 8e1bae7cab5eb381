//! External collaborators of the charm
//!
//! Everything that leaves the process (package managers, SCM clients, user
//! management, service supervision, ownership changes) goes through the
//! [`System`] trait. [`HostSystem`] runs the real commands; tests substitute
//! a recording fake.

mod host;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use host::HostSystem;

/// A command line to execute on the unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Side-effecting operations the handlers depend on
pub trait System {
    /// Run a command to completion; a non-zero exit is an error
    fn run(&mut self, command: &CommandSpec) -> Result<()>;

    /// Whether an executable with this name is on `PATH`
    fn has_command(&self, program: &str) -> bool;

    /// Whether a local account with this name exists
    fn user_exists(&mut self, name: &str) -> Result<bool>;

    /// Hand ownership of `path` (and everything below it if `recursive`) to `user`
    fn chown(&mut self, path: &Path, user: &str, recursive: bool) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        let cmd = CommandSpec::new("npm").args(["install", "npm-offline-registry@1.2.0"]);
        assert_eq!(cmd.to_string(), "npm install npm-offline-registry@1.2.0");
    }

    #[test]
    fn test_command_current_dir() {
        let cmd = CommandSpec::new("npm")
            .arg("install")
            .current_dir(Path::new("/srv/app"));
        assert_eq!(cmd.cwd, Some(PathBuf::from("/srv/app")));
        assert_eq!(cmd.args, vec!["install".to_string()]);
    }
}
