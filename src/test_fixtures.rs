//! Test fixtures shared by the unit tests.
//!
//! ```ignore
//! use crate::test_fixtures::{create_unit, RecordingSystem};
//!
//! #[test]
//! fn my_test() {
//!     let (_temp, layout) = create_unit("systemd");
//!     let mut sys = RecordingSystem::default();
//!     // ... run a handler against `layout` and `sys` ...
//!     assert!(sys.ran("npm"));
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::Layout;
use crate::error::{self, Result};
use crate::system::{CommandSpec, System};

/// Create a temp directory that is removed on drop.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a scratch unit root with a charm directory and a PID 1 named `init`.
///
/// # Panics
///
/// Panics if the directories cannot be created.
#[must_use]
pub fn create_unit(init: &str) -> (TempDir, Layout) {
    let temp = create_temp_dir();
    let root = temp.path().join("root");
    let charm_dir = temp.path().join("charm");
    fs::create_dir_all(&charm_dir).expect("Failed to create charm dir");

    let layout = Layout::new(&root, &charm_dir, "npm-offline-registry/0");
    write_file(&layout.pid1_comm(), &format!("{init}\n"));
    (temp, layout)
}

/// Write a file, creating parent directories.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Fake [`System`] that records every call instead of touching the host
#[derive(Debug, Default)]
pub struct RecordingSystem {
    /// Commands run, in order
    pub commands: Vec<CommandSpec>,
    /// Ownership changes requested, in order
    pub chowned: Vec<(PathBuf, String, bool)>,
    /// Accounts that exist
    pub users: HashSet<String>,
    /// Programs reported as absent from `PATH`
    missing: HashSet<String>,
    /// Programs whose invocations fail
    failing: HashSet<String>,
}

impl RecordingSystem {
    /// Report `program` as not installed
    #[must_use]
    pub fn without(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Make every invocation of `program` exit non-zero
    #[must_use]
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.insert(program.to_string());
        self
    }

    /// Whether any command with this program name was run
    pub fn ran(&self, program: &str) -> bool {
        self.commands.iter().any(|c| c.program == program)
    }

    /// Rendered command lines, in order
    pub fn command_lines(&self) -> Vec<String> {
        self.commands.iter().map(ToString::to_string).collect()
    }

    /// Number of commands whose line contains `needle`
    pub fn count(&self, needle: &str) -> usize {
        self.command_lines()
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl System for RecordingSystem {
    fn run(&mut self, command: &CommandSpec) -> Result<()> {
        self.commands.push(command.clone());
        if self.failing.contains(&command.program) || self.missing.contains(&command.program) {
            return Err(error::command::failed(
                command.to_string(),
                "exit status: 1",
                "simulated failure",
            ));
        }
        if command.program == "useradd" {
            if let Some(name) = command.args.last() {
                self.users.insert(name.clone());
            }
        }
        Ok(())
    }

    fn has_command(&self, program: &str) -> bool {
        !self.missing.contains(program)
    }

    fn user_exists(&mut self, name: &str) -> Result<bool> {
        Ok(self.users.contains(name))
    }

    fn chown(&mut self, path: &Path, user: &str, recursive: bool) -> Result<()> {
        self.chowned
            .push((path.to_path_buf(), user.to_string(), recursive));
        Ok(())
    }
}
