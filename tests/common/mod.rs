//! Common test utilities for charm integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch unit: a root prefix with a fake PID 1 and a charm directory
pub struct TestUnit {
    /// Temporary directory
    pub temp: TempDir,
    /// Root prefix passed as `--root`
    pub root: PathBuf,
    /// Charm directory passed as `--charm-dir`
    pub charm_dir: PathBuf,
}

impl TestUnit {
    /// Create a unit whose PID 1 is named `init`
    pub fn new(init: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().join("root");
        let charm_dir = temp.path().join("charm");
        std::fs::create_dir_all(&charm_dir).expect("Failed to create charm directory");

        let unit = Self {
            temp,
            root,
            charm_dir,
        };
        unit.write_root_file("proc/1/comm", &format!("{init}\n"));
        unit
    }

    /// Write a file below the unit root
    pub fn write_root_file(&self, path: &str, content: &str) {
        write(&self.root.join(path), content);
    }

    /// Write the option overrides passed with `--config`
    pub fn write_options(&self, yaml: &str) -> PathBuf {
        let path = self.temp.path().join("options.yaml");
        write(&path, yaml);
        path
    }

    /// Write the charm's own option declarations
    #[allow(dead_code)]
    pub fn write_charm_config(&self, yaml: &str) {
        write(&self.charm_dir.join("config.yaml"), yaml);
    }

    /// Path of a system file on the unit
    pub fn path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    /// Read a system file on the unit
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path(path)).expect("Failed to read file")
    }

    /// The charm binary pointed at this unit, never touching the host
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("npm-registry-charm").unwrap();
        for var in ["CHARM_ROOT", "CHARM_DIR", "CHARM_CONFIG", "JUJU_UNIT_NAME"] {
            cmd.env_remove(var);
        }
        cmd.env("RUST_LOG", "info")
            .arg("--root")
            .arg(&self.root)
            .arg("--charm-dir")
            .arg(&self.charm_dir)
            .arg("--dry-run");
        cmd
    }

    /// The charm binary acting for real, on a `PATH` with no tools on it
    #[allow(deprecated, dead_code)]
    pub fn cmd_without_tools(&self) -> Command {
        let empty_path = self.temp.path().join("empty-path");
        std::fs::create_dir_all(&empty_path).expect("Failed to create PATH directory");

        let mut cmd = Command::cargo_bin("npm-registry-charm").unwrap();
        for var in ["CHARM_ROOT", "CHARM_DIR", "CHARM_CONFIG", "JUJU_UNIT_NAME"] {
            cmd.env_remove(var);
        }
        cmd.env("RUST_LOG", "info")
            .env("PATH", &empty_path)
            .arg("--root")
            .arg(&self.root)
            .arg("--charm-dir")
            .arg(&self.charm_dir);
        cmd
    }

    /// Run a hook with the given options file
    pub fn hook(&self, name: &str, options: &Path) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--config").arg(options).args(["hook", name]);
        cmd
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}
