//! Error types and handling for the charm
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`config`]: Configuration errors
//! - [`command`]: External command errors
//! - [`fs`]: File system errors
//! - [`state`]: Lifecycle and state file errors

pub mod command;
pub mod config;
pub mod fs;
pub mod state;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for charm operations
#[derive(Error, Diagnostic, Debug)]
pub enum CharmError {
    // Configuration errors
    #[error("Unrecognized repo_type '{repo_type}'")]
    #[diagnostic(
        code(charm::config::unknown_repo_type),
        help("Supported repo types: git, hg (mercurial), svn (subversion)")
    )]
    UnknownRepoType { repo_type: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(charm::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(charm::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(charm::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // External command errors
    #[error("Command `{command}` failed with {status}: {stderr}")]
    #[diagnostic(code(charm::command::failed))]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to run `{command}`: {reason}")]
    #[diagnostic(code(charm::command::spawn_failed))]
    CommandSpawnFailed { command: String, reason: String },

    #[error("Required tool '{tool}' is not installed")]
    #[diagnostic(
        code(charm::command::tool_missing),
        help("Install '{tool}' on the unit and re-run the hook")
    )]
    ToolMissing { tool: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(charm::git::operation_failed))]
    GitOperationFailed { message: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(charm::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(charm::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(charm::fs::io_error))]
    IoError { message: String },

    // State errors
    #[error("Cannot move from '{from}' to '{to}'")]
    #[diagnostic(code(charm::state::invalid_transition))]
    InvalidTransition { from: String, to: String },

    #[error("State file is corrupt: {path}: {reason}")]
    #[diagnostic(
        code(charm::state::corrupt),
        help("Remove the state file to force a full reinstall on the next hook")
    )]
    StateCorrupt { path: String, reason: String },
}

impl From<std::io::Error> for CharmError {
    fn from(err: std::io::Error) -> Self {
        CharmError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CharmError {
    fn from(err: serde_yaml::Error) -> Self {
        CharmError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for CharmError {
    fn from(err: git2::Error) -> Self {
        CharmError::GitOperationFailed {
            message: err.message().to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CharmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CharmError::UnknownRepoType {
            repo_type: "cvs".to_string(),
        };
        assert_eq!(err.to_string(), "Unrecognized repo_type 'cvs'");
    }

    #[test]
    fn test_error_code() {
        let err = CharmError::ToolMissing {
            tool: "hg".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("charm::command::tool_missing".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let charm_err: CharmError = io_err.into();
        assert!(matches!(charm_err, CharmError::IoError { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content: [unclosed");
        let charm_err: CharmError = parse_result.unwrap_err().into();
        assert!(matches!(charm_err, CharmError::ConfigParseFailed { .. }));
    }

    #[test]
    fn test_git_error_conversion() {
        let charm_err: CharmError = git2::Error::from_str("bad object").into();
        assert!(matches!(charm_err, CharmError::GitOperationFailed { .. }));
        assert!(charm_err.to_string().contains("bad object"));
    }

    #[test]
    fn test_command_failed_message() {
        let err = command::failed("npm install", "exit status: 1", "ENOTFOUND");
        assert!(err.to_string().contains("npm install"));
        assert!(err.to_string().contains("ENOTFOUND"));
    }

    #[test]
    fn test_invalid_transition() {
        let err = state::invalid_transition("uninstalled", "available");
        assert!(matches!(err, CharmError::InvalidTransition { .. }));
        assert!(err.to_string().contains("uninstalled"));
    }
}
