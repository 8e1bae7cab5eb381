//! External command errors

use super::CharmError;

/// Creates a command failed error from a non-zero exit
pub fn failed(
    command: impl Into<String>,
    status: impl Into<String>,
    stderr: impl Into<String>,
) -> CharmError {
    CharmError::CommandFailed {
        command: command.into(),
        status: status.into(),
        stderr: stderr.into(),
    }
}

/// Creates an error for a command that could not be started
pub fn spawn_failed(command: impl Into<String>, reason: impl Into<String>) -> CharmError {
    CharmError::CommandSpawnFailed {
        command: command.into(),
        reason: reason.into(),
    }
}

/// Creates a missing tool error
pub fn tool_missing(tool: impl Into<String>) -> CharmError {
    CharmError::ToolMissing { tool: tool.into() }
}
