//! Configuration errors

use super::CharmError;

/// Creates an unknown repo type error
pub fn unknown_repo_type(repo_type: impl Into<String>) -> CharmError {
    CharmError::UnknownRepoType {
        repo_type: repo_type.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> CharmError {
    CharmError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> CharmError {
    CharmError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> CharmError {
    CharmError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
