//! Lifecycle and state file errors

use super::CharmError;

/// Creates an invalid lifecycle transition error
pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> CharmError {
    CharmError::InvalidTransition {
        from: from.into(),
        to: to.into(),
    }
}

/// Creates a corrupt state file error
pub fn corrupt(path: impl Into<String>, reason: impl Into<String>) -> CharmError {
    CharmError::StateCorrupt {
        path: path.into(),
        reason: reason.into(),
    }
}
