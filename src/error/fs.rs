//! File system errors

use std::path::Path;

use super::CharmError;

/// Creates a file read failed error
pub fn read_failed(path: &Path, reason: impl ToString) -> CharmError {
    CharmError::FileReadFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: &Path, reason: impl ToString) -> CharmError {
    CharmError::FileWriteFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}
