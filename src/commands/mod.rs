//! Command implementations for the charm CLI

pub mod completions;
pub mod hook;
pub mod status;
pub mod version;
