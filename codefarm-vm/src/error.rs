//! Code Farm VM error types
//!
//! Re-exports codefarm-error and provides VM-specific conveniences. These
//! cover the host side only; a running script never produces an `Error`.

pub use codefarm_error::{Error, ErrorKind, ErrorStatus, Result};

/// Create a ConfigInvalid error for a specific config field
pub fn config_invalid(message: impl Into<String>, field: &'static str) -> Error {
    Error::config_invalid(message)
        .with_operation("config::validate")
        .with_context("field", field)
}

/// Create a LevelNotFound error
pub fn level_not_found(level_id: u32) -> Error {
    Error::level_not_found(level_id).with_operation("level::by_id")
}

/// Create a ScriptTooLarge error
pub fn script_too_large(lines: usize, max: usize) -> Error {
    Error::new(
        ErrorKind::ScriptTooLarge,
        format!("script has {} lines, at most {} are allowed", lines, max),
    )
    .with_context("lines", lines.to_string())
    .with_context("max", max.to_string())
}

/// Create a SerializationFailed error
pub fn serialization_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::SerializationFailed, message)
}
