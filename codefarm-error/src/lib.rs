//! # codefarm-error
//!
//! Unified error handling for codefarm.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., LevelNotFound, ConfigInvalid)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! Script-level failures (walking into a wall, running out of gold) are not
//! errors in this sense: the interpreter reports them as messages on the tick
//! outcome. This crate covers the host side: loading configs and scripts,
//! looking up levels, talking to the tutor.
//!
//! ## Usage
//!
//! ```rust
//! use codefarm_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::LevelNotFound, "level 9 does not exist")
//!         .with_operation("level::by_id")
//!         .with_context("level", "9"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible host functions return `Result<T, codefarm_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using codefarm Error
pub type Result<T> = std::result::Result<T, Error>;
