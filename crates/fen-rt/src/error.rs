//! Error types for the Fen runtime.
//!
//! Every fallible runtime operation has a total, defined result: mutating
//! operations report a status through [`Result`], value-returning queries
//! fall back to documented defaults (0, the empty string) instead. The only
//! fatal condition in this layer is allocation failure, which is left to the
//! global allocator's abort; nothing here retries or terminates the process.

use crate::handle::{BuilderHandle, VecHandle};
use std::fmt;

/// Errors reported by runtime operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The vector handle does not name a live vector (never allocated,
    /// or already freed).
    InvalidVectorHandle {
        /// The offending handle.
        handle: VecHandle,
    },

    /// The builder handle does not name an allocated builder.
    InvalidBuilderHandle {
        /// The offending handle.
        handle: BuilderHandle,
    },

    /// An absent string was passed where content is required.
    AbsentString,

    /// The builder table is at its fixed maximum occupancy.
    BuilderTableFull {
        /// The table's fixed ceiling.
        limit: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidVectorHandle { handle } => {
                write!(f, "invalid vector handle: {handle}")
            }
            Error::InvalidBuilderHandle { handle } => {
                write!(f, "invalid builder handle: {handle}")
            }
            Error::AbsentString => write!(f, "absent string operand"),
            Error::BuilderTableFull { limit } => {
                write!(f, "builder table full: limit of {limit} builders reached")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for Fen runtime operations.
pub type Result<T> = std::result::Result<T, Error>;
