//! Error types for the tape runtime
//!
//! This module defines [`HarnessError`], the conditions the harness itself can
//! report. End of input is deliberately absent: it reaches the hosted program as
//! a sentinel from `read_byte`, never as an error.
//!
//! Only [`HarnessError::OutOfRange`] can occur after the hosted program has been
//! entered, and only under [`Addressing::Checked`](super::config::Addressing).

use std::fmt;

/// Errors reported by the harness
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// The tape could not be provisioned. Fatal.
    AllocationFailure { requested: usize },

    /// A tape of this size cannot host a cursor
    InvalidTapeSize { size: usize },

    /// Checked addressing refused to move the cursor outside the tape
    OutOfRange { offset: isize, size: usize },
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::AllocationFailure { requested } => {
                write!(f, "Failed to allocate tape of {} bytes", requested)
            }
            HarnessError::InvalidTapeSize { size } => {
                write!(f, "Invalid tape size {}: must be at least 1 byte", size)
            }
            HarnessError::OutOfRange { offset, size } => {
                write!(
                    f,
                    "Cursor offset {} from center is outside the tape of {} bytes",
                    offset, size
                )
            }
        }
    }
}

impl std::error::Error for HarnessError {}
