//! Harness configuration
//!
//! [`HarnessConfig`] fixes everything about a run before the hosted program is
//! entered: tape size, addressing policy, standard input mode and the
//! end-of-stream policy. The [`Default`] value is the reference configuration.

use super::constants::{DEFAULT_EOF_ABORT_LIMIT, DEFAULT_TAPE_SIZE};

/// How cursor movement is validated against the tape bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Addressing {
    /// Movement is never validated. Accessing a cell outside the tape is a
    /// fault of the hosted program.
    #[default]
    Unchecked,
    /// Moving outside the tape is refused with `HarnessError::OutOfRange`
    Checked,
}

/// How standard input is prepared before the hosted program runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoMode {
    /// Untranslated byte streams (binary mode on platforms that have a text mode)
    #[default]
    Binary,
    /// Binary mode, plus terminal raw mode when stdin is a terminal
    RawTerminal,
}

/// What happens when the hosted program keeps reading past end of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Return the sentinel every time
    #[default]
    Ignore,
    /// Exit the process (status 0) after more than this many consecutive
    /// end-of-stream reads
    AbortAfter(u32),
}

impl EofPolicy {
    /// The abort policy with the historical limit of 50 reads
    pub fn abort_default() -> Self {
        EofPolicy::AbortAfter(DEFAULT_EOF_ABORT_LIMIT)
    }
}

/// Settings for one harness run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    pub tape_size: usize,
    pub addressing: Addressing,
    pub io_mode: IoMode,
    pub eof_policy: EofPolicy,
}

impl HarnessConfig {
    pub fn new() -> Self {
        HarnessConfig {
            tape_size: DEFAULT_TAPE_SIZE,
            addressing: Addressing::default(),
            io_mode: IoMode::default(),
            eof_policy: EofPolicy::default(),
        }
    }

    pub fn with_tape_size(mut self, tape_size: usize) -> Self {
        self.tape_size = tape_size;
        self
    }

    pub fn with_addressing(mut self, addressing: Addressing) -> Self {
        self.addressing = addressing;
        self
    }

    pub fn with_io_mode(mut self, io_mode: IoMode) -> Self {
        self.io_mode = io_mode;
        self
    }

    pub fn with_eof_policy(mut self, eof_policy: EofPolicy) -> Self {
        self.eof_policy = eof_policy;
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new()
    }
}
