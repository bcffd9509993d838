//! Byte-level I/O for hosted programs
//!
//! The hosted program sees two operations, exposed through [`ByteIo`]:
//! - `read_byte`: one raw byte from input, or `None` at end of stream
//! - `write_byte`: one raw byte to output, in issue order
//!
//! [`configure_io`] prepares the process's standard input before anything is
//! read. Its effect lasts for the process lifetime, or until the returned
//! [`IoModeGuard`] is dropped when it changed terminal state.

use super::config::{EofPolicy, IoMode};
use super::ffi;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::tty::IsTty;
use log::{debug, warn};
use std::io::{self, Read, Write};

/// The I/O contract a hosted program relies on
pub trait ByteIo {
    /// Consume exactly one input byte; `None` when the stream is exhausted
    fn read_byte(&mut self) -> Option<u8>;

    /// Emit exactly one byte, verbatim
    fn write_byte(&mut self, value: u8) -> io::Result<()>;
}

/// Restores terminal state changed by [`configure_io`]
#[derive(Debug)]
#[must_use = "dropping the guard restores the terminal mode"]
pub struct IoModeGuard {
    raw_terminal: bool,
}

impl Drop for IoModeGuard {
    fn drop(&mut self) {
        if self.raw_terminal {
            if let Err(e) = disable_raw_mode() {
                warn!("Failed to restore terminal mode: {}", e);
            }
        }
    }
}

/// Put standard input (and output) into untranslated byte mode
///
/// Call once, before the first read. Failure is not fatal: it is logged and
/// the run continues with whatever translation the platform applies.
pub fn configure_io(mode: IoMode) -> IoModeGuard {
    if let Err(e) = ffi::set_binary_mode() {
        warn!("Failed to switch standard streams to binary mode: {}", e);
    }

    let raw_terminal = match mode {
        IoMode::Binary => false,
        IoMode::RawTerminal if io::stdin().is_tty() => match enable_raw_mode() {
            Ok(()) => {
                debug!("Terminal raw mode enabled");
                true
            }
            Err(e) => {
                warn!("Failed to enable terminal raw mode: {}", e);
                false
            }
        },
        IoMode::RawTerminal => false,
    };

    IoModeGuard { raw_terminal }
}

/// Read one byte, retrying on `Interrupted`
///
/// Any other error ends the stream, as C `getchar` does.
pub(crate) fn read_one<R: Read + ?Sized>(input: &mut R) -> Option<u8> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return None,
            Ok(_) => return Some(buf[0]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("Input read failed, treating as end of stream: {}", e);
                return None;
            }
        }
    }
}

/// Counts consecutive end-of-stream reads for [`EofPolicy::AbortAfter`]
#[derive(Debug, Clone)]
pub struct EofGuard {
    limit: Option<u32>,
    streak: u32,
}

impl EofGuard {
    pub fn new(policy: EofPolicy) -> Self {
        let limit = match policy {
            EofPolicy::Ignore => None,
            EofPolicy::AbortAfter(limit) => Some(limit),
        };
        EofGuard { limit, streak: 0 }
    }

    /// Record one read; returns `true` once the streak exceeds the limit
    pub fn observe(&mut self, read: Option<u8>) -> bool {
        match read {
            Some(_) => {
                self.streak = 0;
                false
            }
            None => {
                self.streak = self.streak.saturating_add(1);
                self.limit.is_some_and(|limit| self.streak > limit)
            }
        }
    }

    /// Current number of consecutive end-of-stream reads
    pub fn streak(&self) -> u32 {
        self.streak
    }
}

/// [`ByteIo`] over any reader/writer pair
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
    eof: EofGuard,
    pending: bool,
    write_failed: bool,
}

impl<R: Read, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, eof_policy: EofPolicy) -> Self {
        Console {
            input,
            output,
            eof: EofGuard::new(eof_policy),
            pending: false,
            write_failed: false,
        }
    }

    /// Push buffered output through to the underlying writer
    pub fn flush(&mut self) -> io::Result<()> {
        self.pending = false;
        self.output.flush()
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn flush_quietly(&mut self) {
        if self.pending {
            if let Err(e) = self.flush() {
                self.note_write_failure(&e);
            }
        }
    }

    fn note_write_failure(&mut self, e: &io::Error) {
        if !self.write_failed {
            warn!("Output write failed: {}", e);
            self.write_failed = true;
        }
    }
}

impl<R: Read, W: Write> ByteIo for Console<R, W> {
    fn read_byte(&mut self) -> Option<u8> {
        // Prompts must be visible before blocking on input
        self.flush_quietly();

        let byte = read_one(&mut self.input);
        if self.eof.observe(byte) {
            debug!(
                "Aborting after {} consecutive end-of-stream reads",
                self.eof.streak()
            );
            self.flush_quietly();
            std::process::exit(0);
        }
        byte
    }

    fn write_byte(&mut self, value: u8) -> io::Result<()> {
        match self.output.write_all(&[value]) {
            Ok(()) => {
                self.pending = true;
                Ok(())
            }
            Err(e) => {
                self.note_write_failure(&e);
                Err(e)
            }
        }
    }
}
