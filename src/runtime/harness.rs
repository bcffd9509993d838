//! Tape runtime harness
//!
//! The harness owns the whole lifecycle of one run:
//!
//! ```text
//! configure_io → allocate_tape → compute_cursor → invoke → finalize
//! ```
//!
//! The hosted program is opaque. It receives a [`Session`] holding the loaned
//! cursor and the byte I/O channel, and the harness neither validates what it
//! does nor looks at the tape afterwards. The tape is released exactly once,
//! when `finalize` consumes it or, if the hosted program unwinds, by `Drop`.

use super::config::{Addressing, HarnessConfig};
use super::constants::COMPLETION_MESSAGE;
use super::errors::HarnessError;
use super::io::{configure_io, ByteIo, Console, IoModeGuard};
use crate::memory::{cursor::Cursor, tape::Tape};
use log::{debug, warn};
use std::io::{self, Read, Write};

/// What the hosted program is given for the duration of its invocation
pub struct Session<'a> {
    cursor: Cursor<'a>,
    io: &'a mut dyn ByteIo,
}

impl<'a> Session<'a> {
    pub fn new(cursor: Cursor<'a>, io: &'a mut dyn ByteIo) -> Self {
        Session { cursor, io }
    }

    /// The loaned cursor
    pub fn cursor(&mut self) -> &mut Cursor<'a> {
        &mut self.cursor
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        self.io.read_byte()
    }

    /// Write failures are logged by the channel and otherwise ignored
    pub fn write_byte(&mut self, value: u8) {
        let _ = self.io.write_byte(value);
    }

    /// The byte channel itself, for callers that need write results
    pub(crate) fn io(&mut self) -> &mut dyn ByteIo {
        &mut *self.io
    }
}

/// A routine the harness can host
///
/// Called exactly once per run; ownership of the tape never transfers.
pub trait HostedProgram {
    fn enter(&mut self, session: &mut Session<'_>);
}

/// A hosted program backed by a closure; see [`from_fn`]
pub struct FromFn<F>(F);

impl<F> HostedProgram for FromFn<F>
where
    F: FnMut(&mut Session<'_>),
{
    fn enter(&mut self, session: &mut Session<'_>) {
        (self.0)(session)
    }
}

/// Host a closure
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: FnMut(&mut Session<'_>),
{
    FromFn(f)
}

/// Allocate a zero-initialized tape of exactly `size` bytes
pub fn allocate_tape(size: usize) -> Result<Tape, HarnessError> {
    let tape = Tape::allocate(size)?;
    debug!(
        "Allocated tape of {} bytes at 0x{:x}",
        tape.len(),
        tape.base_address()
    );
    Ok(tape)
}

/// The initial cursor: `tape_base + size/2`
pub fn compute_cursor(tape: &mut Tape, addressing: Addressing) -> Cursor<'_> {
    tape.cursor(addressing)
}

/// Call the hosted program once with the cursor as its only argument
pub fn invoke<'a, P>(program: &mut P, cursor: Cursor<'a>, io: &'a mut dyn ByteIo)
where
    P: HostedProgram + ?Sized,
{
    debug!("Invoking hosted program at offset {}", cursor.offset());
    let mut session = Session::new(cursor, io);
    program.enter(&mut session);
    debug!("Hosted program returned");
}

/// Release the tape, then report completion on the diagnostic stream
///
/// `output` is flushed before the tape is released so that everything the
/// hosted program wrote precedes the completion line.
pub fn finalize<W, D>(tape: Tape, output: &mut W, diagnostics: &mut D)
where
    W: Write + ?Sized,
    D: Write + ?Sized,
{
    if let Err(e) = output.flush() {
        warn!("Failed to flush program output: {}", e);
    }

    let size = tape.len();
    drop(tape);
    debug!("Released tape of {} bytes", size);

    if let Err(e) = writeln!(diagnostics, "{}", COMPLETION_MESSAGE) {
        warn!("Failed to write completion message: {}", e);
    }
}

/// Runs hosted programs according to a [`HarnessConfig`]
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Harness { config }
    }

    /// Host `program` on the process's standard streams
    ///
    /// Configures I/O mode first, as the process-wide switch it is. Returns
    /// only `AllocationFailure` or `InvalidTapeSize`, both before any I/O.
    pub fn run_stdio<P>(&self, program: &mut P) -> Result<(), HarnessError>
    where
        P: HostedProgram + ?Sized,
    {
        let io_mode = configure_io(self.config.io_mode);
        // Unlocked handles: foreign callbacks take the stdin lock themselves
        let console = Console::new(io::stdin(), io::stdout(), self.config.eof_policy);
        self.drive(program, console, &mut io::stderr(), Some(io_mode))
            .map(|_| ())
    }

    /// Host `program` on the given streams, returning the output writer
    ///
    /// Leaves the process's I/O mode untouched.
    pub fn run_with<P, R, W, D>(
        &self,
        program: &mut P,
        input: R,
        output: W,
        diagnostics: &mut D,
    ) -> Result<W, HarnessError>
    where
        P: HostedProgram + ?Sized,
        R: Read,
        W: Write,
        D: Write + ?Sized,
    {
        let console = Console::new(input, output, self.config.eof_policy);
        self.drive(program, console, diagnostics, None)
    }

    fn drive<P, R, W, D>(
        &self,
        program: &mut P,
        mut console: Console<R, W>,
        diagnostics: &mut D,
        io_mode: Option<IoModeGuard>,
    ) -> Result<W, HarnessError>
    where
        P: HostedProgram + ?Sized,
        R: Read,
        W: Write,
        D: Write + ?Sized,
    {
        let mut tape = allocate_tape(self.config.tape_size)?;

        let cursor = compute_cursor(&mut tape, self.config.addressing);
        invoke(program, cursor, &mut console);

        // Terminal state goes back to normal before the completion line
        drop(io_mode);

        let (_, mut output) = console.into_parts();
        finalize(tape, &mut output, diagnostics);
        Ok(output)
    }
}
