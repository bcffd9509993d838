//! Foreign-call boundary
//!
//! Everything that crosses into code the harness did not compile lives here,
//! and this is the only module that uses `unsafe`:
//! - [`ForeignEntry`]: a compiled hosted program taking the raw cursor address
//! - `tapehost_read_byte` / `tapehost_write_byte`: C-ABI byte I/O with
//!   `getchar` / `putchar` semantics. While a foreign entry runs they go
//!   through its session's [`ByteIo`], EOF policy included; outside of one
//!   they fall back to the process's standard streams.
//! - binary mode switching for the C runtime's standard descriptors

use super::constants::EOF_SENTINEL;
use super::harness::{HostedProgram, Session};
use super::io::{read_one, ByteIo};
use crate::runtime::config::Addressing;
use log::{debug, warn};
use std::cell::Cell;
use std::ffi::c_int;
use std::io::{self, Write};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};

thread_local! {
    /// Byte channel of the session whose foreign entry is running on this thread
    static ACTIVE_IO: Cell<Option<NonNull<dyn ByteIo>>> = const { Cell::new(None) };
}

/// Installs a session's byte channel for the callbacks; restores the previous one on drop
struct ActiveIo {
    previous: Option<NonNull<dyn ByteIo>>,
}

impl ActiveIo {
    /// # Safety
    ///
    /// The guard must be dropped before `io`'s borrow ends, and `io` must not
    /// be used through any other path while the guard is alive.
    unsafe fn install(io: &mut dyn ByteIo) -> Self {
        let io = NonNull::from(io);
        // SAFETY: only the trait object lifetime is erased; the guard removes
        // the pointer again before the borrow it came from ends.
        let io: NonNull<dyn ByteIo> = unsafe { std::mem::transmute(io) };
        let previous = ACTIVE_IO.with(|active| active.replace(Some(io)));
        ActiveIo { previous }
    }
}

impl Drop for ActiveIo {
    fn drop(&mut self) {
        ACTIVE_IO.with(|active| active.set(self.previous));
    }
}

fn with_active_io<T>(f: impl FnOnce(&mut dyn ByteIo) -> T) -> Option<T> {
    let mut io = ACTIVE_IO.with(Cell::get)?;
    // SAFETY: installed by `ActiveIo` for the foreign call in progress on
    // this thread, which holds no other reference to it.
    Some(f(unsafe { io.as_mut() }))
}

/// Signature of a compiled hosted program: one tape pointer, no result
pub type EntryFn = unsafe extern "C" fn(tape: *mut u8);

/// A hosted program reached through a C-ABI function pointer
#[derive(Debug, Clone, Copy)]
pub struct ForeignEntry {
    entry: EntryFn,
}

impl ForeignEntry {
    /// Wrap a compiled entry point
    ///
    /// # Safety
    ///
    /// `entry` must return normally, and must only read and write cells inside
    /// the tape it is handed. No bounds are enforced on its behalf, whatever
    /// the configured [`Addressing`].
    pub unsafe fn new(entry: EntryFn) -> Self {
        ForeignEntry { entry }
    }
}

impl HostedProgram for ForeignEntry {
    fn enter(&mut self, session: &mut Session<'_>) {
        if session.cursor().addressing() == Addressing::Checked {
            warn!("Checked addressing does not apply to foreign entry points");
        }
        let cell = session.cursor().as_mut_ptr();
        debug!("Entering foreign hosted program at {:p}", cell);
        // SAFETY: the guard is dropped at the end of this block, while
        // `session` is still borrowed and otherwise untouched.
        let _active = unsafe { ActiveIo::install(session.io()) };
        // SAFETY: the contract was accepted in `ForeignEntry::new`, and the
        // pointer designates the center of a live tape borrowed by `session`.
        unsafe { (self.entry)(cell) }
    }
}

/// Set once the fallback path has reported an output failure
static STDOUT_FAILED: AtomicBool = AtomicBool::new(false);

fn note_stdout_failure(e: &io::Error) {
    if !STDOUT_FAILED.swap(true, Ordering::Relaxed) {
        warn!("Output write failed: {}", e);
    }
}

/// Read one byte of input; `-1` at end of stream
#[no_mangle]
pub extern "C" fn tapehost_read_byte() -> c_int {
    let byte = with_active_io(|io| io.read_byte()).unwrap_or_else(|| {
        if let Err(e) = io::stdout().flush() {
            note_stdout_failure(&e);
        }
        read_one(&mut io::stdin().lock())
    });
    match byte {
        Some(byte) => c_int::from(byte),
        None => EOF_SENTINEL,
    }
}

/// Write the low byte of `value` as output; returns it, or `-1`
#[no_mangle]
pub extern "C" fn tapehost_write_byte(value: c_int) -> c_int {
    // putchar converts to unsigned char
    let byte = value as u8;
    let written = with_active_io(|io| io.write_byte(byte)).unwrap_or_else(|| {
        io::stdout()
            .lock()
            .write_all(&[byte])
            .inspect_err(note_stdout_failure)
    });
    match written {
        Ok(()) => c_int::from(byte),
        Err(_) => EOF_SENTINEL,
    }
}

#[cfg(windows)]
pub(crate) fn set_binary_mode() -> io::Result<()> {
    const O_BINARY: c_int = 0x8000;

    extern "C" {
        fn _setmode(fd: c_int, mode: c_int) -> c_int;
    }

    for fd in [0, 1] {
        // SAFETY: descriptors 0 and 1 always exist in the CRT table
        if unsafe { _setmode(fd, O_BINARY) } == -1 {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("_setmode failed for descriptor {}", fd),
            ));
        }
    }
    Ok(())
}

// Streams are already untranslated bytes everywhere else
#[cfg(not(windows))]
pub(crate) fn set_binary_mode() -> io::Result<()> {
    Ok(())
}

#[cfg(feature = "linked-entry")]
extern "C" {
    fn bf_main(tape: *mut u8);
}

/// The `bf_main` symbol linked into this binary
#[cfg(feature = "linked-entry")]
pub fn linked_entry() -> ForeignEntry {
    // SAFETY: `bf_main` is produced by the Brainfuck compiler, which emits
    // code that stays within the tape for well-formed programs and returns.
    unsafe { ForeignEntry::new(bf_main) }
}
