//! # Introduction
//!
//! tapehost is the runtime harness for compiled Brainfuck programs. It
//! provisions a large zero-filled tape, hands the hosted program a cursor at
//! the middle of it, runs the program once, and tears everything down.
//!
//! ## Lifecycle
//!
//! ```text
//! configure_io → allocate_tape → compute_cursor → invoke → finalize
//! ```
//!
//! 1. [`runtime`]: harness configuration, lifecycle operations, raw byte
//!    I/O, and the foreign-call boundary for compiled entry points.
//! 2. [`memory`]: the [`memory::tape::Tape`] arena and the
//!    [`memory::cursor::Cursor`] loaned to the hosted program.
//! 3. [`program`]: a reference hosted program, a Brainfuck interpreter that
//!    works only through the cursor and I/O the harness provides.
//!
//! ## Memory model
//!
//! The tape is fixed at 4,000,000 cells by default and never grows. The cursor
//! starts at `base + size/2`. Movement is unchecked unless
//! [`runtime::config::Addressing::Checked`] is selected.
//!
//! ## Diagnostics
//!
//! On success the harness writes exactly one line, `Exited successfully`, to
//! the diagnostic stream. Everything else the library reports goes through the
//! [`log`](https://docs.rs/log) facade and is silent unless a logger is set.

pub mod memory;
pub mod program;
pub mod runtime;
