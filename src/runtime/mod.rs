//! Tape runtime harness
//!
//! This module provides the harness that hosts a Brainfuck program:
//! - [`harness`]: lifecycle operations and the [`harness::Harness`] driver
//! - [`io`]: raw byte I/O offered to the hosted program
//! - [`ffi`]: the foreign-call boundary for compiled hosted programs
//! - [`config`]: run settings
//! - [`errors`]: harness error types
//!
//! # Execution Model
//!
//! One run is strictly sequential and single-threaded: the harness sets up the
//! tape, calls the hosted program once, and tears down when it returns. Only
//! `read_byte` may block.

pub mod config;
pub mod constants;
pub mod errors;
pub mod ffi;
pub mod harness;
pub mod io;
