//! Memory model for the tape runtime
//!
//! This module provides the two memory abstractions a hosted program sees:
//! - [`tape`]: the fixed-size, zero-initialized arena owned by the harness
//! - [`cursor`]: an offset into the arena, loaned to the hosted program
//!
//! # Layout
//!
//! The cursor starts at the middle of the tape, so a hosted program has
//! `size / 2` cells to its left and `size - size / 2` cells (including the
//! starting cell) to its right:
//! ```text
//! base                  base + size/2                  base + size
//!  |<------ size/2 ------>|<------- size - size/2 ------->|
//!                         ^ initial cursor
//! ```
//!
//! # Addressing
//!
//! The arena never grows. Whether leaving it is detected depends on the
//! [`Addressing`](crate::runtime::config::Addressing) policy the cursor was
//! created with; the hosted-program interface is the same either way.

pub mod cursor;
pub mod tape;
