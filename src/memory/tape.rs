//! The tape arena
//!
//! A [`Tape`] is allocated once per run, zero-filled, and released by `Drop`
//! exactly once. Everything the hosted program does to it goes through a
//! [`Cursor`] borrowed from the tape, so the tape cannot be released while a
//! cursor into it is still alive.

use super::cursor::Cursor;
use crate::runtime::config::Addressing;
use crate::runtime::errors::HarnessError;

/// Fixed-size byte arena simulating Brainfuck data memory
#[derive(Debug)]
pub struct Tape {
    cells: Box<[u8]>,
}

impl Tape {
    /// Allocate a zero-initialized tape of exactly `size` bytes
    ///
    /// Reservation is fallible so that running out of memory is reported as
    /// [`HarnessError::AllocationFailure`] instead of aborting in the allocator.
    pub fn allocate(size: usize) -> Result<Self, HarnessError> {
        if size == 0 {
            return Err(HarnessError::InvalidTapeSize { size });
        }

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|_| HarnessError::AllocationFailure { requested: size })?;
        cells.resize(size, 0u8);

        Ok(Tape {
            cells: cells.into_boxed_slice(),
        })
    }

    /// Size of the tape in cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a tape holds at least one cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Address of the first cell
    pub fn base_address(&self) -> usize {
        self.cells.as_ptr() as usize
    }

    /// Index of the cell the initial cursor points at
    pub fn center(&self) -> usize {
        self.cells.len() / 2
    }

    /// Read-only view of every cell
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Loan a cursor positioned at `base + size/2`
    pub fn cursor(&mut self, addressing: Addressing) -> Cursor<'_> {
        Cursor::new(&mut self.cells, addressing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_exact_size_and_zeroed() {
        let tape = Tape::allocate(4_000_000).unwrap();
        assert_eq!(tape.len(), 4_000_000);
        assert!(tape.cells().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_allocate_zero_size_rejected() {
        assert_eq!(
            Tape::allocate(0).unwrap_err(),
            HarnessError::InvalidTapeSize { size: 0 }
        );
    }

    #[test]
    fn test_allocate_impossible_size_fails() {
        let err = Tape::allocate(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            HarnessError::AllocationFailure {
                requested: usize::MAX
            }
        );
    }

    #[test]
    fn test_center_of_odd_tape() {
        let tape = Tape::allocate(7).unwrap();
        assert_eq!(tape.center(), 3);
    }
}
