//! Cursor into the tape
//!
//! A [`Cursor`] is the hosted program's only handle on the tape. It stores a
//! signed index from the tape base so that, under unchecked addressing, it may
//! wander past either edge exactly as a raw pointer would; only dereferencing
//! it there is a fault.

use crate::runtime::config::Addressing;
use crate::runtime::errors::HarnessError;

/// A position on the tape, loaned to the hosted program for one invocation
#[derive(Debug)]
pub struct Cursor<'t> {
    cells: &'t mut [u8],
    index: isize,
    center: usize,
    addressing: Addressing,
}

impl<'t> Cursor<'t> {
    pub(crate) fn new(cells: &'t mut [u8], addressing: Addressing) -> Self {
        let center = cells.len() / 2;
        Cursor {
            cells,
            // Slices never exceed isize::MAX bytes
            index: center as isize,
            center,
            addressing,
        }
    }

    /// Signed distance from the initial (center) position
    pub fn offset(&self) -> isize {
        self.index - self.center as isize
    }

    /// Signed distance from the first cell of the tape
    pub fn index(&self) -> isize {
        self.index
    }

    /// Absolute address the cursor currently designates
    pub fn address(&self) -> usize {
        (self.cells.as_ptr() as usize).wrapping_add_signed(self.index)
    }

    /// Raw pointer to the current cell, for foreign hosted programs
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.cells.as_mut_ptr().wrapping_offset(self.index)
    }

    pub fn tape_len(&self) -> usize {
        self.cells.len()
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// Whether the cursor currently designates a cell of the tape
    pub fn in_bounds(&self) -> bool {
        usize::try_from(self.index).is_ok_and(|i| i < self.cells.len())
    }

    /// Move the cursor by `delta` cells (negative is left)
    ///
    /// Under [`Addressing::Checked`] a move that would leave the tape fails with
    /// [`HarnessError::OutOfRange`] and the cursor stays where it was.
    pub fn shift(&mut self, delta: isize) -> Result<(), HarnessError> {
        match self.addressing {
            Addressing::Unchecked => {
                self.index = self.index.wrapping_add(delta);
                Ok(())
            }
            Addressing::Checked => {
                let target = self.index.saturating_add(delta);
                if usize::try_from(target).is_ok_and(|i| i < self.cells.len()) {
                    self.index = target;
                    Ok(())
                } else {
                    Err(HarnessError::OutOfRange {
                        offset: target.saturating_sub(self.center as isize),
                        size: self.cells.len(),
                    })
                }
            }
        }
    }

    /// Value of the current cell
    pub fn get(&self) -> u8 {
        self.cells[self.slot()]
    }

    /// Overwrite the current cell
    pub fn set(&mut self, value: u8) {
        let slot = self.slot();
        self.cells[slot] = value;
    }

    /// Add to the current cell, wrapping modulo 256
    pub fn add(&mut self, amount: u8) {
        let slot = self.slot();
        self.cells[slot] = self.cells[slot].wrapping_add(amount);
    }

    fn slot(&self) -> usize {
        match usize::try_from(self.index) {
            Ok(i) if i < self.cells.len() => i,
            _ => self.outside_tape(),
        }
    }

    // Only reachable under unchecked addressing
    #[cold]
    #[inline(never)]
    fn outside_tape(&self) -> ! {
        panic!(
            "hosted program accessed offset {} outside the tape of {} bytes",
            self.offset(),
            self.cells.len()
        )
    }
}
