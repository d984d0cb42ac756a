//! The byte tape.
//!
//! Cell values wrap modulo 256; the cursor does not.  Moving past either edge
//! is reported as [`Error::TapeOutOfBounds`] and the caller is expected to
//! abort the run.

use crate::error::{Direction, Error, Result};

/// A fixed-size array of byte cells plus a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Box<[u8]>,
    cursor: usize,
}

impl Tape {
    /// A zeroed tape of `len` cells with the cursor at cell 0.
    ///
    /// A tape always has at least one cell; `len` 0 builds a single-cell
    /// tape.  [`EngineConfig::validate`] rejects a zero tape size before the
    /// interpreter asks for one.
    ///
    /// [`EngineConfig::validate`]: crate::config::EngineConfig::validate
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![0u8; len.max(1)].into_boxed_slice(),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Value of the cell under the cursor.
    pub fn read(&self) -> u8 {
        self.cells[self.cursor]
    }

    pub fn write(&mut self, value: u8) {
        self.cells[self.cursor] = value;
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_sub(1);
    }

    pub fn move_right(&mut self) -> Result<()> {
        if self.cursor + 1 >= self.cells.len() {
            return Err(self.out_of_bounds(Direction::Right));
        }
        self.cursor += 1;
        Ok(())
    }

    pub fn move_left(&mut self) -> Result<()> {
        if self.cursor == 0 {
            return Err(self.out_of_bounds(Direction::Left));
        }
        self.cursor -= 1;
        Ok(())
    }

    fn out_of_bounds(&self, direction: Direction) -> Error {
        Error::TapeOutOfBounds {
            cursor: self.cursor,
            len: self.cells.len(),
            direction,
        }
    }
}
