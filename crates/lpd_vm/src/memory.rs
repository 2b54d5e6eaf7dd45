use crate::error::ExecError;

/// Fixed-capacity cell array shared by globals, frames and the operand stack.
///
/// Addresses are signed so that a pop from the empty stack (address -1)
/// is reported like any other out-of-range access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<i64>,
}

impl Memory {
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    fn slot(&self, address: i64) -> Result<usize, ExecError> {
        usize::try_from(address)
            .ok()
            .filter(|&i| i < self.cells.len())
            .ok_or(ExecError::MemoryOutOfBounds {
                address,
                capacity: self.cells.len(),
            })
    }

    pub fn read(&self, address: i64) -> Result<i64, ExecError> {
        let i = self.slot(address)?;
        Ok(self.cells[i])
    }

    pub fn write(&mut self, address: i64, value: i64) -> Result<(), ExecError> {
        let i = self.slot(address)?;
        self.cells[i] = value;
        Ok(())
    }

    pub fn cells(&self) -> &[i64] {
        &self.cells
    }

    /// Zero every cell, keeping the capacity.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}
