//! # Reference Column
//!
//! One optional row index into a target table per row. The target-table
//! binding lives in the generated database layer; this column only keeps
//! the indices honest. "No reference" is the [`NONE_INDEX`] sentinel so the
//! wire stays a flat packed `i32` run.

use eyre::Result;

use crate::column::number::NumberColumn;
use crate::column::Column;
use crate::config::NONE_INDEX;
use crate::tree_ensure;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefColumn {
    indices: NumberColumn<i32>,
}

impl RefColumn {
    pub fn new() -> Self {
        Self {
            indices: NumberColumn::new(),
        }
    }

    /// Referenced row at `index`, or `None`. Panics if `index >= len`.
    pub fn get(&self, index: usize) -> Option<usize> {
        let raw = self.indices.get(index);
        (raw >= 0).then_some(raw as usize)
    }

    /// Points row `index` at `target`, or clears it. Panics if
    /// `index >= len` or if `target` exceeds the 31-bit index range.
    pub fn set(&mut self, index: usize, target: Option<usize>) {
        let raw = match target {
            None => NONE_INDEX,
            Some(row) => i32::try_from(row).expect("row index exceeds reference range"),
        };
        self.indices.set(index, raw);
    }
}

impl Column for RefColumn {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn grow(&mut self) {
        self.indices.push(NONE_INDEX);
    }

    fn resize(&mut self, len: usize) {
        self.indices.resize_with(len, NONE_INDEX);
    }

    fn clear(&mut self) {
        self.indices.clear();
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        self.indices.encode(buf);
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<()> {
        self.indices.decode(bytes)?;
        for (row, &raw) in self.indices.as_slice().iter().enumerate() {
            tree_ensure!(
                raw >= NONE_INDEX,
                "reference column row {row} holds invalid index {raw}"
            );
        }
        Ok(())
    }
}
