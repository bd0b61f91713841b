//! # Reference List Column
//!
//! An ordered run of row indices into a target table, per row. This is the
//! storage behind list-valued relationships (`company.teams()`,
//! `team.members()`): the list view the entity layer hands out translates
//! every operation directly into one of the mutators here, so there is no
//! separate commit step — membership and order changes land immediately.
//!
//! Runs are kept inline up to [`INLINE_REF_RUN`] entries; most reference
//! lists in real graphs are short.

use eyre::Result;
use smallvec::SmallVec;

use crate::column::Column;
use crate::config::INLINE_REF_RUN;
use crate::encoding::{decode_varint, push_varint};
use crate::tree_ensure;

type Run = SmallVec<[u32; INLINE_REF_RUN]>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefListColumn {
    rows: Vec<Run>,
}

impl RefListColumn {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Number of references held by `row`. Panics if `row >= len`.
    pub fn row_len(&self, row: usize) -> usize {
        self.rows[row].len()
    }

    /// Target index at `slot` of `row`'s run. Panics if out of range.
    pub fn get(&self, row: usize, slot: usize) -> usize {
        self.rows[row][slot] as usize
    }

    /// The full run for `row`, in order.
    pub fn indices(&self, row: usize) -> &[u32] {
        &self.rows[row]
    }

    /// Appends `target` to `row`'s run.
    pub fn push(&mut self, row: usize, target: usize) {
        self.rows[row].push(to_u32(target));
    }

    /// Overwrites the reference at `slot` of `row`'s run.
    pub fn set(&mut self, row: usize, slot: usize, target: usize) {
        self.rows[row][slot] = to_u32(target);
    }

    /// Inserts `target` at `slot`, shifting later references.
    pub fn insert(&mut self, row: usize, slot: usize, target: usize) {
        self.rows[row].insert(slot, to_u32(target));
    }

    /// Removes and returns the reference at `slot`.
    pub fn remove(&mut self, row: usize, slot: usize) -> usize {
        self.rows[row].remove(slot) as usize
    }

    /// Replaces `row`'s run wholesale, preserving iteration order.
    pub fn set_row(&mut self, row: usize, targets: impl IntoIterator<Item = usize>) {
        let run: Run = targets.into_iter().map(to_u32).collect();
        self.rows[row] = run;
    }

    pub fn clear_row(&mut self, row: usize) {
        self.rows[row].clear();
    }
}

fn to_u32(target: usize) -> u32 {
    u32::try_from(target).expect("row index exceeds reference range")
}

impl Column for RefListColumn {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn grow(&mut self) {
        self.rows.push(Run::new());
    }

    fn resize(&mut self, len: usize) {
        self.rows.resize(len, Run::new());
    }

    fn clear(&mut self) {
        self.rows.clear();
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        push_varint(buf, self.rows.len() as u64);
        for run in &self.rows {
            push_varint(buf, run.len() as u64);
            for &target in run {
                push_varint(buf, target as u64);
            }
        }
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<()> {
        let (count, mut cursor) = decode_varint(bytes)?;
        // Every row costs at least its one-byte run length, so a count
        // beyond the payload size cannot be honest.
        tree_ensure!(
            count <= (bytes.len() - cursor) as u64,
            "reference list count {count} exceeds payload size"
        );

        self.rows.clear();
        self.rows.reserve(count as usize);
        for row in 0..count {
            let (run_len, read) = decode_varint(&bytes[cursor..])?;
            cursor += read;
            tree_ensure!(
                run_len <= (bytes.len() - cursor) as u64,
                "reference list row {row} run length {run_len} exceeds payload size"
            );
            let mut run = Run::new();
            run.reserve(run_len as usize);
            for _ in 0..run_len {
                let (target, read) = decode_varint(&bytes[cursor..])?;
                cursor += read;
                tree_ensure!(
                    target <= u32::MAX as u64,
                    "reference list row {row} holds out-of-range index {target}"
                );
                run.push(target as u32);
            }
            self.rows.push(run);
        }
        tree_ensure!(
            cursor == bytes.len(),
            "reference list payload has {} trailing bytes",
            bytes.len() - cursor
        );
        Ok(())
    }
}
