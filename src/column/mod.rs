//! # Column Storage
//!
//! A column stores one attribute's values for every row of a table,
//! contiguously. Tables own a fixed set of columns decided at schema
//! generation time; every column in a table holds exactly the table's row
//! count of slots.
//!
//! ## Variants
//!
//! | Type | Stores | Leaf encoding |
//! |------|--------|---------------|
//! | [`NumberColumn<T>`] | fixed-width primitives (enums as `u8`) | varint count + packed little-endian values |
//! | [`StringColumn`] | UTF-8 strings | varint count + per-row varint length + bytes |
//! | [`RefColumn`] | one row index into a target table, or none | varint count + packed `i32` (`-1` = none) |
//! | [`RefListColumn`] | an ordered run of row indices per row | varint count + per-row varint length + varint indices |
//!
//! ## Access Contract
//!
//! `get`/`set` with a row index outside `[0, len)` is a programming error
//! in the row-handle layer and panics with slice-indexing semantics. Growth
//! happens only through `Table::add` (one default slot per column) or
//! through decoding, which reconstructs the serialized row count.

pub mod number;
pub mod ref_list;
pub mod reference;
pub mod string;

pub use number::{FixedWidth, NumberColumn};
pub use ref_list::RefListColumn;
pub use reference::RefColumn;
pub use string::StringColumn;

use eyre::Result;

/// Uniform per-column operations the table layer drives: shared row count
/// maintenance and leaf serialization. Typed access goes through the
/// concrete column types.
pub trait Column {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends one default-valued slot. Called by `Table::add` on every
    /// column so the shared row count stays consistent.
    fn grow(&mut self);

    /// Grows or shrinks to exactly `len` slots, filling with defaults.
    /// Used when a serialized table omits this column: the column still
    /// must reach the table's row count.
    fn resize(&mut self, len: usize);

    fn clear(&mut self);

    /// Encodes the full contents as one leaf payload.
    fn encode(&self, buf: &mut Vec<u8>);

    /// Replaces the contents from a leaf payload, growing to the
    /// serialized row count. Malformed payloads are structural errors.
    fn decode(&mut self, bytes: &[u8]) -> Result<()>;
}
