//! # Table Abstraction
//!
//! A table owns a fixed, named set of columns decided at schema generation
//! time, plus the authoritative row count. `add` allocates a row in every
//! column simultaneously; there is no per-row deletion — storage is
//! append-only for the life of the database.
//!
//! ## Serialized Shape
//!
//! ```text
//! <TableName> (node)
//! ├── count   (leaf: varint row count)
//! ├── <col-1> (leaf: column encoding)
//! ├── ...
//! └── <col-n> (leaf)
//! ```
//!
//! ## Read Tolerance
//!
//! Reading accepts sections in written order but does not require any
//! particular set: unknown sections are skipped (newer writer), missing
//! columns are grown to the row count with defaults (older writer). The
//! explicit `count` leaf is authoritative when present; otherwise the
//! longest decoded column establishes the count. A column longer than the
//! count is a structural error — that stream is lying about its shape.

use eyre::{Result, WrapErr};

use crate::column::Column;
use crate::encoding::{decode_varint, push_varint};
use crate::tree::reader::{SectionHeader, TreeReader};
use crate::tree::writer::TreeWriter;
use crate::tree_ensure;

/// Name of the row-count leaf inside every table node.
const COUNT_SECTION: &str = "count";

/// A named, fixed set of columns sharing a row count. Implemented by
/// generated table types; the tree drivers operate through this trait.
pub trait Table {
    fn name(&self) -> &'static str;

    /// Authoritative row count. Every column holds exactly this many slots
    /// at any observation point outside a mutation in progress.
    fn count(&self) -> usize;

    /// Allocates one row across all columns, returning its index.
    fn add(&mut self) -> usize;

    /// Drops all rows from all columns.
    fn clear(&mut self);

    /// Columns in their fixed, generation-time order.
    fn columns(&self) -> Vec<(&'static str, &dyn Column)>;

    fn columns_mut(&mut self) -> Vec<(&'static str, &mut dyn Column)>;

    /// Restores the row count after a read. Only the tree reader calls
    /// this; application code grows tables through [`add`](Self::add).
    fn set_count(&mut self, count: usize);
}

/// Writes `table` as one named node: the count leaf plus one leaf per
/// column, in schema order.
pub fn write_table(table: &dyn Table, writer: &mut TreeWriter) -> Result<()> {
    let columns = table.columns();
    writer.begin_node(table.name(), 1 + columns.len() as u64)?;

    let mut buf = Vec::new();
    push_varint(&mut buf, table.count() as u64);
    writer.leaf(COUNT_SECTION, &buf)?;

    for (name, column) in columns {
        buf.clear();
        column.encode(&mut buf);
        writer.leaf(name, &buf)?;
    }
    writer.end_node()
}

/// Repopulates `table` from a table node whose header (with `children`
/// sections) has already been consumed.
pub fn read_table(table: &mut dyn Table, reader: &mut TreeReader, children: u64) -> Result<()> {
    let table_name = table.name();
    table.clear();
    table.set_count(0);

    let mut explicit_count: Option<usize> = None;
    for _ in 0..children {
        let header = reader.read_header()?;
        match header {
            SectionHeader::Leaf { ref name, len } if name.as_str() == COUNT_SECTION => {
                let bytes = reader.read_leaf(len)?;
                let (count, read) = decode_varint(&bytes)?;
                tree_ensure!(
                    read == bytes.len(),
                    "count leaf of table '{table_name}' has trailing bytes"
                );
                explicit_count = Some(count as usize);
            }
            SectionHeader::Leaf { ref name, len } => {
                let matched = {
                    let mut columns = table.columns_mut();
                    match columns.iter_mut().find(|(n, _)| *n == name.as_str()) {
                        Some((_, column)) => {
                            let bytes = reader.read_leaf(len)?;
                            column
                                .decode(&bytes)
                                .wrap_err_with(|| format!("column '{name}' of table '{table_name}'"))?;
                            true
                        }
                        None => false,
                    }
                };
                if !matched {
                    reader.skip_leaf(len)?;
                }
            }
            node @ SectionHeader::Node { .. } => {
                reader.skip_section(&node)?;
            }
        }
    }

    let count = match explicit_count {
        Some(count) => count,
        None => table
            .columns()
            .iter()
            .map(|(_, column)| column.len())
            .max()
            .unwrap_or(0),
    };
    for (name, column) in table.columns() {
        tree_ensure!(
            column.len() <= count,
            "column '{name}' of table '{table_name}' has {} rows, count is {count}",
            column.len()
        );
    }
    for (_, column) in table.columns_mut() {
        column.resize(count);
    }
    table.set_count(count);
    Ok(())
}
