//! # Database Drivers
//!
//! A database serializes as a single tree: one root node named after the
//! schema, one child node per table. These drivers are schema-agnostic —
//! the generated database type supplies the root name and the table set,
//! and everything else is the generic table machinery.
//!
//! A root whose name does not match the expected schema fails before any
//! table is touched; callers read into a fresh database and swap it in
//! only on success, so a failed read never leaves a partially populated
//! database behind.

use eyre::Result;
use tracing::{debug, trace};

use crate::model::table::{read_table, write_table, Table};
use crate::tree::reader::{SectionHeader, TreeReader};
use crate::tree::writer::TreeWriter;

/// Writes every table under a root node named `root_name`, in schema order.
pub fn write_database(
    writer: &mut TreeWriter,
    root_name: &'static str,
    tables: &[&dyn Table],
) -> Result<()> {
    debug!(root = root_name, tables = tables.len(), "writing database tree");
    writer.begin_node(root_name, tables.len() as u64)?;
    for table in tables {
        write_table(*table, writer)?;
        trace!(table = table.name(), rows = table.count(), "table written");
    }
    writer.end_node()?;
    debug!(bytes = writer.bytes_written(), "database tree written");
    Ok(())
}

/// Repopulates `tables` from a database tree whose root must be named
/// `root_name`. Tables absent from the stream are left empty; sections
/// naming no known table are skipped.
pub fn read_database(
    reader: &mut TreeReader,
    root_name: &'static str,
    tables: &mut [&mut dyn Table],
) -> Result<()> {
    let children = reader.expect_root(root_name)?;
    debug!(root = root_name, sections = children, "reading database tree");

    for table in tables.iter_mut() {
        table.clear();
        table.set_count(0);
    }

    for _ in 0..children {
        let header = reader.read_header()?;
        match header {
            SectionHeader::Node { ref name, children } => {
                match tables.iter_mut().find(|t| t.name() == name.as_str()) {
                    Some(table) => {
                        read_table(&mut **table, reader, children)?;
                        trace!(table = table.name(), rows = table.count(), "table read");
                    }
                    None => {
                        trace!(section = name.as_str(), "skipping unknown table section");
                        reader.skip_section(&header)?;
                    }
                }
            }
            leaf @ SectionHeader::Leaf { .. } => {
                trace!(section = leaf.name(), "skipping unknown leaf section");
                reader.skip_section(&leaf)?;
            }
        }
    }
    Ok(())
}
