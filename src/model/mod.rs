//! # Table and Database Model
//!
//! The generic machinery between the tree protocol and a generated schema.
//! A [`Table`](table::Table) is a named set of columns sharing one
//! authoritative row count; a database is a named set of tables. The
//! drivers here serialize both as tree sections and read them back with
//! schema tolerance: unknown sections are skipped, missing columns are
//! grown to the table's row count with default values.

pub mod database;
pub mod table;

pub use database::{read_database, write_database};
pub use table::{read_table, write_table, Table};
