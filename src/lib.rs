//! # BSOA - Binary Structure-Of-Arrays
//!
//! BSOA is an in-memory columnar object store. Each logical entity type is
//! a table of parallel columns rather than a heap of individually
//! allocated objects; entity instances are thin row-handles (database +
//! row index) over that storage. Whole databases serialize as one
//! self-describing binary tree, so files can be structurally validated
//! without materializing a single entity.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Generated entities (Company/Team/...)  │  row handles, typed accessors
//! ├─────────────────────────────────────────┤
//! │  Database + reference resolution        │  local_index, deep clone
//! ├─────────────────────────────────────────┤
//! │  Tables (named column sets)             │  shared row count, add()
//! ├─────────────────────────────────────────┤
//! │  Columns (number/string/ref/ref-list)   │  contiguous per-attribute
//! ├─────────────────────────────────────────┤
//! │  Binary tree protocol (writer/reader)   │  named nested sections
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use bsoa::{Company, CompanyDatabase, Employee, Team};
//!
//! let db = CompanyDatabase::new();
//! let company = Company::new(&db).with_id(1).with_name("Contoso");
//! let owner = Employee::new(&db).with_id(100);
//! let team = Team::new(&db).with_id(10).with_owner(&owner);
//! company.teams().add(&team);
//!
//! company.write_bsoa("company.bsoa")?;
//! let restored = Company::read_bsoa("company.bsoa")?;
//! assert!(restored.value_eq(&company));
//!
//! let shape = Company::diagnostics("company.bsoa")?;
//! println!("{shape}");
//! ```
//!
//! ## Guarantees
//!
//! - **Round-trip identity**: a written database reads back value-equal,
//!   field for field and reference for reference.
//! - **Append-only growth**: rows are added, never deleted or compacted;
//!   every column always holds exactly the table's row count.
//! - **Structural equality**: entities compare by value, never by row
//!   location, so clones and round-tripped copies are equal.
//! - **Non-overrun reads**: every section consumes exactly its declared
//!   extent; corrupt lengths fail with a structural error, not a partial
//!   database.
//!
//! ## Concurrency
//!
//! The store is single-threaded by design: one database, one logical
//! writer, no locks. Callers needing cross-thread access serialize it
//! themselves.
//!
//! ## Module Overview
//!
//! - [`tree`]: the named, length-prefixed, nested-section binary protocol
//! - [`column`]: typed column storage and leaf encodings
//! - [`model`]: generic table/database serialization drivers
//! - [`company`]: the reference generated schema (root entity `Company`)
//! - [`encoding`]: varint primitives shared by the wire formats
//! - [`error`]: the structural / state-misuse / I/O error taxonomy

mod macros;

pub mod column;
pub mod company;
pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod tree;

pub use company::{
    Company, CompanyDatabase, Employee, EmployeeList, SecurityPolicy, Team, TeamList,
};
pub use error::TreeError;
pub use tree::{SectionStats, TreeDiagnostics, TreeReader, TreeWriter};
