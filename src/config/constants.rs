//! # Format Constants
//!
//! Every constant that defines the `.bsoa` wire format or the in-memory
//! growth policy lives here. The format constants are load-bearing: changing
//! any of them breaks compatibility with previously written streams, so they
//! are versioned through [`FORMAT_VERSION`].
//!
//! ## Stream Layout
//!
//! ```text
//! +-------------+-------------+----------------------+
//! | Magic (4B)  | Version(1B) | Root section         |
//! +-------------+-------------+----------------------+
//! ```
//!
//! A section is a varint-length-prefixed name, a kind byte, and either a
//! varint byte length plus payload (leaf) or a varint child count plus
//! children (node). See `tree::writer` for the full grammar.

/// Magic bytes at the start of every serialized stream.
pub const FORMAT_MAGIC: &[u8; 4] = b"BSOA";

/// Wire format version. Bumped on any incompatible change to the section
/// grammar or the column leaf encodings.
pub const FORMAT_VERSION: u8 = 1;

/// Section kind byte for a leaf (raw payload bytes).
pub const KIND_LEAF: u8 = 0;

/// Section kind byte for an interior node (named children).
pub const KIND_NODE: u8 = 1;

/// Sentinel stored in a reference column for "no reference".
/// Must be negative so it can never collide with a row index.
pub const NONE_INDEX: i32 = -1;

/// Maximum UTF-8 byte length of a section name. Section names come from the
/// schema generator, not from user data; this bound exists so a corrupt
/// length prefix fails fast instead of allocating.
pub const MAX_SECTION_NAME_LEN: u64 = 255;

/// Chunk size for reading leaf payloads. A leaf's declared length is not
/// trusted until the bytes actually arrive, so reads allocate at most one
/// chunk ahead of the data.
pub const LEAF_READ_CHUNK: usize = 64 * 1024;

/// Inline capacity of a per-row reference run before it spills to the heap.
/// Most reference lists in real graphs hold a handful of entries.
pub const INLINE_REF_RUN: usize = 4;

/// Worst-case encoded size of a varint.
pub const MAX_VARINT_LEN: usize = 9;

/// Maximum section nesting depth a reader will follow. Real streams nest
/// three levels (database, table, column); the bound stops a corrupt child
/// count from recursing the walker off the stack.
pub const MAX_TREE_DEPTH: usize = 64;

const _: () = assert!(NONE_INDEX < 0, "NONE_INDEX must never collide with a row index");
