//! # Configuration Module
//!
//! Centralizes the wire-format and storage constants for the BSOA core.
//! Interdependent values live together so a format change touches one file.
//!
//! - [`constants`]: magic bytes, format version, sentinels, read limits

pub mod constants;
pub use constants::*;
