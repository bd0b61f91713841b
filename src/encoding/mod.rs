//! # Wire Encoding Primitives
//!
//! Low-level encodings shared by the tree protocol and the column leaf
//! formats. Everything here is pure and allocation-free except
//! [`varint::push_varint`], which appends to a caller-owned buffer.

pub mod varint;

pub use varint::{decode_varint, encode_varint, push_varint, read_varint, varint_len};
