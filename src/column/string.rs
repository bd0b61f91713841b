//! # String Column
//!
//! One UTF-8 string per row. The leaf packs all rows into a single
//! length-prefixed run so a table with a million short strings costs one
//! section, not a million.

use eyre::Result;

use crate::column::Column;
use crate::encoding::{decode_varint, push_varint};
use crate::tree_ensure;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringColumn {
    values: Vec<String>,
}

impl StringColumn {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Value at `index`. Panics if `index >= len`.
    pub fn get(&self, index: usize) -> &str {
        &self.values[index]
    }

    /// Overwrites the value at `index`. Panics if `index >= len`.
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        self.values[index] = value.into();
    }

    /// Appends a value, returning its row index.
    pub fn push(&mut self, value: impl Into<String>) -> usize {
        self.values.push(value.into());
        self.values.len() - 1
    }
}

impl Column for StringColumn {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn grow(&mut self) {
        self.values.push(String::new());
    }

    fn resize(&mut self, len: usize) {
        self.values.resize(len, String::new());
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        push_varint(buf, self.values.len() as u64);
        for value in &self.values {
            push_varint(buf, value.len() as u64);
            buf.extend_from_slice(value.as_bytes());
        }
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<()> {
        let (count, mut cursor) = decode_varint(bytes)?;
        // Every row costs at least its one-byte length prefix, so a count
        // beyond the payload size cannot be honest.
        tree_ensure!(
            count <= (bytes.len() - cursor) as u64,
            "string column count {count} exceeds payload size"
        );

        self.values.clear();
        self.values.reserve(count as usize);
        for row in 0..count {
            let (len, read) = decode_varint(&bytes[cursor..])?;
            cursor += read;
            let end = cursor.checked_add(len as usize);
            tree_ensure!(
                end.is_some_and(|end| end <= bytes.len()),
                "string column row {row} declares {len} bytes past the payload end"
            );
            let end = end.unwrap(); // INVARIANT: bounds checked above
            let value = match std::str::from_utf8(&bytes[cursor..end]) {
                Ok(s) => s,
                Err(_) => eyre::bail!(crate::error::TreeError::Structural(format!(
                    "string column row {row} is not UTF-8"
                ))),
            };
            self.values.push(value.to_owned());
            cursor = end;
        }
        tree_ensure!(
            cursor == bytes.len(),
            "string column payload has {} trailing bytes",
            bytes.len() - cursor
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_mixed_content() {
        let mut col = StringColumn::new();
        col.push("");
        col.push("plain");
        col.push("naïve — ünïcödé 🚀");
        col.push("x".repeat(5000));

        let mut buf = Vec::new();
        col.encode(&mut buf);

        let mut restored = StringColumn::new();
        restored.decode(&buf).unwrap();
        assert_eq!(restored, col);
    }

    #[test]
    fn grow_appends_empty_strings() {
        let mut col = StringColumn::new();
        col.grow();
        col.grow();
        assert_eq!(col.len(), 2);
        assert_eq!(col.get(1), "");
    }

    #[test]
    fn truncated_payload_is_structural() {
        let mut col = StringColumn::new();
        col.push("hello world");
        let mut buf = Vec::new();
        col.encode(&mut buf);
        buf.truncate(buf.len() - 3);

        let mut restored = StringColumn::new();
        let err = restored.decode(&buf).unwrap_err();
        assert!(err
            .downcast_ref::<crate::error::TreeError>()
            .unwrap()
            .is_structural());
    }

    #[test]
    fn invalid_utf8_is_structural() {
        let mut buf = Vec::new();
        crate::encoding::push_varint(&mut buf, 1);
        crate::encoding::push_varint(&mut buf, 2);
        buf.extend_from_slice(&[0xFF, 0xFE]);

        let mut restored = StringColumn::new();
        assert!(restored.decode(&buf).is_err());
    }

    #[test]
    fn trailing_bytes_are_structural() {
        let mut col = StringColumn::new();
        col.push("a");
        let mut buf = Vec::new();
        col.encode(&mut buf);
        buf.push(0);

        let mut restored = StringColumn::new();
        assert!(restored.decode(&buf).is_err());
    }
}
