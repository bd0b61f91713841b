//! # Number Column
//!
//! Fixed-width primitive storage. Values live in a plain `Vec<T>` for
//! native-speed access; the wire boundary converts through zerocopy's
//! little-endian types so the leaf encoding is identical on every target.
//!
//! Enum-typed attributes are stored here as `u8`; the translation to and
//! from the enum type happens at the entity property layer.

use eyre::Result;
use zerocopy::little_endian::{F32, F64, I16, I32, I64, U16, U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, Unaligned};

use crate::column::Column;
use crate::encoding::{decode_varint, push_varint};
use crate::tree_ensure;

/// A primitive that can cross the wire as a fixed-width little-endian value.
pub trait FixedWidth: Copy + Default + PartialEq + std::fmt::Debug + 'static {
    type Wire: IntoBytes + FromBytes + Immutable + Unaligned + Copy;

    fn to_wire(self) -> Self::Wire;
    fn from_wire(wire: Self::Wire) -> Self;
}

macro_rules! fixed_width_via {
    ($($ty:ty => $wire:ty),* $(,)?) => {$(
        impl FixedWidth for $ty {
            type Wire = $wire;

            fn to_wire(self) -> $wire {
                <$wire>::new(self)
            }

            fn from_wire(wire: $wire) -> $ty {
                wire.get()
            }
        }
    )*};
}

fixed_width_via! {
    i16 => I16, u16 => U16,
    i32 => I32, u32 => U32,
    i64 => I64, u64 => U64,
    f32 => F32, f64 => F64,
}

macro_rules! fixed_width_identity {
    ($($ty:ty),* $(,)?) => {$(
        impl FixedWidth for $ty {
            type Wire = $ty;

            fn to_wire(self) -> $ty {
                self
            }

            fn from_wire(wire: $ty) -> $ty {
                wire
            }
        }
    )*};
}

fixed_width_identity!(u8, i8);

/// Append-only column of fixed-width values, one per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberColumn<T: FixedWidth> {
    values: Vec<T>,
}

impl<T: FixedWidth> NumberColumn<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Value at `index`. Panics if `index >= len`.
    pub fn get(&self, index: usize) -> T {
        self.values[index]
    }

    /// Overwrites the value at `index`. Panics if `index >= len`.
    pub fn set(&mut self, index: usize, value: T) {
        self.values[index] = value;
    }

    /// Appends a value, returning its row index.
    pub fn push(&mut self, value: T) -> usize {
        self.values.push(value);
        self.values.len() - 1
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Grows or shrinks to exactly `len` slots, filling with `fill` rather
    /// than `T::default()`. Used by wrappers whose empty value is not the
    /// primitive default (reference columns fill with the none sentinel).
    pub fn resize_with(&mut self, len: usize, fill: T) {
        self.values.resize(len, fill);
    }
}

impl<T: FixedWidth> Column for NumberColumn<T> {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn grow(&mut self) {
        self.values.push(T::default());
    }

    fn resize(&mut self, len: usize) {
        self.values.resize(len, T::default());
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    fn encode(&self, buf: &mut Vec<u8>) {
        push_varint(buf, self.values.len() as u64);
        for value in &self.values {
            buf.extend_from_slice(value.to_wire().as_bytes());
        }
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<()> {
        let (count, header) = decode_varint(bytes)?;
        let payload = &bytes[header..];
        let width = std::mem::size_of::<T::Wire>();
        let expected = count.checked_mul(width as u64);
        tree_ensure!(
            expected == Some(payload.len() as u64),
            "number column declares {count} values ({width}B each), payload is {} bytes",
            payload.len()
        );

        self.values.clear();
        self.values.reserve(count as usize);
        for chunk in payload.chunks_exact(width) {
            let wire = T::Wire::read_from_bytes(chunk).unwrap(); // INVARIANT: chunks_exact yields width-sized chunks
            self.values.push(T::from_wire(wire));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_appends_default_slots() {
        let mut col: NumberColumn<i64> = NumberColumn::new();
        for _ in 0..5 {
            col.grow();
        }
        assert_eq!(col.len(), 5);
        for i in 0..5 {
            assert_eq!(col.get(i), 0);
        }
    }

    #[test]
    fn set_and_get_roundtrip() {
        let mut col: NumberColumn<i64> = NumberColumn::new();
        col.push(10);
        col.push(-3);
        col.set(0, 42);
        assert_eq!(col.get(0), 42);
        assert_eq!(col.get(1), -3);
    }

    #[test]
    #[should_panic]
    fn get_out_of_range_panics() {
        let col: NumberColumn<u8> = NumberColumn::new();
        col.get(0);
    }

    #[test]
    fn encode_decode_preserves_values() {
        let mut col: NumberColumn<i64> = NumberColumn::new();
        for v in [0i64, 1, -1, i64::MAX, i64::MIN, 123_456_789] {
            col.push(v);
        }

        let mut buf = Vec::new();
        col.encode(&mut buf);

        let mut restored: NumberColumn<i64> = NumberColumn::new();
        restored.decode(&buf).unwrap();
        assert_eq!(restored, col);
    }

    #[test]
    fn encode_is_little_endian() {
        let mut col: NumberColumn<u16> = NumberColumn::new();
        col.push(0x0102);
        let mut buf = Vec::new();
        col.encode(&mut buf);
        assert_eq!(buf, [1, 0x02, 0x01]);
    }

    #[test]
    fn decode_length_mismatch_is_structural() {
        let mut col: NumberColumn<i64> = NumberColumn::new();
        col.push(7);
        let mut buf = Vec::new();
        col.encode(&mut buf);
        buf.pop();

        let mut restored: NumberColumn<i64> = NumberColumn::new();
        let err = restored.decode(&buf).unwrap_err();
        assert!(err
            .downcast_ref::<crate::error::TreeError>()
            .unwrap()
            .is_structural());
    }

    #[test]
    fn empty_column_roundtrips() {
        let col: NumberColumn<f64> = NumberColumn::new();
        let mut buf = Vec::new();
        col.encode(&mut buf);

        let mut restored: NumberColumn<f64> = NumberColumn::new();
        restored.decode(&buf).unwrap();
        assert_eq!(restored.len(), 0);
    }
}
