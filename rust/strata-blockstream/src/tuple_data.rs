//! Encoded tuple storage backing value blocks.

use strata_common::{Result, error::Error, verify_arg};

use crate::layout::{FieldType, TupleLayout};

/// A run of encoded tuples sharing one [`TupleLayout`].
///
/// Tuples are stored back to back in a single byte buffer, with a `u64`
/// offsets array (`tuple_count + 1` entries) marking the tuple boundaries.
/// Each encoded tuple consists of the layout's slot table followed by the
/// variable-length region, see [`TupleLayout`].
///
/// Fixed-width values are stored in native byte order; the buffer is an
/// in-memory representation and never leaves the process.
#[derive(Clone)]
pub struct TupleData {
    layout: TupleLayout,
    bytes: Vec<u8>,
    offsets: Vec<u64>,
}

impl TupleData {
    /// Encodes a sequence of integers as single-field `Int64` tuples.
    pub fn from_i64s(values: impl IntoIterator<Item = i64>) -> TupleData {
        let values = values.into_iter();
        let (lower, _) = values.size_hint();
        let mut bytes = Vec::with_capacity(lower * TupleLayout::SLOT_SIZE);
        let mut offsets = Vec::with_capacity(lower + 1);
        offsets.push(0u64);
        for value in values {
            bytes.extend_from_slice(bytemuck::bytes_of(&value));
            offsets.push(bytes.len() as u64);
        }
        TupleData {
            layout: TupleLayout::single(FieldType::Int64),
            bytes,
            offsets,
        }
    }

    #[inline]
    pub fn layout(&self) -> &TupleLayout {
        &self.layout
    }

    #[inline]
    pub fn tuple_count(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tuple_count() == 0
    }

    /// Total size of the encoded tuples in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns an accessor for the tuple at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= tuple_count()`.
    #[inline]
    pub fn tuple(&self, index: usize) -> TupleRef<'_> {
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        TupleRef {
            layout: &self.layout,
            bytes: &self.bytes[start..end],
        }
    }
}

/// A borrowed view of one encoded tuple.
#[derive(Clone, Copy)]
pub struct TupleRef<'a> {
    layout: &'a TupleLayout,
    bytes: &'a [u8],
}

impl<'a> TupleRef<'a> {
    /// A tuple without fields.
    pub fn empty(layout: &'a TupleLayout) -> TupleRef<'a> {
        debug_assert!(layout.is_empty());
        TupleRef { layout, bytes: &[] }
    }

    #[inline]
    pub fn layout(&self) -> &'a TupleLayout {
        self.layout
    }

    /// Reads an `Int64` field.
    ///
    /// # Panics
    ///
    /// Panics if `field` is out of bounds or is not an `Int64` field.
    pub fn get_i64(&self, field: usize) -> i64 {
        self.expect_type(field, FieldType::Int64);
        bytemuck::pod_read_unaligned(self.slot(field))
    }

    /// Reads a `Float64` field.
    ///
    /// # Panics
    ///
    /// Panics if `field` is out of bounds or is not a `Float64` field.
    pub fn get_f64(&self, field: usize) -> f64 {
        self.expect_type(field, FieldType::Float64);
        bytemuck::pod_read_unaligned(self.slot(field))
    }

    /// Reads a `Binary` field.
    ///
    /// # Panics
    ///
    /// Panics if `field` is out of bounds or is not a `Binary` field.
    pub fn get_bytes(&self, field: usize) -> &'a [u8] {
        self.expect_type(field, FieldType::Binary);
        let end = self.binary_end(field);
        let start = self
            .layout
            .prev_binary(field)
            .map_or(0, |prev| self.binary_end(prev));
        let base = self.layout.slot_table_size();
        &self.bytes[base + start..base + end]
    }

    fn binary_end(&self, field: usize) -> usize {
        bytemuck::pod_read_unaligned::<u64>(self.slot(field)) as usize
    }

    #[inline]
    fn slot(&self, field: usize) -> &'a [u8] {
        let offset = self.layout.slot_offset(field);
        &self.bytes[offset..offset + TupleLayout::SLOT_SIZE]
    }

    #[inline]
    fn expect_type(&self, field: usize, expected: FieldType) {
        let actual = self.layout.field_type(field);
        assert_eq!(
            actual, expected,
            "field {field} of layout {} is {actual}, not {expected}",
            self.layout
        );
    }
}

/// A single field value, used when appending tuples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Int64(i64),
    Float64(f64),
    Binary(&'a [u8]),
}

impl FieldValue<'_> {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Int64(_) => FieldType::Int64,
            FieldValue::Float64(_) => FieldType::Float64,
            FieldValue::Binary(_) => FieldType::Binary,
        }
    }
}

/// Incremental builder of [`TupleData`].
///
/// Fields are pushed one at a time in layout order; [`finish_tuple`](Self::finish_tuple)
/// seals the current tuple once every field has been supplied.
pub struct TupleDataBuilder {
    layout: TupleLayout,
    bytes: Vec<u8>,
    offsets: Vec<u64>,
    slots: Vec<u8>,
    var_data: Vec<u8>,
    next_field: usize,
}

impl TupleDataBuilder {
    pub fn new(layout: TupleLayout) -> TupleDataBuilder {
        Self::with_capacity(layout, 0)
    }

    pub fn with_capacity(layout: TupleLayout, tuples: usize) -> TupleDataBuilder {
        let mut offsets = Vec::with_capacity(tuples + 1);
        offsets.push(0);
        TupleDataBuilder {
            bytes: Vec::with_capacity(tuples * layout.slot_table_size()),
            slots: Vec::with_capacity(layout.slot_table_size()),
            var_data: Vec::new(),
            next_field: 0,
            offsets,
            layout,
        }
    }

    /// Number of completed tuples.
    #[inline]
    pub fn tuple_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn push_i64(&mut self, value: i64) -> Result<&mut Self> {
        self.push_value(FieldValue::Int64(value))
    }

    pub fn push_f64(&mut self, value: f64) -> Result<&mut Self> {
        self.push_value(FieldValue::Float64(value))
    }

    pub fn push_bytes(&mut self, value: &[u8]) -> Result<&mut Self> {
        self.push_value(FieldValue::Binary(value))
    }

    /// Appends the next field of the current tuple.
    pub fn push_value(&mut self, value: FieldValue) -> Result<&mut Self> {
        let field = self.next_field;
        if field >= self.layout.field_count() {
            return Err(Error::invalid_arg(
                "value",
                format!(
                    "tuple already has all {} fields of layout {}",
                    self.layout.field_count(),
                    self.layout
                ),
            ));
        }
        let expected = self.layout.field_type(field);
        if value.field_type() != expected {
            return Err(Error::invalid_arg(
                "value",
                format!("field {field} expects {expected}, got {}", value.field_type()),
            ));
        }
        match value {
            FieldValue::Int64(v) => self.slots.extend_from_slice(bytemuck::bytes_of(&v)),
            FieldValue::Float64(v) => self.slots.extend_from_slice(bytemuck::bytes_of(&v)),
            FieldValue::Binary(v) => {
                self.var_data.extend_from_slice(v);
                let end = self.var_data.len() as u64;
                self.slots.extend_from_slice(bytemuck::bytes_of(&end));
            }
        }
        self.next_field += 1;
        Ok(self)
    }

    /// Seals the current tuple.
    pub fn finish_tuple(&mut self) -> Result<()> {
        if self.next_field != self.layout.field_count() {
            return Err(Error::invalid_operation(format!(
                "finish_tuple: {} of {} fields supplied",
                self.next_field,
                self.layout.field_count()
            )));
        }
        self.bytes.append(&mut self.slots);
        self.bytes.append(&mut self.var_data);
        self.offsets.push(self.bytes.len() as u64);
        self.next_field = 0;
        Ok(())
    }

    /// Appends a complete tuple.
    ///
    /// All values are checked against the layout before anything is written,
    /// so a rejected tuple leaves the builder unchanged.
    pub fn append_tuple(&mut self, values: &[FieldValue]) -> Result<()> {
        if self.next_field != 0 {
            return Err(Error::invalid_operation(format!(
                "append_tuple: the current tuple has {} of {} fields",
                self.next_field,
                self.layout.field_count()
            )));
        }
        verify_arg!(values, values.len() == self.layout.field_count());
        if let Some((field, value)) = values
            .iter()
            .enumerate()
            .find(|(field, value)| value.field_type() != self.layout.field_type(*field))
        {
            return Err(Error::invalid_arg(
                "values",
                format!(
                    "field {field} expects {}, got {}",
                    self.layout.field_type(field),
                    value.field_type()
                ),
            ));
        }
        for &value in values {
            self.push_value(value)?;
        }
        self.finish_tuple()
    }

    pub fn build(self) -> Result<TupleData> {
        if self.next_field != 0 {
            return Err(Error::invalid_operation(
                "build: the last tuple is incomplete",
            ));
        }
        Ok(TupleData {
            layout: self.layout,
            bytes: self.bytes,
            offsets: self.offsets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, TupleData, TupleDataBuilder};
    use crate::layout::{FieldType, TupleLayout};

    #[test]
    fn test_from_i64s() {
        let data = TupleData::from_i64s([5, -7, i64::MAX]);
        assert_eq!(data.tuple_count(), 3);
        assert_eq!(data.byte_len(), 24);
        assert_eq!(data.tuple(0).get_i64(0), 5);
        assert_eq!(data.tuple(1).get_i64(0), -7);
        assert_eq!(data.tuple(2).get_i64(0), i64::MAX);
    }

    #[test]
    fn test_mixed_layout() {
        let layout = TupleLayout::new([
            FieldType::Binary,
            FieldType::Int64,
            FieldType::Binary,
            FieldType::Float64,
        ]);
        let mut builder = TupleDataBuilder::new(layout);
        builder
            .append_tuple(&[
                FieldValue::Binary(b"alpha"),
                FieldValue::Int64(1),
                FieldValue::Binary(b""),
                FieldValue::Float64(0.5),
            ])
            .unwrap();
        builder
            .push_bytes(b"b")
            .unwrap()
            .push_i64(2)
            .unwrap()
            .push_bytes(b"gamma")
            .unwrap()
            .push_f64(-1.25)
            .unwrap();
        builder.finish_tuple().unwrap();
        let data = builder.build().unwrap();

        assert_eq!(data.tuple_count(), 2);
        let t0 = data.tuple(0);
        assert_eq!(t0.get_bytes(0), b"alpha");
        assert_eq!(t0.get_i64(1), 1);
        assert_eq!(t0.get_bytes(2), b"");
        assert_eq!(t0.get_f64(3), 0.5);
        let t1 = data.tuple(1);
        assert_eq!(t1.get_bytes(0), b"b");
        assert_eq!(t1.get_i64(1), 2);
        assert_eq!(t1.get_bytes(2), b"gamma");
        assert_eq!(t1.get_f64(3), -1.25);
    }

    #[test]
    fn test_builder_rejects_type_mismatch() {
        let mut builder = TupleDataBuilder::new(TupleLayout::single(FieldType::Int64));
        assert!(builder.push_f64(1.0).is_err());
        builder.push_i64(1).unwrap();
        assert!(builder.push_i64(2).is_err());
        builder.finish_tuple().unwrap();
        assert_eq!(builder.tuple_count(), 1);
    }

    #[test]
    fn test_rejected_tuple_leaves_builder_usable() {
        let layout = TupleLayout::new([FieldType::Binary, FieldType::Int64]);
        let mut builder = TupleDataBuilder::new(layout);
        let bad = [FieldValue::Binary(b"lost"), FieldValue::Float64(1.5)];
        assert!(builder.append_tuple(&bad).is_err());
        assert_eq!(builder.tuple_count(), 0);

        builder
            .append_tuple(&[FieldValue::Binary(b"kept"), FieldValue::Int64(7)])
            .unwrap();
        let data = builder.build().unwrap();
        assert_eq!(data.tuple_count(), 1);
        assert_eq!(data.tuple(0).get_bytes(0), b"kept");
        assert_eq!(data.tuple(0).get_i64(1), 7);
    }

    #[test]
    fn test_append_tuple_mid_tuple_rejected() {
        let layout = TupleLayout::new([FieldType::Int64, FieldType::Int64]);
        let mut builder = TupleDataBuilder::new(layout);
        builder.push_i64(1).unwrap();
        assert!(
            builder
                .append_tuple(&[FieldValue::Int64(2), FieldValue::Int64(3)])
                .is_err()
        );
        builder.push_i64(2).unwrap();
        builder.finish_tuple().unwrap();
        assert_eq!(builder.tuple_count(), 1);
    }

    #[test]
    fn test_builder_rejects_incomplete_tuple() {
        let layout = TupleLayout::new([FieldType::Int64, FieldType::Int64]);
        let mut builder = TupleDataBuilder::new(layout);
        builder.push_i64(1).unwrap();
        assert!(builder.finish_tuple().is_err());
        assert!(builder.build().is_err());
    }

    #[test]
    #[should_panic(expected = "not Float64")]
    fn test_read_wrong_type_panics() {
        let data = TupleData::from_i64s([1]);
        data.tuple(0).get_f64(0);
    }
}
