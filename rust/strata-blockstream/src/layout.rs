//! Tuple layout: the immutable description of the fields making up one tuple.

use std::{fmt, sync::Arc};

/// Storage type of a single tuple field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 64-bit signed integer, fixed width.
    Int64,
    /// 64-bit IEEE float, fixed width.
    Float64,
    /// Variable-length byte string.
    Binary,
}

impl FieldType {
    /// Returns the width in bytes of a fixed-width field, or `None` for
    /// variable-length fields.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            FieldType::Int64 | FieldType::Float64 => Some(8),
            FieldType::Binary => None,
        }
    }

    #[inline]
    pub fn is_fixed_width(self) -> bool {
        self.fixed_width().is_some()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Int64 => "Int64",
            FieldType::Float64 => "Float64",
            FieldType::Binary => "Binary",
        };
        f.write_str(name)
    }
}

/// Immutable, cheaply cloneable description of the fields of a tuple.
///
/// The layout is constant across all blocks of one stream. Position streams use
/// the [empty](TupleLayout::empty) layout, since their blocks carry positions
/// only.
///
/// Encoded tuples reserve one [`TupleLayout::SLOT_SIZE`]-byte slot per field,
/// followed by the variable-length region holding the bytes of `Binary` fields.
/// A `Binary` slot stores the cumulative end offset of its bytes within that
/// region, so its start is the end offset of the preceding `Binary` field.
#[derive(Clone)]
pub struct TupleLayout(Arc<LayoutInner>);

struct LayoutInner {
    fields: Vec<FieldType>,
    /// For each `Binary` field, the index of the preceding `Binary` field.
    prev_binary: Vec<Option<usize>>,
}

impl TupleLayout {
    /// Size of a single field slot in the encoded tuple.
    pub const SLOT_SIZE: usize = 8;

    pub fn new(fields: impl IntoIterator<Item = FieldType>) -> TupleLayout {
        let fields: Vec<FieldType> = fields.into_iter().collect();
        let mut prev_binary = Vec::with_capacity(fields.len());
        let mut last = None;
        for (i, field) in fields.iter().enumerate() {
            prev_binary.push(last);
            if *field == FieldType::Binary {
                last = Some(i);
            }
        }
        TupleLayout(Arc::new(LayoutInner {
            fields,
            prev_binary,
        }))
    }

    /// The layout without fields, used by position streams.
    pub fn empty() -> TupleLayout {
        TupleLayout::new(std::iter::empty())
    }

    pub fn single(field: FieldType) -> TupleLayout {
        TupleLayout::new([field])
    }

    #[inline]
    pub fn fields(&self) -> &[FieldType] {
        &self.0.fields
    }

    #[inline]
    pub fn field_count(&self) -> usize {
        self.0.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.fields.is_empty()
    }

    /// Returns the type of the field at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn field_type(&self, index: usize) -> FieldType {
        match self.0.fields.get(index) {
            Some(&field) => field,
            None => panic!(
                "field index {index} out of bounds for layout {self} ({} fields)",
                self.field_count()
            ),
        }
    }

    /// Returns `true` if every field is fixed width.
    pub fn is_fixed_width(&self) -> bool {
        self.0.fields.iter().all(|f| f.is_fixed_width())
    }

    /// Size of the slot table at the start of every encoded tuple.
    #[inline]
    pub fn slot_table_size(&self) -> usize {
        self.field_count() * Self::SLOT_SIZE
    }

    /// Byte offset of the slot belonging to field `index`.
    #[inline]
    pub(crate) fn slot_offset(&self, index: usize) -> usize {
        index * Self::SLOT_SIZE
    }

    /// For a `Binary` field, the index of the `Binary` field preceding it.
    #[inline]
    pub(crate) fn prev_binary(&self, index: usize) -> Option<usize> {
        self.0.prev_binary[index]
    }
}

impl PartialEq for TupleLayout {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.fields == other.0.fields
    }
}

impl Eq for TupleLayout {}

impl fmt::Debug for TupleLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TupleLayout").field(&self.0.fields).finish()
    }
}

impl fmt::Display for TupleLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, field) in self.0.fields.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        f.write_str(")")
    }
}
