//! Offset-addressed (list, map) and row-aligned (struct) column vectors.

use std::ops::Range;

use super::{ColumnVector, NullMask};

/// Per-row `(offset, length)` addressing into a child row range, shared by list and map
/// vectors.
///
/// Rows are laid out back to back: `offsets[i]` is the child count before row `i` was
/// written and `child_count` advances by `lengths[i]`, so row ranges never overlap.
#[derive(Debug)]
pub struct MultiValueIndex {
    pub(crate) nulls: NullMask,
    offsets: Vec<usize>,
    lengths: Vec<usize>,
    child_count: usize,
}

impl MultiValueIndex {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nulls: NullMask::with_capacity(capacity),
            offsets: vec![0; capacity],
            lengths: vec![0; capacity],
            child_count: 0,
        }
    }

    /// Number of row slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.offsets.len()
    }

    /// Null state of the column.
    #[inline]
    #[must_use]
    pub fn nulls(&self) -> &NullMask {
        &self.nulls
    }

    /// Per-row start offsets into the child vector(s).
    #[inline]
    #[must_use]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Per-row element counts.
    #[inline]
    #[must_use]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Total child rows written so far.
    #[inline]
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.child_count
    }

    /// Child row range of `row`, or `None` when the row is null or out of range.
    #[must_use]
    pub fn range(&self, row: usize) -> Option<Range<usize>> {
        if row >= self.capacity() || self.nulls.is_null(row) {
            return None;
        }
        let start = self.offsets[row];
        Some(start..start + self.lengths[row])
    }

    /// Claim `len` child rows for `row` and return its offset. The caller must grow the
    /// child vector(s), write the elements, then call [`MultiValueIndex::commit`].
    pub(crate) fn begin(&mut self, row: usize, len: usize) -> usize {
        let offset = self.child_count;
        self.offsets[row] = offset;
        self.lengths[row] = len;
        self.nulls.set_valid(row);
        offset
    }

    pub(crate) fn commit(&mut self, len: usize) {
        self.child_count += len;
    }

    /// Mark `row` null with an empty range at the current cursor.
    pub(crate) fn set_null(&mut self, row: usize) {
        self.nulls.set_null(row);
        self.lengths[row] = 0;
        self.offsets[row] = self.child_count;
    }

    pub(crate) fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        if min <= self.capacity() {
            return;
        }
        if preserve {
            self.offsets.resize(min, 0);
            self.lengths.resize(min, 0);
        } else {
            self.offsets = vec![0; min];
            self.lengths = vec![0; min];
            self.child_count = 0;
        }
        self.nulls.ensure_capacity(min, preserve);
    }

    /// Keep rows `..rows` and return the child count they cover. Later rows get an empty
    /// range at 0, like rows that were never written.
    pub(crate) fn truncate(&mut self, rows: usize) -> usize {
        let rows = rows.min(self.capacity());
        // null and unwritten rows end at or before the cursor, so the max is the cursor
        self.child_count = (0..rows)
            .map(|i| self.offsets[i] + self.lengths[i])
            .max()
            .unwrap_or(0);
        self.offsets[rows..].fill(0);
        self.lengths[rows..].fill(0);
        self.child_count
    }

    pub(crate) fn reset(&mut self) {
        self.nulls.reset();
        // rows skipped in the next batch (under a null struct) must read as empty
        self.offsets.fill(0);
        self.lengths.fill(0);
        self.child_count = 0;
    }
}

/// List column: a [`MultiValueIndex`] over one element vector.
#[derive(Debug)]
pub struct ListColumnVector {
    pub(crate) index: MultiValueIndex,
    pub(crate) child: Box<ColumnVector>,
}

impl ListColumnVector {
    pub(crate) fn new(index: MultiValueIndex, child: ColumnVector) -> Self {
        Self {
            index,
            child: Box::new(child),
        }
    }

    /// Row addressing.
    #[inline]
    #[must_use]
    pub fn index(&self) -> &MultiValueIndex {
        &self.index
    }

    /// Element vector.
    #[inline]
    #[must_use]
    pub fn child(&self) -> &ColumnVector {
        &self.child
    }
}

/// Map column: a [`MultiValueIndex`] over key and value vectors advancing in lock-step.
#[derive(Debug)]
pub struct MapColumnVector {
    pub(crate) index: MultiValueIndex,
    pub(crate) keys: Box<ColumnVector>,
    pub(crate) values: Box<ColumnVector>,
}

impl MapColumnVector {
    pub(crate) fn new(index: MultiValueIndex, keys: ColumnVector, values: ColumnVector) -> Self {
        Self {
            index,
            keys: Box::new(keys),
            values: Box::new(values),
        }
    }

    /// Row addressing.
    #[inline]
    #[must_use]
    pub fn index(&self) -> &MultiValueIndex {
        &self.index
    }

    /// Key vector.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &ColumnVector {
        &self.keys
    }

    /// Value vector.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &ColumnVector {
        &self.values
    }
}

/// Struct column: one vector per field, indexed by the struct's own row index.
#[derive(Debug)]
pub struct StructColumnVector {
    pub(crate) nulls: NullMask,
    pub(crate) names: Vec<String>,
    pub(crate) fields: Vec<ColumnVector>,
}

impl StructColumnVector {
    pub(crate) fn new(capacity: usize, names: Vec<String>, fields: Vec<ColumnVector>) -> Self {
        Self {
            nulls: NullMask::with_capacity(capacity),
            names,
            fields,
        }
    }

    /// Number of row slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nulls.len()
    }

    /// Null state of the struct itself.
    #[inline]
    #[must_use]
    pub fn nulls(&self) -> &NullMask {
        &self.nulls
    }

    /// Field names in schema order.
    #[inline]
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Field vectors in schema order.
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[ColumnVector] {
        &self.fields
    }

    /// Field vector by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ColumnVector> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.fields[i])
    }

    pub(crate) fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        if min > self.capacity() {
            self.nulls.ensure_capacity(min, preserve);
        }
        for field in &mut self.fields {
            field.ensure_capacity(min, preserve);
        }
    }
}
