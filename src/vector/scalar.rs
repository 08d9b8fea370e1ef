//! Fixed-width and variable-length byte column vectors.

use super::NullMask;

/// Fixed-width column of `T` with one slot per row.
#[derive(Debug)]
pub struct PrimitiveColumnVector<T> {
    pub(crate) nulls: NullMask,
    values: Vec<T>,
}

/// Column vector for `Integer` and `Long` columns.
pub type LongColumnVector = PrimitiveColumnVector<i64>;

/// Column vector for `Double` columns.
pub type DoubleColumnVector = PrimitiveColumnVector<f64>;

impl<T: Copy + Default> PrimitiveColumnVector<T> {
    /// Allocate `capacity` zeroed, non-null slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nulls: NullMask::with_capacity(capacity),
            values: vec![T::default(); capacity],
        }
    }

    /// Number of row slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// All slots, including ones marked null.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Null state of the column.
    #[inline]
    #[must_use]
    pub fn nulls(&self) -> &NullMask {
        &self.nulls
    }

    /// Value at `row`, or `None` when the slot is null or out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize) -> Option<T> {
        if self.nulls.is_null(row) {
            return None;
        }
        self.values.get(row).copied()
    }

    /// Store `v` at `row` and clear its null bit.
    #[inline]
    pub fn set(&mut self, row: usize, v: T) {
        self.values[row] = v;
        self.nulls.set_valid(row);
    }

    /// Mark `row` null.
    #[inline]
    pub fn set_null(&mut self, row: usize) {
        self.nulls.set_null(row);
    }

    /// Grow to at least `min` slots; see [`ColumnVector::ensure_capacity`](super::ColumnVector::ensure_capacity).
    pub fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        if min <= self.capacity() {
            return;
        }
        if preserve {
            self.values.resize(min, T::default());
        } else {
            self.values = vec![T::default(); min];
        }
        self.nulls.ensure_capacity(min, preserve);
    }

    pub(crate) fn reset(&mut self) {
        self.nulls.reset();
    }
}

/// Variable-length byte column: one shared buffer and a `(start, length)` slice per row.
#[derive(Debug)]
pub struct BytesColumnVector {
    pub(crate) nulls: NullMask,
    buffer: Vec<u8>,
    start: Vec<usize>,
    length: Vec<usize>,
}

impl BytesColumnVector {
    /// Allocate `capacity` empty, non-null slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nulls: NullMask::with_capacity(capacity),
            buffer: Vec::new(),
            start: vec![0; capacity],
            length: vec![0; capacity],
        }
    }

    /// Number of row slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.start.len()
    }

    /// Null state of the column.
    #[inline]
    #[must_use]
    pub fn nulls(&self) -> &NullMask {
        &self.nulls
    }

    /// The shared byte buffer.
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Bytes stored at `row`, or `None` when the slot is null or out of range.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&[u8]> {
        if row >= self.capacity() || self.nulls.is_null(row) {
            return None;
        }
        let start = self.start[row];
        self.buffer.get(start..start + self.length[row])
    }

    /// UTF-8 string stored at `row`.
    #[must_use]
    pub fn get_str(&self, row: usize) -> Option<&str> {
        self.get(row).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Append `bytes` to the buffer, point `row` at them and clear its null bit.
    pub fn set(&mut self, row: usize, bytes: &[u8]) {
        self.start[row] = self.buffer.len();
        self.length[row] = bytes.len();
        self.buffer.extend_from_slice(bytes);
        self.nulls.set_valid(row);
    }

    /// Mark `row` null.
    #[inline]
    pub fn set_null(&mut self, row: usize) {
        self.nulls.set_null(row);
    }

    /// Grow to at least `min` slots. Without `preserve` the byte buffer is dropped as well.
    pub fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        if min <= self.capacity() {
            return;
        }
        if preserve {
            self.start.resize(min, 0);
            self.length.resize(min, 0);
        } else {
            self.buffer.clear();
            self.start = vec![0; min];
            self.length = vec![0; min];
        }
        self.nulls.ensure_capacity(min, preserve);
    }

    pub(crate) fn reset(&mut self) {
        self.nulls.reset();
        self.buffer.clear();
        self.start.fill(0);
        self.length.fill(0);
    }
}
