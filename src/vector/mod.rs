//! Growable per-column storage.
//!
//! Every vector owns its buffers and a [`NullMask`]. Growth is explicit: writers call
//! `ensure_capacity(min, preserve)` before touching a slot past the current capacity.
//! Growing with `preserve == false` discards earlier contents, which list and map
//! writers only request while their child range is still empty.

mod nested;
mod scalar;

use std::fmt;

pub use nested::{ListColumnVector, MapColumnVector, MultiValueIndex, StructColumnVector};
pub use scalar::{BytesColumnVector, DoubleColumnVector, LongColumnVector, PrimitiveColumnVector};

use crate::{
    BatchError,
    arrow_buffer::BooleanBufferBuilder,
    schema::{Category, TypeDescriptor},
    value::RowValue,
};

/// Vector-wide "no nulls" flag plus one null bit per row slot (`true` = null).
pub struct NullMask {
    no_nulls: bool,
    bits: BooleanBufferBuilder,
}

impl NullMask {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut bits = BooleanBufferBuilder::new(capacity);
        bits.append_n(capacity, false);
        Self {
            no_nulls: true,
            bits,
        }
    }

    /// Number of row slots covered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the mask covers no slots.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// `true` until the first slot is marked null.
    #[inline]
    #[must_use]
    pub fn no_nulls(&self) -> bool {
        self.no_nulls
    }

    /// Whether `row` is marked null. Out-of-range rows are not.
    #[inline]
    #[must_use]
    pub fn is_null(&self, row: usize) -> bool {
        !self.no_nulls && row < self.bits.len() && self.bits.get_bit(row)
    }

    pub(crate) fn set_null(&mut self, row: usize) {
        self.no_nulls = false;
        self.bits.set_bit(row, true);
    }

    pub(crate) fn set_valid(&mut self, row: usize) {
        if !self.no_nulls {
            self.bits.set_bit(row, false);
        }
    }

    pub(crate) fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        if min <= self.len() {
            return;
        }
        if preserve {
            // new bits are zero, i.e. not null
            self.bits.resize(min);
        } else {
            *self = Self::with_capacity(min);
        }
    }

    pub(crate) fn reset(&mut self) {
        if !self.no_nulls {
            let len = self.len();
            *self = Self::with_capacity(len);
        }
    }
}

impl fmt::Debug for NullMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: Vec<bool> = (0..self.len()).map(|i| self.is_null(i)).collect();
        f.debug_struct("NullMask")
            .field("no_nulls", &self.no_nulls)
            .field("is_null", &bits)
            .finish()
    }
}

/// Storage for one column, shaped after its [`TypeDescriptor`].
#[derive(Debug)]
pub enum ColumnVector {
    /// `Integer` and `Long` columns.
    Long(LongColumnVector),
    /// `Double` columns.
    Double(DoubleColumnVector),
    /// `String` columns.
    Bytes(BytesColumnVector),
    /// `List` columns.
    List(ListColumnVector),
    /// `Map` columns.
    Map(MapColumnVector),
    /// `Struct` columns.
    Struct(StructColumnVector),
}

impl ColumnVector {
    /// Allocate a vector tree for `descriptor` with `capacity` row slots.
    ///
    /// List and map children start empty and grow as rows are written.
    ///
    /// # Errors
    /// Returns `BatchError::UnsupportedSchema` if the tree contains a category that has no
    /// column writer, or `BatchError::MalformedSchema` for containers with missing children.
    pub fn for_descriptor(descriptor: &TypeDescriptor, capacity: usize) -> Result<Self, BatchError> {
        allocate(descriptor, capacity, "")
    }

    /// Number of row slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match self {
            ColumnVector::Long(v) => v.capacity(),
            ColumnVector::Double(v) => v.capacity(),
            ColumnVector::Bytes(v) => v.capacity(),
            ColumnVector::List(v) => v.index.capacity(),
            ColumnVector::Map(v) => v.index.capacity(),
            ColumnVector::Struct(v) => v.capacity(),
        }
    }

    /// Null state of this vector (for structs, the struct's own null bits).
    #[must_use]
    pub fn nulls(&self) -> &NullMask {
        match self {
            ColumnVector::Long(v) => &v.nulls,
            ColumnVector::Double(v) => &v.nulls,
            ColumnVector::Bytes(v) => &v.nulls,
            ColumnVector::List(v) => &v.index.nulls,
            ColumnVector::Map(v) => &v.index.nulls,
            ColumnVector::Struct(v) => &v.nulls,
        }
    }

    /// Whether `row` is marked null.
    #[inline]
    #[must_use]
    pub fn is_null(&self, row: usize) -> bool {
        self.nulls().is_null(row)
    }

    /// Mark `row` null. List and map rows also get an empty range at the current cursor so
    /// readers never follow a stale `(offset, length)`.
    pub fn set_null(&mut self, row: usize) {
        match self {
            ColumnVector::Long(v) => v.set_null(row),
            ColumnVector::Double(v) => v.set_null(row),
            ColumnVector::Bytes(v) => v.set_null(row),
            ColumnVector::List(v) => v.index.set_null(row),
            ColumnVector::Map(v) => v.index.set_null(row),
            ColumnVector::Struct(v) => v.nulls.set_null(row),
        }
    }

    /// Grow to at least `min` row slots.
    ///
    /// A no-op when the capacity already suffices. Otherwise earlier contents are kept when
    /// `preserve` is set and discarded (zeroed buffers, cleared null state) when it is not.
    /// List and map children are not grown here; they follow the child count. Struct fields
    /// grow with the struct.
    pub fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        match self {
            ColumnVector::Long(v) => v.ensure_capacity(min, preserve),
            ColumnVector::Double(v) => v.ensure_capacity(min, preserve),
            ColumnVector::Bytes(v) => v.ensure_capacity(min, preserve),
            ColumnVector::List(v) => v.index.ensure_capacity(min, preserve),
            ColumnVector::Map(v) => v.index.ensure_capacity(min, preserve),
            ColumnVector::Struct(v) => v.ensure_capacity(min, preserve),
        }
    }

    /// Clear null state and cursors so the vector can take a new batch of rows.
    pub fn reset(&mut self) {
        match self {
            ColumnVector::Long(v) => v.reset(),
            ColumnVector::Double(v) => v.reset(),
            ColumnVector::Bytes(v) => v.reset(),
            ColumnVector::List(v) => {
                v.index.reset();
                v.child.reset();
            }
            ColumnVector::Map(v) => {
                v.index.reset();
                v.keys.reset();
                v.values.reset();
            }
            ColumnVector::Struct(v) => {
                v.nulls.reset();
                for field in &mut v.fields {
                    field.reset();
                }
            }
        }
    }

    /// Forget rows `rows..`: list and map cursors move back to the end of row `rows - 1`
    /// and their children are truncated to match. Scalar slots are left to be overwritten.
    pub(crate) fn truncate(&mut self, rows: usize) {
        match self {
            ColumnVector::Long(_) | ColumnVector::Double(_) | ColumnVector::Bytes(_) => {}
            ColumnVector::List(v) => {
                let children = v.index.truncate(rows);
                v.child.truncate(children);
            }
            ColumnVector::Map(v) => {
                let children = v.index.truncate(rows);
                v.keys.truncate(children);
                v.values.truncate(children);
            }
            ColumnVector::Struct(v) => {
                for field in &mut v.fields {
                    field.truncate(rows);
                }
            }
        }
    }

    /// Decode the slot at `row` back into a [`RowValue`].
    ///
    /// Integers decode as `Long`, floats as `Double`. Struct rows decode to a record holding
    /// every field, with `Null` for null fields. Null or out-of-range slots decode as `Null`.
    #[must_use]
    pub fn value(&self, row: usize) -> RowValue {
        if self.is_null(row) || row >= self.capacity() {
            return RowValue::Null;
        }
        match self {
            ColumnVector::Long(v) => v.get(row).map_or(RowValue::Null, RowValue::Long),
            ColumnVector::Double(v) => v.get(row).map_or(RowValue::Null, RowValue::Double),
            ColumnVector::Bytes(v) => v
                .get_str(row)
                .map_or(RowValue::Null, |s| RowValue::Str(s.to_string())),
            ColumnVector::List(v) => match v.index.range(row) {
                Some(range) => RowValue::List(range.map(|i| v.child.value(i)).collect()),
                None => RowValue::Null,
            },
            ColumnVector::Map(v) => match v.index.range(row) {
                Some(range) => RowValue::Map(
                    range
                        .map(|i| (v.keys.value(i), v.values.value(i)))
                        .collect(),
                ),
                None => RowValue::Null,
            },
            ColumnVector::Struct(v) => RowValue::Record(
                v.names
                    .iter()
                    .zip(v.fields.iter())
                    .map(|(name, field)| (name.clone(), field.value(row)))
                    .collect(),
            ),
        }
    }

    /// Borrow as a long vector.
    #[must_use]
    pub fn as_long(&self) -> Option<&LongColumnVector> {
        match self {
            ColumnVector::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a double vector.
    #[must_use]
    pub fn as_double(&self) -> Option<&DoubleColumnVector> {
        match self {
            ColumnVector::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a bytes vector.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&BytesColumnVector> {
        match self {
            ColumnVector::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a list vector.
    #[must_use]
    pub fn as_list(&self) -> Option<&ListColumnVector> {
        match self {
            ColumnVector::List(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a map vector.
    #[must_use]
    pub fn as_map(&self) -> Option<&MapColumnVector> {
        match self {
            ColumnVector::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow as a struct vector.
    #[must_use]
    pub fn as_struct(&self) -> Option<&StructColumnVector> {
        match self {
            ColumnVector::Struct(v) => Some(v),
            _ => None,
        }
    }
}

// Column paths follow the "parent.child" / "list[]" convention used in error messages.
pub(crate) fn field_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

pub(crate) fn item_path(parent: &str) -> String {
    format!("{parent}[]")
}

pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

/// Children of a container descriptor, checked against the count its category requires.
pub(crate) fn expect_children<'a>(
    descriptor: &'a TypeDescriptor,
    path: &str,
) -> Result<&'a [TypeDescriptor], BatchError> {
    let children = descriptor.children();
    let ok = match descriptor.category() {
        Category::List => children.len() == 1,
        Category::Map => children.len() == 2,
        Category::Struct => children.len() == descriptor.field_names().len(),
        _ => true,
    };
    if ok {
        Ok(children)
    } else {
        Err(BatchError::MalformedSchema {
            path: display_path(path),
            message: format!(
                "`{}` descriptor has {} children and {} field names",
                descriptor.category(),
                children.len(),
                descriptor.field_names().len()
            ),
        })
    }
}

pub(crate) fn allocate(
    descriptor: &TypeDescriptor,
    capacity: usize,
    path: &str,
) -> Result<ColumnVector, BatchError> {
    let vector = match descriptor.category() {
        Category::Integer | Category::Long => {
            ColumnVector::Long(LongColumnVector::with_capacity(capacity))
        }
        Category::Double => ColumnVector::Double(DoubleColumnVector::with_capacity(capacity)),
        Category::String => ColumnVector::Bytes(BytesColumnVector::with_capacity(capacity)),
        Category::List => {
            let children = expect_children(descriptor, path)?;
            let child = allocate(&children[0], 0, &item_path(path))?;
            ColumnVector::List(ListColumnVector::new(
                MultiValueIndex::with_capacity(capacity),
                child,
            ))
        }
        Category::Map => {
            let children = expect_children(descriptor, path)?;
            let keys = allocate(&children[0], 0, &field_path(path, "key"))?;
            let values = allocate(&children[1], 0, &field_path(path, "value"))?;
            ColumnVector::Map(MapColumnVector::new(
                MultiValueIndex::with_capacity(capacity),
                keys,
                values,
            ))
        }
        Category::Struct => {
            expect_children(descriptor, path)?;
            let fields = descriptor
                .fields()
                .map(|(name, child)| allocate(child, capacity, &field_path(path, name)))
                .collect::<Result<Vec<_>, _>>()?;
            ColumnVector::Struct(StructColumnVector::new(
                capacity,
                descriptor.field_names().to_vec(),
                fields,
            ))
        }
        category @ (Category::Boolean
        | Category::Byte
        | Category::Short
        | Category::Float
        | Category::Binary
        | Category::Timestamp
        | Category::Date
        | Category::Decimal
        | Category::Union) => {
            return Err(BatchError::UnsupportedSchema {
                path: display_path(path),
                category,
            });
        }
    };
    Ok(vector)
}
