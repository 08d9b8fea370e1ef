//! Column writers and the dispatcher that builds them.
//!
//! [`new_column_writer`] resolves a [`TypeDescriptor`] to a writer once, pre-binding child
//! writers for lists, maps and structs, so writing a row never inspects the schema again.
//! Each writer owns its vector while the batch is being filled and returns it through
//! [`ColumnWriter::into_vector`].

mod nested;
mod scalar;

use crate::{
    BatchError,
    schema::{Category, TypeDescriptor},
    value::RowValue,
    vector::{
        ColumnVector, ListColumnVector, MapColumnVector, StructColumnVector, display_path,
        expect_children, field_path, item_path,
    },
};

use self::{
    nested::{ListWriter, MapWriter, StructWriter},
    scalar::{DoubleWriter, LongWriter, StringWriter},
};

/// What a writer does with a non-null value whose shape does not fit its column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MismatchPolicy {
    /// Write null, as if the value were absent.
    #[default]
    Null,
    /// Fail with `BatchError::TypeMismatch`.
    Error,
}

/// Options applied to every writer in a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WriterOptions {
    /// Handling of mismatched values.
    pub mismatch: MismatchPolicy,
}

impl WriterOptions {
    /// Set the mismatch policy.
    #[must_use]
    pub fn with_mismatch(mut self, mismatch: MismatchPolicy) -> Self {
        self.mismatch = mismatch;
        self
    }
}

/// Writer bound to one column vector; writes one row's value at a given row index.
pub trait ColumnWriter: Send {
    /// Category of the descriptor this writer was built for.
    fn category(&self) -> Category;

    /// Column path used in error messages (e.g., "person.tags[]").
    fn path(&self) -> &str;

    /// Write `value` at `row`. Values that don't fit the column are written as null.
    ///
    /// # Errors
    /// Returns `BatchError::TypeMismatch` for mismatched values under
    /// [`MismatchPolicy::Error`].
    fn write(&mut self, row: usize, value: &RowValue) -> Result<(), BatchError>;

    /// Mark `row` null.
    fn set_null(&mut self, row: usize);

    /// Grow the owned vector; see [`ColumnVector::ensure_capacity`].
    fn ensure_capacity(&mut self, min: usize, preserve: bool);

    /// Give the filled vector back.
    fn into_vector(self: Box<Self>) -> ColumnVector;
}

/// Build the writer tree for `descriptor`, taking ownership of `vector`.
///
/// `path` names the column in error messages; child writers extend it with
/// `.field`, `[]`, `.key` and `.value`.
///
/// # Errors
/// Returns `BatchError::UnsupportedSchema` for categories without a writer,
/// `BatchError::MalformedSchema` for containers with missing children, and
/// `BatchError::VectorMismatch` when `vector` is not shaped like `descriptor`.
pub fn new_column_writer(
    path: &str,
    descriptor: &TypeDescriptor,
    vector: ColumnVector,
    options: &WriterOptions,
) -> Result<Box<dyn ColumnWriter>, BatchError> {
    build(descriptor, vector, path, options)
}

fn build(
    descriptor: &TypeDescriptor,
    vector: ColumnVector,
    path: &str,
    options: &WriterOptions,
) -> Result<Box<dyn ColumnWriter>, BatchError> {
    let category = descriptor.category();
    let target = Target {
        path: display_path(path),
        category,
        policy: options.mismatch,
    };
    log::trace!("building `{category}` writer for {}", target.path);
    let writer: Box<dyn ColumnWriter> = match (category, vector) {
        (
            Category::Boolean
            | Category::Byte
            | Category::Short
            | Category::Float
            | Category::Binary
            | Category::Timestamp
            | Category::Date
            | Category::Decimal
            | Category::Union,
            _,
        ) => {
            return Err(BatchError::UnsupportedSchema {
                path: target.path,
                category,
            });
        }
        (Category::Integer | Category::Long, ColumnVector::Long(vector)) => {
            Box::new(LongWriter::new(target, vector))
        }
        (Category::Double, ColumnVector::Double(vector)) => {
            Box::new(DoubleWriter::new(target, vector))
        }
        (Category::String, ColumnVector::Bytes(vector)) => {
            Box::new(StringWriter::new(target, vector))
        }
        (Category::List, ColumnVector::List(vector)) => {
            let children = expect_children(descriptor, path)?;
            let ListColumnVector { index, child } = vector;
            let element = build(&children[0], *child, &item_path(path), options)?;
            Box::new(ListWriter::new(target, index, element))
        }
        (Category::Map, ColumnVector::Map(vector)) => {
            let children = expect_children(descriptor, path)?;
            let MapColumnVector {
                index,
                keys,
                values,
            } = vector;
            let keys = build(&children[0], *keys, &field_path(path, "key"), options)?;
            let values = build(&children[1], *values, &field_path(path, "value"), options)?;
            Box::new(MapWriter::new(
                target,
                children[0].clone(),
                index,
                keys,
                values,
            ))
        }
        (Category::Struct, ColumnVector::Struct(vector)) => {
            expect_children(descriptor, path)?;
            let StructColumnVector {
                nulls,
                names,
                fields,
            } = vector;
            if names.as_slice() != descriptor.field_names() {
                return Err(BatchError::VectorMismatch {
                    path: target.path,
                    category,
                });
            }
            let fields = descriptor
                .fields()
                .zip(fields)
                .map(|((name, child), field)| {
                    build(child, field, &field_path(path, name), options)
                })
                .collect::<Result<Vec<_>, _>>()?;
            Box::new(StructWriter::new(target, nulls, names, fields))
        }
        (
            Category::Integer
            | Category::Long
            | Category::Double
            | Category::String
            | Category::List
            | Category::Map
            | Category::Struct,
            _,
        ) => {
            return Err(BatchError::VectorMismatch {
                path: target.path,
                category,
            });
        }
    };
    Ok(writer)
}

/// Per-writer identity and mismatch policy.
pub(crate) struct Target {
    pub(crate) path: String,
    pub(crate) category: Category,
    pub(crate) policy: MismatchPolicy,
}

impl Target {
    /// Called when `value` does not fit the column; decides between writing null and failing.
    pub(crate) fn reject(&self, value: &RowValue) -> Result<(), BatchError> {
        match self.policy {
            MismatchPolicy::Error if !value.is_null() => Err(BatchError::TypeMismatch {
                path: self.path.clone(),
                expected: self.category,
                found: value.kind(),
            }),
            _ => Ok(()),
        }
    }
}

/// Whether `value` is stored as-is by a writer for `descriptor`, rather than written as null.
///
/// `Integer` columns take only values inside the `i32` range, so every stored slot exports.
pub(crate) fn accepts(descriptor: &TypeDescriptor, value: &RowValue) -> bool {
    match descriptor.category() {
        Category::Integer => value.as_long().is_some_and(|v| i32::try_from(v).is_ok()),
        Category::Long => value.as_long().is_some(),
        Category::Double => value.as_double().is_some(),
        Category::String => value.as_str().is_some(),
        Category::List => matches!(value, RowValue::List(items) if !items.is_empty()),
        Category::Map => match value {
            RowValue::Map(entries) => descriptor
                .children()
                .first()
                .is_some_and(|key| entries.iter().any(|(k, _)| accepts(key, k))),
            _ => false,
        },
        Category::Struct => matches!(value, RowValue::Record(_)),
        _ => false,
    }
}
