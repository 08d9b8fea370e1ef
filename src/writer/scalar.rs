//! Writers for `Integer`/`Long`, `Double` and `String` columns.

use super::{ColumnWriter, Target};
use crate::{
    BatchError,
    schema::Category,
    value::RowValue,
    vector::{BytesColumnVector, ColumnVector, DoubleColumnVector, LongColumnVector},
};

/// Integer-family values widened to `i64`. An `Integer` column treats values outside the
/// `i32` range as mismatches.
pub(crate) struct LongWriter {
    target: Target,
    vector: LongColumnVector,
}

impl LongWriter {
    pub(crate) fn new(target: Target, vector: LongColumnVector) -> Self {
        Self { target, vector }
    }
}

impl ColumnWriter for LongWriter {
    fn category(&self) -> Category {
        self.target.category
    }

    fn path(&self) -> &str {
        &self.target.path
    }

    fn write(&mut self, row: usize, value: &RowValue) -> Result<(), BatchError> {
        match value.as_long() {
            // `Integer` columns export as Int32
            Some(v) if self.target.category == Category::Long || i32::try_from(v).is_ok() => {
                self.vector.set(row, v);
            }
            _ => {
                self.target.reject(value)?;
                self.vector.set_null(row);
            }
        }
        Ok(())
    }

    fn set_null(&mut self, row: usize) {
        self.vector.set_null(row);
    }

    fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        self.vector.ensure_capacity(min, preserve);
    }

    fn into_vector(self: Box<Self>) -> ColumnVector {
        ColumnVector::Long(self.vector)
    }
}

/// Floating-family values widened to `f64`.
pub(crate) struct DoubleWriter {
    target: Target,
    vector: DoubleColumnVector,
}

impl DoubleWriter {
    pub(crate) fn new(target: Target, vector: DoubleColumnVector) -> Self {
        Self { target, vector }
    }
}

impl ColumnWriter for DoubleWriter {
    fn category(&self) -> Category {
        self.target.category
    }

    fn path(&self) -> &str {
        &self.target.path
    }

    fn write(&mut self, row: usize, value: &RowValue) -> Result<(), BatchError> {
        match value.as_double() {
            Some(v) => self.vector.set(row, v),
            None => {
                self.target.reject(value)?;
                self.vector.set_null(row);
            }
        }
        Ok(())
    }

    fn set_null(&mut self, row: usize) {
        self.vector.set_null(row);
    }

    fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        self.vector.ensure_capacity(min, preserve);
    }

    fn into_vector(self: Box<Self>) -> ColumnVector {
        ColumnVector::Double(self.vector)
    }
}

/// Strings stored as UTF-8 bytes in the shared buffer.
pub(crate) struct StringWriter {
    target: Target,
    vector: BytesColumnVector,
}

impl StringWriter {
    pub(crate) fn new(target: Target, vector: BytesColumnVector) -> Self {
        Self { target, vector }
    }
}

impl ColumnWriter for StringWriter {
    fn category(&self) -> Category {
        self.target.category
    }

    fn path(&self) -> &str {
        &self.target.path
    }

    fn write(&mut self, row: usize, value: &RowValue) -> Result<(), BatchError> {
        match value.as_str() {
            Some(s) => self.vector.set(row, s.as_bytes()),
            None => {
                self.target.reject(value)?;
                self.vector.set_null(row);
            }
        }
        Ok(())
    }

    fn set_null(&mut self, row: usize) {
        self.vector.set_null(row);
    }

    fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        self.vector.ensure_capacity(min, preserve);
    }

    fn into_vector(self: Box<Self>) -> ColumnVector {
        ColumnVector::Bytes(self.vector)
    }
}
