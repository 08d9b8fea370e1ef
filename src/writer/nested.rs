//! Writers for list, map and struct columns.

use super::{ColumnWriter, MismatchPolicy, Target, accepts};
use crate::{
    BatchError,
    schema::{Category, TypeDescriptor},
    value::RowValue,
    vector::{
        ColumnVector, ListColumnVector, MapColumnVector, MultiValueIndex, NullMask,
        StructColumnVector,
    },
};

static NULL: RowValue = RowValue::Null;

/// Variable-sized list writer: appends each row's elements to the element vector.
pub(crate) struct ListWriter {
    target: Target,
    index: MultiValueIndex,
    element: Box<dyn ColumnWriter>,
}

impl ListWriter {
    pub(crate) fn new(target: Target, index: MultiValueIndex, element: Box<dyn ColumnWriter>) -> Self {
        Self {
            target,
            index,
            element,
        }
    }
}

impl ColumnWriter for ListWriter {
    fn category(&self) -> Category {
        self.target.category
    }

    fn path(&self) -> &str {
        &self.target.path
    }

    fn write(&mut self, row: usize, value: &RowValue) -> Result<(), BatchError> {
        match value {
            RowValue::List(items) if !items.is_empty() => {
                let len = items.len();
                let offset = self.index.begin(row, len);
                // Offset 0 means nothing has been written to the element vector yet.
                self.element.ensure_capacity(offset + len, offset != 0);
                for (k, item) in items.iter().enumerate() {
                    self.element.write(offset + k, item)?;
                }
                self.index.commit(len);
            }
            RowValue::List(_) => self.index.set_null(row),
            other => {
                self.target.reject(other)?;
                self.index.set_null(row);
            }
        }
        Ok(())
    }

    fn set_null(&mut self, row: usize) {
        self.index.set_null(row);
    }

    fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        self.index.ensure_capacity(min, preserve);
    }

    fn into_vector(self: Box<Self>) -> ColumnVector {
        let this = *self;
        ColumnVector::List(ListColumnVector::new(
            this.index,
            this.element.into_vector(),
        ))
    }
}

/// Map writer: keys and values share one cursor and one `(offset, length)` per row.
///
/// Map keys are never null, so an entry whose key would be written as null is dropped.
pub(crate) struct MapWriter {
    target: Target,
    key_type: TypeDescriptor,
    index: MultiValueIndex,
    keys: Box<dyn ColumnWriter>,
    values: Box<dyn ColumnWriter>,
}

impl MapWriter {
    pub(crate) fn new(
        target: Target,
        key_type: TypeDescriptor,
        index: MultiValueIndex,
        keys: Box<dyn ColumnWriter>,
        values: Box<dyn ColumnWriter>,
    ) -> Self {
        Self {
            target,
            key_type,
            index,
            keys,
            values,
        }
    }

    /// Number of entries with a storable key. Fails on the first non-null key that does not
    /// fit under the strict policy; other unfit keys drop their entry.
    fn count_entries(&self, entries: &[(RowValue, RowValue)]) -> Result<usize, BatchError> {
        let mut len = 0;
        for (key, _) in entries {
            if accepts(&self.key_type, key) {
                len += 1;
                continue;
            }
            if self.target.policy == MismatchPolicy::Error && !key.is_null() {
                return Err(BatchError::TypeMismatch {
                    path: self.keys.path().to_string(),
                    expected: self.key_type.category(),
                    found: key.kind(),
                });
            }
            log::warn!(
                "dropping map entry at {}: {} key does not fit",
                self.target.path,
                key.kind()
            );
        }
        Ok(len)
    }
}

impl ColumnWriter for MapWriter {
    fn category(&self) -> Category {
        self.target.category
    }

    fn path(&self) -> &str {
        &self.target.path
    }

    fn write(&mut self, row: usize, value: &RowValue) -> Result<(), BatchError> {
        match value {
            RowValue::Map(entries) => {
                let len = self.count_entries(entries)?;
                if len == 0 {
                    self.index.set_null(row);
                    return Ok(());
                }
                let offset = self.index.begin(row, len);
                let preserve = offset != 0;
                self.keys.ensure_capacity(offset + len, preserve);
                self.values.ensure_capacity(offset + len, preserve);
                let kept = entries
                    .iter()
                    .filter(|(key, _)| accepts(&self.key_type, key));
                for (k, (key, value)) in kept.enumerate() {
                    self.keys.write(offset + k, key)?;
                    self.values.write(offset + k, value)?;
                }
                self.index.commit(len);
            }
            other => {
                self.target.reject(other)?;
                self.index.set_null(row);
            }
        }
        Ok(())
    }

    fn set_null(&mut self, row: usize) {
        self.index.set_null(row);
    }

    fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        self.index.ensure_capacity(min, preserve);
    }

    fn into_vector(self: Box<Self>) -> ColumnVector {
        let this = *self;
        ColumnVector::Map(MapColumnVector::new(
            this.index,
            this.keys.into_vector(),
            this.values.into_vector(),
        ))
    }
}

/// Struct writer: field writers run at the struct's own row index.
pub(crate) struct StructWriter {
    target: Target,
    nulls: NullMask,
    names: Vec<String>,
    fields: Vec<Box<dyn ColumnWriter>>, // same len as names
}

impl StructWriter {
    pub(crate) fn new(
        target: Target,
        nulls: NullMask,
        names: Vec<String>,
        fields: Vec<Box<dyn ColumnWriter>>,
    ) -> Self {
        Self {
            target,
            nulls,
            names,
            fields,
        }
    }
}

impl ColumnWriter for StructWriter {
    fn category(&self) -> Category {
        self.target.category
    }

    fn path(&self) -> &str {
        &self.target.path
    }

    fn write(&mut self, row: usize, value: &RowValue) -> Result<(), BatchError> {
        match value {
            RowValue::Record(record) => {
                self.nulls.set_valid(row);
                for (name, field) in self.names.iter().zip(self.fields.iter_mut()) {
                    field.write(row, record.get(name).unwrap_or(&NULL))?;
                }
            }
            // Field vectors keep whatever they held at `row`; readers must honor the
            // struct's null bit.
            other => {
                self.target.reject(other)?;
                self.nulls.set_null(row);
            }
        }
        Ok(())
    }

    fn set_null(&mut self, row: usize) {
        self.nulls.set_null(row);
    }

    fn ensure_capacity(&mut self, min: usize, preserve: bool) {
        self.nulls.ensure_capacity(min, preserve);
        for field in &mut self.fields {
            field.ensure_capacity(min, preserve);
        }
    }

    fn into_vector(self: Box<Self>) -> ColumnVector {
        let this = *self;
        let fields = this.fields.into_iter().map(|f| f.into_vector()).collect();
        ColumnVector::Struct(StructColumnVector {
            nulls: this.nulls,
            names: this.names,
            fields,
        })
    }
}
