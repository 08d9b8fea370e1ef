//! Bridge from descriptors and filled vectors to Arrow `DataType`s and arrays.
//!
//! - `Integer` → `Int32`, `Long` → `Int64`, `Double` → `Float64`, `String` → `Utf8`.
//! - `List` → `List` with a nullable `item` field.
//! - `Map` → `Map` with non-null `keys` and nullable `values` (unsorted).
//! - `Struct` → `Struct` with nullable fields.
//!
//! Top-level columns are always nullable.

use std::sync::Arc;

use crate::{
    BatchError,
    arrow_array::{
        ArrayRef, Float64Array, Int32Array, Int64Array, ListArray, MapArray, RecordBatch,
        RecordBatchOptions, StringArray, StructArray,
    },
    arrow_buffer::{BooleanBuffer, NullBuffer, OffsetBuffer, ScalarBuffer},
    arrow_schema::{DataType, Field, FieldRef, Fields, Schema},
    batch::RowBatch,
    schema::{Category, TypeDescriptor},
    vector::{
        ColumnVector, MultiValueIndex, NullMask, display_path, expect_children, field_path,
        item_path,
    },
};

impl TypeDescriptor {
    /// The Arrow `DataType` for this descriptor.
    ///
    /// # Errors
    /// Returns `BatchError::UnsupportedSchema` for categories without a column writer.
    pub fn to_data_type(&self) -> Result<DataType, BatchError> {
        data_type(self, "")
    }

    /// The Arrow schema of a batch written with this descriptor (see
    /// [`TypeDescriptor::top_level_columns`]).
    ///
    /// # Errors
    /// Returns `BatchError::UnsupportedSchema` for categories without a column writer.
    pub fn to_arrow_schema(&self) -> Result<Schema, BatchError> {
        expect_children(self, "")?;
        let fields = self
            .top_level_columns()
            .into_iter()
            .map(|(name, child)| Ok(Field::new(name.as_str(), data_type(child, &name)?, true)))
            .collect::<Result<Vec<_>, BatchError>>()?;
        Ok(Schema::new(fields))
    }
}

impl RowBatch {
    /// Convert the first `size` rows of every column into an Arrow `RecordBatch`.
    ///
    /// # Errors
    /// Returns `BatchError::Export` if a hand-built vector cannot be represented (an `Integer`
    /// slot outside the `i32` range, a broken list layout), or `BatchError::Arrow` when Arrow
    /// rejects an array. Batches filled by the writers always export.
    pub fn to_record_batch(&self) -> Result<RecordBatch, BatchError> {
        let schema = Arc::new(self.schema().to_arrow_schema()?);
        let columns = self.schema().top_level_columns();
        if columns.len() != self.num_columns() {
            return Err(BatchError::VectorMismatch {
                path: display_path(""),
                category: self.schema().category(),
            });
        }
        let arrays = columns
            .iter()
            .zip(self.columns())
            .map(|((name, descriptor), vector)| to_array(descriptor, vector, self.size, name))
            .collect::<Result<Vec<_>, _>>()?;
        let options = RecordBatchOptions::new().with_row_count(Some(self.size));
        Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
    }
}

fn data_type(descriptor: &TypeDescriptor, path: &str) -> Result<DataType, BatchError> {
    let dt = match descriptor.category() {
        Category::Integer => DataType::Int32,
        Category::Long => DataType::Int64,
        Category::Double => DataType::Float64,
        Category::String => DataType::Utf8,
        Category::List => {
            let children = expect_children(descriptor, path)?;
            DataType::List(list_item_field(&children[0], path)?)
        }
        Category::Map => {
            let children = expect_children(descriptor, path)?;
            DataType::Map(map_entries_field(&children[0], &children[1], path)?, false)
        }
        Category::Struct => DataType::Struct(struct_fields(descriptor, path)?),
        category => {
            return Err(BatchError::UnsupportedSchema {
                path: display_path(path),
                category,
            });
        }
    };
    Ok(dt)
}

fn list_item_field(element: &TypeDescriptor, path: &str) -> Result<FieldRef, BatchError> {
    Ok(Arc::new(Field::new(
        "item",
        data_type(element, &item_path(path))?,
        true,
    )))
}

fn map_entry_fields(
    key: &TypeDescriptor,
    value: &TypeDescriptor,
    path: &str,
) -> Result<Fields, BatchError> {
    Ok(Fields::from(vec![
        Field::new("keys", data_type(key, &field_path(path, "key"))?, false),
        Field::new("values", data_type(value, &field_path(path, "value"))?, true),
    ]))
}

fn map_entries_field(
    key: &TypeDescriptor,
    value: &TypeDescriptor,
    path: &str,
) -> Result<FieldRef, BatchError> {
    Ok(Arc::new(Field::new(
        "entries",
        DataType::Struct(map_entry_fields(key, value, path)?),
        false,
    )))
}

fn struct_fields(descriptor: &TypeDescriptor, path: &str) -> Result<Fields, BatchError> {
    expect_children(descriptor, path)?;
    let fields = descriptor
        .fields()
        .map(|(name, child)| Ok(Field::new(name, data_type(child, &field_path(path, name))?, true)))
        .collect::<Result<Vec<_>, BatchError>>()?;
    Ok(Fields::from(fields))
}

fn null_buffer(nulls: &NullMask, len: usize) -> Option<NullBuffer> {
    if nulls.no_nulls() {
        return None;
    }
    Some(NullBuffer::new(BooleanBuffer::collect_bool(len, |i| {
        !nulls.is_null(i)
    })))
}

/// Arrow offsets for the first `len` rows, checking that non-empty rows sit back to back.
/// Returns the offsets and the number of child rows they cover.
fn offsets(
    index: &MultiValueIndex,
    len: usize,
    path: &str,
) -> Result<(OffsetBuffer<i32>, usize), BatchError> {
    let mut out = Vec::with_capacity(len + 1);
    let mut end = 0usize;
    out.push(0i32);
    for row in 0..len {
        let length = index.lengths()[row];
        if length > 0 && !index.nulls().is_null(row) {
            if index.offsets()[row] != end {
                return Err(BatchError::export(
                    path,
                    format!(
                        "row {row} starts at child {} but the previous row ends at {end}",
                        index.offsets()[row]
                    ),
                ));
            }
            end += length;
        }
        let offset = i32::try_from(end)
            .map_err(|_| BatchError::export(path, "child count exceeds i32 offsets"))?;
        out.push(offset);
    }
    Ok((OffsetBuffer::new(ScalarBuffer::from(out)), end))
}

fn to_array(
    descriptor: &TypeDescriptor,
    vector: &ColumnVector,
    len: usize,
    path: &str,
) -> Result<ArrayRef, BatchError> {
    if vector.capacity() < len {
        return Err(BatchError::export(
            path,
            format!("vector holds {} rows, {len} requested", vector.capacity()),
        ));
    }
    let nulls = null_buffer(vector.nulls(), len);
    let array: ArrayRef = match (descriptor.category(), vector) {
        (Category::Integer, ColumnVector::Long(v)) => {
            let values = v.values()[..len]
                .iter()
                .enumerate()
                .map(|(row, &x)| {
                    if v.nulls().is_null(row) {
                        return Ok(0);
                    }
                    i32::try_from(x).map_err(|_| {
                        BatchError::export(path, format!("row {row}: {x} does not fit `int`"))
                    })
                })
                .collect::<Result<Vec<i32>, _>>()?;
            Arc::new(Int32Array::new(ScalarBuffer::from(values), nulls))
        }
        (Category::Long, ColumnVector::Long(v)) => Arc::new(Int64Array::new(
            ScalarBuffer::from(v.values()[..len].to_vec()),
            nulls,
        )),
        (Category::Double, ColumnVector::Double(v)) => Arc::new(Float64Array::new(
            ScalarBuffer::from(v.values()[..len].to_vec()),
            nulls,
        )),
        (Category::String, ColumnVector::Bytes(v)) => {
            let strings: StringArray = (0..len).map(|row| v.get_str(row)).collect();
            Arc::new(strings)
        }
        (Category::List, ColumnVector::List(v)) => {
            let children = expect_children(descriptor, path)?;
            let item = list_item_field(&children[0], path)?;
            let (offsets, child_len) = offsets(v.index(), len, path)?;
            let values = to_array(&children[0], v.child(), child_len, &item_path(path))?;
            Arc::new(ListArray::try_new(item, offsets, values, nulls)?)
        }
        (Category::Map, ColumnVector::Map(v)) => {
            let children = expect_children(descriptor, path)?;
            let (key, value) = (&children[0], &children[1]);
            let (offsets, child_len) = offsets(v.index(), len, path)?;
            let keys = to_array(key, v.keys(), child_len, &field_path(path, "key"))?;
            let values = to_array(value, v.values(), child_len, &field_path(path, "value"))?;
            let entries =
                StructArray::try_new(map_entry_fields(key, value, path)?, vec![keys, values], None)?;
            Arc::new(MapArray::try_new(
                map_entries_field(key, value, path)?,
                offsets,
                entries,
                nulls,
                false,
            )?)
        }
        (Category::Struct, ColumnVector::Struct(v)) => {
            let fields = struct_fields(descriptor, path)?;
            let arrays = descriptor
                .fields()
                .zip(v.fields())
                .map(|((name, child), field)| to_array(child, field, len, &field_path(path, name)))
                .collect::<Result<Vec<_>, _>>()?;
            Arc::new(StructArray::try_new(fields, arrays, nulls)?)
        }
        (category, _) => {
            if !category.is_writable() {
                return Err(BatchError::UnsupportedSchema {
                    path: display_path(path),
                    category,
                });
            }
            return Err(BatchError::VectorMismatch {
                path: display_path(path),
                category,
            });
        }
    };
    Ok(array)
}
