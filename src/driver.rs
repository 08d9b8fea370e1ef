//! Drive rows through column writers into one batch and flush it.

use crate::{
    BatchError,
    batch::RowBatch,
    schema::{Category, TypeDescriptor},
    sink::BatchSink,
    value::RowValue,
    writer::{ColumnWriter, MismatchPolicy, WriterOptions, new_column_writer},
};

static NULL: RowValue = RowValue::Null;

/// Write `rows` into a single batch for `schema` and append it to `sink`.
///
/// With a struct schema each row is a [`RowValue::Record`] supplying top-level columns by
/// name; absent fields are written as null. Any other schema is a single column and each row
/// is that column's value. Values that don't fit their column are written as null.
///
/// # Errors
/// Returns `BatchError::UnsupportedSchema` before any row is written if the schema contains a
/// category without a column writer, or the sink's error if the append fails.
pub fn write_rows<S: BatchSink + ?Sized>(
    sink: &mut S,
    schema: &TypeDescriptor,
    rows: &[RowValue],
) -> Result<(), BatchError> {
    fill_and_flush(sink, schema, rows, &WriterOptions::default())
}

/// Batch writer bound to a sink, a schema and writer options.
///
/// Every call to [`BatchWriter::write`] materializes its rows into one batch and flushes it.
pub struct BatchWriter<S: BatchSink> {
    sink: S,
    schema: TypeDescriptor,
    options: WriterOptions,
    rows_written: usize,
}

impl<S: BatchSink> BatchWriter<S> {
    /// Create a writer with default options.
    pub fn new(sink: S, schema: TypeDescriptor) -> Self {
        Self {
            sink,
            schema,
            options: WriterOptions::default(),
            rows_written: 0,
        }
    }

    /// Replace the writer options.
    #[must_use]
    pub fn with_options(mut self, options: WriterOptions) -> Self {
        self.options = options;
        self
    }

    /// The schema rows are written with.
    pub fn schema(&self) -> &TypeDescriptor {
        &self.schema
    }

    /// Write `rows` as one batch and append it to the sink.
    ///
    /// # Errors
    /// See [`write_rows`]; under [`MismatchPolicy::Error`] also `BatchError::TypeMismatch`,
    /// in which case nothing is appended.
    pub fn write(&mut self, rows: &[RowValue]) -> Result<(), BatchError> {
        fill_and_flush(&mut self.sink, &self.schema, rows, &self.options)?;
        self.rows_written += rows.len();
        Ok(())
    }

    /// Rows written through this writer.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Return the sink so the caller can close it.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

fn fill_and_flush<S: BatchSink + ?Sized>(
    sink: &mut S,
    schema: &TypeDescriptor,
    rows: &[RowValue],
    options: &WriterOptions,
) -> Result<(), BatchError> {
    let mut batch = sink.create_row_batch(schema, rows.len())?;
    fill_row_batch(&mut batch, rows, options)?;
    log::debug!(
        "flushing batch for {schema}: {} rows, {} columns",
        batch.size,
        batch.num_columns()
    );
    sink.append(&batch)
}

/// Write `rows` into `batch` after its current rows, growing it as needed.
///
/// This is the fill half of [`write_rows`] for callers that manage batches themselves.
/// The call is all or nothing: on error the batch keeps its columns and the rows it held
/// before the call, and can be filled again.
///
/// # Errors
/// Returns `BatchError::TypeMismatch` under [`MismatchPolicy::Error`]. Schema errors cannot
/// occur here because [`RowBatch::new`] already allocated every column from the schema.
pub fn fill_row_batch(
    batch: &mut RowBatch,
    rows: &[RowValue],
    options: &WriterOptions,
) -> Result<(), BatchError> {
    let schema = batch.schema().clone();
    let start = batch.size;
    batch.ensure_capacity(start + rows.len());

    let columns = schema.top_level_columns();
    if batch.num_columns() != columns.len() {
        return Err(BatchError::VectorMismatch {
            path: "<root>".to_string(),
            category: schema.category(),
        });
    }
    let vectors = batch.take_columns();
    // all writers are built before the first row, so schema errors write nothing
    let mut writers = columns
        .iter()
        .zip(vectors)
        .map(|((name, descriptor), vector)| new_column_writer(name, descriptor, vector, options))
        .collect::<Result<Vec<_>, _>>()?;

    let by_name = schema.category() == Category::Struct;
    let mut at = start;
    let written: Result<(), BatchError> = rows.iter().try_for_each(|row| {
        if by_name {
            write_record(&columns, &mut writers, at, row, options)?;
        } else {
            writers[0].write(at, row)?;
        }
        at += 1;
        Ok(())
    });

    batch.restore_columns(writers.into_iter().map(|w| w.into_vector()).collect());
    match written {
        Ok(()) => {
            batch.size = at;
            Ok(())
        }
        Err(err) => {
            log::debug!("rolling back {} rows after error: {err}", at - start + 1);
            batch.truncate(start);
            Err(err)
        }
    }
}

fn write_record(
    columns: &[(String, &TypeDescriptor)],
    writers: &mut [Box<dyn ColumnWriter>],
    at: usize,
    row: &RowValue,
    options: &WriterOptions,
) -> Result<(), BatchError> {
    match row {
        RowValue::Record(record) => {
            for ((name, _), writer) in columns.iter().zip(writers.iter_mut()) {
                writer.write(at, record.get(name).unwrap_or(&NULL))?;
            }
        }
        other => {
            if !other.is_null() {
                if options.mismatch == MismatchPolicy::Error {
                    return Err(BatchError::TypeMismatch {
                        path: "<root>".to_string(),
                        expected: Category::Struct,
                        found: other.kind(),
                    });
                }
                log::warn!("row {at} is a {}, not a record; writing nulls", other.kind());
            }
            for writer in writers.iter_mut() {
                writer.set_null(at);
            }
        }
    }
    Ok(())
}
