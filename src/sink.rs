//! Batch sinks: the destination a filled [`RowBatch`] is handed to.

use crate::{
    BatchError, arrow_array::RecordBatch, batch::RowBatch, schema::TypeDescriptor,
};

/// Destination for filled row batches.
///
/// A sink hands out the batch to fill for a schema and receives it back through
/// [`BatchSink::append`]. Finalizing the destination (`close`) is up to each
/// implementation.
pub trait BatchSink {
    /// Create an empty batch for `schema` with room for `capacity` rows.
    ///
    /// # Errors
    /// Returns `BatchError::UnsupportedSchema` if the schema contains a category without a
    /// column writer.
    fn create_row_batch(
        &self,
        schema: &TypeDescriptor,
        capacity: usize,
    ) -> Result<RowBatch, BatchError> {
        RowBatch::new(schema, capacity)
    }

    /// Take a filled batch.
    ///
    /// # Errors
    /// Returns an error if the batch cannot be converted or stored.
    fn append(&mut self, batch: &RowBatch) -> Result<(), BatchError>;
}

impl<S: BatchSink + ?Sized> BatchSink for &mut S {
    fn create_row_batch(
        &self,
        schema: &TypeDescriptor,
        capacity: usize,
    ) -> Result<RowBatch, BatchError> {
        (**self).create_row_batch(schema, capacity)
    }

    fn append(&mut self, batch: &RowBatch) -> Result<(), BatchError> {
        (**self).append(batch)
    }
}

/// In-memory sink keeping every appended batch as an Arrow `RecordBatch`.
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Vec<RecordBatch>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Batches appended so far.
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total rows across appended batches.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Finish and return the collected batches.
    #[must_use]
    pub fn close(self) -> Vec<RecordBatch> {
        self.batches
    }
}

impl BatchSink for MemorySink {
    fn append(&mut self, batch: &RowBatch) -> Result<(), BatchError> {
        self.batches.push(batch.to_record_batch()?);
        Ok(())
    }
}
