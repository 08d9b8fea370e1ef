//! Parquet file sink.

use std::{io::Write, sync::Arc};

use crate::{
    BatchError,
    arrow_schema::SchemaRef,
    batch::RowBatch,
    parquet::{arrow::ArrowWriter, file::properties::WriterProperties},
    schema::TypeDescriptor,
    sink::BatchSink,
};

/// Sink streaming appended batches into a Parquet file.
///
/// Compression and row-group layout are the `ArrowWriter`'s business; pass
/// [`WriterProperties`] through [`ParquetSink::with_properties`] to tune them. The file is
/// only valid after [`ParquetSink::close`].
pub struct ParquetSink<W: Write + Send> {
    schema: TypeDescriptor,
    arrow_schema: SchemaRef,
    writer: ArrowWriter<W>,
    rows: usize,
}

impl<W: Write + Send> ParquetSink<W> {
    /// Open a sink for `schema` over `out` with default writer properties.
    ///
    /// # Errors
    /// Returns `BatchError::UnsupportedSchema` if `schema` cannot be mapped to Arrow, or
    /// `BatchError::Parquet` if the writer cannot be created.
    pub fn try_new(out: W, schema: &TypeDescriptor) -> Result<Self, BatchError> {
        Self::with_properties(out, schema, WriterProperties::builder().build())
    }

    /// Open a sink for `schema` over `out` with explicit writer properties.
    ///
    /// # Errors
    /// Same as [`ParquetSink::try_new`].
    pub fn with_properties(
        out: W,
        schema: &TypeDescriptor,
        properties: WriterProperties,
    ) -> Result<Self, BatchError> {
        let arrow_schema = Arc::new(schema.to_arrow_schema()?);
        let writer = ArrowWriter::try_new(out, Arc::clone(&arrow_schema), Some(properties))?;
        Ok(Self {
            schema: schema.clone(),
            arrow_schema,
            writer,
            rows: 0,
        })
    }

    /// Arrow schema of the file being written.
    #[must_use]
    pub fn arrow_schema(&self) -> &SchemaRef {
        &self.arrow_schema
    }

    /// Rows appended so far.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Flush remaining data, write the footer and return the underlying writer.
    ///
    /// # Errors
    /// Returns `BatchError::Parquet` if flushing or writing the footer fails.
    pub fn close(self) -> Result<W, BatchError> {
        log::debug!("closing parquet sink after {} rows", self.rows);
        Ok(self.writer.into_inner()?)
    }
}

impl<W: Write + Send> BatchSink for ParquetSink<W> {
    fn append(&mut self, batch: &RowBatch) -> Result<(), BatchError> {
        if batch.schema() != &self.schema {
            return Err(BatchError::export(
                "<root>",
                format!(
                    "batch schema {} does not match sink schema {}",
                    batch.schema(),
                    self.schema
                ),
            ));
        }
        let record_batch = batch.to_record_batch()?;
        self.writer.write(&record_batch)?;
        self.rows += record_batch.num_rows();
        Ok(())
    }
}
