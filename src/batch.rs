//! Row batch: one column vector per top-level column plus a row count.

use crate::{
    BatchError,
    schema::TypeDescriptor,
    vector::{ColumnVector, allocate, expect_children},
};

/// Column vectors for a fixed set of rows, flushed to a sink together.
#[derive(Debug)]
pub struct RowBatch {
    schema: TypeDescriptor,
    names: Vec<String>,
    cols: Vec<ColumnVector>,
    /// Number of rows written so far.
    pub size: usize,
}

impl RowBatch {
    /// Allocate vectors for every top-level column of `schema` with `capacity` row slots.
    ///
    /// # Errors
    /// Returns `BatchError::UnsupportedSchema` if any column uses a category without a
    /// writer, or `BatchError::MalformedSchema` for malformed containers.
    pub fn new(schema: &TypeDescriptor, capacity: usize) -> Result<Self, BatchError> {
        expect_children(schema, "")?;
        let columns = schema.top_level_columns();
        let mut names = Vec::with_capacity(columns.len());
        let mut cols = Vec::with_capacity(columns.len());
        for (name, descriptor) in columns {
            cols.push(allocate(descriptor, capacity, &name)?);
            names.push(name);
        }
        log::debug!(
            "allocated row batch for {schema}: {} columns, capacity {capacity}",
            cols.len()
        );
        Ok(Self {
            schema: schema.clone(),
            names,
            cols,
            size: 0,
        })
    }

    /// The schema this batch was allocated for.
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &TypeDescriptor {
        &self.schema
    }

    /// Top-level column names (`_col0` for a non-struct schema).
    #[inline]
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Number of top-level columns.
    #[inline]
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.cols.len()
    }

    /// All top-level vectors.
    #[inline]
    #[must_use]
    pub fn columns(&self) -> &[ColumnVector] {
        &self.cols
    }

    /// Vector of column `i`.
    #[inline]
    #[must_use]
    pub fn column(&self, i: usize) -> &ColumnVector {
        &self.cols[i]
    }

    /// Vector of the column called `name`.
    #[must_use]
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnVector> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.cols[i])
    }

    /// Row slots available in every top-level vector.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cols.iter().map(ColumnVector::capacity).min().unwrap_or(0)
    }

    /// Grow every top-level vector to at least `min` rows, keeping written rows.
    pub fn ensure_capacity(&mut self, min: usize) {
        for col in &mut self.cols {
            col.ensure_capacity(min, true);
        }
    }

    /// Clear row count, null state and cursors so the batch can be refilled.
    pub fn reset(&mut self) {
        self.size = 0;
        for col in &mut self.cols {
            col.reset();
        }
    }

    /// Drop every row from `rows` on, including list and map children they claimed.
    pub(crate) fn truncate(&mut self, rows: usize) {
        self.size = rows;
        for col in &mut self.cols {
            col.truncate(rows);
        }
    }

    /// Move the vectors out so writers can own them; pair with [`RowBatch::restore_columns`].
    pub(crate) fn take_columns(&mut self) -> Vec<ColumnVector> {
        std::mem::take(&mut self.cols)
    }

    pub(crate) fn restore_columns(&mut self, cols: Vec<ColumnVector>) {
        self.cols = cols;
    }
}
