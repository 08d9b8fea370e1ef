#![deny(missing_docs)]
//! vector-batch: write dynamic rows into schema-shaped column vectors.
//!
//! Rows arrive as [`RowValue`] trees. A [`TypeDescriptor`] declares the column layout, and
//! [`new_column_writer`] binds one [`ColumnWriter`] per top-level column to the vectors of a
//! [`RowBatch`]. The filled batch is handed to a [`BatchSink`] in a single flush; the bundled
//! sinks convert it to Arrow ([`MemorySink`]) or stream it into a Parquet file ([`ParquetSink`]).

#[cfg(not(any(feature = "arrow-55", feature = "arrow-56", feature = "arrow-57")))]
compile_error!("enable one of the `arrow-55`, `arrow-56` or `arrow-57` features");

// Re-export the selected Arrow/Parquet major so downstream users don't need
// to depend on Arrow directly. The newest enabled version wins.
#[cfg(feature = "arrow-57")]
pub use arrow_array_57 as arrow_array;
#[cfg(all(feature = "arrow-56", not(feature = "arrow-57")))]
pub use arrow_array_56 as arrow_array;
#[cfg(all(feature = "arrow-55", not(any(feature = "arrow-56", feature = "arrow-57"))))]
pub use arrow_array_55 as arrow_array;

#[cfg(feature = "arrow-57")]
pub use arrow_buffer_57 as arrow_buffer;
#[cfg(all(feature = "arrow-56", not(feature = "arrow-57")))]
pub use arrow_buffer_56 as arrow_buffer;
#[cfg(all(feature = "arrow-55", not(any(feature = "arrow-56", feature = "arrow-57"))))]
pub use arrow_buffer_55 as arrow_buffer;

#[cfg(feature = "arrow-57")]
pub use arrow_schema_57 as arrow_schema;
#[cfg(all(feature = "arrow-56", not(feature = "arrow-57")))]
pub use arrow_schema_56 as arrow_schema;
#[cfg(all(feature = "arrow-55", not(any(feature = "arrow-56", feature = "arrow-57"))))]
pub use arrow_schema_55 as arrow_schema;

#[cfg(feature = "arrow-57")]
pub use parquet_57 as parquet;
#[cfg(all(feature = "arrow-56", not(feature = "arrow-57")))]
pub use parquet_56 as parquet;
#[cfg(all(feature = "arrow-55", not(any(feature = "arrow-56", feature = "arrow-57"))))]
pub use parquet_55 as parquet;

mod bridge;
mod batch;
mod driver;
mod error;
mod parquet_sink;
mod schema;
mod sink;
mod value;
pub mod vector;
mod writer;

pub use batch::RowBatch;
pub use driver::{BatchWriter, fill_row_batch, write_rows};
pub use error::BatchError;
pub use parquet_sink::ParquetSink;
pub use schema::{Category, TypeDescriptor};
pub use sink::{BatchSink, MemorySink};
pub use value::RowValue;
pub use vector::ColumnVector;
pub use writer::{ColumnWriter, MismatchPolicy, WriterOptions, new_column_writer};
