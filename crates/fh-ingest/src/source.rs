//! The data-source capability consumed by the loader.

use polars::prelude::DataFrame;

use crate::error::Result;

/// A relational source that can list its tables and stream their rows.
///
/// Implementations hand rows to `sink` in frames of at most `batch_size`
/// rows, all with the same column names in the same order. A table with no
/// rows is still delivered once as an empty frame so its columns are known.
pub trait TableSource {
    /// Short human-readable description for logs.
    fn describe(&self) -> String;

    /// Every table the source exposes, in a stable order.
    fn table_names(&mut self) -> Result<Vec<String>>;

    /// Number of rows in `table`.
    fn row_count(&mut self, table: &str) -> Result<usize>;

    /// Stream `table` in bounded batches.
    fn read_batches(
        &mut self,
        table: &str,
        batch_size: usize,
        sink: &mut dyn FnMut(DataFrame) -> Result<()>,
    ) -> Result<()>;
}
