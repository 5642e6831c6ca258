//! Chunked loading of every table a source exposes.

use std::collections::HashSet;
use std::time::Instant;

use fh_common::{any_to_string_opt, format_numeric};
use fh_model::{Table, TableSet};
use polars::prelude::{AnyValue, Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};

use crate::error::{IngestError, Result};
use crate::source::TableSource;

/// Default number of rows fetched per batch.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Options for [`load_tables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Rows per batch. Results do not depend on this value.
    pub chunk_size: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl LoadOptions {
    /// Set the chunk size, clamped to at least one row.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// Observer for load progress.
pub trait LoadProgress {
    /// A table is about to be read.
    fn on_table_start(&mut self, _table: &str, _rows: usize) {}
    /// A batch of `rows` rows arrived.
    fn on_batch(&mut self, _table: &str, _rows: usize) {}
    /// The table is fully read.
    fn on_table_done(&mut self, _table: &str, _rows: usize) {}
}

/// Progress observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl LoadProgress for NoProgress {}

/// Load every table exposed by `source`.
///
/// Any source error aborts the whole load. Index columns with repeated values
/// are reported but kept.
pub fn load_tables(
    source: &mut dyn TableSource,
    options: &LoadOptions,
    progress: &mut dyn LoadProgress,
) -> Result<TableSet> {
    let span = info_span!("load", source = %source.describe());
    let _guard = span.enter();
    let start = Instant::now();

    let names = source.table_names()?;
    let mut tables = TableSet::new();
    for name in names {
        let expected = source.row_count(&name)?;
        progress.on_table_start(&name, expected);

        let mut acc: Option<DataFrame> = None;
        let mut batches = 0usize;
        source.read_batches(&name, options.chunk_size.max(1), &mut |batch| {
            batches += 1;
            progress.on_batch(&name, batch.height());
            match acc.as_mut() {
                None => acc = Some(batch),
                Some(frame) => append_batch(&name, frame, batch)?,
            }
            Ok(())
        })?;

        let data = finalize(acc.unwrap_or_default())?;
        let table = Table::new(name.clone(), data);
        if let Some(index) = &table.index {
            let duplicates = duplicate_count(&table.data, index);
            if duplicates > 0 {
                warn!(table = %name, index = %index, duplicates, "index column has repeated values");
            }
        }
        debug!(table = %name, rows = table.record_count(), batches, "table loaded");
        progress.on_table_done(&name, table.record_count());
        tables.insert(table);
    }

    info!(
        tables = tables.len(),
        records = tables.total_records(),
        duration_ms = start.elapsed().as_millis(),
        "load complete"
    );
    Ok(tables)
}

/// Target dtype when two batches disagree on a column.
fn unify(left: &DataType, right: &DataType) -> Option<DataType> {
    if left == right {
        return None;
    }
    let unified = match (left, right) {
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::String,
    };
    Some(unified)
}

/// Cast for batch unification. Floats become text the same way a single
/// mixed batch renders them, so results do not depend on batch boundaries.
fn cast_column(column: &Column, target: &DataType) -> polars::error::PolarsResult<Column> {
    if target == &DataType::String && column.dtype() == &DataType::Float64 {
        let values: Vec<Option<String>> = column
            .as_materialized_series()
            .f64()?
            .into_iter()
            .map(|v| v.map(format_numeric))
            .collect();
        return Ok(Series::new(column.name().clone(), values).into_column());
    }
    column.cast(target)
}

fn append_batch(table: &str, acc: &mut DataFrame, mut batch: DataFrame) -> Result<()> {
    let assemble_err = |e: polars::error::PolarsError| IngestError::Assemble {
        table: table.to_string(),
        message: e.to_string(),
    };
    let names: Vec<String> = acc
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    for name in &names {
        let left = acc.column(name).map_err(assemble_err)?.dtype().clone();
        let right = batch.column(name).map_err(assemble_err)?.dtype().clone();
        if let Some(target) = unify(&left, &right) {
            if target != left {
                let cast = cast_column(acc.column(name).map_err(assemble_err)?, &target)
                    .map_err(assemble_err)?;
                acc.with_column(cast).map_err(assemble_err)?;
            }
            if target != right {
                let cast = cast_column(batch.column(name).map_err(assemble_err)?, &target)
                    .map_err(assemble_err)?;
                batch.with_column(cast).map_err(assemble_err)?;
            }
        }
    }
    acc.vstack_mut(&batch).map_err(assemble_err)?;
    Ok(())
}

/// Columns that stayed entirely null are materialized as strings.
fn finalize(mut df: DataFrame) -> Result<DataFrame> {
    let null_columns: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::Null)
        .map(|column| column.name().to_string())
        .collect();
    for name in null_columns {
        let cast = df.column(&name)?.cast(&DataType::String)?;
        df.with_column(cast)?;
    }
    Ok(df)
}

fn duplicate_count(df: &DataFrame, column: &str) -> usize {
    let Ok(values) = df.column(column) else {
        return 0;
    };
    let mut seen = HashSet::new();
    (0..df.height())
        .filter_map(|idx| any_to_string_opt(values.get(idx).unwrap_or(AnyValue::Null)))
        .filter(|value| !seen.insert(value.clone()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unify_rules() {
        assert_eq!(unify(&DataType::Int64, &DataType::Int64), None);
        assert_eq!(
            unify(&DataType::Int64, &DataType::Float64),
            Some(DataType::Float64)
        );
        assert_eq!(unify(&DataType::Null, &DataType::Int64), Some(DataType::Int64));
        assert_eq!(unify(&DataType::String, &DataType::Null), Some(DataType::String));
        assert_eq!(unify(&DataType::Int64, &DataType::String), Some(DataType::String));
    }

    #[test]
    fn test_chunk_size_clamped() {
        assert_eq!(LoadOptions::default().with_chunk_size(0).chunk_size, 1);
        assert_eq!(LoadOptions::default().chunk_size, DEFAULT_CHUNK_SIZE);
    }
}
