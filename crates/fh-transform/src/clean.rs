//! Uniform cleaning applied to every loaded table.
//!
//! Two passes run per table: blank strings become nulls, then fully repeated
//! rows are dropped. The identifier column is row identity, so it does not
//! take part in the comparison.

use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use fh_common::any_to_string_opt;
use fh_model::names::tables;
use fh_model::{Table, TableSet};
use polars::prelude::{AnyValue, BooleanChunked, DataFrame, DataType, NewChunkedArray};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::error::Result;
use crate::frame::{set_column, string_column};

/// Options for [`clean_tables`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Tables whose repeated rows are distinct events and must be kept.
    pub duplicate_exempt: Vec<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            duplicate_exempt: vec![tables::PASSENGER_FEEDBACK.to_string()],
        }
    }
}

impl CleanOptions {
    fn is_exempt(&self, table: &str) -> bool {
        self.duplicate_exempt
            .iter()
            .any(|name| name.eq_ignore_ascii_case(table))
    }
}

/// Per-table cleaning counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCleanStats {
    pub blanks_replaced: usize,
    pub duplicates_removed: usize,
}

/// What the cleaner changed, keyed by table name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub tables: BTreeMap<String, TableCleanStats>,
}

impl CleanReport {
    /// Total duplicate rows removed across every table.
    pub fn total_duplicates(&self) -> usize {
        self.tables.values().map(|s| s.duplicates_removed).sum()
    }

    /// Total blank cells turned into nulls.
    pub fn total_blanks(&self) -> usize {
        self.tables.values().map(|s| s.blanks_replaced).sum()
    }
}

/// Clean every table in the set.
pub fn clean_tables(tables: &TableSet, options: &CleanOptions) -> Result<(TableSet, CleanReport)> {
    let span = info_span!("clean");
    let _guard = span.enter();
    let start = Instant::now();

    let mut report = CleanReport::default();
    let mut cleaned = TableSet::new();
    for table in tables.iter() {
        let (table, stats) = clean_table(table, options.is_exempt(&table.name))?;
        if stats.duplicates_removed > 0 {
            info!(
                table = %table.name,
                duplicates = stats.duplicates_removed,
                "removed duplicate rows"
            );
        }
        debug!(table = %table.name, blanks = stats.blanks_replaced, "blank cells nulled");
        report.tables.insert(table.name.clone(), stats);
        cleaned.insert(table);
    }

    info!(
        tables = cleaned.len(),
        duplicates = report.total_duplicates(),
        blanks = report.total_blanks(),
        duration_ms = start.elapsed().as_millis(),
        "clean complete"
    );
    Ok((cleaned, report))
}

fn clean_table(table: &Table, keep_duplicates: bool) -> Result<(Table, TableCleanStats)> {
    let (mut data, blanks_replaced) = replace_blanks(&table.data)?;
    let mut duplicates_removed = 0;
    if !keep_duplicates {
        let before = data.height();
        data = drop_duplicate_rows(&data, table.index.as_deref())?;
        duplicates_removed = before - data.height();
    }
    let stats = TableCleanStats {
        blanks_replaced,
        duplicates_removed,
    };
    Ok((table.with_data(data), stats))
}

/// Replace empty and whitespace-only strings with nulls.
///
/// Returns the new frame and the number of cells replaced.
pub fn replace_blanks(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let mut out = df.clone();
    let mut replaced = 0;
    for column in df.get_columns() {
        if column.dtype() != &DataType::String {
            continue;
        }
        let mut blanks = 0;
        let values: Vec<Option<String>> = (0..column.len())
            .map(|idx| {
                let value = any_to_string_opt(column.get(idx).unwrap_or(AnyValue::Null));
                match value {
                    Some(text) if text.trim().is_empty() => {
                        blanks += 1;
                        None
                    }
                    other => other,
                }
            })
            .collect();
        if blanks > 0 {
            set_column(&mut out, string_column(column.name().as_str(), values))?;
            replaced += blanks;
        }
    }
    Ok((out, replaced))
}

/// Keep the first occurrence of every distinct row.
///
/// `ignore` names a column left out of the comparison. Survivors keep their order.
pub fn drop_duplicate_rows(df: &DataFrame, ignore: Option<&str>) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let columns: Vec<_> = df
        .get_columns()
        .iter()
        .filter(|column| Some(column.name().as_str()) != ignore)
        .collect();
    if columns.is_empty() {
        return Ok(df.clone());
    }

    let mut seen = HashSet::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let row: Vec<Option<String>> = columns
            .iter()
            .map(|column| any_to_string_opt(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        keep.push(seen.insert(row));
    }
    if keep.iter().all(|kept| *kept) {
        return Ok(df.clone());
    }
    let mask = BooleanChunked::from_slice("dedupe".into(), &keep);
    Ok(df.filter(&mask)?)
}
