//! Per-table diagnostic report: shape, dtypes, missing values and a numeric
//! summary for every numeric column.

use std::fmt;

use fh_common::column_f64_values;
use polars::prelude::{DataFrame, DataType};
use serde::Serialize;

/// Summary statistics for one numeric column.
///
/// Quartiles interpolate linearly between ranks and `std` is the sample
/// standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Diagnostic report for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInsight {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    /// Column name and dtype, in frame order.
    pub dtypes: Vec<(String, String)>,
    /// Null count per column, in frame order.
    pub missing: Vec<(String, usize)>,
    pub numeric: Vec<NumericSummary>,
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

fn summarize(column: &str, values: Vec<f64>) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values;
    sorted.sort_by(f64::total_cmp);
    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });
    Some(NumericSummary {
        column: column.to_string(),
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Build the report for `df`.
pub fn table_insight(df: &DataFrame, name: &str) -> TableInsight {
    let mut dtypes = Vec::with_capacity(df.width());
    let mut missing = Vec::with_capacity(df.width());
    let mut numeric = Vec::new();
    for column in df.get_columns() {
        let col_name = column.name().to_string();
        dtypes.push((col_name.clone(), column.dtype().to_string()));
        missing.push((col_name.clone(), column.null_count()));
        if is_numeric(column.dtype()) {
            let values: Vec<f64> = column_f64_values(df, &col_name)
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .filter(|v| v.is_finite())
                .collect();
            numeric.extend(summarize(&col_name, values));
        }
    }
    TableInsight {
        name: name.to_string(),
        rows: df.height(),
        columns: df.width(),
        dtypes,
        missing,
        numeric,
    }
}

impl fmt::Display for TableInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.name)?;
        writeln!(f, "shape: ({}, {})", self.rows, self.columns)?;
        writeln!(f, "dtypes:")?;
        for (column, dtype) in &self.dtypes {
            writeln!(f, "  {column}: {dtype}")?;
        }
        writeln!(f, "missing values:")?;
        for (column, nulls) in &self.missing {
            writeln!(f, "  {column}: {nulls}")?;
        }
        if !self.numeric.is_empty() {
            writeln!(f, "summary:")?;
            for s in &self.numeric {
                let std = s.std.map_or_else(|| "NaN".to_string(), |v| format!("{v:.3}"));
                writeln!(
                    f,
                    "  {}: count={} mean={:.3} std={} min={} 25%={:.3} 50%={:.3} 75%={:.3} max={}",
                    s.column, s.count, s.mean, std, s.min, s.q25, s.median, s.q75, s.max
                )?;
            }
        }
        Ok(())
    }
}
