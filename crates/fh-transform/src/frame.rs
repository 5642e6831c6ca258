//! Small DataFrame helpers shared by the stages.

use fh_model::{Table, TableSet};
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series, TimeUnit};

use crate::error::{Result, TransformError};

/// Drop every listed column that exists; absent names are ignored.
pub fn drop_columns(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let mut out = df.clone();
    for name in columns {
        if out.column(name).is_ok() {
            out.drop_in_place(name)?;
        }
    }
    Ok(out)
}

/// Insert or replace a column, keeping its position when it already exists.
pub(crate) fn set_column(df: &mut DataFrame, column: Column) -> Result<()> {
    df.with_column(column)?;
    Ok(())
}

pub(crate) fn i64_column(name: &str, values: Vec<Option<i64>>) -> Column {
    Series::new(name.into(), values).into_column()
}

pub(crate) fn f64_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into_column()
}

pub(crate) fn string_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into_column()
}

pub(crate) fn bool_column(name: &str, values: Vec<Option<bool>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Epoch milliseconds as a `Datetime(Milliseconds)` column.
pub(crate) fn datetime_column(name: &str, millis: Vec<Option<i64>>) -> Result<Column> {
    let series = Series::new(name.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    Ok(series.into_column())
}

/// Days since the epoch as a `Date` column.
pub(crate) fn date_column(name: &str, days: Vec<Option<i32>>) -> Result<Column> {
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into_column())
}

pub(crate) fn require_table<'a>(tables: &'a TableSet, name: &str) -> Result<&'a Table> {
    tables.get(name).ok_or_else(|| TransformError::MissingTable {
        table: name.to_string(),
    })
}

pub(crate) fn require_column(df: &DataFrame, table: &str, column: &str) -> Result<()> {
    if df.column(column).is_ok() {
        Ok(())
    } else {
        Err(TransformError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_columns_ignores_absent() {
        let df = DataFrame::new(vec![
            i64_column("a", vec![Some(1)]),
            i64_column("b", vec![Some(2)]),
        ])
        .unwrap();
        let out = drop_columns(&df, &["b", "zzz"]).unwrap();
        assert_eq!(out.width(), 1);
        assert!(out.column("a").is_ok());
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_datetime_column_dtype() {
        let column = datetime_column("ts", vec![Some(0), None]).unwrap();
        assert_eq!(
            column.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(column.null_count(), 1);
    }
}
