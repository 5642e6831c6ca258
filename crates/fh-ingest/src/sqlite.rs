//! SQLite table source.

use std::path::{Path, PathBuf};

use fh_common::format_numeric;
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::source::TableSource;

/// Reads every user table of a SQLite database file.
///
/// The file is opened read-only.
#[derive(Debug)]
pub struct SqliteSource {
    path: PathBuf,
    conn: Connection,
}

impl SqliteSource {
    /// Open the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| IngestError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, conn })
    }

    /// Path of the opened database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for SqliteSource {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    fn table_names(&mut self) -> Result<Vec<String>> {
        let query_err = |source: rusqlite::Error| IngestError::Query {
            table: "sqlite_master".to_string(),
            source,
        };
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )
            .map_err(query_err)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(query_err)?;
        Ok(names)
    }

    fn row_count(&mut self, table: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|source| IngestError::Query {
                table: table.to_string(),
                source,
            })?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn read_batches(
        &mut self,
        table: &str,
        batch_size: usize,
        sink: &mut dyn FnMut(DataFrame) -> Result<()>,
    ) -> Result<()> {
        let query_err = |source: rusqlite::Error| IngestError::Query {
            table: table.to_string(),
            source,
        };
        let batch_size = batch_size.max(1);
        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        let mut stmt = self.conn.prepare(&sql).map_err(query_err)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt.query([]).map_err(query_err)?;
        let mut buffer: Vec<Vec<Cell>> = Vec::with_capacity(batch_size);
        let mut emitted = false;
        while let Some(row) = rows.next().map_err(query_err)? {
            let mut cells = Vec::with_capacity(columns.len());
            for idx in 0..columns.len() {
                cells.push(Cell::from(row.get_ref(idx).map_err(query_err)?));
            }
            buffer.push(cells);
            if buffer.len() >= batch_size {
                sink(build_batch(&columns, &buffer)?)?;
                buffer.clear();
                emitted = true;
            }
        }
        if !buffer.is_empty() || !emitted {
            sink(build_batch(&columns, &buffer)?)?;
        }
        debug!(table, "sqlite read complete");
        Ok(())
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// An owned SQLite cell.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null | ValueRef::Blob(_) => Cell::Null,
            ValueRef::Integer(v) => Cell::Integer(v),
            ValueRef::Real(v) => Cell::Real(v),
            ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Dtype a batch column is materialized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inferred {
    Null,
    Int,
    Float,
    Text,
}

fn infer(cells: &[&Cell]) -> Inferred {
    cells.iter().fold(Inferred::Null, |acc, cell| match (acc, cell) {
        (Inferred::Text, _) | (_, Cell::Text(_)) => Inferred::Text,
        (_, Cell::Null) => acc,
        (Inferred::Float, _) | (_, Cell::Real(_)) => Inferred::Float,
        (_, Cell::Integer(_)) => Inferred::Int,
    })
}

fn build_batch(columns: &[String], rows: &[Vec<Cell>]) -> Result<DataFrame> {
    let mut out: Vec<Column> = Vec::with_capacity(columns.len());
    for (idx, name) in columns.iter().enumerate() {
        let cells: Vec<&Cell> = rows.iter().filter_map(|row| row.get(idx)).collect();
        let series = match infer(&cells) {
            Inferred::Null => Series::full_null(name.as_str().into(), cells.len(), &DataType::Null),
            Inferred::Int => {
                let values: Vec<Option<i64>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::Integer(v) => Some(*v),
                        _ => None,
                    })
                    .collect();
                Series::new(name.as_str().into(), values)
            }
            Inferred::Float => {
                let values: Vec<Option<f64>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::Integer(v) => Some(*v as f64),
                        Cell::Real(v) => Some(*v),
                        _ => None,
                    })
                    .collect();
                Series::new(name.as_str().into(), values)
            }
            Inferred::Text => {
                let values: Vec<Option<String>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::Null => None,
                        Cell::Integer(v) => Some(v.to_string()),
                        Cell::Real(v) => Some(format_numeric(*v)),
                        Cell::Text(s) => Some(s.clone()),
                    })
                    .collect();
                Series::new(name.as_str().into(), values)
            }
        };
        out.push(series.into_column());
    }
    Ok(DataFrame::new(out)?)
}

#[cfg(test)]
mod tests {
    use polars::prelude::AnyValue;

    use super::*;

    #[test]
    fn test_infer_promotes_mixed_numbers_to_float() {
        let cells = [Cell::Integer(1), Cell::Null, Cell::Real(2.5)];
        let refs: Vec<&Cell> = cells.iter().collect();
        assert_eq!(infer(&refs), Inferred::Float);
    }

    #[test]
    fn test_infer_text_wins() {
        let cells = [Cell::Integer(1), Cell::Text("a".into())];
        let refs: Vec<&Cell> = cells.iter().collect();
        assert_eq!(infer(&refs), Inferred::Text);
    }

    #[test]
    fn test_infer_all_null() {
        let cells = [Cell::Null, Cell::Null];
        let refs: Vec<&Cell> = cells.iter().collect();
        assert_eq!(infer(&refs), Inferred::Null);
    }

    #[test]
    fn test_quote_identifier_escapes_quotes() {
        assert_eq!(quote_identifier("flight"), "\"flight\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_build_batch_dtypes() {
        let columns = vec!["id".to_string(), "price".to_string(), "note".to_string()];
        let rows = vec![
            vec![Cell::Integer(1), Cell::Real(9.5), Cell::Null],
            vec![Cell::Integer(2), Cell::Integer(10), Cell::Null],
        ];
        let df = build_batch(&columns, &rows).unwrap();
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("note").unwrap().dtype(), &DataType::Null);
    }

    #[test]
    fn test_build_batch_text_renders_reals_without_trailing_zero() {
        let columns = vec!["note".to_string()];
        let rows = vec![vec![Cell::Real(10.0)], vec![Cell::Text("x".into())]];
        let df = build_batch(&columns, &rows).unwrap();
        let note = df.column("note").unwrap();
        assert_eq!(note.get(0).unwrap(), AnyValue::String("10"));
    }
}
