//! CSV-directory table source.
//!
//! Each `*.csv` file in a directory is one table, named by its file stem.
//! Files are parsed once with Polars and then sliced into batches.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::source::TableSource;

/// Tables exported as one CSV file each.
#[derive(Debug)]
pub struct CsvDirectorySource {
    dir: PathBuf,
    files: BTreeMap<String, PathBuf>,
    parsed: BTreeMap<String, DataFrame>,
}

impl CsvDirectorySource {
    /// Scan `dir` for CSV files.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(IngestError::DirectoryNotFound { path: dir });
        }
        let entries = std::fs::read_dir(&dir).map_err(|source| IngestError::DirectoryRead {
            path: dir.clone(),
            source,
        })?;

        let mut files = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| IngestError::DirectoryRead {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                files.insert(stem.to_string(), path.clone());
            }
        }
        debug!(dir = %dir.display(), tables = files.len(), "scanned csv directory");
        Ok(Self {
            dir,
            files,
            parsed: BTreeMap::new(),
        })
    }

    /// Directory being read.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn frame(&mut self, table: &str) -> Result<&DataFrame> {
        if !self.parsed.contains_key(table) {
            let path = self
                .files
                .get(table)
                .ok_or_else(|| IngestError::TableNotFound {
                    table: table.to_string(),
                })?;
            let df = read_csv(path)?;
            self.parsed.insert(table.to_string(), df);
        }
        self.parsed
            .get(table)
            .ok_or_else(|| IngestError::TableNotFound {
                table: table.to_string(),
            })
    }
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let parse_err = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_err)?
        .finish()
        .map_err(parse_err)
}

impl TableSource for CsvDirectorySource {
    fn describe(&self) -> String {
        format!("csv:{}", self.dir.display())
    }

    fn table_names(&mut self) -> Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    fn row_count(&mut self, table: &str) -> Result<usize> {
        Ok(self.frame(table)?.height())
    }

    fn read_batches(
        &mut self,
        table: &str,
        batch_size: usize,
        sink: &mut dyn FnMut(DataFrame) -> Result<()>,
    ) -> Result<()> {
        let df = self.frame(table)?.clone();
        let batch_size = batch_size.max(1);
        let total = df.height();
        if total == 0 {
            return sink(df);
        }
        let mut offset = 0;
        while offset < total {
            let end = (offset + batch_size).min(total);
            let chunk = df.slice(offset as i64, end - offset);
            sink(chunk)?;
            offset = end;
        }
        // streamed once; release the parsed copy
        self.parsed.remove(table);
        Ok(())
    }
}
