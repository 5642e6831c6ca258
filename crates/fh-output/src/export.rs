//! Delimited-text export of the booking view.
//!
//! The same bytes are written to disk and handed back for download.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{OutputError, Result};

/// Export file flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated, `booking_data.csv`.
    #[default]
    Csv,
    /// Tab-separated, `booking_data.txt`.
    Txt,
}

impl ExportFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            Self::Csv => b',',
            Self::Txt => b'\t',
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Csv => "booking_data.csv",
            Self::Txt => "booking_data.txt",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Txt => "text/plain",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "txt" | "tsv" => Ok(Self::Txt),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}

/// A written export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Where the file was written.
    pub path: PathBuf,
    /// The exact bytes written, for download.
    pub bytes: Vec<u8>,
    /// MIME type matching the format.
    pub mime: &'static str,
}

/// Serialize a frame as header plus rows, without an index column.
pub fn export_bytes(df: &DataFrame, format: ExportFormat) -> Result<Vec<u8>> {
    let mut data = df.clone();
    let mut buffer: Vec<u8> = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(format.delimiter())
        .finish(&mut data)?;
    Ok(buffer)
}

/// Write the export into `dir`, creating it when needed.
pub fn export_to_dir(df: &DataFrame, format: ExportFormat, dir: &Path) -> Result<ExportArtifact> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let bytes = export_bytes(df, format)?;
    let path = dir.join(format.file_name());
    std::fs::write(&path, &bytes).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;
    info!(
        path = %path.display(),
        rows = df.height(),
        bytes = bytes.len(),
        "booking data exported"
    );
    Ok(ExportArtifact {
        path,
        bytes,
        mime: format.mime(),
    })
}
