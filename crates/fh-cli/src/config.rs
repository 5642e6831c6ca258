//! Run configuration.
//!
//! Settings come from an optional `flighthub.toml`; command line flags
//! override individual values afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fh_ingest::LoadOptions;
use fh_output::ExportFormat;
use fh_transform::CleanOptions;
use serde::{Deserialize, Serialize};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "flighthub.toml";

/// Kind of table source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A SQLite database file.
    #[default]
    Sqlite,
    /// A directory of `*.csv` files, one per table.
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Sqlite,
            path: PathBuf::from("flighthub.db"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed RNG seed; fresh entropy per run when absent.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: PathBuf,
    pub format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("exports"),
            format: ExportFormat::Csv,
        }
    }
}

/// Everything a run needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightHubConfig {
    pub source: SourceConfig,
    pub load: LoadOptions,
    pub clean: CleanOptions,
    pub simulation: SimulationConfig,
    pub export: ExportConfig,
}

/// Values given on the command line. `None` leaves the file value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub source_kind: Option<SourceKind>,
    pub sqlite: Option<PathBuf>,
    pub csv_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub chunk_size: Option<usize>,
    pub export_dir: Option<PathBuf>,
    pub format: Option<ExportFormat>,
}

impl FlightHubConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse configuration")
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Without one,
    /// [`DEFAULT_CONFIG_FILE`] is used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("read config {}", path.display()))?;
                Self::from_toml_str(&content)
                    .with_context(|| format!("invalid config {}", path.display()))
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                match fs::read_to_string(default_path) {
                    Ok(content) => Self::from_toml_str(&content)
                        .with_context(|| format!("invalid config {DEFAULT_CONFIG_FILE}")),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                        Ok(Self::default())
                    }
                    Err(e) => Err(e).with_context(|| format!("read config {DEFAULT_CONFIG_FILE}")),
                }
            }
        }
    }

    /// Apply command line values on top of this configuration.
    ///
    /// `--sqlite` and `--csv-dir` set both the source kind and its path.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(kind) = overrides.source_kind {
            self.source.kind = kind;
        }
        if let Some(path) = &overrides.sqlite {
            self.source.kind = SourceKind::Sqlite;
            self.source.path = path.clone();
        }
        if let Some(dir) = &overrides.csv_dir {
            self.source.kind = SourceKind::Csv;
            self.source.path = dir.clone();
        }
        if let Some(seed) = overrides.seed {
            self.simulation.seed = Some(seed);
        }
        if let Some(chunk_size) = overrides.chunk_size {
            self.load = self.load.with_chunk_size(chunk_size);
        }
        if let Some(dir) = &overrides.export_dir {
            self.export.dir = dir.clone();
        }
        if let Some(format) = overrides.format {
            self.export.format = format;
        }
        self
    }
}
