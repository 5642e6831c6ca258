//! CLI argument definitions for `flighthub`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use fh_cli::config::{ConfigOverrides, SourceKind};
use fh_output::ExportFormat;

#[derive(Parser)]
#[command(
    name = "flighthub",
    version,
    about = "FlightHub - airline booking analytics pipeline",
    long_about = "Load an airline database, clean and enrich it, and build the\n\
                  flight, booking and airline views behind the dashboard.\n\n\
                  Sources: a SQLite database file or a directory of CSV files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: ./flighthub.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run load, clean, transform and merge, then print a summary.
    Run(RunArgs),

    /// Run the pipeline and write the booking view to a file.
    Export(ExportArgs),

    /// List the tables the source exposes with their row counts.
    Tables(SourceArgs),

    /// Print shape, dtypes, missing values and numeric summary of a view.
    Insight(InsightArgs),
}

/// Where to read tables from.
#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    /// Source kind; the path comes from the config file.
    #[arg(long = "source", value_enum)]
    pub source: Option<SourceKindArg>,

    /// Read a SQLite database file.
    #[arg(long = "sqlite", value_name = "PATH", conflicts_with = "csv_dir")]
    pub sqlite: Option<PathBuf>,

    /// Read every *.csv file in a directory.
    #[arg(long = "csv-dir", value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Rows fetched per batch while loading.
    #[arg(long = "chunk-size", value_name = "ROWS")]
    pub chunk_size: Option<usize>,
}

/// Source plus simulation settings.
#[derive(Args, Clone, Default)]
pub struct PipelineArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Seed for the passenger and load factor simulation.
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,
}

#[derive(Args, Clone, Default)]
pub struct ExportTarget {
    /// Directory for the exported file.
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Export file format.
    #[arg(long = "format", value_enum)]
    pub format: Option<FormatArg>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Also write the booking view.
    #[arg(long = "export")]
    pub export: bool,

    #[command(flatten)]
    pub target: ExportTarget,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    #[command(flatten)]
    pub target: ExportTarget,
}

#[derive(Args)]
pub struct InsightArgs {
    /// View to describe.
    #[arg(value_enum)]
    pub view: ViewArg,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceKindArg {
    Sqlite,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Txt,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Flights,
    Bookings,
    Airlines,
}

impl ViewArg {
    pub fn name(self) -> &'static str {
        match self {
            Self::Flights => "flights",
            Self::Bookings => "bookings",
            Self::Airlines => "airlines",
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl SourceArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source_kind: self.source.map(|kind| match kind {
                SourceKindArg::Sqlite => SourceKind::Sqlite,
                SourceKindArg::Csv => SourceKind::Csv,
            }),
            sqlite: self.sqlite.clone(),
            csv_dir: self.csv_dir.clone(),
            chunk_size: self.chunk_size,
            ..ConfigOverrides::default()
        }
    }
}

impl PipelineArgs {
    /// Overrides from these flags, optionally with an export target.
    pub fn overrides(&self, target: Option<&ExportTarget>) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            seed: self.seed,
            ..self.source.overrides()
        };
        if let Some(target) = target {
            overrides.export_dir = target.export_dir.clone();
            overrides.format = target.format.map(|format| match format {
                FormatArg::Csv => ExportFormat::Csv,
                FormatArg::Txt => ExportFormat::Txt,
            });
        }
        overrides
    }
}

impl From<&SourceArgs> for ConfigOverrides {
    fn from(args: &SourceArgs) -> Self {
        args.overrides()
    }
}
