//! Table loading for FlightHub.
//!
//! A [`TableSource`] lists tables and streams their rows in bounded batches;
//! [`load_tables`] drains every table into a [`fh_model::TableSet`].
//!
//! Two sources are provided:
//!
//! - [`SqliteSource`]: every user table of a SQLite database file
//! - [`CsvDirectorySource`]: one table per `*.csv` file in a directory

pub mod csv_dir;
pub mod error;
pub mod loader;
pub mod source;
pub mod sqlite;

pub use csv_dir::CsvDirectorySource;
pub use error::{IngestError, Result};
pub use loader::{DEFAULT_CHUNK_SIZE, LoadOptions, LoadProgress, NoProgress, load_tables};
pub use source::TableSource;
pub use sqlite::SqliteSource;
