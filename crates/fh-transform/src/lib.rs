//! FlightHub pipeline stages after loading.
//!
//! - [`clean_tables`]: blank strings to nulls, duplicate rows removed
//! - [`transform_tables`]: derived columns per table, passenger simulation
//! - [`merge_views`]: the flight, booking and airline analytic views
//!
//! Each stage takes a [`fh_model::TableSet`] by reference and returns a new
//! value.

pub mod clean;
pub mod error;
pub mod frame;
pub mod merge;
pub mod pipeline;
pub mod simulate;
pub mod wrangle;

pub use clean::{CleanOptions, CleanReport, TableCleanStats, clean_tables};
pub use error::{Result, TransformError};
pub use frame::drop_columns;
pub use merge::merge_views;
pub use pipeline::{TransformReport, transform_tables};
pub use simulate::simulate_passengers;
pub use wrangle::{
    AgeBucketing, apply_airline_ratings, bucket_passenger_ages, classify_haul_column,
    derive_booking_calendar, derive_flight_timings, fill_missing_age, simulate_load_factor,
};
