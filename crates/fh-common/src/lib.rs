//! Shared utilities for FlightHub crates.
//!
//! - **values**: polars `AnyValue` conversions used when walking frames row by row
//! - **calendar**: timestamp parsing and month naming

pub mod calendar;
pub mod values;

pub use calendar::{
    MONTH_NAMES, any_to_timestamp, month_index, month_name, parse_date, parse_timestamp, timestamp_from_millis,
};
pub use values::{
    any_to_bool, any_to_f64, any_to_i64, any_to_string, any_to_string_opt, column_f64_values,
    column_i64_values, column_string_values, format_numeric, parse_f64, parse_i64,
};
