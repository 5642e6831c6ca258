//! Table-specific derived columns.
//!
//! Every function takes one frame and returns a new one. A missing input
//! column makes the step a no-op.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use fh_common::{
    any_to_f64, any_to_string_opt, any_to_timestamp, column_f64_values, column_string_values,
    month_name,
};
use fh_model::names::columns;
use fh_model::{AgeGroup, Haul};
use polars::prelude::{AnyValue, DataFrame};
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::frame::{
    date_column, datetime_column, drop_columns, f64_column, i64_column, set_column, string_column,
};

/// Bounds of the simulated load factor, `[low, high)`.
pub const LOAD_FACTOR_RANGE: (f64, f64) = (0.6, 0.95);

/// Fill missing passenger ages with the column mean.
///
/// Only null cells are filled and the column comes back as `Float64`. When
/// no age is known, or any present age is not numeric, the frame is returned
/// unchanged so bucketing can report it.
pub fn fill_missing_age(df: &DataFrame) -> Result<DataFrame> {
    let Ok(raw) = df.column(columns::PASSENGER_AGE) else {
        return Ok(df.clone());
    };
    let mut ages: Vec<Option<f64>> = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = raw.get(idx).unwrap_or(AnyValue::Null);
        if matches!(value, AnyValue::Null) {
            ages.push(None);
            continue;
        }
        match any_to_f64(value) {
            Some(age) => ages.push(Some(age)),
            None => {
                debug!(row = idx, "non-numeric passenger_age, skipping mean fill");
                return Ok(df.clone());
            }
        }
    }
    let known: Vec<f64> = ages.iter().flatten().copied().collect();
    if known.is_empty() {
        return Ok(df.clone());
    }
    let mean = known.iter().sum::<f64>() / known.len() as f64;
    let filled = ages.into_iter().map(|age| Some(age.unwrap_or(mean))).collect();

    let mut out = df.clone();
    set_column(&mut out, f64_column(columns::PASSENGER_AGE, filled))?;
    Ok(out)
}

/// Parse `booking_date` and derive `booking_year` and `booking_month`.
///
/// Unparseable dates become null, as do the fields derived from them.
pub fn derive_booking_calendar(df: &DataFrame) -> Result<DataFrame> {
    let Ok(raw) = df.column(columns::BOOKING_DATE) else {
        return Ok(df.clone());
    };
    let dates: Vec<Option<NaiveDate>> = (0..df.height())
        .map(|idx| any_to_timestamp(raw.get(idx).unwrap_or(AnyValue::Null)).map(|ts| ts.date()))
        .collect();

    let days = dates.iter().map(|date| date.and_then(epoch_days)).collect();
    let years = dates
        .iter()
        .map(|date| date.map(|d| i64::from(d.year())))
        .collect();
    let months = dates
        .iter()
        .map(|date| date.and_then(|d| month_name(d.month())).map(str::to_string))
        .collect();

    let mut out = df.clone();
    set_column(&mut out, date_column(columns::BOOKING_DATE, days)?)?;
    set_column(&mut out, i64_column(columns::BOOKING_YEAR, years))?;
    set_column(&mut out, string_column(columns::BOOKING_MONTH, months))?;
    Ok(out)
}

fn epoch_days(date: NaiveDate) -> Option<i32> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    i32::try_from(date.signed_duration_since(epoch).num_days()).ok()
}

/// Replace `max_range` with its `haul` class.
pub fn classify_haul_column(df: &DataFrame) -> Result<DataFrame> {
    let Some(ranges) = column_f64_values(df, columns::MAX_RANGE) else {
        return Ok(df.clone());
    };
    let hauls = ranges
        .into_iter()
        .map(|range| range.map(|r| Haul::from_max_range(r).as_str().to_string()))
        .collect();

    let mut out = df.clone();
    set_column(&mut out, string_column(columns::HAUL, hauls))?;
    drop_columns(&out, &[columns::MAX_RANGE])
}

/// Mean feedback rating per airline code.
///
/// Feedback rows without a code or a numeric rating are skipped.
pub fn average_ratings(feedback: &DataFrame) -> HashMap<String, f64> {
    let (Some(codes), Some(ratings)) = (
        column_string_values(feedback, columns::PREFERRED_AIRLINE),
        column_f64_values(feedback, columns::RATING),
    ) else {
        return HashMap::new();
    };
    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
    for (code, rating) in codes.into_iter().zip(ratings) {
        if let (Some(code), Some(rating)) = (code, rating) {
            let entry = sums.entry(code).or_insert((0.0, 0));
            entry.0 += rating;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(code, (sum, count))| (code, sum / count as f64))
        .collect()
}

/// Set `rating` from the feedback average for every airline whose IATA code
/// received feedback.
///
/// Airlines without feedback keep their existing rating, or none. The column
/// is only created once at least one airline matches.
pub fn apply_airline_ratings(airline: &DataFrame, feedback: Option<&DataFrame>) -> Result<DataFrame> {
    let averages = feedback.map(average_ratings).unwrap_or_default();
    if averages.is_empty() {
        return Ok(airline.clone());
    }
    let Some(codes) = column_string_values(airline, columns::IATA) else {
        return Ok(airline.clone());
    };
    let existing = column_f64_values(airline, columns::RATING);
    if existing.is_none()
        && !codes
            .iter()
            .flatten()
            .any(|code| averages.contains_key(code))
    {
        return Ok(airline.clone());
    }

    let existing = existing.unwrap_or_else(|| vec![None; airline.height()]);
    let ratings = codes
        .iter()
        .zip(existing)
        .map(|(code, current)| {
            code.as_ref()
                .and_then(|code| averages.get(code).copied())
                .or(current)
        })
        .collect();

    let mut out = airline.clone();
    set_column(&mut out, f64_column(columns::RATING, ratings))?;
    Ok(out)
}

fn timestamps(df: &DataFrame, name: &str) -> Option<Vec<Option<NaiveDateTime>>> {
    let column = df.column(name).ok()?;
    Some(
        (0..df.height())
            .map(|idx| any_to_timestamp(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect(),
    )
}

fn millis(values: &[Option<NaiveDateTime>]) -> Vec<Option<i64>> {
    values
        .iter()
        .map(|ts| ts.map(|t| t.and_utc().timestamp_millis()))
        .collect()
}

fn minutes_between(
    from: &[Option<NaiveDateTime>],
    to: &[Option<NaiveDateTime>],
) -> Vec<Option<i64>> {
    from.iter()
        .zip(to)
        .map(|(from, to)| match (from, to) {
            (Some(from), Some(to)) => Some(to.signed_duration_since(*from).num_minutes()),
            _ => None,
        })
        .collect()
}

/// Parse schedule timestamps and derive delay, trip duration and departure
/// calendar fields.
///
/// `delay` is `actual_departure - expected_departure` and `trip_duration` is
/// `arrival - actual_departure`, both in whole minutes. The expected departure
/// and arrival columns are dropped afterwards. Requires `expected_departure`;
/// without it the frame is returned unchanged.
pub fn derive_flight_timings(df: &DataFrame) -> Result<DataFrame> {
    let Some(expected) = timestamps(df, columns::EXPECTED_DEPARTURE) else {
        return Ok(df.clone());
    };
    let height = df.height();
    let actual = timestamps(df, columns::ACTUAL_DEPARTURE).unwrap_or_else(|| vec![None; height]);
    let arrival = timestamps(df, columns::ARRIVAL).unwrap_or_else(|| vec![None; height]);

    let months = actual
        .iter()
        .map(|ts| ts.and_then(|t| month_name(t.month())).map(str::to_string))
        .collect();
    let years = actual
        .iter()
        .map(|ts| ts.map(|t| i64::from(t.year())))
        .collect();

    let mut out = df.clone();
    set_column(
        &mut out,
        datetime_column(columns::ACTUAL_DEPARTURE, millis(&actual))?,
    )?;
    set_column(
        &mut out,
        i64_column(columns::DELAY, minutes_between(&expected, &actual)),
    )?;
    set_column(
        &mut out,
        i64_column(columns::TRIP_DURATION, minutes_between(&actual, &arrival)),
    )?;
    set_column(&mut out, string_column(columns::DEPARTURE_MONTH, months))?;
    set_column(&mut out, i64_column(columns::DEPARTURE_YEAR, years))?;
    drop_columns(&out, &[columns::EXPECTED_DEPARTURE, columns::ARRIVAL])
}

/// Outcome of [`bucket_passenger_ages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AgeBucketing {
    /// Ages were replaced by band labels.
    Applied {
        /// Rows that landed in a band.
        bucketed: usize,
        /// Rows with a known age outside every band; now null.
        out_of_range: usize,
    },
    /// The column was left as it was.
    Skipped { reason: String },
}

impl AgeBucketing {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Replace numeric `passenger_age` values with their [`AgeGroup`] label.
///
/// Any value that is present but not numeric skips the whole step and
/// returns the input untouched together with the reason.
pub fn bucket_passenger_ages(df: &DataFrame) -> Result<(DataFrame, AgeBucketing)> {
    let Ok(raw) = df.column(columns::PASSENGER_AGE) else {
        let reason = format!("column '{}' not present", columns::PASSENGER_AGE);
        return Ok((df.clone(), AgeBucketing::Skipped { reason }));
    };

    let mut labels = Vec::with_capacity(df.height());
    let mut bucketed = 0;
    let mut out_of_range = 0;
    for idx in 0..df.height() {
        let value = raw.get(idx).unwrap_or(AnyValue::Null);
        if matches!(value, AnyValue::Null) {
            labels.push(None);
            continue;
        }
        let Some(age) = any_to_f64(value.clone()) else {
            let text = any_to_string_opt(value).unwrap_or_default();
            let reason = format!("non-numeric age '{text}' at row {idx}");
            return Ok((df.clone(), AgeBucketing::Skipped { reason }));
        };
        match AgeGroup::from_age(age) {
            Some(band) => {
                bucketed += 1;
                labels.push(Some(band.as_str().to_string()));
            }
            None => {
                out_of_range += 1;
                labels.push(None);
            }
        }
    }

    let mut out = df.clone();
    set_column(&mut out, string_column(columns::PASSENGER_AGE, labels))?;
    Ok((
        out,
        AgeBucketing::Applied {
            bucketed,
            out_of_range,
        },
    ))
}

/// Draw a `load_factor` per row, uniform in [`LOAD_FACTOR_RANGE`].
pub fn simulate_load_factor<R: Rng + ?Sized>(df: &DataFrame, rng: &mut R) -> Result<DataFrame> {
    let (low, high) = LOAD_FACTOR_RANGE;
    let factors = (0..df.height())
        .map(|_| Some(rng.gen_range(low..high)))
        .collect();
    let mut out = df.clone();
    set_column(&mut out, f64_column(columns::LOAD_FACTOR, factors))?;
    Ok(out)
}
