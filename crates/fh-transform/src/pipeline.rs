//! Table-specific transformation of a cleaned table set.

use std::time::Instant;

use fh_common::column_i64_values;
use fh_model::names::{columns, tables};
use fh_model::{Table, TableSet};
use polars::prelude::DataFrame;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::error::Result;
use crate::frame::{drop_columns, require_table};
use crate::simulate::simulate_passengers;
use crate::wrangle::{
    AgeBucketing, apply_airline_ratings, bucket_passenger_ages, classify_haul_column,
    derive_booking_calendar, derive_flight_timings, fill_missing_age, simulate_load_factor,
};

/// Columns removed from bookings before analysis.
pub const BOOKING_PII_COLUMNS: [&str; 2] = [columns::PASSENGER_EMAIL, columns::PASSENGER_NATIONALITY];

/// What the transform stage did beyond rewriting tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformReport {
    /// Result of the age bucketing step.
    pub age_bucketing: AgeBucketing,
    /// Bookings that received a simulated passenger count.
    pub simulated_bookings: usize,
    /// Bookings zeroed because their flight was full.
    pub zeroed_bookings: usize,
    /// Passengers counted across all bookings after capacity enforcement.
    pub total_passengers: i64,
}

/// Apply every table-specific transform.
///
/// The input set is left untouched; a new set is returned. Steps for absent
/// tables are skipped, except the passenger simulation, which needs the
/// booking, flight, airplane and airplane type tables.
pub fn transform_tables<R: Rng + ?Sized>(
    tables: &TableSet,
    rng: &mut R,
) -> Result<(TableSet, TransformReport)> {
    let span = info_span!("transform");
    let _guard = span.enter();
    let start = Instant::now();

    let mut out = tables.clone();

    update(&mut out, tables::BOOKING, |df| {
        let df = fill_missing_age(df)?;
        let df = drop_columns(&df, &BOOKING_PII_COLUMNS)?;
        derive_booking_calendar(&df)
    })?;

    update(&mut out, tables::AIRPLANE_TYPE, |df| {
        let df = classify_haul_column(df)?;
        drop_columns(&df, &[columns::DESCRIPTION])
    })?;

    let feedback = tables.get(tables::PASSENGER_FEEDBACK).map(|t| t.data.clone());
    update(&mut out, tables::AIRLINE, |df| {
        let df = apply_airline_ratings(df, feedback.as_ref())?;
        drop_columns(&df, &[columns::BASE_AIRPORT])
    })?;

    update(&mut out, tables::FLIGHT, derive_flight_timings)?;

    let mut age_bucketing = AgeBucketing::Skipped {
        reason: format!("table '{}' not present", tables::BOOKING),
    };
    update(&mut out, tables::BOOKING, |df| {
        let (df, outcome) = bucket_passenger_ages(df)?;
        age_bucketing = outcome;
        Ok(df)
    })?;
    match &age_bucketing {
        AgeBucketing::Applied {
            bucketed,
            out_of_range,
        } => debug!(bucketed, out_of_range, "ages bucketed"),
        AgeBucketing::Skipped { reason } => warn!(%reason, "age bucketing skipped"),
    }

    update(&mut out, tables::FLIGHT, |df| simulate_load_factor(df, rng))?;

    let booking = simulate_passengers(
        &require_table(&out, tables::BOOKING)?.data,
        &require_table(&out, tables::FLIGHT)?.data,
        &require_table(&out, tables::AIRPLANE)?.data,
        &require_table(&out, tables::AIRPLANE_TYPE)?.data,
        rng,
    )?;
    let counts: Vec<i64> = column_i64_values(&booking, columns::NUM_PASSENGERS)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect();
    let report = TransformReport {
        age_bucketing,
        simulated_bookings: counts.len(),
        zeroed_bookings: counts.iter().filter(|n| **n == 0).count(),
        total_passengers: counts.iter().sum(),
    };
    update(&mut out, tables::BOOKING, |_| Ok(booking))?;

    info!(
        bookings = report.simulated_bookings,
        zeroed = report.zeroed_bookings,
        passengers = report.total_passengers,
        duration_ms = start.elapsed().as_millis(),
        "transform complete"
    );
    Ok((out, report))
}

/// Replace one table's data through `f` when the table is present.
fn update<F>(tables: &mut TableSet, name: &str, f: F) -> Result<()>
where
    F: FnOnce(&DataFrame) -> Result<DataFrame>,
{
    let Some(table) = tables.get(name) else {
        debug!(table = name, "table absent, step skipped");
        return Ok(());
    };
    let replaced: Table = table.with_data(f(&table.data)?);
    tables.insert(replaced);
    Ok(())
}
