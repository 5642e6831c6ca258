//! Relational merge into the three analytic views.
//!
//! Aircraft, airline and flight linkage uses inner joins, so rows with a
//! broken link disappear from the views; the number of dropped rows is logged
//! as a warning. Airport and booking-count lookups are left joins.

use std::collections::HashSet;
use std::time::Instant;

use fh_common::column_i64_values;
use fh_model::names::{columns, tables};
use fh_model::{AnalyticViews, TableSet};
use polars::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::error::Result;
use crate::frame::{drop_columns, require_column, require_table};

const ROW_ORDER: &str = "__row_order";
const RIGHT_SUFFIX: &str = "_right";

/// Columns removed from the booking view after the join.
pub const BOOKING_VIEW_DROPPED: [&str; 6] = [
    columns::FLIGHT_ID,
    columns::IATA,
    columns::MAKER,
    columns::MAX_ALTITUDE,
    columns::ACTUAL_DEPARTURE,
    columns::ORIGIN_COUNTRY,
];

/// Build the flight, booking and airline views from transformed tables.
pub fn merge_views(tables: &TableSet) -> Result<AnalyticViews> {
    let span = info_span!("merge");
    let _guard = span.enter();
    let start = Instant::now();

    let airline = &require_table(tables, tables::AIRLINE)?.data;
    let airplane = &require_table(tables, tables::AIRPLANE)?.data;
    let airplane_type = &require_table(tables, tables::AIRPLANE_TYPE)?.data;
    let airport = &require_table(tables, tables::AIRPORT)?.data;
    let flight = &require_table(tables, tables::FLIGHT)?.data;
    let booking = &require_table(tables, tables::BOOKING)?.data;

    let airplanes = merge_airplanes(airplane, airplane_type, airline)?;
    let flights = merge_flights(flight, &airplanes, airport, booking)?;
    let bookings = merge_bookings(booking, &flights)?;

    info!(
        flights = flights.height(),
        bookings = bookings.height(),
        airlines = airline.height(),
        duration_ms = start.elapsed().as_millis(),
        "merge complete"
    );
    Ok(AnalyticViews {
        flights,
        bookings,
        airlines: airline.clone(),
    })
}

/// Airplanes with their type attributes and owning airline's code, name and type.
pub fn merge_airplanes(
    airplane: &DataFrame,
    airplane_type: &DataFrame,
    airline: &DataFrame,
) -> Result<DataFrame> {
    require_column(airplane, tables::AIRPLANE, columns::TYPE_ID)?;
    require_column(airplane, tables::AIRPLANE, columns::AIRLINE_ID)?;
    require_column(airplane_type, tables::AIRPLANE_TYPE, columns::TYPE_ID)?;
    require_column(airline, tables::AIRLINE, columns::AIRLINE_ID)?;

    warn_unmatched(
        "airplane -> airplane_type",
        airplane,
        columns::TYPE_ID,
        airplane_type,
        columns::TYPE_ID,
    );
    warn_unmatched(
        "airplane -> airline",
        airplane,
        columns::AIRLINE_ID,
        airline,
        columns::AIRLINE_ID,
    );

    let airline_subset = present(
        airline,
        &[
            columns::AIRLINE_ID,
            columns::IATA,
            columns::AIRLINE_NAME,
            columns::AIRLINE_TYPE,
        ],
    );
    let merged = keyed(airplane, &[columns::TYPE_ID, columns::AIRLINE_ID])
        .with_row_index(ROW_ORDER, None)
        .inner_join(
            keyed(airplane_type, &[columns::TYPE_ID]),
            col(columns::TYPE_ID),
            col(columns::TYPE_ID),
        )
        .inner_join(
            keyed(airline, &[columns::AIRLINE_ID]).select(airline_subset),
            col(columns::AIRLINE_ID),
            col(columns::AIRLINE_ID),
        )
        .sort([ROW_ORDER], SortMultipleOptions::default())
        .collect()?;

    debug!(rows = merged.height(), "airplanes merged");
    drop_columns(
        &merged,
        &[ROW_ORDER, columns::TYPE_ID, columns::REGISTRATION],
    )
}

/// Flights with aircraft, airline, airport names and per-flight passenger totals.
pub fn merge_flights(
    flight: &DataFrame,
    airplanes: &DataFrame,
    airport: &DataFrame,
    booking: &DataFrame,
) -> Result<DataFrame> {
    for column in [
        columns::FLIGHT_ID,
        columns::AIRPLANE_ID,
        columns::ORIGIN_AIRPORT_ID,
        columns::DEST_AIRPORT_ID,
    ] {
        require_column(flight, tables::FLIGHT, column)?;
    }
    require_column(airport, tables::AIRPORT, columns::AIRPORT_ID)?;
    require_column(booking, tables::BOOKING, columns::FLIGHT_ID)?;
    require_column(booking, tables::BOOKING, columns::NUM_PASSENGERS)?;

    warn_unmatched(
        "flight -> airplane",
        flight,
        columns::AIRPLANE_ID,
        airplanes,
        columns::AIRPLANE_ID,
    );

    let origin = airport_lookup(airport, columns::ORIGIN_CITY, columns::ORIGIN_COUNTRY);
    let destination = airport_lookup(
        airport,
        columns::DESTINATION_CITY,
        columns::DESTINATION_COUNTRY,
    );
    let booking_counts = keyed(booking, &[columns::FLIGHT_ID])
        .group_by([col(columns::FLIGHT_ID)])
        .agg([col(columns::NUM_PASSENGERS).sum().alias(columns::BOOKING_COUNT)]);

    let merged = keyed(
        flight,
        &[
            columns::FLIGHT_ID,
            columns::AIRPLANE_ID,
            columns::AIRLINE_ID,
            columns::ORIGIN_AIRPORT_ID,
            columns::DEST_AIRPORT_ID,
        ],
    )
    .with_row_index(ROW_ORDER, None)
    .inner_join(
        keyed(airplanes, &[columns::AIRPLANE_ID]),
        col(columns::AIRPLANE_ID),
        col(columns::AIRPLANE_ID),
    )
    .left_join(
        origin,
        col(columns::ORIGIN_AIRPORT_ID),
        col(columns::AIRPORT_ID),
    )
    .left_join(
        destination,
        col(columns::DEST_AIRPORT_ID),
        col(columns::AIRPORT_ID),
    )
    .left_join(
        booking_counts,
        col(columns::FLIGHT_ID),
        col(columns::FLIGHT_ID),
    )
    .sort([ROW_ORDER], SortMultipleOptions::default())
    .collect()?;

    debug!(rows = merged.height(), "flights merged");
    let airline_right = format!("{}{RIGHT_SUFFIX}", columns::AIRLINE_ID);
    let airport_right = format!("{}{RIGHT_SUFFIX}", columns::AIRPORT_ID);
    drop_columns(
        &merged,
        &[
            ROW_ORDER,
            airline_right.as_str(),
            columns::AIRPORT_ID,
            airport_right.as_str(),
            columns::AIRLINE_ID,
            columns::AIRPLANE_ID,
            columns::ORIGIN_AIRPORT_ID,
            columns::DEST_AIRPORT_ID,
        ],
    )
}

/// Bookings joined with every attribute of their flight.
pub fn merge_bookings(booking: &DataFrame, flights: &DataFrame) -> Result<DataFrame> {
    require_column(booking, tables::BOOKING, columns::FLIGHT_ID)?;
    warn_unmatched(
        "booking -> flight",
        booking,
        columns::FLIGHT_ID,
        flights,
        columns::FLIGHT_ID,
    );

    let merged = keyed(booking, &[columns::FLIGHT_ID])
        .with_row_index(ROW_ORDER, None)
        .inner_join(
            keyed(flights, &[columns::FLIGHT_ID]),
            col(columns::FLIGHT_ID),
            col(columns::FLIGHT_ID),
        )
        .sort([ROW_ORDER], SortMultipleOptions::default())
        .collect()?;

    let mut dropped = vec![ROW_ORDER];
    dropped.extend(BOOKING_VIEW_DROPPED);
    drop_columns(&merged, &dropped)
}

/// Lazy frame with the listed key columns cast to `Int64`; absent keys are skipped.
fn keyed(df: &DataFrame, keys: &[&str]) -> LazyFrame {
    let casts: Vec<Expr> = keys
        .iter()
        .filter(|key| df.column(key).is_ok())
        .map(|key| col(*key).cast(DataType::Int64))
        .collect();
    df.clone().lazy().with_columns(casts)
}

fn present(df: &DataFrame, wanted: &[&str]) -> Vec<Expr> {
    wanted
        .iter()
        .filter(|name| df.column(name).is_ok())
        .map(|name| col(*name))
        .collect()
}

fn airport_lookup(airport: &DataFrame, city_alias: &str, country_alias: &str) -> LazyFrame {
    let mut exprs = vec![col(columns::AIRPORT_ID)];
    if airport.column(columns::CITY).is_ok() {
        exprs.push(col(columns::CITY).alias(city_alias));
    }
    if airport.column(columns::COUNTRY).is_ok() {
        exprs.push(col(columns::COUNTRY).alias(country_alias));
    }
    keyed(airport, &[columns::AIRPORT_ID]).select(exprs)
}

/// Number of left rows whose key has no match on the right.
pub fn unmatched_rows(left: &DataFrame, left_key: &str, right: &DataFrame, right_key: &str) -> usize {
    let right_keys: HashSet<i64> = column_i64_values(right, right_key)
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect();
    column_i64_values(left, left_key)
        .unwrap_or_default()
        .into_iter()
        .filter(|key| key.is_none_or(|key| !right_keys.contains(&key)))
        .count()
}

fn warn_unmatched(link: &str, left: &DataFrame, left_key: &str, right: &DataFrame, right_key: &str) {
    let dropped = unmatched_rows(left, left_key, right, right_key);
    if dropped > 0 {
        warn!(link, dropped, "inner join dropped rows with no match");
    }
}
