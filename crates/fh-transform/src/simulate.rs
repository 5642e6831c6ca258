//! Simulated passenger counts and agent flags for bookings.
//!
//! The simulation is a single deterministic pass over bookings in row order
//! with an injected random source:
//!
//! 1. draw a passenger count per booking (no draw for 2020/2021 departures,
//!    which are fixed at one traveler)
//! 2. draw an agent flag per booking
//! 3. walk each flight's bookings keeping a running total and zero every
//!    booking whose running total exceeds the flight's capacity
//!
//! The running total is not recomputed after zeroing.

use std::collections::HashMap;

use chrono::Datelike;
use fh_common::{any_to_timestamp, column_i64_values};
use fh_model::names::{columns, tables};
use polars::prelude::{AnyValue, DataFrame};
use rand::Rng;

use crate::error::Result;
use crate::frame::{bool_column, i64_column, require_column, set_column};

/// Destination airport ids above this are treated as domestic.
pub const DOMESTIC_DEST_THRESHOLD: i64 = 5;

/// Departure years in which every booking is a single traveler.
pub const SINGLE_TRAVELER_YEARS: [i32; 2] = [2020, 2021];

/// Largest group size drawn for domestic bookings.
pub const DOMESTIC_MAX_GROUP: i64 = 4;

/// Largest group size drawn for international bookings.
pub const INTERNATIONAL_MAX_GROUP: i64 = 6;

/// Probability that a domestic booking was made through an agent.
pub const DOMESTIC_AGENT_PROBABILITY: f64 = 0.4;

/// Probability that an international booking was made through an agent.
pub const INTERNATIONAL_AGENT_PROBABILITY: f64 = 0.7;

/// What the simulation knows about one booking's flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingContext {
    pub flight_id: Option<i64>,
    pub dest_airport_id: Option<i64>,
    pub capacity: Option<i64>,
    pub departure_year: Option<i32>,
}

impl BookingContext {
    /// Domestic when the destination id is known and above the threshold.
    pub fn is_domestic(&self) -> bool {
        self.dest_airport_id
            .is_some_and(|dest| dest > DOMESTIC_DEST_THRESHOLD)
    }

    fn single_traveler(&self) -> bool {
        self.departure_year
            .is_some_and(|year| SINGLE_TRAVELER_YEARS.contains(&year))
    }
}

/// Draw a passenger count for every booking, in order.
pub fn draw_passenger_counts<R: Rng + ?Sized>(contexts: &[BookingContext], rng: &mut R) -> Vec<i64> {
    contexts
        .iter()
        .map(|ctx| {
            if ctx.single_traveler() {
                1
            } else if ctx.is_domestic() {
                rng.gen_range(1..=DOMESTIC_MAX_GROUP)
            } else {
                rng.gen_range(1..=INTERNATIONAL_MAX_GROUP)
            }
        })
        .collect()
}

/// Draw the agent flag for every booking, in order.
pub fn draw_agent_flags<R: Rng + ?Sized>(contexts: &[BookingContext], rng: &mut R) -> Vec<bool> {
    contexts
        .iter()
        .map(|ctx| {
            let p = if ctx.is_domestic() {
                DOMESTIC_AGENT_PROBABILITY
            } else {
                INTERNATIONAL_AGENT_PROBABILITY
            };
            rng.gen_range(0.0..1.0) < p
        })
        .collect()
}

/// Zero every booking whose per-flight running total exceeds capacity.
///
/// The running total includes zeroed bookings. Bookings without a flight or
/// whose flight has no known capacity are never zeroed.
///
/// ```
/// use fh_transform::simulate::enforce_capacity;
///
/// let flights = [Some(1), Some(1), Some(1)];
/// let capacity = [Some(100), Some(100), Some(100)];
/// assert_eq!(enforce_capacity(&flights, &[40, 50, 30], &capacity), vec![40, 50, 0]);
/// ```
pub fn enforce_capacity(
    flight_ids: &[Option<i64>],
    counts: &[i64],
    capacities: &[Option<i64>],
) -> Vec<i64> {
    let mut running: HashMap<i64, i64> = HashMap::new();
    flight_ids
        .iter()
        .zip(counts)
        .zip(capacities)
        .map(|((flight, count), capacity)| {
            let Some(flight) = flight else {
                return *count;
            };
            let total = running.entry(*flight).or_insert(0);
            *total += *count;
            match capacity {
                Some(capacity) if *total > *capacity => 0,
                _ => *count,
            }
        })
        .collect()
}

/// Resolve each booking's destination, capacity and departure year through
/// flight, airplane and airplane type.
pub fn booking_contexts(
    booking: &DataFrame,
    flight: &DataFrame,
    airplane: &DataFrame,
    airplane_type: &DataFrame,
) -> Result<Vec<BookingContext>> {
    require_column(booking, tables::BOOKING, columns::FLIGHT_ID)?;
    for column in [
        columns::FLIGHT_ID,
        columns::AIRPLANE_ID,
        columns::DEST_AIRPORT_ID,
        columns::ACTUAL_DEPARTURE,
    ] {
        require_column(flight, tables::FLIGHT, column)?;
    }
    require_column(airplane, tables::AIRPLANE, columns::AIRPLANE_ID)?;
    require_column(airplane, tables::AIRPLANE, columns::TYPE_ID)?;
    require_column(airplane_type, tables::AIRPLANE_TYPE, columns::TYPE_ID)?;
    require_column(airplane_type, tables::AIRPLANE_TYPE, columns::CAPACITY)?;

    let capacity_by_type = key_map(airplane_type, columns::TYPE_ID, columns::CAPACITY);
    let type_by_airplane = key_map(airplane, columns::AIRPLANE_ID, columns::TYPE_ID);

    let flight_ids = column_i64_values(flight, columns::FLIGHT_ID).unwrap_or_default();
    let airplane_ids = column_i64_values(flight, columns::AIRPLANE_ID).unwrap_or_default();
    let dests = column_i64_values(flight, columns::DEST_AIRPORT_ID).unwrap_or_default();
    let departures = flight.column(columns::ACTUAL_DEPARTURE)?;

    let mut by_flight: HashMap<i64, BookingContext> = HashMap::new();
    for idx in 0..flight.height() {
        let Some(flight_id) = flight_ids.get(idx).copied().flatten() else {
            continue;
        };
        let capacity = airplane_ids
            .get(idx)
            .copied()
            .flatten()
            .and_then(|airplane| type_by_airplane.get(&airplane).copied())
            .and_then(|type_id| capacity_by_type.get(&type_id).copied());
        let departure_year = any_to_timestamp(departures.get(idx).unwrap_or(AnyValue::Null))
            .map(|ts| ts.year());
        by_flight.entry(flight_id).or_insert(BookingContext {
            flight_id: Some(flight_id),
            dest_airport_id: dests.get(idx).copied().flatten(),
            capacity,
            departure_year,
        });
    }

    let booking_flights = column_i64_values(booking, columns::FLIGHT_ID).unwrap_or_default();
    Ok(booking_flights
        .into_iter()
        .map(|flight_id| match flight_id {
            Some(id) => by_flight.get(&id).copied().unwrap_or(BookingContext {
                flight_id: Some(id),
                ..BookingContext::default()
            }),
            None => BookingContext::default(),
        })
        .collect())
}

fn key_map(df: &DataFrame, key: &str, value: &str) -> HashMap<i64, i64> {
    let keys = column_i64_values(df, key).unwrap_or_default();
    let values = column_i64_values(df, value).unwrap_or_default();
    let mut map = HashMap::with_capacity(keys.len());
    for (key, value) in keys.into_iter().zip(values) {
        if let (Some(key), Some(value)) = (key, value) {
            map.entry(key).or_insert(value);
        }
    }
    map
}

/// Add simulated `num_passengers` and `is_agent` columns to the booking frame.
///
/// Requires the booking, flight, airplane and airplane type link columns.
pub fn simulate_passengers<R: Rng + ?Sized>(
    booking: &DataFrame,
    flight: &DataFrame,
    airplane: &DataFrame,
    airplane_type: &DataFrame,
    rng: &mut R,
) -> Result<DataFrame> {
    let contexts = booking_contexts(booking, flight, airplane, airplane_type)?;
    let drawn = draw_passenger_counts(&contexts, rng);
    let agents = draw_agent_flags(&contexts, rng);

    let flight_ids: Vec<Option<i64>> = contexts.iter().map(|ctx| ctx.flight_id).collect();
    let capacities: Vec<Option<i64>> = contexts.iter().map(|ctx| ctx.capacity).collect();
    let counts = enforce_capacity(&flight_ids, &drawn, &capacities);

    let mut out = booking.clone();
    set_column(
        &mut out,
        i64_column(
            columns::NUM_PASSENGERS,
            counts.into_iter().map(Some).collect(),
        ),
    )?;
    set_column(
        &mut out,
        bool_column(columns::IS_AGENT, agents.into_iter().map(Some).collect()),
    )?;
    Ok(out)
}
