//! Tests for the table-specific transforms and the passenger simulation.

mod common;

use std::collections::HashMap;

use common::{floats, frame, ints, opt_strs, strs};
use fh_common::{column_f64_values, column_i64_values, column_string_values};
use fh_model::Table;
use fh_transform::simulate::{BookingContext, draw_passenger_counts, enforce_capacity};
use fh_transform::{
    AgeBucketing, TransformError, apply_airline_ratings, bucket_passenger_ages,
    classify_haul_column, derive_booking_calendar, derive_flight_timings, fill_missing_age,
    simulate_load_factor, simulate_passengers, transform_tables,
};
use polars::prelude::DataType;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn haul_replaces_max_range() {
    let df = frame(vec![
        ints("type_id", &[1, 2, 3, 4]),
        floats("max_range", &[1200.0, 1200.5, 7999.0, 8000.0]),
    ]);
    let out = classify_haul_column(&df).unwrap();
    assert!(out.column("max_range").is_err());
    assert_eq!(
        column_string_values(&out, "haul").unwrap(),
        vec![
            Some("Short Haul".to_string()),
            Some("Medium Haul".to_string()),
            Some("Medium Haul".to_string()),
            Some("Long Haul".to_string()),
        ]
    );
}

#[test]
fn airline_rating_is_feedback_mean() {
    let out = apply_airline_ratings(&common::airline(), Some(&common::passenger_feedback())).unwrap();
    let ratings = column_f64_values(&out, "rating").unwrap();
    assert_eq!(ratings, vec![Some(4.5), Some(3.0), None]);
}

#[test]
fn airline_without_feedback_keeps_existing_rating() {
    let airline = frame(vec![
        strs("iata", &["XY", "QQ"]),
        floats("rating", &[1.0, 2.5]),
    ]);
    let out = apply_airline_ratings(&airline, Some(&common::passenger_feedback())).unwrap();
    assert_eq!(column_f64_values(&out, "rating").unwrap(), vec![Some(4.5), Some(2.5)]);
}

#[test]
fn no_feedback_leaves_airline_untouched() {
    let out = apply_airline_ratings(&common::airline(), None).unwrap();
    assert!(out.column("rating").is_err());
}

#[test]
fn missing_age_filled_with_mean() {
    let out = fill_missing_age(&common::booking()).unwrap();
    let ages = column_f64_values(&out, "passenger_age").unwrap();
    assert_eq!(ages[1], Some(37.75));
    assert!(ages.iter().all(Option::is_some));
}

#[test]
fn booking_calendar_fields() {
    let out = derive_booking_calendar(&common::booking()).unwrap();
    assert_eq!(out.column("booking_date").unwrap().dtype(), &DataType::Date);
    assert_eq!(
        column_i64_values(&out, "booking_year").unwrap()[2],
        Some(2020)
    );
    assert_eq!(
        column_string_values(&out, "booking_month").unwrap()[0].as_deref(),
        Some("February")
    );
}

#[test]
fn flight_timings_coerce_bad_timestamps() {
    let out = derive_flight_timings(&common::flight()).unwrap();
    assert!(out.column("expected_departure").is_err());
    assert!(out.column("arrival").is_err());
    assert_eq!(
        column_i64_values(&out, "delay").unwrap(),
        vec![Some(30), Some(5), None]
    );
    assert_eq!(
        column_i64_values(&out, "trip_duration").unwrap(),
        vec![Some(90), Some(180), None]
    );
    assert_eq!(
        column_i64_values(&out, "departure_year").unwrap(),
        vec![Some(2023), Some(2020), None]
    );
    assert_eq!(
        column_string_values(&out, "departure_month").unwrap()[0].as_deref(),
        Some("March")
    );
}

#[test]
fn age_bucketing_skips_non_numeric_values() {
    let df = frame(vec![opt_strs("passenger_age", &[Some("30"), Some("unknown")])]);
    let (out, outcome) = bucket_passenger_ages(&df).unwrap();
    assert!(matches!(outcome, AgeBucketing::Skipped { .. }));
    assert_eq!(
        column_string_values(&out, "passenger_age").unwrap()[0].as_deref(),
        Some("30")
    );
}

#[test]
fn age_bucketing_reports_out_of_range() {
    let df = frame(vec![ints("passenger_age", &[13, 14, 106, 65])]);
    let (out, outcome) = bucket_passenger_ages(&df).unwrap();
    assert_eq!(
        outcome,
        AgeBucketing::Applied {
            bucketed: 2,
            out_of_range: 2
        }
    );
    assert_eq!(
        column_string_values(&out, "passenger_age").unwrap(),
        vec![None, Some("Teen".to_string()), None, Some("Adult".to_string())]
    );
}

#[test]
fn load_factor_within_bounds() {
    let mut rng = StdRng::seed_from_u64(11);
    let out = simulate_load_factor(&common::flight(), &mut rng).unwrap();
    let factors = column_f64_values(&out, "load_factor").unwrap();
    assert_eq!(factors.len(), 3);
    assert!(factors.iter().flatten().all(|f| (0.6..0.95).contains(f)));
}

#[test]
fn capacity_scenario_zeroes_third_booking() {
    let flights = [Some(7), Some(7), Some(7)];
    let capacity = [Some(100), Some(100), Some(100)];
    let counts = enforce_capacity(&flights, &[40, 50, 30], &capacity);
    assert_eq!(counts, vec![40, 50, 0]);
    assert_eq!(counts.iter().sum::<i64>(), 90);
}

#[test]
fn pandemic_departures_have_single_travelers() {
    let flight = derive_flight_timings(&common::flight()).unwrap();
    let booking = frame(vec![ints("booking_id", &[1, 2, 3]), ints("flight_id", &[11, 11, 11])]);
    let mut rng = StdRng::seed_from_u64(3);
    let out = simulate_passengers(
        &booking,
        &flight,
        &common::airplane(),
        &common::airplane_type(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(
        column_i64_values(&out, "num_passengers").unwrap(),
        vec![Some(1), Some(1), Some(1)]
    );
    assert_eq!(out.column("is_agent").unwrap().dtype(), &DataType::Boolean);
}

#[test]
fn simulation_requires_link_columns() {
    let flight = derive_flight_timings(&common::flight()).unwrap();
    let airplane = common::airplane().drop("type_id").unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let err = simulate_passengers(
        &common::booking(),
        &flight,
        &airplane,
        &common::airplane_type(),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, TransformError::MissingColumn { ref column, .. } if column == "type_id"));
}

#[test]
fn transform_is_reproducible_with_seed() {
    let tables = common::tables();
    let (a, report_a) = transform_tables(&tables, &mut StdRng::seed_from_u64(42)).unwrap();
    let (b, report_b) = transform_tables(&tables, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(report_a, report_b);
    assert!(a.get("booking").unwrap().data.equals_missing(&b.get("booking").unwrap().data));
    assert!(a.get("flight").unwrap().data.equals_missing(&b.get("flight").unwrap().data));
}

#[test]
fn transform_applies_every_step() {
    let (out, report) = transform_tables(&common::tables(), &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(
        report.age_bucketing,
        AgeBucketing::Applied {
            bucketed: 5,
            out_of_range: 0
        }
    );
    assert_eq!(report.simulated_bookings, 5);

    let booking = &out.get("booking").unwrap().data;
    assert!(booking.column("passenger_email").is_err());
    assert!(booking.column("passenger_nationality").is_err());
    assert_eq!(
        column_string_values(booking, "passenger_age").unwrap(),
        vec![
            Some("Young Adult".to_string()),
            Some("Adult".to_string()),
            Some("Senior".to_string()),
            Some("Teen".to_string()),
            Some("Adult".to_string()),
        ]
    );
    let counts = column_i64_values(booking, "num_passengers").unwrap();
    assert_eq!(counts[2], Some(1));
    assert_eq!(counts[3], Some(1));
    assert!(counts[0].is_some_and(|n| (1..=4).contains(&n)));

    let airplane_type = &out.get("airplane_type").unwrap().data;
    assert!(airplane_type.column("description").is_err());
    assert!(airplane_type.column("haul").is_ok());

    let airline = &out.get("airline").unwrap().data;
    assert!(airline.column("base_airport").is_err());

    let flight = &out.get("flight").unwrap().data;
    assert!(flight.column("load_factor").is_ok());
}

#[test]
fn transform_reports_skipped_bucketing_for_non_numeric_age() {
    let mut booking = common::booking();
    booking
        .with_column(opt_strs(
            "passenger_age",
            &[Some("30"), Some("unknown"), Some("50"), None, Some("40")],
        ))
        .unwrap();
    let tables = common::tables().with_table(Table::new("booking", booking));

    let (out, report) = transform_tables(&tables, &mut StdRng::seed_from_u64(1)).unwrap();
    assert!(matches!(report.age_bucketing, AgeBucketing::Skipped { .. }));
    let ages = column_string_values(&out.get("booking").unwrap().data, "passenger_age").unwrap();
    assert_eq!(ages[1].as_deref(), Some("unknown"));
    assert_eq!(ages[3], None);
}

#[test]
fn transform_without_airplane_fails() {
    let mut tables = common::tables();
    tables = tables
        .into_iter()
        .filter(|table| table.name != "airplane")
        .collect();
    let err = transform_tables(&tables, &mut StdRng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(err, TransformError::MissingTable { ref table } if table == "airplane"));
}

fn context(flight: i64) -> BookingContext {
    BookingContext {
        flight_id: Some(flight),
        dest_airport_id: Some(flight),
        capacity: None,
        departure_year: Some(2019),
    }
}

proptest! {
    #[test]
    fn counted_passengers_never_exceed_capacity(
        bookings in prop::collection::vec((0i64..4, 0i64..8), 0..80),
        capacities in prop::collection::vec(1i64..40, 4),
    ) {
        let flights: Vec<Option<i64>> = bookings.iter().map(|(f, _)| Some(*f)).collect();
        let drawn: Vec<i64> = bookings.iter().map(|(_, n)| *n).collect();
        let caps: Vec<Option<i64>> = bookings
            .iter()
            .map(|(f, _)| Some(capacities[*f as usize]))
            .collect();

        let counts = enforce_capacity(&flights, &drawn, &caps);
        let mut totals: HashMap<i64, i64> = HashMap::new();
        for (flight, count) in flights.iter().zip(&counts) {
            *totals.entry(flight.unwrap()).or_default() += count;
        }
        for (flight, total) in totals {
            prop_assert!(total <= capacities[flight as usize]);
        }
        for (count, original) in counts.iter().zip(&drawn) {
            prop_assert!(*count == 0 || count == original);
        }
    }

    #[test]
    fn drawn_counts_stay_in_range(seed in any::<u64>(), flights in prop::collection::vec(1i64..10, 1..50)) {
        let contexts: Vec<BookingContext> = flights.iter().map(|f| context(*f)).collect();
        let counts = draw_passenger_counts(&contexts, &mut StdRng::seed_from_u64(seed));
        for (ctx, n) in contexts.iter().zip(counts) {
            let max = if ctx.is_domestic() { 4 } else { 6 };
            prop_assert!((1..=max).contains(&n));
        }
    }
}
