//! Shared fixture: a tiny airline database.

#![allow(dead_code)]

use fh_model::{Table, TableSet};
use polars::prelude::*;

pub fn frame(columns: Vec<Column>) -> DataFrame {
    DataFrame::new(columns).unwrap()
}

pub fn ints(name: &str, values: &[i64]) -> Column {
    Series::new(name.into(), values).into_column()
}

pub fn opt_ints(name: &str, values: &[Option<i64>]) -> Column {
    Series::new(name.into(), values).into_column()
}

pub fn floats(name: &str, values: &[f64]) -> Column {
    Series::new(name.into(), values).into_column()
}

pub fn strs(name: &str, values: &[&str]) -> Column {
    Series::new(name.into(), values).into_column()
}

pub fn opt_strs(name: &str, values: &[Option<&str>]) -> Column {
    Series::new(name.into(), values).into_column()
}

pub fn airline() -> DataFrame {
    frame(vec![
        ints("airline_id", &[1, 2, 3]),
        strs("iata", &["XY", "PK", "ZZ"]),
        strs("airline_name", &["Xylo Air", "Pakistan International", "Zed Wings"]),
        strs("type", &["Domestic", "International", "Domestic"]),
        strs("base_airport", &["LHE", "KHI", "ISB"]),
    ])
}

pub fn airplane() -> DataFrame {
    frame(vec![
        ints("airplane_id", &[1, 2, 3]),
        ints("type_id", &[1, 2, 1]),
        ints("airline_id", &[1, 2, 3]),
        strs("registration", &["AP-BHA", "AP-BHB", "AP-BHC"]),
    ])
}

pub fn airplane_type() -> DataFrame {
    frame(vec![
        ints("type_id", &[1, 2]),
        ints("capacity", &[100, 200]),
        floats("max_range", &[1200.0, 9000.0]),
        strs("maker", &["ATR", "Boeing"]),
        ints("max_altitude", &[25000, 43000]),
        strs("description", &["turboprop", "wide body"]),
    ])
}

pub fn airport() -> DataFrame {
    frame(vec![
        ints("airport_id", &[1, 2, 6, 7]),
        strs("city", &["Lahore", "Dubai", "Karachi", "Islamabad"]),
        strs("country", &["Pakistan", "UAE", "Pakistan", "Pakistan"]),
    ])
}

/// Flight 12 flies an airplane that does not exist.
pub fn flight() -> DataFrame {
    frame(vec![
        ints("flight_id", &[10, 11, 12]),
        ints("airplane_id", &[1, 2, 9]),
        ints("airline_id", &[1, 2, 1]),
        ints("origin_airport_id", &[1, 1, 6]),
        ints("dest_airport_id", &[6, 2, 7]),
        strs(
            "expected_departure",
            &["2023-03-01 10:00:00", "2020-07-15 08:00:00", "2023-05-02 12:00:00"],
        ),
        opt_strs(
            "actual_departure",
            &[Some("2023-03-01 10:30:00"), Some("2020-07-15 08:05:00"), Some("garbage")],
        ),
        strs(
            "arrival",
            &["2023-03-01 12:00:00", "2020-07-15 11:05:00", "2023-05-02 14:00:00"],
        ),
    ])
}

pub fn booking() -> DataFrame {
    frame(vec![
        ints("booking_id", &[1, 2, 3, 4, 5]),
        ints("flight_id", &[10, 10, 11, 11, 12]),
        opt_ints("passenger_age", &[Some(25), None, Some(70), Some(16), Some(40)]),
        strs("passenger_email", &["a@x.pk", "b@x.pk", "c@x.pk", "d@x.pk", "e@x.pk"]),
        strs("passenger_nationality", &["PK", "PK", "AE", "PK", "PK"]),
        strs(
            "booking_date",
            &["2023-02-01", "2023-02-15", "2020-06-01", "2020-06-02", "2023-04-01"],
        ),
        strs("ticket_type", &["Economy", "Business", "Economy", "First", "Economy"]),
        strs("seat_class", &["Economy", "Business", "Economy", "First", "Economy"]),
        floats("price", &[100.0, 400.0, 120.0, 900.0, 90.0]),
        floats("weight_kg", &[20.0, 35.0, 25.0, 10.0, 23.0]),
        strs("business_lounge", &["N", "Y", "N", "Y", "N"]),
        strs("inflight_entertainment", &["Y", "Y", "N", "Y", "N"]),
        strs("inflight_food", &["Y", "N", "N", "Y", "Y"]),
    ])
}

pub fn passenger_feedback() -> DataFrame {
    frame(vec![
        strs("preferred_airline", &["XY", "XY", "PK", "PK"]),
        ints("rating", &[4, 5, 3, 3]),
    ])
}

pub fn tables() -> TableSet {
    [
        Table::new("airline", airline()),
        Table::new("airplane", airplane()),
        Table::new("airplane_type", airplane_type()),
        Table::new("airport", airport()),
        Table::new("flight", flight()),
        Table::new("booking", booking()),
        Table::new("passenger_feedback", passenger_feedback()),
    ]
    .into_iter()
    .collect()
}
