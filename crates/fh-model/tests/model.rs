//! Tests for the FlightHub table model.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use proptest::prelude::*;

use fh_model::{AgeGroup, Haul, Table, TableSet};

fn test_df(columns: Vec<(&str, Vec<i64>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).unwrap()
}

#[test]
fn table_detects_leading_id_column() {
    let table = Table::new("flight", test_df(vec![("flight_id", vec![1, 2]), ("airplane_id", vec![7, 8])]));
    assert_eq!(table.index.as_deref(), Some("flight_id"));
    assert_eq!(table.record_count(), 2);
}

#[test]
fn table_without_leading_id_has_no_index() {
    let table = Table::new(
        "passenger_feedback",
        test_df(vec![("rating", vec![4, 5]), ("feedback_id", vec![1, 2])]),
    );
    assert!(table.index.is_none());
}

#[test]
fn with_data_keeps_surviving_index() {
    let table = Table::new("airplane", test_df(vec![("airplane_id", vec![1]), ("type_id", vec![3])]));
    let reordered = test_df(vec![("type_id", vec![3]), ("airplane_id", vec![1])]);
    let replaced = table.with_data(reordered);
    assert_eq!(replaced.index.as_deref(), Some("airplane_id"));
    assert_eq!(replaced.name, "airplane");
}

#[test]
fn table_set_orders_by_name() {
    let set: TableSet = vec![
        Table::new("flight", test_df(vec![("flight_id", vec![1])])),
        Table::new("airline", test_df(vec![("airline_id", vec![1, 2])])),
    ]
    .into_iter()
    .collect();
    assert_eq!(set.names(), vec!["airline", "flight"]);
    assert_eq!(set.total_records(), 3);
    assert!(set.contains("flight"));
    assert!(!set.contains("booking"));
}

#[test]
fn haul_thresholds() {
    assert_eq!(Haul::from_max_range(0.0), Haul::Short);
    assert_eq!(Haul::from_max_range(1200.0), Haul::Short);
    assert_eq!(Haul::from_max_range(1201.0), Haul::Medium);
    assert_eq!(Haul::from_max_range(7999.9), Haul::Medium);
    assert_eq!(Haul::from_max_range(8000.0), Haul::Long);
    assert_eq!(Haul::Long.to_string(), "Long Haul");
}

#[test]
fn age_group_edges() {
    assert_eq!(AgeGroup::from_age(14.0), Some(AgeGroup::Teen));
    assert_eq!(AgeGroup::from_age(30.0), Some(AgeGroup::YoungAdult));
    assert_eq!(AgeGroup::from_age(65.0), Some(AgeGroup::Adult));
    assert_eq!(AgeGroup::from_age(105.0), Some(AgeGroup::Senior));
    assert_eq!(AgeGroup::from_age(105.1), None);
    assert_eq!(AgeGroup::from_age(f64::NAN), None);
    assert!(AgeGroup::Teen < AgeGroup::Senior);
    assert_eq!(AgeGroup::from_label("young adult"), Some(AgeGroup::YoungAdult));
}

#[test]
fn bands_serialize_with_display_labels() {
    let json = serde_json::to_string(&(Haul::Medium, AgeGroup::YoungAdult)).unwrap();
    assert_eq!(json, r#"["Medium Haul","Young Adult"]"#);
}

proptest! {
    #[test]
    fn haul_is_total_and_matches_thresholds(range in 0.0f64..20_000.0) {
        let haul = Haul::from_max_range(range);
        if range <= 1200.0 {
            prop_assert_eq!(haul, Haul::Short);
        } else if range < 8000.0 {
            prop_assert_eq!(haul, Haul::Medium);
        } else {
            prop_assert_eq!(haul, Haul::Long);
        }
    }

    #[test]
    fn age_group_label_round_trips(age in 13.01f64..105.0) {
        let band = AgeGroup::from_age(age).unwrap();
        prop_assert_eq!(AgeGroup::from_label(band.as_str()), Some(band));
    }
}
