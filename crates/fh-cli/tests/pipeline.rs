//! End-to-end runs over a directory of CSV tables.

use std::path::Path;

use fh_cli::config::{ConfigOverrides, FlightHubConfig};
use fh_cli::pipeline::{open_source, run_pipeline};
use fh_ingest::NoProgress;
use fh_output::{DashboardKpis, ExportFormat, export_to_dir};

const TABLES: [(&str, &str); 7] = [
    (
        "airline",
        "airline_id,iata,airline_name,type,base_airport\n\
         1,XY,Xylo Air,Domestic,LHE\n\
         2,PK,Pakistan International,International,KHI\n",
    ),
    (
        "airplane",
        "airplane_id,type_id,airline_id,registration\n\
         1,1,1,AP-BHA\n\
         2,2,2,AP-BHB\n",
    ),
    (
        "airplane_type",
        "type_id,capacity,max_range,maker,max_altitude,description\n\
         1,100,1200,ATR,25000,turboprop\n\
         2,200,9000,Boeing,43000,wide body\n",
    ),
    (
        "airport",
        "airport_id,city,country\n\
         1,Lahore,Pakistan\n\
         2,Dubai,UAE\n\
         6,Karachi,Pakistan\n",
    ),
    (
        "flight",
        "flight_id,airplane_id,airline_id,origin_airport_id,dest_airport_id,expected_departure,actual_departure,arrival\n\
         10,1,1,1,6,2023-03-01 10:00:00,2023-03-01 10:30:00,2023-03-01 12:00:00\n\
         11,2,2,1,2,2023-04-15 08:00:00,2023-04-15 08:05:00,2023-04-15 11:05:00\n",
    ),
    (
        "booking",
        "booking_id,flight_id,passenger_age,passenger_email,passenger_nationality,booking_date,ticket_type,seat_class,price,weight_kg,business_lounge,inflight_entertainment,inflight_food\n\
         1,10,25,a@example.pk,PK,2023-02-01,Flexible,Economy,100,20,Y,N,Y\n\
         2,10,40,b@example.pk,PK,2023-02-03,Standard,Economy,120,25,N,N,Y\n\
         3,11,,c@example.pk,AE,2023-03-10,Standard,Business,300,30,N,Y,N\n\
         4,11,70,d@example.pk,AE,2023-03-12,Flexible,First,500,41,Y,Y,Y\n",
    ),
    (
        "passenger_feedback",
        "feedback_id,preferred_airline,rating\n\
         1,XY,4\n\
         2,XY,5\n",
    ),
];

fn write_tables(dir: &Path) {
    for (name, content) in TABLES {
        std::fs::write(dir.join(format!("{name}.csv")), content).unwrap();
    }
}

fn csv_config(dir: &Path, seed: u64) -> FlightHubConfig {
    FlightHubConfig::default().with_overrides(&ConfigOverrides {
        csv_dir: Some(dir.to_path_buf()),
        seed: Some(seed),
        chunk_size: Some(2),
        ..Default::default()
    })
}

#[test]
fn test_pipeline_builds_views() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let config = csv_config(dir.path(), 11);

    let mut source = open_source(&config.source).unwrap();
    let outcome = run_pipeline(source.as_mut(), &config, &mut NoProgress).unwrap();

    assert_eq!(outcome.loaded.len(), 7);
    assert_eq!(outcome.loaded.total_records(), 17);
    let stages: Vec<&str> = outcome.stages.iter().map(|s| s.stage).collect();
    assert_eq!(stages, vec!["load", "clean", "transform", "merge"]);

    let views = &outcome.views;
    assert_eq!(views.flights.height(), 2);
    assert_eq!(views.bookings.height(), 4);
    assert_eq!(views.airlines.height(), 2);

    let booking_columns = views.bookings.get_column_names();
    assert!(booking_columns.iter().all(|c| c.as_str() != "passenger_email"));
    assert!(booking_columns.iter().any(|c| c.as_str() == "booking_count"));
    assert!(booking_columns.iter().any(|c| c.as_str() == "haul"));

    let kpis = DashboardKpis::compute(&views.bookings).unwrap();
    assert_eq!(kpis.total_flights, 4);
}

#[test]
fn test_same_seed_same_views() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let config = csv_config(dir.path(), 99);

    let run = || {
        let mut source = open_source(&config.source).unwrap();
        run_pipeline(source.as_mut(), &config, &mut NoProgress).unwrap()
    };
    let first = run();
    let second = run();

    assert!(first.views.bookings.equals_missing(&second.views.bookings));
    assert!(first.views.flights.equals_missing(&second.views.flights));
    assert_eq!(first.transform, second.transform);
}

#[test]
fn test_export_after_run() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let config = csv_config(dir.path(), 3);
    let mut source = open_source(&config.source).unwrap();
    let outcome = run_pipeline(source.as_mut(), &config, &mut NoProgress).unwrap();

    let out = dir.path().join("exports");
    let artifact = export_to_dir(&outcome.views.bookings, ExportFormat::Csv, &out).unwrap();
    let text = std::fs::read_to_string(&artifact.path).unwrap();
    // header plus one line per booking
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn test_missing_source_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = csv_config(&dir.path().join("absent"), 1);
    assert!(open_source(&config.source).is_err());
}
