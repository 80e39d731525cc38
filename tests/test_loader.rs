mod shared;

use std::io::ErrorKind;

use datafusion::prelude::*;
use shared::{micros, trips_batch, write_parquet, write_sources, TripRow};
use taxi_dashboard::batches::{f64_values, i64_values, string_values};
use taxi_dashboard::columns::{
    FARE_AMOUNT, PICKUP_HOUR, PICKUP_TIME, PICKUP_WEEKDAY_NAME, TRIP_DISTANCE,
};
use taxi_dashboard::dataset::cleaning_pipeline;
use taxi_dashboard::exceptions::{DashboardError, DashboardResult};
use taxi_dashboard::loader::load_dataset;
use taxi_dashboard::settings::SourceSettings;

fn mixed_rows() -> Vec<TripRow> {
    let valid = TripRow::new("2024-01-01 08:00:00", 10, 1, 10.0, 2.0, 1);
    vec![
        valid.clone(),
        TripRow::new("2024-01-02 17:30:00", 25, 2, 32.5, 7.2, 2),
        TripRow::new("2024-01-06 23:59:00", 5, 3, 500.0, 0.4, 1),
        // Missing fare.
        TripRow {
            fare: None,
            ..valid.clone()
        },
        // Missing pickup time.
        TripRow {
            pickup: None,
            ..valid.clone()
        },
        // Zero distance.
        TripRow {
            distance: 0.0,
            ..valid.clone()
        },
        // Negative fare.
        TripRow {
            fare: Some(-4.0),
            ..valid.clone()
        },
        // Fare above the cap.
        TripRow {
            fare: Some(500.01),
            ..valid.clone()
        },
        // Dropoff before pickup.
        TripRow {
            dropoff: Some(micros("2024-01-01 07:50:00")),
            ..valid.clone()
        },
        // Dropoff equal to pickup.
        TripRow {
            dropoff: valid.pickup,
            ..valid
        },
    ]
}

#[tokio::test]
async fn test_load_dataset_drops_invalid_rows() -> DashboardResult<()> {
    let sources = write_sources("loader-clean", &mixed_rows())?;
    let dataset = load_dataset(&sources).await?;

    assert_eq!(dataset.trip_count(), 3);
    assert_eq!(dataset.zone_count(), 15);

    let batches = dataset.trips().collect().await?;
    for fare in f64_values(&batches, FARE_AMOUNT)? {
        let fare = fare.unwrap();
        assert!(fare > 0.0 && fare <= 500.0);
    }
    for distance in f64_values(&batches, TRIP_DISTANCE)? {
        assert!(distance.unwrap() > 0.0);
    }

    let bounds = dataset.date_bounds().unwrap();
    assert_eq!(bounds.min.to_string(), "2024-01-01");
    assert_eq!(bounds.max.to_string(), "2024-01-06");
    Ok(())
}

#[tokio::test]
async fn test_calendar_fields_are_derived_from_pickup() -> DashboardResult<()> {
    let sources = write_sources("loader-calendar", &mixed_rows())?;
    let dataset = load_dataset(&sources).await?;

    let batches = dataset
        .trips()
        .sort(vec![col(PICKUP_TIME).sort(true, false)])?
        .collect()
        .await?;
    let hours: Vec<i64> = i64_values(&batches, PICKUP_HOUR)?
        .into_iter()
        .flatten()
        .collect();
    let days: Vec<String> = string_values(&batches, PICKUP_WEEKDAY_NAME)?
        .into_iter()
        .flatten()
        .collect();

    assert_eq!(hours, vec![8, 17, 23]);
    assert_eq!(days, vec!["Monday", "Tuesday", "Saturday"]);
    Ok(())
}

#[tokio::test]
async fn test_missing_trip_file_is_an_io_error() {
    let sources = SourceSettings::new(
        "/nonexistent/yellow_tripdata_2024-01.parquet",
        "/nonexistent/taxi_zone_lookup.csv",
    );
    match load_dataset(&sources).await {
        Err(DashboardError::IoError(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
        other => panic!("expected IoError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_zone_file_is_an_io_error() -> DashboardResult<()> {
    let mut sources = write_sources("loader-no-zones", &mixed_rows())?;
    sources.zone_path = sources.zone_path.with_file_name("missing.csv");
    let result = load_dataset(&sources).await;
    assert!(matches!(result, Err(DashboardError::IoError(_))));
    Ok(())
}

#[tokio::test]
async fn test_missing_required_column_is_reported() -> DashboardResult<()> {
    let sources = write_sources("loader-no-payment", &mixed_rows())?;
    // Rewrite the trips without `payment_type` (column 6).
    let batch = trips_batch(&mixed_rows()).project(&[0, 1, 2, 3, 4, 5, 7, 8])?;
    write_parquet(&sources.trip_path, &batch)?;

    match load_dataset(&sources).await {
        Err(DashboardError::MissingColumn(msg)) => assert!(msg.contains("payment_type")),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_cleaning_steps_run_in_order() {
    let pipeline = cleaning_pipeline(&SourceSettings::default());
    assert_eq!(
        pipeline.step_names(),
        vec![
            "project_trip_columns",
            "drop_missing_critical",
            "drop_invalid_trips",
            "pickup_calendar_features",
        ]
    );
}
