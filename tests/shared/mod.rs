//! Fixtures shared by the integration tests: small trip and zone tables laid out like the
//! NYC source files, either in memory or written to a temporary directory.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::array::TimestampMicrosecondArray;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDateTime};
use datafusion::prelude::SessionContext;
use parquet::arrow::ArrowWriter;
use taxi_dashboard::dataset::TripDataset;
use taxi_dashboard::exceptions::DashboardResult;
use taxi_dashboard::settings::SourceSettings;

static FIXTURE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Microseconds since the epoch for `YYYY-MM-DD HH:MM:SS`.
pub fn micros(datetime: &str) -> i64 {
    NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M:%S")
        .unwrap()
        .and_utc()
        .timestamp_micros()
}

/// One raw trip record.
#[derive(Debug, Clone)]
pub struct TripRow {
    pub pickup: Option<i64>,
    pub dropoff: Option<i64>,
    pub pickup_zone: i32,
    pub dropoff_zone: i32,
    pub fare: Option<f64>,
    pub total: f64,
    pub distance: f64,
    pub payment: i64,
}

impl TripRow {
    /// A valid trip starting at `pickup` and lasting `minutes`; total equals fare.
    pub fn new(pickup: &str, minutes: i64, zone: i32, fare: f64, distance: f64, payment: i64) -> Self {
        let start = micros(pickup);
        Self {
            pickup: Some(start),
            dropoff: Some(start + Duration::minutes(minutes).num_microseconds().unwrap()),
            pickup_zone: zone,
            dropoff_zone: zone,
            fare: Some(fare),
            total: fare,
            distance,
            payment,
        }
    }
}

pub fn trip_schema() -> Arc<Schema> {
    let ts = DataType::Timestamp(TimeUnit::Microsecond, None);
    Arc::new(Schema::new(vec![
        Field::new("VendorID", DataType::Int32, true),
        Field::new("tpep_pickup_datetime", ts.clone(), true),
        Field::new("tpep_dropoff_datetime", ts, true),
        Field::new("trip_distance", DataType::Float64, true),
        Field::new("PULocationID", DataType::Int32, true),
        Field::new("DOLocationID", DataType::Int32, true),
        Field::new("payment_type", DataType::Int64, true),
        Field::new("fare_amount", DataType::Float64, true),
        Field::new("total_amount", DataType::Float64, true),
    ]))
}

pub fn trips_batch(rows: &[TripRow]) -> RecordBatch {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(vec![Some(2); rows.len()])),
        Arc::new(TimestampMicrosecondArray::from(
            rows.iter().map(|r| r.pickup).collect::<Vec<_>>(),
        )),
        Arc::new(TimestampMicrosecondArray::from(
            rows.iter().map(|r| r.dropoff).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.distance).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from(
            rows.iter().map(|r| r.pickup_zone).collect::<Vec<_>>(),
        )),
        Arc::new(Int32Array::from(
            rows.iter().map(|r| r.dropoff_zone).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(
            rows.iter().map(|r| r.payment).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.fare).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.total).collect::<Vec<_>>(),
        )),
    ];
    RecordBatch::try_new(trip_schema(), columns).unwrap()
}

/// Zones 1..=15; the first few carry real names.
pub fn zone_rows() -> Vec<(i64, &'static str, String)> {
    let named = [
        (1, "EWR", "Newark Airport"),
        (2, "Queens", "Jamaica Bay"),
        (3, "Bronx", "Allerton/Pelham Gardens"),
        (4, "Manhattan", "Alphabet City"),
        (5, "Staten Island", "Arden Heights"),
    ];
    let mut rows: Vec<(i64, &'static str, String)> = named
        .iter()
        .map(|(id, borough, zone)| (*id, *borough, zone.to_string()))
        .collect();
    for id in 6..=15 {
        rows.push((id, "Manhattan", format!("Zone {}", id)));
    }
    rows
}

pub fn zones_batch() -> RecordBatch {
    let rows = zone_rows();
    let schema = Arc::new(Schema::new(vec![
        Field::new("LocationID", DataType::Int64, false),
        Field::new("Borough", DataType::Utf8, true),
        Field::new("Zone", DataType::Utf8, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.0).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.1).collect::<Vec<_>>())),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.2.as_str()).collect::<Vec<_>>(),
            )),
        ],
    )
    .unwrap()
}

pub fn zones_csv() -> String {
    let mut csv = String::from("\"LocationID\",\"Borough\",\"Zone\",\"service_zone\"\n");
    for (id, borough, zone) in zone_rows() {
        csv.push_str(&format!("{},\"{}\",\"{}\",\"Yellow Zone\"\n", id, borough, zone));
    }
    csv
}

/// Cleans `rows` into a dataset without touching the filesystem.
pub async fn dataset_from_rows(rows: &[TripRow]) -> DashboardResult<TripDataset> {
    let ctx = SessionContext::new();
    let trips = ctx.read_batch(trips_batch(rows))?;
    let zones = ctx.read_batch(zones_batch())?;
    TripDataset::from_raw(trips, zones, &SourceSettings::default()).await
}

/// A fresh, empty directory under the system temp dir.
pub fn fixture_dir(name: &str) -> PathBuf {
    let n = FIXTURE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "taxi-dashboard-{}-{}-{}",
        name,
        std::process::id(),
        n
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_parquet(path: &PathBuf, batch: &RecordBatch) -> DashboardResult<()> {
    let file = fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

/// Writes both source files for `rows` and returns settings pointing at them.
pub fn write_sources(name: &str, rows: &[TripRow]) -> DashboardResult<SourceSettings> {
    let dir = fixture_dir(name);
    let trip_path = dir.join("yellow_tripdata.parquet");
    let zone_path = dir.join("taxi_zone_lookup.csv");
    write_parquet(&trip_path, &trips_batch(rows))?;
    fs::write(&zone_path, zones_csv())?;
    Ok(SourceSettings::new(trip_path, zone_path))
}

/// The two trips of the reference metrics scenario.
pub fn two_trip_rows() -> Vec<TripRow> {
    vec![
        TripRow::new("2024-01-01 08:00:00", 10, 1, 10.0, 2.0, 1),
        TripRow::new("2024-01-01 09:00:00", 20, 2, 20.0, 4.0, 2),
    ]
}

/// A month of valid trips spread over days, hours, zones, and payment types.
pub fn month_rows() -> Vec<TripRow> {
    let mut rows = Vec::new();
    for day in 1..=31 {
        for hour in [0, 7, 8, 13, 17, 22] {
            let zone = ((day + hour) % 15 + 1) as i32;
            let payment = if hour % 2 == 0 { 1 } else { 2 };
            let fare = 8.0 + hour as f64;
            let distance = 0.5 + (day % 10) as f64 * 1.5;
            rows.push(TripRow::new(
                &format!("2024-01-{:02} {:02}:15:00", day, hour),
                12,
                zone,
                fare,
                distance,
                payment,
            ));
        }
    }
    rows
}
