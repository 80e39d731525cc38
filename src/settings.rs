//! ## Dashboard Settings
//!
//! Static configuration for the dashboard: where the two sources live, how their columns are
//! named, the cleaning bounds, the HTTP bind address, and the chart canvas size.
//! Every value has a default matching the January 2024 NYC yellow taxi release, so
//! `DashboardSettings::default()` is all the binary needs.

use std::path::PathBuf;

/// Default location of the trip-records Parquet file.
pub const DEFAULT_TRIP_PATH: &str = "data/raw/yellow_tripdata_2024-01.parquet";

/// Default location of the zone-lookup CSV file.
pub const DEFAULT_ZONE_PATH: &str = "data/raw/taxi_zone_lookup.csv";

/// Names of the trip-record columns in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripColumns {
    pub pickup_time: String,
    pub dropoff_time: String,
    pub pickup_zone_id: String,
    pub dropoff_zone_id: String,
    pub fare_amount: String,
    pub total_amount: String,
    pub trip_distance: String,
    pub payment_type: String,
}

impl TripColumns {
    /// All required source columns, in a stable order.
    pub fn required(&self) -> [&str; 8] {
        [
            self.pickup_time.as_str(),
            self.dropoff_time.as_str(),
            self.pickup_zone_id.as_str(),
            self.dropoff_zone_id.as_str(),
            self.fare_amount.as_str(),
            self.total_amount.as_str(),
            self.trip_distance.as_str(),
            self.payment_type.as_str(),
        ]
    }
}

impl Default for TripColumns {
    fn default() -> Self {
        Self {
            pickup_time: "tpep_pickup_datetime".to_string(),
            dropoff_time: "tpep_dropoff_datetime".to_string(),
            pickup_zone_id: "PULocationID".to_string(),
            dropoff_zone_id: "DOLocationID".to_string(),
            fare_amount: "fare_amount".to_string(),
            total_amount: "total_amount".to_string(),
            trip_distance: "trip_distance".to_string(),
            payment_type: "payment_type".to_string(),
        }
    }
}

/// Names of the zone-lookup columns in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneColumns {
    pub zone_id: String,
    pub zone_name: String,
    /// Optional; carried through when present.
    pub borough: String,
}

impl Default for ZoneColumns {
    fn default() -> Self {
        Self {
            zone_id: "LocationID".to_string(),
            zone_name: "Zone".to_string(),
            borough: "Borough".to_string(),
        }
    }
}

/// Everything the loader needs to find, validate, and clean the sources.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    pub trip_path: PathBuf,
    pub zone_path: PathBuf,
    pub trip_columns: TripColumns,
    pub zone_columns: ZoneColumns,
    /// Upper bound (inclusive) on a valid fare.
    pub max_fare: f64,
}

impl SourceSettings {
    pub fn new(trip_path: impl Into<PathBuf>, zone_path: impl Into<PathBuf>) -> Self {
        Self {
            trip_path: trip_path.into(),
            zone_path: zone_path.into(),
            ..Self::default()
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            trip_path: PathBuf::from(DEFAULT_TRIP_PATH),
            zone_path: PathBuf::from(DEFAULT_ZONE_PATH),
            trip_columns: TripColumns::default(),
            zone_columns: ZoneColumns::default(),
            max_fare: 500.0,
        }
    }
}

/// Pixel size of every rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 420,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub sources: SourceSettings,
    pub charts: ChartSettings,
    pub bind_address: String,
    /// Number of HTTP workers. One worker keeps the request model single threaded.
    pub workers: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            sources: SourceSettings::default(),
            charts: ChartSettings::default(),
            bind_address: "127.0.0.1:8501".to_string(),
            workers: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_point_at_raw_data() {
        let settings = DashboardSettings::default();
        assert_eq!(settings.sources.trip_path, PathBuf::from(DEFAULT_TRIP_PATH));
        assert_eq!(settings.sources.zone_path, PathBuf::from(DEFAULT_ZONE_PATH));
        assert_eq!(settings.sources.max_fare, 500.0);
        assert_eq!(settings.workers, 1);
    }

    #[test]
    fn test_required_trip_columns() {
        let columns = TripColumns::default();
        let required = columns.required();
        assert_eq!(required.len(), 8);
        assert!(required.contains(&"PULocationID"));
        assert!(required.contains(&"tpep_dropoff_datetime"));
    }
}
