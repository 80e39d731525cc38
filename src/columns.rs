//! Canonical column names of the cleaned trip and zone tables.
//!
//! Source files are projected onto these names at load time, so everything downstream of the
//! loader refers to columns only through these constants.

pub const PICKUP_TIME: &str = "pickup_time";
pub const DROPOFF_TIME: &str = "dropoff_time";
pub const PICKUP_ZONE_ID: &str = "pickup_zone_id";
pub const DROPOFF_ZONE_ID: &str = "dropoff_zone_id";
pub const FARE_AMOUNT: &str = "fare_amount";
pub const TOTAL_AMOUNT: &str = "total_amount";
pub const TRIP_DISTANCE: &str = "trip_distance";
pub const PAYMENT_TYPE: &str = "payment_type";

// Derived at load time.
pub const PICKUP_DATE: &str = "pickup_date";
pub const PICKUP_HOUR: &str = "pickup_hour";
pub const PICKUP_WEEKDAY_NAME: &str = "pickup_weekday_name";

pub const ZONE_ID: &str = "zone_id";
pub const ZONE_NAME: &str = "zone_name";
pub const BOROUGH: &str = "borough";

/// Columns that must be non-null for a trip to survive cleaning.
pub const CRITICAL_TRIP_COLUMNS: [&str; 5] = [
    PICKUP_TIME,
    DROPOFF_TIME,
    PICKUP_ZONE_ID,
    DROPOFF_ZONE_ID,
    FARE_AMOUNT,
];
