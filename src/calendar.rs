//! Calendar helpers shared by the loader, the filter engine, and the charts.
//!
//! Arrow stores dates as `Date32` (days since the Unix epoch); the dashboard works with
//! [`chrono::NaiveDate`]. Weekday names are fixed English names so the output never depends
//! on the host locale.

use chrono::{Days, NaiveDate};

/// Weekday names in heatmap row order.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Weekday names indexed by `date_part('dow', ..)`, which counts from Sunday = 0.
pub(crate) const WEEKDAY_NAMES_FROM_SUNDAY: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Position of a weekday name in [`WEEKDAY_NAMES`] (Monday = 0).
pub fn weekday_index(name: &str) -> Option<usize> {
    WEEKDAY_NAMES.iter().position(|day| *day == name)
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Converts a date to its `Date32` representation.
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.signed_duration_since(epoch()).num_days() as i32
}

/// Converts a `Date32` value back to a calendar date.
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    let epoch = epoch();
    if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs() as u64))
    }
}
