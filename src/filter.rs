//! ## Filter Engine
//!
//! A [`Selection`] is the user's current choice of date range, hour range, and payment types.
//! Applying it to the cleaned trip table yields the filtered view that the metrics and charts
//! are computed from. Filtering only builds a lazy DataFusion plan over the immutable base
//! table; nothing is copied until a panel collects its aggregate.

use crate::calendar::date_to_days;
use crate::columns::{PAYMENT_TYPE, PICKUP_DATE, PICKUP_HOUR};
use crate::dataset::{DateBounds, TripDataset};
use crate::exceptions::{DashboardError, DashboardResult};
use chrono::NaiveDate;
use datafusion::logical_expr::{col, lit, Expr};
use datafusion::prelude::*;
use datafusion::scalar::ScalarValue;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Payment method codes used in the trip records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PaymentType {
    CreditCard = 1,
    Cash = 2,
    NoCharge = 3,
    Dispute = 4,
    Unknown = 5,
}

impl PaymentType {
    pub const ALL: [PaymentType; 5] = [
        PaymentType::CreditCard,
        PaymentType::Cash,
        PaymentType::NoCharge,
        PaymentType::Dispute,
        PaymentType::Unknown,
    ];

    pub fn code(&self) -> i64 {
        *self as i64
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentType::CreditCard => "Credit card",
            PaymentType::Cash => "Cash",
            PaymentType::NoCharge => "No charge",
            PaymentType::Dispute => "Dispute",
            PaymentType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display label for any payment code, including codes outside the known enumeration.
pub fn payment_label(code: i64) -> String {
    PaymentType::from_code(code)
        .map(|p| p.label().to_string())
        .unwrap_or_else(|| format!("Code {}", code))
}

pub const MAX_HOUR: u32 = 23;

/// The user's filter choice. Both ranges are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_hour: u32,
    pub end_hour: u32,
    pub payment_types: BTreeSet<i64>,
}

impl Selection {
    pub fn new(
        dates: (NaiveDate, NaiveDate),
        hours: (u32, u32),
        payment_types: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            start_date: dates.0,
            end_date: dates.1,
            start_hour: hours.0,
            end_hour: hours.1,
            payment_types: payment_types.into_iter().collect(),
        }
    }

    /// The default selection: every date in the data, every hour, every payment type.
    pub fn full(bounds: Option<DateBounds>) -> Self {
        let (start, end) = bounds
            .map(|b| (b.min, b.max))
            .unwrap_or((NaiveDate::default(), NaiveDate::default()));
        Self::new(
            (start, end),
            (0, MAX_HOUR),
            PaymentType::ALL.iter().map(PaymentType::code),
        )
    }

    /// True when no row can match (empty payment set or a reversed range).
    pub fn is_empty(&self) -> bool {
        self.payment_types.is_empty()
            || self.end_date < self.start_date
            || self.end_hour < self.start_hour
    }

    /// Builds a selection from request parameters.
    ///
    /// Recognized keys are `start`, `end` (`YYYY-MM-DD`), `hour_start`, `hour_end` and `payment`
    /// (repeated, one code each). Absent keys keep their defaults. When the form was submitted
    /// (`submitted` present) an absent `payment` means "none selected"; otherwise it means "all".
    ///
    /// A range that overlaps the data is clamped to it (dates to the data bounds, hours to
    /// 0–23). A reversed range, or one lying entirely outside, is never clamped and matches no
    /// rows.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if a value cannot be parsed.
    pub fn from_query(
        pairs: &[(String, String)],
        bounds: Option<DateBounds>,
    ) -> DashboardResult<Self> {
        let mut selection = Self::full(bounds);
        let mut hours = (0i64, MAX_HOUR as i64);
        let mut payments: Option<BTreeSet<i64>> = None;
        let mut submitted = false;

        for (key, value) in pairs {
            let value = value.trim();
            match key.as_str() {
                "start" if !value.is_empty() => selection.start_date = parse_date(key, value)?,
                "end" if !value.is_empty() => selection.end_date = parse_date(key, value)?,
                "hour_start" if !value.is_empty() => hours.0 = parse_hour(key, value)?,
                "hour_end" if !value.is_empty() => hours.1 = parse_hour(key, value)?,
                "payment" => {
                    let code = value.parse::<i64>().map_err(|_| {
                        DashboardError::InvalidParameter(format!(
                            "payment must be an integer code, got '{}'",
                            value
                        ))
                    })?;
                    payments.get_or_insert_with(BTreeSet::new).insert(code);
                }
                "submitted" => submitted = true,
                _ => {}
            }
        }

        if let Some(codes) = payments {
            selection.payment_types = codes;
        } else if submitted {
            selection.payment_types.clear();
        }
        if let Some(bounds) = bounds {
            if let Some((start, end)) = clamp_range(
                (selection.start_date, selection.end_date),
                (bounds.min, bounds.max),
            ) {
                selection.start_date = start;
                selection.end_date = end;
            }
        }
        (selection.start_hour, selection.end_hour) =
            match clamp_range(hours, (0, MAX_HOUR as i64)) {
                Some((start, end)) => (start as u32, end as u32),
                // Reversed inside 0-23: keep as given.
                None if hours.0 > hours.1 && hours.1 >= 0 && hours.0 <= MAX_HOUR as i64 => {
                    (hours.0 as u32, hours.1 as u32)
                }
                // Entirely outside 0-23: no hour matches.
                None => (MAX_HOUR, 0),
            };
        Ok(selection)
    }

    /// The row predicate for this selection.
    pub fn predicate(&self) -> Expr {
        if self.is_empty() {
            return lit(false);
        }
        let date_lit = |d: NaiveDate| lit(ScalarValue::Date32(Some(date_to_days(d))));
        let codes: Vec<Expr> = self.payment_types.iter().map(|c| lit(*c)).collect();
        col(PICKUP_DATE)
            .between(date_lit(self.start_date), date_lit(self.end_date))
            .and(col(PICKUP_HOUR).between(
                lit(self.start_hour as i64),
                lit(self.end_hour as i64),
            ))
            .and(col(PAYMENT_TYPE).in_list(codes, false))
    }

    /// Filters a cleaned trip table down to the rows matching this selection.
    pub fn apply(&self, trips: DataFrame) -> DashboardResult<DataFrame> {
        trips.filter(self.predicate()).map_err(DashboardError::from)
    }
}

/// The filtered view of `dataset` for `selection`.
pub fn filtered_view(dataset: &TripDataset, selection: &Selection) -> DashboardResult<DataFrame> {
    selection.apply(dataset.trips())
}

fn parse_date(key: &str, value: &str) -> DashboardResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        DashboardError::InvalidParameter(format!(
            "{} must be a date formatted as YYYY-MM-DD, got '{}'",
            key, value
        ))
    })
}

fn parse_hour(key: &str, value: &str) -> DashboardResult<i64> {
    value.parse::<i64>().map_err(|_| {
        DashboardError::InvalidParameter(format!("{} must be an hour 0-23, got '{}'", key, value))
    })
}

/// Intersects the inclusive range `range` with `limits`.
///
/// `None` when `range` is reversed or does not overlap `limits`.
fn clamp_range<T: Ord + Copy>(range: (T, T), limits: (T, T)) -> Option<(T, T)> {
    let (start, end) = range;
    if start > end || end < limits.0 || start > limits.1 {
        return None;
    }
    Some((start.max(limits.0), end.min(limits.1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn january() -> Option<DateBounds> {
        Some(DateBounds {
            min: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            max: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        })
    }

    #[test]
    fn test_payment_labels() {
        assert_eq!(payment_label(1), "Credit card");
        assert_eq!(payment_label(2), "Cash");
        assert_eq!(payment_label(5), "Unknown");
        assert_eq!(payment_label(0), "Code 0");
        assert_eq!(PaymentType::Dispute.to_string(), "Dispute");
    }

    #[test]
    fn test_empty_query_yields_full_selection() {
        let selection = Selection::from_query(&[], january()).unwrap();
        assert_eq!(selection, Selection::full(january()));
        assert_eq!(selection.payment_types.len(), 5);
        assert_eq!((selection.start_hour, selection.end_hour), (0, 23));
    }

    #[test]
    fn test_query_overrides_and_clamps() {
        let selection = Selection::from_query(
            &pairs(&[
                ("start", "2023-12-01"),
                ("end", "2024-01-10"),
                ("hour_start", "7"),
                ("hour_end", "42"),
                ("payment", "1"),
                ("payment", "2"),
            ]),
            january(),
        )
        .unwrap();
        assert_eq!(selection.start_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(selection.end_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!((selection.start_hour, selection.end_hour), (7, 23));
        assert_eq!(selection.payment_types, BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_submitted_form_without_payments_selects_none() {
        let selection =
            Selection::from_query(&pairs(&[("submitted", "1")]), january()).unwrap();
        assert!(selection.payment_types.is_empty());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_reversed_ranges_are_empty_not_errors() {
        let selection = Selection::from_query(
            &pairs(&[("hour_start", "10"), ("hour_end", "3")]),
            january(),
        )
        .unwrap();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_ranges_outside_the_data_are_not_clamped() {
        let past = Selection::from_query(
            &pairs(&[("start", "2024-02-10"), ("end", "2024-02-01")]),
            january(),
        )
        .unwrap();
        assert_eq!(past.start_date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert!(past.is_empty());

        let before = Selection::from_query(
            &pairs(&[("start", "2023-12-01"), ("end", "2023-12-05")]),
            january(),
        )
        .unwrap();
        assert_eq!(before.end_date, NaiveDate::from_ymd_opt(2023, 12, 5).unwrap());

        let late = Selection::from_query(
            &pairs(&[("hour_start", "30"), ("hour_end", "25")]),
            january(),
        )
        .unwrap();
        assert!(late.is_empty());

        let negative = Selection::from_query(
            &pairs(&[("hour_start", "-5"), ("hour_end", "-1")]),
            january(),
        )
        .unwrap();
        assert!(negative.is_empty());
    }

    #[test]
    fn test_clamp_range() {
        assert_eq!(clamp_range((-3, 5), (0, 23)), Some((0, 5)));
        assert_eq!(clamp_range((20, 40), (0, 23)), Some((20, 23)));
        assert_eq!(clamp_range((24, 30), (0, 23)), None);
        assert_eq!(clamp_range((9, 4), (0, 23)), None);
    }

    #[test]
    fn test_bad_values_are_rejected() {
        let err = Selection::from_query(&pairs(&[("start", "01/02/2024")]), january())
            .unwrap_err();
        assert!(matches!(err, DashboardError::InvalidParameter(_)));
        let err = Selection::from_query(&pairs(&[("payment", "cash")]), january()).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidParameter(_)));
    }
}
