//! ## Metrics Panel
//!
//! Five headline numbers over the filtered view: trip count, average fare, total revenue,
//! average distance, and average duration. All five come from one aggregate query. An empty
//! view is not an error; every value falls back to zero.

use crate::batches::{scalar_f64, scalar_i64};
use crate::columns::{DROPOFF_TIME, FARE_AMOUNT, PICKUP_TIME, TOTAL_AMOUNT, TRIP_DISTANCE};
use crate::exceptions::DashboardResult;
use datafusion::functions_aggregate::expr_fn::{avg, count, sum};
use datafusion::prelude::*;
use datafusion_functions::datetime::to_unixtime;
use serde::Serialize;
use std::ops::Sub;

/// Summary metrics of a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryMetrics {
    pub trip_count: u64,
    pub avg_fare: f64,
    pub total_revenue: f64,
    pub avg_distance_miles: f64,
    pub avg_duration_minutes: f64,
}

/// A labelled, formatted metric ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

/// Trip duration in seconds: `to_unixtime(dropoff) - to_unixtime(pickup)`.
fn duration_seconds_expr() -> Expr {
    let dropoff = to_unixtime().call(vec![col(DROPOFF_TIME)]);
    let pickup = to_unixtime().call(vec![col(PICKUP_TIME)]);
    dropoff.sub(pickup)
}

impl SummaryMetrics {
    /// Computes the metrics of `view` in a single aggregate pass.
    pub async fn compute(view: &DataFrame) -> DashboardResult<Self> {
        let batches = view
            .clone()
            .aggregate(
                vec![],
                vec![
                    count(lit(1)).alias("trip_count"),
                    avg(col(FARE_AMOUNT)).alias("avg_fare"),
                    sum(col(TOTAL_AMOUNT)).alias("total_revenue"),
                    avg(col(TRIP_DISTANCE)).alias("avg_distance"),
                    avg(duration_seconds_expr()).alias("avg_duration_seconds"),
                ],
            )?
            .collect()
            .await?;

        let trip_count = scalar_i64(&batches, "trip_count")?.unwrap_or(0).max(0) as u64;
        if trip_count == 0 {
            return Ok(Self::default());
        }
        Ok(Self {
            trip_count,
            avg_fare: scalar_f64(&batches, "avg_fare")?.unwrap_or(0.0),
            total_revenue: scalar_f64(&batches, "total_revenue")?.unwrap_or(0.0),
            avg_distance_miles: scalar_f64(&batches, "avg_distance")?.unwrap_or(0.0),
            avg_duration_minutes: scalar_f64(&batches, "avg_duration_seconds")?.unwrap_or(0.0)
                / 60.0,
        })
    }

    pub fn formatted_trip_count(&self) -> String {
        format_thousands(self.trip_count as i64)
    }

    pub fn formatted_avg_fare(&self) -> String {
        format!("${:.2}", self.avg_fare)
    }

    pub fn formatted_total_revenue(&self) -> String {
        let rounded = self.total_revenue.round() as i64;
        if rounded < 0 {
            format!("-${}", format_thousands(-rounded))
        } else {
            format!("${}", format_thousands(rounded))
        }
    }

    pub fn formatted_avg_distance(&self) -> String {
        format!("{:.1} mi", self.avg_distance_miles)
    }

    pub fn formatted_avg_duration(&self) -> String {
        format!("{:.1} min", self.avg_duration_minutes)
    }

    /// The five metric cards in display order.
    pub fn cards(&self) -> Vec<MetricCard> {
        vec![
            MetricCard {
                label: "Total Trips",
                value: self.formatted_trip_count(),
            },
            MetricCard {
                label: "Avg Fare",
                value: self.formatted_avg_fare(),
            },
            MetricCard {
                label: "Total Revenue",
                value: self.formatted_total_revenue(),
            },
            MetricCard {
                label: "Avg Distance",
                value: self.formatted_avg_distance(),
            },
            MetricCard {
                label: "Avg Duration",
                value: self.formatted_avg_duration(),
            },
        ]
    }
}

/// Formats an integer with `,` as the thousands separator.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
