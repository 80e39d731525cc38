//! ## Transformers for removing invalid trips
//!
//! - **ValidTripFilter:** Removes trips whose distance, fare, or timing cannot be real.
//!
//! A trip is kept only when `trip_distance > 0`, `0 < fare_amount <= max_fare`, and the dropoff
//! happens strictly after the pickup. The bounds are fixed (not fitted from the data), so the
//! transformer is stateless.

use crate::columns::{DROPOFF_TIME, FARE_AMOUNT, PICKUP_TIME, TRIP_DISTANCE};
use crate::exceptions::{DashboardError, DashboardResult};
use crate::pipeline::Transformer;
use datafusion::logical_expr::{col, lit};
use datafusion::prelude::*;

pub struct ValidTripFilter {
    pub max_fare: f64,
}

impl ValidTripFilter {
    pub fn new(max_fare: f64) -> Self {
        Self { max_fare }
    }
}

impl Transformer for ValidTripFilter {
    /// Returns a new DataFrame with every invalid trip dropped.
    fn transform(&self, df: DataFrame) -> DashboardResult<DataFrame> {
        for name in [TRIP_DISTANCE, FARE_AMOUNT, PICKUP_TIME, DROPOFF_TIME] {
            df.schema().field_with_name(None, name).map_err(|_| {
                DashboardError::MissingColumn(format!("Column '{}' not found", name))
            })?;
        }
        let predicate = col(TRIP_DISTANCE)
            .gt(lit(0.0))
            .and(col(FARE_AMOUNT).gt(lit(0.0)))
            .and(col(FARE_AMOUNT).lt_eq(lit(self.max_fare)))
            .and(col(DROPOFF_TIME).gt(col(PICKUP_TIME)));
        df.filter(predicate).map_err(DashboardError::from)
    }
}
