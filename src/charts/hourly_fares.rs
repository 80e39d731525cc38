//! Average fare by hour of day.

use super::{ChartInput, ChartPanel};
use crate::batches::{f64_values, i64_values};
use crate::columns::{FARE_AMOUNT, PICKUP_HOUR};
use crate::exceptions::DashboardResult;
use async_trait::async_trait;
use datafusion::functions_aggregate::expr_fn::avg;
use datafusion::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyFare {
    pub hour: u32,
    pub avg_fare: f64,
}

/// One point per hour that has trips, ascending by hour. Hours without trips are absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HourlyFares {
    pub points: Vec<HourlyFare>,
}

pub struct HourlyFarePanel;

#[async_trait]
impl ChartPanel for HourlyFarePanel {
    type Data = HourlyFares;

    fn title(&self) -> &'static str {
        "Average Fare by Hour of Day"
    }

    fn insight(&self) -> &'static str {
        "Fares are highest during early mornings, likely due to airport trips."
    }

    async fn compute(&self, input: &ChartInput) -> DashboardResult<HourlyFares> {
        let batches = input
            .view
            .clone()
            .aggregate(
                vec![col(PICKUP_HOUR)],
                vec![avg(col(FARE_AMOUNT)).alias("avg_fare")],
            )?
            .sort(vec![col(PICKUP_HOUR).sort(true, false)])?
            .collect()
            .await?;

        let hours = i64_values(&batches, PICKUP_HOUR)?;
        let fares = f64_values(&batches, "avg_fare")?;
        let points = hours
            .into_iter()
            .zip(fares)
            .filter_map(|(hour, fare)| {
                Some(HourlyFare {
                    hour: u32::try_from(hour?).ok()?,
                    avg_fare: fare?,
                })
            })
            .collect();
        Ok(HourlyFares { points })
    }
}
