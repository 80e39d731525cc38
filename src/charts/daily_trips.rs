//! Daily trip volume: trips per pickup date.

use super::{ChartInput, ChartPanel};
use crate::batches::{date_values, i64_values};
use crate::columns::PICKUP_DATE;
use crate::exceptions::DashboardResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub trips: u64,
}

/// Ascending by date; dates without trips are absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DailyTrips {
    pub points: Vec<DailyCount>,
}

pub struct DailyTripsPanel;

#[async_trait]
impl ChartPanel for DailyTripsPanel {
    type Data = DailyTrips;

    fn title(&self) -> &'static str {
        "Trips per Day"
    }

    fn insight(&self) -> &'static str {
        "Daily volume follows the weekly cycle, with quieter Sundays and holidays such as New Year's Day standing out."
    }

    async fn compute(&self, input: &ChartInput) -> DashboardResult<DailyTrips> {
        let batches = input
            .view
            .clone()
            .aggregate(vec![col(PICKUP_DATE)], vec![count(lit(1)).alias("trips")])?
            .sort(vec![col(PICKUP_DATE).sort(true, false)])?
            .collect()
            .await?;

        let dates = date_values(&batches, PICKUP_DATE)?;
        let trips = i64_values(&batches, "trips")?;
        let points = dates
            .into_iter()
            .zip(trips)
            .filter_map(|(date, trips)| {
                Some(DailyCount {
                    date: date?,
                    trips: trips?.max(0) as u64,
                })
            })
            .collect();
        Ok(DailyTrips { points })
    }
}
