//! Weekly/hourly heatmap: trip counts on a weekday × hour grid.

use super::{ChartInput, ChartPanel};
use crate::batches::{i64_values, string_values};
use crate::calendar::{weekday_index, WEEKDAY_NAMES};
use crate::columns::{PICKUP_HOUR, PICKUP_WEEKDAY_NAME};
use crate::exceptions::DashboardResult;
use async_trait::async_trait;
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::prelude::*;
use serde::Serialize;

pub const HOURS_PER_DAY: usize = 24;

/// A 7 × 24 grid of trip counts. Rows are Monday..Sunday, columns are hours 0..23, and every
/// combination without trips holds 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyHeatmap {
    pub weekdays: Vec<String>,
    pub hours: Vec<u32>,
    pub counts: Vec<Vec<u64>>,
}

impl Default for WeeklyHeatmap {
    fn default() -> Self {
        Self {
            weekdays: WEEKDAY_NAMES.iter().map(|d| d.to_string()).collect(),
            hours: (0..HOURS_PER_DAY as u32).collect(),
            counts: vec![vec![0; HOURS_PER_DAY]; WEEKDAY_NAMES.len()],
        }
    }
}

impl WeeklyHeatmap {
    pub fn get(&self, weekday: &str, hour: u32) -> Option<u64> {
        let row = weekday_index(weekday)?;
        self.counts.get(row)?.get(hour as usize).copied()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

pub struct WeeklyHeatmapPanel;

#[async_trait]
impl ChartPanel for WeeklyHeatmapPanel {
    type Data = WeeklyHeatmap;

    fn title(&self) -> &'static str {
        "Trips by Day of Week and Hour"
    }

    fn insight(&self) -> &'static str {
        "Weekdays are structured around work hours at 7am and 5pm, while weekends show more activity in the afternoons and evenings, reflecting leisure travel."
    }

    async fn compute(&self, input: &ChartInput) -> DashboardResult<WeeklyHeatmap> {
        let batches = input
            .view
            .clone()
            .aggregate(
                vec![col(PICKUP_WEEKDAY_NAME), col(PICKUP_HOUR)],
                vec![count(lit(1)).alias("trips")],
            )?
            .collect()
            .await?;

        let mut heatmap = WeeklyHeatmap::default();
        let days = string_values(&batches, PICKUP_WEEKDAY_NAME)?;
        let hours = i64_values(&batches, PICKUP_HOUR)?;
        let trips = i64_values(&batches, "trips")?;
        for ((day, hour), n) in days.into_iter().zip(hours).zip(trips) {
            let (Some(day), Some(hour), Some(n)) = (day, hour, n) else {
                continue;
            };
            let Some(row) = weekday_index(&day) else {
                continue;
            };
            if let Some(cell) = usize::try_from(hour)
                .ok()
                .and_then(|h| heatmap.counts[row].get_mut(h))
            {
                *cell += n.max(0) as u64;
            }
        }
        Ok(heatmap)
    }
}
