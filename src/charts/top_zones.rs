//! Top pickup zones: the busiest pickup zones by trip count, named via the zone lookup.

use super::{ChartInput, ChartPanel};
use crate::batches::{i64_values, string_values};
use crate::columns::{PICKUP_ZONE_ID, ZONE_ID, ZONE_NAME};
use crate::exceptions::DashboardResult;
use async_trait::async_trait;
use datafusion::functions_aggregate::expr_fn::count;
use datafusion::logical_expr::SortExpr;
use datafusion::prelude::*;
use serde::Serialize;

pub const DEFAULT_TOP_ZONES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCount {
    pub zone_id: i64,
    pub zone_name: String,
    pub trips: u64,
}

/// Zones in descending trip-count order. Zones missing from the lookup are left out, so the
/// list may be shorter than the limit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TopZones {
    pub zones: Vec<ZoneCount>,
}

pub struct TopPickupZones {
    pub limit: usize,
}

impl Default for TopPickupZones {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TOP_ZONES,
        }
    }
}

/// Busiest first; ties go to the lower zone id.
fn busiest_first() -> Vec<SortExpr> {
    vec![
        col("trips").sort(false, false),
        col(PICKUP_ZONE_ID).sort(true, false),
    ]
}

#[async_trait]
impl ChartPanel for TopPickupZones {
    type Data = TopZones;

    fn title(&self) -> &'static str {
        "Top 10 Busiest Pickup Zones"
    }

    fn insight(&self) -> &'static str {
        "Airport zones and Manhattan locations like Midtown dominate, showing high travel demand from tourists in early 2024."
    }

    async fn compute(&self, input: &ChartInput) -> DashboardResult<TopZones> {
        let top = input
            .view
            .clone()
            .aggregate(vec![col(PICKUP_ZONE_ID)], vec![count(lit(1)).alias("trips")])?
            .sort(busiest_first())?
            .limit(0, Some(self.limit))?
            .alias("top")?;
        let zones = input
            .zones
            .clone()
            .select(vec![col(ZONE_ID), col(ZONE_NAME)])?
            .alias("zones")?;

        let batches = top
            .join(zones, JoinType::Inner, &[PICKUP_ZONE_ID], &[ZONE_ID], None)?
            .sort(busiest_first())?
            .collect()
            .await?;

        let ids = i64_values(&batches, PICKUP_ZONE_ID)?;
        let names = string_values(&batches, ZONE_NAME)?;
        let trips = i64_values(&batches, "trips")?;
        let zones = ids
            .into_iter()
            .zip(names)
            .zip(trips)
            .filter_map(|((id, name), trips)| {
                Some(ZoneCount {
                    zone_id: id?,
                    zone_name: name.unwrap_or_default(),
                    trips: trips?.max(0) as u64,
                })
            })
            .collect();
        Ok(TopZones { zones })
    }
}
