//! # Chart Panels
//!
//! Each submodule holds one chart: a [`ChartPanel`] that turns the filtered view into plain,
//! serializable chart data with a single group-by/aggregate query. Panels never touch shared
//! state; rendering the data into SVG lives in [`crate::render`].

pub mod daily_trips;
pub mod distance;
pub mod heatmap;
pub mod hourly_fares;
pub mod payments;
pub mod top_zones;

use crate::exceptions::DashboardResult;
use async_trait::async_trait;
use datafusion::prelude::DataFrame;
use serde::Serialize;

/// What a panel computes from: the filtered trips plus the zone lookup.
#[derive(Clone)]
pub struct ChartInput {
    pub view: DataFrame,
    pub zones: DataFrame,
}

impl ChartInput {
    pub fn new(view: DataFrame, zones: DataFrame) -> Self {
        Self { view, zones }
    }
}

/// A chart computed from the filtered view.
#[async_trait]
pub trait ChartPanel {
    /// The chart data this panel produces.
    type Data: Serialize + Send;

    /// Chart title shown above the plot.
    fn title(&self) -> &'static str;

    /// One-line caption shown under the chart.
    fn insight(&self) -> &'static str;

    /// Runs the panel's aggregate over `input`.
    async fn compute(&self, input: &ChartInput) -> DashboardResult<Self::Data>;
}
