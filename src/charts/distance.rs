//! Trip distance distribution: an equal-width histogram with a clipped display window.

use super::{ChartInput, ChartPanel};
use crate::batches::{i64_values, scalar_f64};
use crate::columns::TRIP_DISTANCE;
use crate::exceptions::DashboardResult;
use async_trait::async_trait;
use datafusion::arrow::datatypes::DataType;
use datafusion::functions_aggregate::expr_fn::{count, max, min};
use datafusion::logical_expr::Case as DFCase;
use datafusion::prelude::*;
use serde::Serialize;

pub const DEFAULT_BINS: usize = 50;

/// Visible x-axis window in miles. Bins outside it still exist in the data.
pub const DISPLAY_RANGE: (f64, f64) = (0.0, 30.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub lower: f64,
    /// Exclusive upper edge (inclusive for the last bin).
    pub upper: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DistanceHistogram {
    /// Every bin across `[min, max]` of the filtered distances; empty for an empty view.
    pub bins: Vec<HistogramBin>,
    pub display_range: (f64, f64),
}

impl DistanceHistogram {
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Bins that overlap the display window.
    pub fn visible_bins(&self) -> impl Iterator<Item = &HistogramBin> {
        let (lo, hi) = self.display_range;
        self.bins.iter().filter(move |b| b.upper > lo && b.lower < hi)
    }
}

pub struct DistanceHistogramPanel {
    pub bins: usize,
}

impl Default for DistanceHistogramPanel {
    fn default() -> Self {
        Self { bins: DEFAULT_BINS }
    }
}

/// `CASE WHEN idx >= last THEN last ELSE idx END` where `idx = CAST((d - min) / width AS BIGINT)`.
///
/// The maximum distance lands exactly on the upper edge, so it is folded into the last bin.
fn bin_index_expr(min_value: f64, width: f64, bins: usize) -> Expr {
    let last = bins as i64 - 1;
    let raw = cast(
        (col(TRIP_DISTANCE) - lit(min_value)) / lit(width),
        DataType::Int64,
    );
    Expr::Case(DFCase {
        expr: None,
        when_then_expr: vec![(Box::new(raw.clone().gt_eq(lit(last))), Box::new(lit(last)))],
        else_expr: Some(Box::new(raw)),
    })
}

#[async_trait]
impl ChartPanel for DistanceHistogramPanel {
    type Data = DistanceHistogram;

    fn title(&self) -> &'static str {
        "Distribution of Trip Distances"
    }

    fn insight(&self) -> &'static str {
        "Most trips are short, as expected in a dense urban environment like NYC, with a long tail of longer trips to and from airports or outer boroughs."
    }

    async fn compute(&self, input: &ChartInput) -> DashboardResult<DistanceHistogram> {
        let bins = self.bins.max(1);
        let range = input
            .view
            .clone()
            .aggregate(
                vec![],
                vec![
                    min(col(TRIP_DISTANCE)).alias("min_distance"),
                    max(col(TRIP_DISTANCE)).alias("max_distance"),
                ],
            )?
            .collect()
            .await?;
        let (lo, hi) = match (
            scalar_f64(&range, "min_distance")?,
            scalar_f64(&range, "max_distance")?,
        ) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => {
                return Ok(DistanceHistogram {
                    bins: Vec::new(),
                    display_range: DISPLAY_RANGE,
                })
            }
        };
        // A single distinct value still gets a non-degenerate unit-wide span.
        let span = if hi > lo { hi - lo } else { 1.0 };
        let width = span / bins as f64;

        let batches = input
            .view
            .clone()
            .select(vec![bin_index_expr(lo, width, bins).alias("bin")])?
            .aggregate(vec![col("bin")], vec![count(lit(1)).alias("trips")])?
            .collect()
            .await?;

        let mut counts = vec![0u64; bins];
        let indices = i64_values(&batches, "bin")?;
        let trips = i64_values(&batches, "trips")?;
        for (idx, n) in indices.into_iter().zip(trips) {
            if let (Some(idx), Some(n)) = (idx, n) {
                let slot = idx.clamp(0, bins as i64 - 1) as usize;
                counts[slot] += n.max(0) as u64;
            }
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: lo + width * i as f64,
                upper: lo + width * (i + 1) as f64,
                count,
            })
            .collect();
        Ok(DistanceHistogram {
            bins,
            display_range: DISPLAY_RANGE,
        })
    }
}
