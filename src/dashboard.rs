//! ## Dashboard View
//!
//! [`build_view`] is the whole analytic core of one interaction: filter the cached dataset with
//! the selection, then compute the metrics and all six charts from the filtered view. It is a
//! pure function of its inputs, so it can be tested without any web or rendering harness.

use crate::charts::daily_trips::{DailyTrips, DailyTripsPanel};
use crate::charts::distance::{DistanceHistogram, DistanceHistogramPanel};
use crate::charts::heatmap::{WeeklyHeatmap, WeeklyHeatmapPanel};
use crate::charts::hourly_fares::{HourlyFarePanel, HourlyFares};
use crate::charts::payments::{PaymentBreakdown, PaymentBreakdownPanel};
use crate::charts::top_zones::{TopPickupZones, TopZones};
use crate::charts::{ChartInput, ChartPanel};
use crate::dataset::TripDataset;
use crate::exceptions::DashboardResult;
use crate::filter::{filtered_view, Selection};
use crate::metrics::SummaryMetrics;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

pub const TITLE: &str = "NYC Yellow Taxi Trips Dashboard - January 2024";

pub const DESCRIPTION: &str = "This dashboard analyzes ~3 million yellow taxi trips for January 2024, including pickups, fares, distances, payments and more.";

/// The six charts of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    TopZones,
    PaymentBreakdown,
    HourlyFares,
    DistanceHistogram,
    WeeklyHeatmap,
    DailyTrips,
}

impl ChartKind {
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::TopZones => TopPickupZones::default().title(),
            ChartKind::PaymentBreakdown => PaymentBreakdownPanel.title(),
            ChartKind::HourlyFares => HourlyFarePanel.title(),
            ChartKind::DistanceHistogram => DistanceHistogramPanel::default().title(),
            ChartKind::WeeklyHeatmap => WeeklyHeatmapPanel.title(),
            ChartKind::DailyTrips => DailyTripsPanel.title(),
        }
    }

    pub fn insight(&self) -> &'static str {
        match self {
            ChartKind::TopZones => TopPickupZones::default().insight(),
            ChartKind::PaymentBreakdown => PaymentBreakdownPanel.insight(),
            ChartKind::HourlyFares => HourlyFarePanel.insight(),
            ChartKind::DistanceHistogram => DistanceHistogramPanel::default().insight(),
            ChartKind::WeeklyHeatmap => WeeklyHeatmapPanel.insight(),
            ChartKind::DailyTrips => DailyTripsPanel.insight(),
        }
    }
}

/// A tab and the two charts it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TabLayout {
    pub title: &'static str,
    pub charts: [ChartKind; 2],
}

pub const TABS: [TabLayout; 3] = [
    TabLayout {
        title: "Zones & Payments",
        charts: [ChartKind::TopZones, ChartKind::PaymentBreakdown],
    },
    TabLayout {
        title: "Fares & Distances",
        charts: [ChartKind::HourlyFares, ChartKind::DistanceHistogram],
    },
    TabLayout {
        title: "Time Patterns",
        charts: [ChartKind::WeeklyHeatmap, ChartKind::DailyTrips],
    },
];

/// Everything one render of the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub metrics: SummaryMetrics,
    pub top_zones: TopZones,
    pub payment_breakdown: PaymentBreakdown,
    pub hourly_fares: HourlyFares,
    pub distance_histogram: DistanceHistogram,
    pub weekly_heatmap: WeeklyHeatmap,
    pub daily_trips: DailyTrips,
}

/// Filters `dataset` by `selection` and computes the metrics and all charts.
pub async fn build_view(
    dataset: &TripDataset,
    selection: &Selection,
) -> DashboardResult<DashboardView> {
    let start = Instant::now();
    let view = filtered_view(dataset, selection)?;
    let input = ChartInput::new(view, dataset.zones());

    let metrics = SummaryMetrics::compute(&input.view).await?;
    let top_zones = TopPickupZones::default().compute(&input).await?;
    let payment_breakdown = PaymentBreakdownPanel.compute(&input).await?;
    let hourly_fares = HourlyFarePanel.compute(&input).await?;
    let distance_histogram = DistanceHistogramPanel::default().compute(&input).await?;
    let weekly_heatmap = WeeklyHeatmapPanel.compute(&input).await?;
    let daily_trips = DailyTripsPanel.compute(&input).await?;

    debug!(
        "Built view for {:?} ({} trips) in {:?}",
        selection,
        metrics.trip_count,
        start.elapsed()
    );
    Ok(DashboardView {
        selection: selection.clone(),
        metrics,
        top_zones,
        payment_breakdown,
        hourly_fares,
        distance_histogram,
        weekly_heatmap,
        daily_trips,
    })
}
