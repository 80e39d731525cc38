//! ## Cleaned Trip Dataset
//!
//! [`TripDataset`] is the immutable base every request filters. Building one runs the cleaning
//! pipeline over the raw tables and materializes the result into in-memory tables, so later
//! queries never go back to the source files.

use crate::batches::{date_values, row_count};
use crate::columns::{PICKUP_DATE, PICKUP_TIME};
use crate::exceptions::DashboardResult;
use crate::make_pipeline;
use crate::pipeline::{Pipeline, Transformer};
use crate::settings::SourceSettings;
use crate::transformers::datetime_features::PickupCalendarFeatures;
use crate::transformers::missing_data::DropIncompleteTrips;
use crate::transformers::outlier_handling::ValidTripFilter;
use crate::transformers::projection::{TripProjection, ZoneProjection};
use chrono::NaiveDate;
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::datasource::MemTable;
use datafusion::functions_aggregate::expr_fn::{max, min};
use datafusion::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Earliest and latest pickup date present in the cleaned data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateBounds {
    /// Clamps a date into the bounds.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        date.clamp(self.min, self.max)
    }
}

/// The cleaned trip table and the zone lookup, both held in memory.
#[derive(Clone)]
pub struct TripDataset {
    trips: DataFrame,
    zones: DataFrame,
    trip_count: usize,
    zone_count: usize,
    date_bounds: Option<DateBounds>,
}

/// The trip cleaning steps, in order: project, drop nulls, drop invalid trips, derive calendar
/// fields.
pub fn cleaning_pipeline(sources: &SourceSettings) -> Pipeline {
    make_pipeline!(true,
        ("project_trip_columns", TripProjection::new(sources.trip_columns.clone())),
        ("drop_missing_critical", DropIncompleteTrips::default()),
        ("drop_invalid_trips", ValidTripFilter::new(sources.max_fare)),
        ("pickup_calendar_features", PickupCalendarFeatures::new(PICKUP_TIME)),
    )
}

/// Executes `df` and registers the result as an in-memory table in `ctx`.
async fn materialize(ctx: &SessionContext, df: DataFrame) -> DashboardResult<(DataFrame, usize)> {
    let fallback_schema: SchemaRef = Arc::new(df.schema().as_arrow().clone());
    let batches = df.collect().await?;
    let schema = batches
        .first()
        .map(|batch| batch.schema())
        .unwrap_or(fallback_schema);
    let rows = row_count(&batches);
    let table = MemTable::try_new(schema, vec![batches])?;
    Ok((ctx.read_table(Arc::new(table))?, rows))
}

async fn compute_date_bounds(trips: &DataFrame) -> DashboardResult<Option<DateBounds>> {
    let batches = trips
        .clone()
        .aggregate(
            vec![],
            vec![
                min(col(PICKUP_DATE)).alias("min_date"),
                max(col(PICKUP_DATE)).alias("max_date"),
            ],
        )?
        .collect()
        .await?;
    let min_date = date_values(&batches, "min_date")?.into_iter().next().flatten();
    let max_date = date_values(&batches, "max_date")?.into_iter().next().flatten();
    Ok(match (min_date, max_date) {
        (Some(min), Some(max)) => Some(DateBounds { min, max }),
        _ => None,
    })
}

impl TripDataset {
    /// Cleans the raw trip and zone tables and materializes both in memory.
    ///
    /// # Arguments
    ///
    /// * `raw_trips` - The trip records exactly as read from the source.
    /// * `raw_zones` - The zone lookup exactly as read from the source.
    /// * `sources` - Column names and cleaning bounds.
    ///
    /// # Errors
    ///
    /// `MissingColumn` if a required column is absent, `InvalidParameter` if a column type is
    /// unusable, or any DataFusion error raised while executing the plans.
    pub async fn from_raw(
        raw_trips: DataFrame,
        raw_zones: DataFrame,
        sources: &SourceSettings,
    ) -> DashboardResult<Self> {
        let pipeline = cleaning_pipeline(sources);
        debug!("Cleaning trips with steps {:?}", pipeline.step_names());
        let cleaned = pipeline.transform(raw_trips)?;
        let zones = ZoneProjection::new(sources.zone_columns.clone()).transform(raw_zones)?;

        let ctx = SessionContext::new();
        let (trips, trip_count) = materialize(&ctx, cleaned).await?;
        let (zones, zone_count) = materialize(&ctx, zones).await?;
        let date_bounds = compute_date_bounds(&trips).await?;

        info!(
            "Cleaned dataset holds {} trips and {} zones (dates {:?})",
            trip_count, zone_count, date_bounds
        );
        Ok(Self {
            trips,
            zones,
            trip_count,
            zone_count,
            date_bounds,
        })
    }

    /// A fresh handle on the cleaned trip table.
    pub fn trips(&self) -> DataFrame {
        self.trips.clone()
    }

    /// A fresh handle on the zone lookup.
    pub fn zones(&self) -> DataFrame {
        self.zones.clone()
    }

    pub fn trip_count(&self) -> usize {
        self.trip_count
    }

    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    /// `None` when no trip survived cleaning.
    pub fn date_bounds(&self) -> Option<DateBounds> {
        self.date_bounds
    }
}

impl std::fmt::Debug for TripDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripDataset")
            .field("trip_count", &self.trip_count)
            .field("zone_count", &self.zone_count)
            .field("date_bounds", &self.date_bounds)
            .finish()
    }
}
