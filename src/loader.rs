//! ## Data Loader
//!
//! Reads the trip-records Parquet file and the zone-lookup CSV file, then hands both to
//! [`TripDataset::from_raw`] for cleaning. A missing or unreadable file is reported as an
//! `IoError` before DataFusion touches it.

use crate::dataset::TripDataset;
use crate::exceptions::{DashboardError, DashboardResult};
use crate::settings::SourceSettings;
use datafusion::dataframe::DataFrame;
use datafusion::prelude::{CsvReadOptions, ParquetReadOptions, SessionContext};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Fails with the underlying I/O error (usually `NotFound`) if `path` is not a readable file.
pub(crate) fn ensure_readable(path: &Path) -> DashboardResult<fs::Metadata> {
    let metadata = fs::metadata(path).map_err(|e| {
        DashboardError::IoError(std::io::Error::new(
            e.kind(),
            format!("cannot read '{}': {}", path.display(), e),
        ))
    })?;
    if !metadata.is_file() {
        return Err(DashboardError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("'{}' is not a file", path.display()),
        )));
    }
    Ok(metadata)
}

fn path_str(path: &Path) -> DashboardResult<&str> {
    path.to_str().ok_or_else(|| {
        DashboardError::InvalidParameter(format!("Path '{}' is not valid UTF-8", path.display()))
    })
}

/// Reads the raw trip records.
pub async fn read_trips(ctx: &SessionContext, path: &Path) -> DashboardResult<DataFrame> {
    ensure_readable(path)?;
    let df = ctx
        .read_parquet(path_str(path)?, ParquetReadOptions::default())
        .await?;
    Ok(df)
}

/// Reads the raw zone lookup.
pub async fn read_zones(ctx: &SessionContext, path: &Path) -> DashboardResult<DataFrame> {
    ensure_readable(path)?;
    let df = ctx
        .read_csv(path_str(path)?, CsvReadOptions::new().has_header(true))
        .await?;
    Ok(df)
}

/// Loads and cleans both sources.
///
/// # Errors
///
/// * `IoError` if either file is missing or unreadable.
/// * `MissingColumn` if a required column is absent from either source.
pub async fn load_dataset(sources: &SourceSettings) -> DashboardResult<TripDataset> {
    let start = Instant::now();
    info!(
        "Loading trips from '{}' and zones from '{}'",
        sources.trip_path.display(),
        sources.zone_path.display()
    );
    let ctx = SessionContext::new();
    let raw_trips = read_trips(&ctx, &sources.trip_path).await?;
    let raw_zones = read_zones(&ctx, &sources.zone_path).await?;
    debug!("Raw trip schema: {:?}", raw_trips.schema().field_names());

    let dataset = TripDataset::from_raw(raw_trips, raw_zones, sources).await?;
    info!("Dataset ready in {:?}", start.elapsed());
    Ok(dataset)
}
