mod shared;

use std::sync::Arc;

use shared::{month_rows, trips_batch, two_trip_rows, write_parquet, write_sources};
use taxi_dashboard::cache::{DatasetCache, SourceKey};
use taxi_dashboard::exceptions::{DashboardError, DashboardResult};
use taxi_dashboard::settings::SourceSettings;

#[tokio::test]
async fn test_unchanged_sources_are_loaded_once() -> DashboardResult<()> {
    let sources = write_sources("cache-hit", &two_trip_rows())?;
    let mut cache = DatasetCache::new();

    let first = cache.get_or_load(&sources).await?;
    let second = cache.get_or_load(&sources).await?;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.loads(), 1);
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_changed_trip_file_triggers_reload() -> DashboardResult<()> {
    let sources = write_sources("cache-reload", &two_trip_rows())?;
    let mut cache = DatasetCache::new();
    let before = cache.get_or_load(&sources).await?;
    assert_eq!(before.trip_count(), 2);

    write_parquet(&sources.trip_path, &trips_batch(&month_rows()))?;
    let after = cache.get_or_load(&sources).await?;

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.trip_count(), month_rows().len());
    assert_eq!(cache.loads(), 2);
    // The stale entry is gone.
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_load_leaves_cache_empty() {
    let sources = SourceSettings::new("/nonexistent/trips.parquet", "/nonexistent/zones.csv");
    let mut cache = DatasetCache::new();

    let result = cache.get_or_load(&sources).await;

    assert!(matches!(result, Err(DashboardError::IoError(_))));
    assert!(cache.is_empty());
    assert_eq!(cache.loads(), 0);
}

#[test]
fn test_source_key_tracks_file_length() -> DashboardResult<()> {
    let sources = write_sources("cache-key", &two_trip_rows())?;
    let key = SourceKey::probe(&sources)?;
    assert_eq!(key.trips.path, sources.trip_path);
    assert_eq!(key.trips.len, std::fs::metadata(&sources.trip_path)?.len());
    assert_eq!(key, SourceKey::probe(&sources)?);
    Ok(())
}
