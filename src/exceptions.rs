//! ## Custom Errors for the Taxi Dashboard
//!
//! This module defines the error type shared by every layer of the dashboard.
//! It uses the `thiserror` crate to derive the `Error` trait. The `DashboardError` enum
//! includes variants for failures while reading the sources, running DataFusion plans,
//! validating user input, and rendering charts or the page.
//!
//! The `DashboardResult` type alias simplifies error handling by providing a convenient
//! alias for results returned by the library.
//!
//! ### Example
//!
//! ```rust
//! use taxi_dashboard::exceptions::{DashboardError, DashboardResult};
//!
//! fn parse_hour(value: &str) -> DashboardResult<u32> {
//!     value
//!         .parse()
//!         .map_err(|_| DashboardError::InvalidParameter(format!("bad hour '{}'", value)))
//! }
//! ```

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Errors specific to the taxi dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Wraps underlying I/O errors (e.g., a source file that does not exist).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Wraps errors from DataFusion.
    #[error("DataFusion error: {0}")]
    DataFusionError(#[from] datafusion::error::DataFusionError),

    /// Wraps errors from Arrow.
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Wraps errors from Parquet.
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Indicates that an invalid parameter was provided (e.g., an unparseable date in a request
    /// or a source column with an unusable data type).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Indicates that a required column does not exist in a source table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Indicates that a chart could not be drawn.
    #[error("Render error: {0}")]
    RenderError(String),

    /// Wraps errors from the HTML template engine.
    #[error("Template error: {0}")]
    TemplateError(#[from] askama::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for DashboardError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        DashboardError::RenderError(err.to_string())
    }
}

/// A convenient result type for dashboard operations.
pub type DashboardResult<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "trips.parquet");
        let err: DashboardError = io_err.into();
        let err_msg = format!("{}", err);
        assert!(err_msg.contains("I/O error:"));
        assert!(err_msg.contains("trips.parquet"));
    }

    #[test]
    fn test_datafusion_error() {
        let df_err = datafusion::error::DataFusionError::Plan("test plan error".into());
        let err: DashboardError = df_err.into();
        let err_msg = format!("{}", err);
        assert!(err_msg.contains("DataFusion error:"));
        assert!(err_msg.contains("test plan error"));
    }

    #[test]
    fn test_arrow_error() {
        let arrow_err = arrow::error::ArrowError::ComputeError("test compute error".into());
        let err: DashboardError = arrow_err.into();
        let err_msg = format!("{}", err);
        assert!(err_msg.contains("Arrow error:"));
        assert!(err_msg.contains("test compute error"));
    }

    #[test]
    fn test_parquet_error() {
        let parquet_err = parquet::errors::ParquetError::General("test parquet error".into());
        let err: DashboardError = parquet_err.into();
        assert!(format!("{}", err).contains("Parquet error:"));
    }

    #[test]
    fn test_invalid_parameter_error() {
        let err = DashboardError::InvalidParameter("hour_start".into());
        let err_msg = format!("{}", err);
        assert!(err_msg.contains("Invalid parameter:"));
        assert!(err_msg.contains("hour_start"));
    }

    #[test]
    fn test_missing_column_error() {
        let err = DashboardError::MissingColumn("PULocationID".into());
        let err_msg = format!("{}", err);
        assert!(err_msg.contains("Missing column:"));
        assert!(err_msg.contains("PULocationID"));
    }

    #[test]
    fn test_render_error_from_drawing_area() {
        let draw_err: DrawingAreaErrorKind<io::Error> = DrawingAreaErrorKind::LayoutError;
        let err: DashboardError = draw_err.into();
        assert!(format!("{}", err).contains("Render error:"));
    }
}
