//! # Cleaning Steps
//!
//! The submodules contain the stateless transformers that turn the raw source tables into the
//! cleaned, canonical tables the dashboard queries.

pub mod datetime_features;
pub mod missing_data;
pub mod outlier_handling;
pub mod projection;
