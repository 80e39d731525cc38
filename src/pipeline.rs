//! ## Cleaning Pipeline
//!
//! This module provides the abstractions used to clean the raw trip table before it is cached.
//!
//! ### Overview
//!
//! - The [`Transformer`] trait defines a single stateless step that rewrites a DataFrame's
//!   logical plan (projection, row filter, or derived columns).
//! - The [`Pipeline`] struct chains named transformers; each step's output plan is the next
//!   step's input, and nothing executes until the caller collects the result.
//! - The [`crate::make_pipeline`] macro boxes the steps for you.

use crate::exceptions::{DashboardError, DashboardResult};
use datafusion::prelude::*;
use std::time::Instant;
use tracing::{debug, error};

/// A stateless step in the cleaning pipeline.
pub trait Transformer {
    /// Transform the input DataFrame, returning a new DataFrame with the step applied.
    ///
    /// # Arguments
    ///
    /// * `df` - The input DataFrame.
    ///
    /// # Returns
    ///
    /// * `DashboardResult<DataFrame>` - The transformed DataFrame or an error if the input
    ///   does not have the columns the step needs.
    fn transform(&self, df: DataFrame) -> DashboardResult<DataFrame>;
}

/// A pipeline that chains a sequence of transformers.
///
/// Each transformer's output (a new logical plan) is passed as input to the next transformer.
pub struct Pipeline {
    steps: Vec<(String, Box<dyn Transformer + Send + Sync>)>,
    verbose: bool,
}

impl Pipeline {
    /// Creates a new pipeline.
    ///
    /// # Arguments
    ///
    /// * `steps` - A vector of (name, transformer) pairs (each transformer is already boxed).
    /// * `verbose` - If true, logs the name and planning time of every step.
    pub fn new(steps: Vec<(String, Box<dyn Transformer + Send + Sync>)>, verbose: bool) -> Self {
        Self { steps, verbose }
    }

    /// Names of the steps, in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Applies every step in order.
    pub fn transform(&self, df: DataFrame) -> DashboardResult<DataFrame> {
        if self.steps.is_empty() {
            return Err(DashboardError::InvalidParameter(
                "Pipeline must have at least one transformer.".to_string(),
            ));
        }
        let mut current_df = df;
        for (name, step) in self.steps.iter() {
            let start = Instant::now();
            current_df = step
                .transform(current_df)
                .inspect_err(|e| error!("Pipeline step '{}' failed: {}", name, e))?;
            if self.verbose {
                debug!("Step '{}' planned in {:?}", name, start.elapsed());
            }
        }
        Ok(current_df)
    }
}

/// Macro to simplify pipeline creation by automatically boxing transformers.
///
/// # Example
///
/// ```rust,no_run
/// use taxi_dashboard::make_pipeline;
/// use taxi_dashboard::transformers::missing_data::DropIncompleteTrips;
///
/// let pipeline = make_pipeline!(false,
///     ("drop_incomplete", DropIncompleteTrips::default()),
/// );
/// ```
#[macro_export]
macro_rules! make_pipeline {
    ($verbose:expr, $(($name:expr, $transformer:expr)),+ $(,)?) => {
        {
            let steps: Vec<(String, Box<dyn $crate::pipeline::Transformer + Send + Sync>)> = vec![
                $(
                    ($name.to_string(), Box::new($transformer)),
                )+
            ];
            $crate::pipeline::Pipeline::new(steps, $verbose)
        }
    };
}
