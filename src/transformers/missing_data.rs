//! ## Transformers for incomplete trips
//!
//! - **DropIncompleteTrips:** Removes trips with a null in any required column.
//!
//! By default the required columns are [`CRITICAL_TRIP_COLUMNS`]: the two timestamps, both
//! zone ids, and the fare. Nothing is ever imputed.

use crate::columns::CRITICAL_TRIP_COLUMNS;
use crate::exceptions::{DashboardError, DashboardResult};
use crate::pipeline::Transformer;
use datafusion::prelude::*;

pub struct DropIncompleteTrips {
    pub required: Vec<String>,
}

impl DropIncompleteTrips {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for DropIncompleteTrips {
    fn default() -> Self {
        Self::new(CRITICAL_TRIP_COLUMNS)
    }
}

impl Transformer for DropIncompleteTrips {
    fn transform(&self, df: DataFrame) -> DashboardResult<DataFrame> {
        let mut predicate: Option<Expr> = None;
        for name in &self.required {
            if df.schema().field_with_name(None, name).is_err() {
                return Err(DashboardError::MissingColumn(format!(
                    "Required column '{}' not found",
                    name
                )));
            }
            let present = col(name.as_str()).is_not_null();
            predicate = Some(match predicate {
                Some(p) => p.and(present),
                None => present,
            });
        }
        match predicate {
            Some(p) => Ok(df.filter(p)?),
            None => Ok(df),
        }
    }
}
