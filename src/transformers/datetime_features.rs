//! ## Transformers for extracting calendar features
//!
//! - **PickupCalendarFeatures:** Derives the pickup date, hour of day, and weekday name from a
//!   timestamp column.
//!
//! The new columns are `pickup_date` (`Date32`), `pickup_hour` (`Int64`, 0–23) and
//! `pickup_weekday_name` (`Utf8`, Monday–Sunday).

use crate::calendar::WEEKDAY_NAMES_FROM_SUNDAY;
use crate::columns::{PICKUP_DATE, PICKUP_HOUR, PICKUP_WEEKDAY_NAME};
use crate::exceptions::{DashboardError, DashboardResult};
use crate::pipeline::Transformer;
use datafusion::arrow::datatypes::DataType;
use datafusion::logical_expr::Case as DFCase;
use datafusion::prelude::*;
use datafusion::scalar::ScalarValue;
use datafusion_expr::{col, lit, Expr};
use datafusion_functions::datetime::date_part;

/// Validates that a column exists and is of a datetime type (Timestamp, Date32, or Date64).
fn validate_datetime_column(df: &DataFrame, col_name: &str) -> DashboardResult<()> {
    let field = df
        .schema()
        .field_with_name(None, col_name)
        .map_err(|_| DashboardError::MissingColumn(format!("Column '{}' not found", col_name)))?;
    match field.data_type() {
        DataType::Timestamp(_, _) | DataType::Date32 | DataType::Date64 => Ok(()),
        dt => Err(DashboardError::InvalidParameter(format!(
            "Column '{}' must be a datetime type (Timestamp, Date32, or Date64), but found {:?}",
            col_name, dt
        ))),
    }
}

/// Maps `date_part('dow', ..)` (Sunday = 0) to the English weekday name.
fn weekday_name_expr(base: Expr) -> Expr {
    let dow = cast(
        date_part().call(vec![lit("dow"), base]),
        DataType::Int64,
    );
    let when_then_expr = WEEKDAY_NAMES_FROM_SUNDAY
        .iter()
        .enumerate()
        .map(|(i, name)| {
            (
                Box::new(dow.clone().eq(lit(i as i64))),
                Box::new(lit(*name)),
            )
        })
        .collect::<Vec<_>>();
    Expr::Case(DFCase {
        expr: None,
        when_then_expr,
        else_expr: Some(Box::new(lit(ScalarValue::Utf8(None)))),
    })
}

/// Appends calendar features derived from the pickup timestamp.
pub struct PickupCalendarFeatures {
    pub column: String,
}

impl PickupCalendarFeatures {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Transformer for PickupCalendarFeatures {
    /// Validates the source column, then returns a new DataFrame with all original columns
    /// plus `pickup_date`, `pickup_hour`, and `pickup_weekday_name`.
    fn transform(&self, df: DataFrame) -> DashboardResult<DataFrame> {
        validate_datetime_column(&df, &self.column)?;

        // Retain all original columns.
        let mut exprs: Vec<Expr> = df.schema().fields().iter().map(|f| col(f.name())).collect();

        let base = col(&self.column);
        let date_expr = cast(base.clone(), DataType::Date32).alias(PICKUP_DATE);
        let hour_expr = cast(
            date_part().call(vec![lit("hour"), base.clone()]),
            DataType::Int64,
        )
        .alias(PICKUP_HOUR);
        let weekday_expr = weekday_name_expr(base).alias(PICKUP_WEEKDAY_NAME);

        exprs.push(date_expr);
        exprs.push(hour_expr);
        exprs.push(weekday_expr);

        df.select(exprs).map_err(DashboardError::DataFusionError)
    }
}
