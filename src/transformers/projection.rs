//! ## Transformers for projecting source files onto the canonical schema
//!
//! - **TripProjection:** Validates that every required trip column exists with a usable type,
//!   then selects, casts, and renames the columns to the canonical trip schema.
//! - **ZoneProjection:** The same for the zone lookup (`zone_id`, `zone_name`, `borough`).
//!
//! Casting uses `TRY_CAST`, so a value that cannot be converted (for example a malformed
//! timestamp string) turns into a null and the row is dropped by the next cleaning step.

use crate::columns::{
    BOROUGH, DROPOFF_TIME, DROPOFF_ZONE_ID, FARE_AMOUNT, PAYMENT_TYPE, PICKUP_TIME,
    PICKUP_ZONE_ID, TOTAL_AMOUNT, TRIP_DISTANCE, ZONE_ID, ZONE_NAME,
};
use crate::exceptions::{DashboardError, DashboardResult};
use crate::pipeline::Transformer;
use crate::settings::{TripColumns, ZoneColumns};
use datafusion::arrow::datatypes::{DataType, TimeUnit};
use datafusion::prelude::*;
use datafusion::scalar::ScalarValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Timestamp,
    Numeric,
    Text,
}

impl ColumnKind {
    fn accepts(&self, data_type: &DataType) -> bool {
        let is_text = matches!(
            data_type,
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
        );
        match self {
            ColumnKind::Timestamp => {
                is_text
                    || matches!(
                        data_type,
                        DataType::Timestamp(_, _) | DataType::Date32 | DataType::Date64
                    )
            }
            ColumnKind::Numeric => data_type.is_numeric(),
            ColumnKind::Text => is_text || data_type.is_numeric(),
        }
    }

    fn target_type(&self) -> DataType {
        match self {
            ColumnKind::Timestamp => DataType::Timestamp(TimeUnit::Nanosecond, None),
            ColumnKind::Numeric => DataType::Float64,
            ColumnKind::Text => DataType::Utf8,
        }
    }
}

/// Checks that `name` exists in the DataFrame and that its type fits `kind`.
fn validate_source_column(df: &DataFrame, name: &str, kind: ColumnKind) -> DashboardResult<()> {
    let field = df.schema().field_with_name(None, name).map_err(|_| {
        DashboardError::MissingColumn(format!("Required column '{}' not found in source", name))
    })?;
    if kind.accepts(field.data_type()) {
        Ok(())
    } else {
        Err(DashboardError::InvalidParameter(format!(
            "Column '{}' has unsupported type {:?}",
            name,
            field.data_type()
        )))
    }
}

/// Builds `TRY_CAST(source AS target) AS alias`.
fn project(source: &str, target: DataType, alias: &str) -> Expr {
    try_cast(ident(source), target).alias(alias)
}

/// Projects the raw trip table onto the canonical trip schema.
pub struct TripProjection {
    pub columns: TripColumns,
}

impl TripProjection {
    pub fn new(columns: TripColumns) -> Self {
        Self { columns }
    }

    fn plan(&self) -> [(&str, ColumnKind, DataType, &'static str); 8] {
        let c = &self.columns;
        let ts = ColumnKind::Timestamp;
        let num = ColumnKind::Numeric;
        [
            (c.pickup_time.as_str(), ts, ts.target_type(), PICKUP_TIME),
            (c.dropoff_time.as_str(), ts, ts.target_type(), DROPOFF_TIME),
            (c.pickup_zone_id.as_str(), num, DataType::Int64, PICKUP_ZONE_ID),
            (c.dropoff_zone_id.as_str(), num, DataType::Int64, DROPOFF_ZONE_ID),
            (c.fare_amount.as_str(), num, num.target_type(), FARE_AMOUNT),
            (c.total_amount.as_str(), num, num.target_type(), TOTAL_AMOUNT),
            (c.trip_distance.as_str(), num, num.target_type(), TRIP_DISTANCE),
            (c.payment_type.as_str(), num, DataType::Int64, PAYMENT_TYPE),
        ]
    }
}

impl Transformer for TripProjection {
    fn transform(&self, df: DataFrame) -> DashboardResult<DataFrame> {
        let plan = self.plan();
        for (source, kind, _, _) in &plan {
            validate_source_column(&df, source, *kind)?;
        }
        let exprs: Vec<Expr> = plan
            .iter()
            .map(|(source, _, target, alias)| project(source, target.clone(), alias))
            .collect();
        df.select(exprs).map_err(DashboardError::from)
    }
}

/// Projects the raw zone lookup onto `zone_id`, `zone_name`, and `borough`.
pub struct ZoneProjection {
    pub columns: ZoneColumns,
}

impl ZoneProjection {
    pub fn new(columns: ZoneColumns) -> Self {
        Self { columns }
    }
}

impl Transformer for ZoneProjection {
    fn transform(&self, df: DataFrame) -> DashboardResult<DataFrame> {
        let c = &self.columns;
        validate_source_column(&df, &c.zone_id, ColumnKind::Numeric)?;
        validate_source_column(&df, &c.zone_name, ColumnKind::Text)?;

        // The borough is informational only, so a lookup without it is still valid.
        let borough = if df.schema().field_with_name(None, &c.borough).is_ok() {
            project(&c.borough, DataType::Utf8, BOROUGH)
        } else {
            lit(ScalarValue::Utf8(None)).alias(BOROUGH)
        };

        let exprs = vec![
            project(&c.zone_id, DataType::Int64, ZONE_ID),
            project(&c.zone_name, DataType::Utf8, ZONE_NAME),
            borough,
        ];
        df.select(exprs)?
            .filter(col(ZONE_ID).is_not_null())
            .map_err(DashboardError::from)
    }
}
