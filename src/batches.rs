//! Helpers for pulling typed values out of collected record batches.
//!
//! Aggregations come back as Arrow arrays whose exact type depends on the source file
//! (`Int32` vs `Int64` ids, `Utf8` vs `Utf8View` strings). Every helper here casts the column
//! to one canonical type first, so callers only ever see `i64`, `f64`, `String`, or dates.

use crate::calendar::days_to_date;
use crate::exceptions::{DashboardError, DashboardResult};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;

fn column_cast(batch: &RecordBatch, name: &str, to: &DataType) -> DashboardResult<ArrayRef> {
    let array = batch.column_by_name(name).ok_or_else(|| {
        DashboardError::MissingColumn(format!("Column '{}' not found in result", name))
    })?;
    Ok(cast(array, to)?)
}

/// Collects a column as `f64` values across all batches; nulls become `None`.
pub fn f64_values(batches: &[RecordBatch], name: &str) -> DashboardResult<Vec<Option<f64>>> {
    let mut values = Vec::new();
    for batch in batches {
        let array = column_cast(batch, name, &DataType::Float64)?;
        values.extend(array.as_primitive::<Float64Type>().iter());
    }
    Ok(values)
}

/// Collects a column as `i64` values across all batches; nulls become `None`.
pub fn i64_values(batches: &[RecordBatch], name: &str) -> DashboardResult<Vec<Option<i64>>> {
    let mut values = Vec::new();
    for batch in batches {
        let array = column_cast(batch, name, &DataType::Int64)?;
        values.extend(array.as_primitive::<Int64Type>().iter());
    }
    Ok(values)
}

/// Collects a column as owned strings across all batches; nulls become `None`.
pub fn string_values(
    batches: &[RecordBatch],
    name: &str,
) -> DashboardResult<Vec<Option<String>>> {
    let mut values = Vec::new();
    for batch in batches {
        let array = column_cast(batch, name, &DataType::Utf8)?;
        values.extend(
            array
                .as_string::<i32>()
                .iter()
                .map(|v| v.map(str::to_string)),
        );
    }
    Ok(values)
}

/// Collects a `Date32`-compatible column as calendar dates; nulls become `None`.
pub fn date_values(
    batches: &[RecordBatch],
    name: &str,
) -> DashboardResult<Vec<Option<NaiveDate>>> {
    let mut values = Vec::new();
    for batch in batches {
        let array = column_cast(batch, name, &DataType::Date32)?;
        values.extend(
            array
                .as_primitive::<Date32Type>()
                .iter()
                .map(|v| v.and_then(days_to_date)),
        );
    }
    Ok(values)
}

/// Reads the first value of a single-row aggregate result as `f64`.
pub fn scalar_f64(batches: &[RecordBatch], name: &str) -> DashboardResult<Option<f64>> {
    Ok(f64_values(batches, name)?.into_iter().next().flatten())
}

/// Reads the first value of a single-row aggregate result as `i64`.
pub fn scalar_i64(batches: &[RecordBatch], name: &str) -> DashboardResult<Option<i64>> {
    Ok(i64_values(batches, name)?.into_iter().next().flatten())
}

/// Total number of rows across batches.
pub fn row_count(batches: &[RecordBatch]) -> usize {
    batches.iter().map(|b| b.num_rows()).sum()
}
