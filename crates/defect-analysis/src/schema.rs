//! Column names of the manufacturing defects dataset.
//!
//! The report works against one fixed schema. Columns are looked up by these
//! names everywhere; nothing is inferred from the data.

use crate::error::{ReportError, Result};
use polars::prelude::*;

pub const DEFECT_ID: &str = "defect_id";
pub const TIMESTAMP: &str = "timestamp";
pub const DEFECT_TYPE: &str = "defect_type";
pub const COST: &str = "defect_cost_pln";
pub const SHIFT: &str = "shift";
pub const MACHINE_ID: &str = "machine_id";

/// Derived during cleaning.
pub const DATE: &str = "date";
pub const HOUR: &str = "hour";

/// Columns the input file must provide, in file order.
pub const REQUIRED_COLUMNS: [&str; 6] =
    [DEFECT_ID, TIMESTAMP, DEFECT_TYPE, COST, SHIFT, MACHINE_ID];

/// Fail with [`ReportError::ColumnNotFound`] on the first missing column.
pub fn require_columns(df: &DataFrame) -> Result<()> {
    let names = df.get_column_names();
    for required in REQUIRED_COLUMNS {
        if !names.iter().any(|name| name.as_str() == required) {
            return Err(ReportError::ColumnNotFound(required.to_string()));
        }
    }
    Ok(())
}

/// Fetch a column as a materialized series.
pub(crate) fn series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| ReportError::ColumnNotFound(name.to_string()))
}

/// Read a categorical column as owned strings; nulls stay `None`.
pub(crate) fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = series(df, name)?;
    let as_string = series.cast(&DataType::String)?;
    let values = as_string
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Read the cost column as f64 values; nulls stay `None`.
pub(crate) fn cost_values(df: &DataFrame) -> Result<Vec<Option<f64>>> {
    numeric_values(df, COST)
}

/// Read a numeric column as f64 values; integers are widened and anything
/// non-numeric is rejected.
///
/// NaN and infinite values come back as `None`, the same as nulls.
pub(crate) fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = series(df, name)?;
    if !is_numeric_dtype(series.dtype()) {
        return Err(ReportError::InvalidColumnType {
            column: name.to_string(),
            expected: "numeric".to_string(),
            actual: series.dtype().to_string(),
        });
    }
    let float_series = series.cast(&DataType::Float64)?;
    Ok(float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect())
}

/// Integer or floating point dtype.
#[inline]
pub(crate) fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}
