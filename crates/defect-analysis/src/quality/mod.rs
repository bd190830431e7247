//! Data quality checks run on the freshly loaded dataset.

use crate::error::Result;
use crate::types::{ColumnCount, ColumnDtype, QualityReport};
use polars::prelude::*;
use tracing::debug;

/// Rows shown in the dataset preview.
pub const PREVIEW_ROWS: usize = 5;

pub struct QualityChecker;

impl QualityChecker {
    /// Count missing values per column, full-row duplicates, and collect the
    /// inferred dtypes. Read-only.
    pub fn check(df: &DataFrame) -> Result<QualityReport> {
        let missing_values = df
            .get_columns()
            .iter()
            .map(|col| ColumnCount {
                column: col.name().to_string(),
                count: missing_count(col),
            })
            .collect();

        let dtypes = df
            .get_columns()
            .iter()
            .map(|col| ColumnDtype {
                column: col.name().to_string(),
                dtype: col.dtype().to_string(),
            })
            .collect();

        let duplicate_rows = Self::count_duplicates(df)?;
        debug!("Found {} duplicate rows", duplicate_rows);

        Ok(QualityReport {
            rows: df.height(),
            columns: df.width(),
            preview: format!("{}", df.head(Some(PREVIEW_ROWS))),
            missing_values,
            duplicate_rows,
            dtypes,
        })
    }

    /// Rows that repeat an earlier row across every column.
    pub fn count_duplicates(df: &DataFrame) -> Result<usize> {
        if df.height() == 0 {
            return Ok(0);
        }
        let unique = df.unique::<&str, &str>(None, UniqueKeepStrategy::First, None)?;
        Ok(df.height() - unique.height())
    }
}

/// Nulls plus NaN values in float columns.
fn missing_count(col: &Column) -> usize {
    let nan = match col.dtype() {
        DataType::Float32 | DataType::Float64 => col
            .as_materialized_series()
            .is_nan()
            .map(|mask| mask.sum().unwrap_or(0) as usize)
            .unwrap_or(0),
        _ => 0,
    };
    col.null_count() + nan
}
