//! Timestamp parsing and derived calendar fields.

use crate::error::{ReportError, Result};
use crate::schema::{DATE, HOUR};
use crate::types::TimestampSummary;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use polars::prelude::*;
use tracing::{debug, warn};

/// Layouts tried in order for naive datetimes.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse one timestamp string.
///
/// Offsets (RFC 3339) are normalised to UTC; a bare date means midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.naive_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Replace `column` with a millisecond datetime and append `date` and `hour`.
///
/// Values that cannot be parsed become null in all three columns; nothing
/// fails on malformed input.
pub fn derive_time_fields(df: &mut DataFrame, column: &str) -> Result<TimestampSummary> {
    let datetimes = read_datetimes(df, column)?;

    let present = df
        .column(column)
        .map(|col| col.len() - col.null_count())
        .map_err(|_| ReportError::ColumnNotFound(column.to_string()))?;
    let parsed = datetimes.iter().filter(|v| v.is_some()).count();
    let summary = TimestampSummary {
        parsed,
        unparsed: present.saturating_sub(parsed),
    };
    if summary.unparsed > 0 {
        warn!(
            "{} values in '{}' could not be parsed and are now null",
            summary.unparsed, column
        );
    }

    let millis: Vec<Option<i64>> = datetimes
        .iter()
        .map(|v| v.map(|dt| dt.and_utc().timestamp_millis()))
        .collect();
    let days: Vec<Option<i32>> = datetimes
        .iter()
        .map(|v| v.map(|dt| days_since_epoch(dt.date())))
        .collect();
    let hours: Vec<Option<i32>> = datetimes
        .iter()
        .map(|v| v.map(|dt| dt.hour() as i32))
        .collect();

    let timestamp_series = Series::new(column.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let date_series = Series::new(DATE.into(), days).cast(&DataType::Date)?;
    let hour_series = Series::new(HOUR.into(), hours);

    df.replace(column, timestamp_series)?;
    df.with_column(date_series)?;
    df.with_column(hour_series)?;

    debug!("Parsed {} timestamps in '{}'", summary.parsed, column);
    Ok(summary)
}

/// Column values as naive datetimes, whatever the stored type.
fn read_datetimes(df: &DataFrame, column: &str) -> Result<Vec<Option<NaiveDateTime>>> {
    let series = df
        .column(column)
        .map_err(|_| ReportError::ColumnNotFound(column.to_string()))?
        .as_materialized_series();

    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_timestamp))
            .collect()),
        DataType::Datetime(_, _) | DataType::Date => {
            let as_millis = series
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .cast(&DataType::Int64)?;
            Ok(as_millis
                .i64()?
                .into_iter()
                .map(|v| v.and_then(DateTime::from_timestamp_millis).map(|dt| dt.naive_utc()))
                .collect())
        }
        other => Err(ReportError::InvalidColumnType {
            column: column.to_string(),
            expected: "string or datetime".to_string(),
            actual: other.to_string(),
        }),
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}
