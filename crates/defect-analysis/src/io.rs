//! CSV input and output.

use crate::error::{ReportError, Result, ResultExt};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Datetime layout used in the exported CSV.
pub const EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field values read as missing, in every column.
pub const NULL_MARKERS: [&str; 16] = [
    "NA", "N/A", "n/a", "na", "#N/A", "NULL", "null", "Null", "None", "none", "NaN", "nan",
    "-NaN", "-nan", "<NA>", "missing",
];

fn parse_options() -> CsvParseOptions {
    let markers = NULL_MARKERS.iter().map(|m| PlSmallStr::from(*m)).collect();
    CsvParseOptions::default()
        .with_quote_char(Some(b'"'))
        .with_null_values(Some(NullValues::AllColumns(markers)))
}

/// Load a CSV file with a header row.
///
/// The whole file is scanned for schema inference so a cost column that
/// switches from whole numbers to decimals late in the file is still read as
/// numeric. Empty fields and the [`NULL_MARKERS`] tokens load as null, so
/// `NA` or `NaN` in the cost column counts as missing rather than turning the
/// column into text. If the standard read fails, blank lines are stripped and the read
/// is retried once before giving up.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    match CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(parse_options())
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    let content = fs::read_to_string(path)?;
    let cleaned = strip_blank_lines(&content);

    CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .with_parse_options(parse_options())
        .into_reader_with_file_handle(Cursor::new(cleaned))
        .finish()
        .context(format!("Failed to parse {}", path.display()))
}

fn strip_blank_lines(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the dataset as CSV, creating the parent directory if needed.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .with_datetime_format(Some(EXPORT_DATETIME_FORMAT.to_string()))
        .finish(df)
        .context("Writing cleaned dataset")?;

    info!("Cleaned dataset saved: {}", path.display());
    Ok(path.to_path_buf())
}
