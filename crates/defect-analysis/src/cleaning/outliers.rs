//! Upper clipping of a numeric column at mean + kσ.

use crate::error::Result;
use crate::schema::numeric_values;
use crate::stats::{mean, sample_std};
use crate::types::ClipSummary;
use polars::prelude::*;
use tracing::debug;

/// Clip `column` from above at `mean + sigma * std`.
///
/// Mean and sample standard deviation are taken over the non-null values of
/// the column before clipping. Values strictly above the bound are replaced
/// by the bound; everything else, nulls included, is left untouched. NaN and
/// infinite values are treated as missing and written back as null. The
/// column is rewritten as Float64.
pub fn clip_upper_sigma(df: &mut DataFrame, column: &str, sigma: f64) -> Result<ClipSummary> {
    let values = numeric_values(df, column)?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();

    let mean = mean(&present);
    let std = sample_std(&present);
    let upper_bound = mean + sigma * std;

    let mut outliers_clipped = 0;
    let clipped: Vec<Option<f64>> = values
        .into_iter()
        .map(|v| {
            v.map(|val| {
                if val > upper_bound {
                    outliers_clipped += 1;
                    upper_bound
                } else {
                    val
                }
            })
        })
        .collect();

    df.replace(column, Series::new(column.into(), clipped))?;

    debug!(
        "Clipped {} values in '{}' above {:.2} (mean {:.2}, std {:.2})",
        outliers_clipped, column, upper_bound, mean, std
    );

    Ok(ClipSummary {
        column: column.to_string(),
        mean,
        std,
        upper_bound,
        outliers_clipped,
        shape_after: df.shape(),
    })
}
