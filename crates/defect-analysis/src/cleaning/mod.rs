//! Dataset cleaning: timestamp parsing and cost clipping.
//!
//! Both steps mutate the dataset in place and return a summary for the
//! report. Neither removes rows.

mod outliers;
mod timestamps;

pub use outliers::clip_upper_sigma;
pub use timestamps::{derive_time_fields, parse_timestamp};
