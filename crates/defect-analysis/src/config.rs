//! Configuration for the defect report.
//!
//! Every field has a default that reproduces the standard report over
//! `manufacturing_defects.csv`; the CLI only overrides what the user passes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Standard deviations above the mean at which costs are clipped.
pub const OUTLIER_SIGMA: f64 = 3.0;

/// Default input file name.
pub const DEFAULT_INPUT: &str = "manufacturing_defects.csv";

/// Default name of the exported, cleaned dataset.
pub const DEFAULT_CLEANED_NAME: &str = "manufacturing_defects_cleaned.csv";

/// Configuration for [`crate::ReportPipeline`].
///
/// Use [`ReportConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use defect_analysis::ReportConfig;
///
/// let config = ReportConfig::builder()
///     .input_path("data/defects.csv")
///     .output_dir("out")
///     .render_charts(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// CSV file to analyze.
    /// Default: "manufacturing_defects.csv"
    pub input_path: PathBuf,

    /// Directory receiving the cleaned CSV, charts and JSON report.
    /// Default: "."
    pub output_dir: PathBuf,

    /// File name of the cleaned dataset inside `output_dir`.
    /// Default: "manufacturing_defects_cleaned.csv"
    pub cleaned_file_name: String,

    /// Whether to render the SVG charts.
    /// Default: true
    pub render_charts: bool,

    /// Number of leading defect types summed for the Pareto headline.
    /// Default: 3
    pub top_n: usize,

    /// Shift whose share of all defects is reported.
    /// Default: "Night"
    pub focus_shift: String,

    /// Machine whose mean cost is reported.
    /// If None, the machine with the highest mean cost is used.
    /// Default: None
    pub focus_machine: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            cleaned_file_name: DEFAULT_CLEANED_NAME.to_string(),
            render_charts: true,
            top_n: 3,
            focus_shift: "Night".to_string(),
            focus_machine: None,
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n));
        }

        if self.cleaned_file_name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField(
                "cleaned_file_name".to_string(),
            ));
        }

        if self.focus_shift.trim().is_empty() {
            return Err(ConfigValidationError::EmptyField("focus_shift".to_string()));
        }

        if matches!(self.focus_machine.as_deref(), Some(m) if m.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyField(
                "focus_machine".to_string(),
            ));
        }

        Ok(())
    }

    /// Full path of the cleaned CSV.
    pub fn cleaned_path(&self) -> PathBuf {
        self.output_dir.join(&self.cleaned_file_name)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid top_n: {0} (must be at least 1)")]
    InvalidTopN(usize),

    #[error("Field '{0}' must not be empty")]
    EmptyField(String),
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    input_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    cleaned_file_name: Option<String>,
    render_charts: Option<bool>,
    top_n: Option<usize>,
    focus_shift: Option<String>,
    focus_machine: Option<String>,
}

impl ReportConfigBuilder {
    /// Set the CSV file to analyze.
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Set the output directory.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the file name of the cleaned dataset.
    pub fn cleaned_file_name(mut self, name: impl Into<String>) -> Self {
        self.cleaned_file_name = Some(name.into());
        self
    }

    /// Enable or disable chart rendering.
    pub fn render_charts(mut self, render: bool) -> Self {
        self.render_charts = Some(render);
        self
    }

    /// Set how many defect types the Pareto headline sums.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Set the shift whose share is reported.
    pub fn focus_shift(mut self, shift: impl Into<String>) -> Self {
        self.focus_shift = Some(shift.into());
        self
    }

    /// Report a specific machine instead of the highest-cost one.
    pub fn focus_machine(mut self, machine: impl Into<String>) -> Self {
        self.focus_machine = Some(machine.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ReportConfig` or an error if validation fails.
    pub fn build(self) -> Result<ReportConfig, ConfigValidationError> {
        let defaults = ReportConfig::default();
        let config = ReportConfig {
            input_path: self.input_path.unwrap_or(defaults.input_path),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            cleaned_file_name: self
                .cleaned_file_name
                .unwrap_or(defaults.cleaned_file_name),
            render_charts: self.render_charts.unwrap_or(defaults.render_charts),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            focus_shift: self.focus_shift.unwrap_or(defaults.focus_shift),
            focus_machine: self.focus_machine,
        };

        config.validate()?;
        Ok(config)
    }
}
