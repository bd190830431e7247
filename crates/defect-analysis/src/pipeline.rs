//! The report pipeline: load, check, clean, analyze, export, summarize.
//!
//! Stages run strictly in order over one `DataFrame` that is mutated in place
//! by the cleaning stages. Any failure aborts the run; the error carries the
//! name of the stage it happened in.
//!
//! # Example
//!
//! ```rust,ignore
//! use defect_analysis::{ReportConfig, ReportPipeline};
//!
//! let config = ReportConfig::builder()
//!     .input_path("manufacturing_defects.csv")
//!     .build()?;
//!
//! let report = ReportPipeline::new(config).run()?;
//! println!("{report}");
//! ```

use crate::analysis::shift_share_pct;
use crate::charts::ChartRenderer;
use crate::cleaning::{clip_upper_sigma, derive_time_fields};
use crate::config::{OUTLIER_SIGMA, ReportConfig};
use crate::error::{ReportError, Result, ResultExt};
use crate::io::{load_csv, write_csv};
use crate::quality::QualityChecker;
use crate::reporting::AnalysisReport;
use crate::schema::{self, COST, MACHINE_ID, SHIFT, TIMESTAMP};
use crate::types::{Crosstab, Headlines, MachineTable, ParetoTable, ShiftTable};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Stages of the report pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStage {
    /// Reading the CSV and checking the required columns
    Loading,
    /// Missing values, duplicates and dtypes
    QualityCheck,
    /// Timestamp parsing and derived date/hour columns
    Cleaning,
    /// Clipping costs at mean + 3σ
    OutlierClipping,
    ParetoAnalysis,
    ShiftAnalysis,
    MachineAnalysis,
    /// Charts and the cleaned CSV
    Export,
    /// Headline figures over the exported data
    Summary,
}

impl ReportStage {
    /// All stages in execution order.
    pub const ALL: [ReportStage; 9] = [
        Self::Loading,
        Self::QualityCheck,
        Self::Cleaning,
        Self::OutlierClipping,
        Self::ParetoAnalysis,
        Self::ShiftAnalysis,
        Self::MachineAnalysis,
        Self::Export,
        Self::Summary,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Dataset",
            Self::QualityCheck => "Checking Quality",
            Self::Cleaning => "Cleaning Timestamps",
            Self::OutlierClipping => "Clipping Outliers",
            Self::ParetoAnalysis => "Pareto Analysis",
            Self::ShiftAnalysis => "Shift Analysis",
            Self::MachineAnalysis => "Machine Analysis",
            Self::Export => "Exporting Results",
            Self::Summary => "Summarizing",
        }
    }

    /// One-based position of the stage.
    pub fn step(&self) -> usize {
        Self::ALL
            .iter()
            .position(|stage| stage == self)
            .map_or(0, |i| i + 1)
    }
}

impl std::fmt::Display for ReportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Runs every stage of the defect report for one configuration.
pub struct ReportPipeline {
    config: ReportConfig,
}

impl ReportPipeline {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    fn enter(stage: ReportStage) {
        info!(
            "[{}/{}] {}",
            stage.step(),
            ReportStage::ALL.len(),
            stage.display_name()
        );
    }

    /// Run the full pipeline and return the collected report.
    ///
    /// The configuration is validated first, whether or not it came through
    /// the builder.
    ///
    /// Side effects: writes the cleaned CSV and, unless disabled, the three
    /// charts into the configured output directory.
    pub fn run(&self) -> Result<AnalysisReport> {
        let config = &self.config;
        config.validate().map_err(ReportError::from)?;

        Self::enter(ReportStage::Loading);
        let mut df = self.load().context(ReportStage::Loading.display_name())?;
        info!("Dataset loaded: {:?}", df.shape());

        Self::enter(ReportStage::QualityCheck);
        let quality =
            QualityChecker::check(&df).context(ReportStage::QualityCheck.display_name())?;
        info!(
            "{} missing values, {} duplicate rows",
            quality.total_missing(),
            quality.duplicate_rows
        );

        Self::enter(ReportStage::Cleaning);
        let timestamps =
            derive_time_fields(&mut df, TIMESTAMP).context(ReportStage::Cleaning.display_name())?;

        Self::enter(ReportStage::OutlierClipping);
        let clipping = clip_upper_sigma(&mut df, COST, OUTLIER_SIGMA)
            .context(ReportStage::OutlierClipping.display_name())?;
        info!(
            "Clipped {} outliers above {:.2}",
            clipping.outliers_clipped, clipping.upper_bound
        );

        Self::enter(ReportStage::ParetoAnalysis);
        let pareto =
            ParetoTable::compute(&df).context(ReportStage::ParetoAnalysis.display_name())?;
        debug!("{} defect types", pareto.rows.len());

        Self::enter(ReportStage::ShiftAnalysis);
        let shifts =
            ShiftTable::compute(&df).context(ReportStage::ShiftAnalysis.display_name())?;
        let shift_share = shift_share_pct(&df, &config.focus_shift)
            .context(ReportStage::ShiftAnalysis.display_name())?;

        Self::enter(ReportStage::MachineAnalysis);
        let machines =
            MachineTable::compute(&df).context(ReportStage::MachineAnalysis.display_name())?;
        let crosstab = Crosstab::compute(&df, MACHINE_ID, SHIFT)
            .context(ReportStage::MachineAnalysis.display_name())?;

        Self::enter(ReportStage::Export);
        let charts = self
            .render_charts(&pareto, &shifts, &crosstab)
            .context(ReportStage::Export.display_name())?;
        let cleaned_path = write_csv(&mut df, &config.cleaned_path())
            .context(ReportStage::Export.display_name())?;

        Self::enter(ReportStage::Summary);
        let headlines =
            Headlines::compute(&df, config).context(ReportStage::Summary.display_name())?;

        Ok(AnalysisReport {
            generated_at: chrono::Local::now().to_rfc3339(),
            input_file: config.input_path.display().to_string(),
            cleaned_file: cleaned_path.display().to_string(),
            quality,
            timestamps,
            clipping,
            pareto,
            shifts,
            shift_share_pct: shift_share,
            machines,
            machine_shift_crosstab: crosstab,
            headlines,
            charts,
        })
    }

    fn load(&self) -> Result<DataFrame> {
        let df = load_csv(&self.config.input_path)?;
        schema::require_columns(&df)?;
        // rejects a non-numeric cost column before any work is done
        schema::cost_values(&df)?;
        Ok(df)
    }

    fn render_charts(
        &self,
        pareto: &ParetoTable,
        shifts: &ShiftTable,
        crosstab: &Crosstab,
    ) -> Result<Vec<String>> {
        if !self.config.render_charts {
            debug!("Chart rendering disabled");
            return Ok(Vec::new());
        }

        let renderer = ChartRenderer::new(&self.config.output_dir);
        let paths = renderer.render_all(pareto, self.config.top_n, shifts, crosstab)?;
        Ok(paths.iter().map(|p| p.display().to_string()).collect())
    }
}
