//! Manufacturing Defect Report Library
//!
//! A one-shot quality report over a CSV of manufacturing defects, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! Each row of the input is one recorded defect with a timestamp, a defect
//! type, a repair cost in PLN, the production shift and the machine. The
//! report:
//!
//! - **Quality Check**: missing values, duplicate rows and inferred dtypes
//! - **Cleaning**: timestamp parsing with derived `date`/`hour` columns, and
//!   upper clipping of costs at mean + 3σ
//! - **Analysis**: Pareto of cost by defect type, shift and machine
//!   breakdowns, machine × shift crosstab
//! - **Export**: cleaned CSV plus three SVG charts
//! - **Summary**: headline figures recomputed from the exported data
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use defect_analysis::{ReportConfig, ReportPipeline};
//!
//! let config = ReportConfig::builder()
//!     .input_path("manufacturing_defects.csv")
//!     .output_dir("out")
//!     .top_n(3)
//!     .focus_shift("Night")
//!     .build()?;
//!
//! let report = ReportPipeline::new(config).run()?;
//!
//! println!("{report}");
//! println!("Night share: {:.1}%", report.headlines.shift_pct);
//! ```
//!
//! # Individual stages
//!
//! The stages are plain functions over a `DataFrame` and can be used on
//! their own:
//!
//! ```rust,ignore
//! use defect_analysis::cleaning::clip_upper_sigma;
//! use defect_analysis::io::load_csv;
//! use defect_analysis::ParetoTable;
//!
//! let mut df = load_csv(Path::new("manufacturing_defects.csv"))?;
//! let clip = clip_upper_sigma(&mut df, "defect_cost_pln", 3.0)?;
//! let pareto = ParetoTable::compute(&df)?;
//! ```

pub mod analysis;
pub mod charts;
pub mod cleaning;
pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod schema;
pub mod stats;
pub mod types;

// Re-exports for convenient access
pub use analysis::shift_share_pct;
pub use charts::ChartRenderer;
pub use config::{ConfigValidationError, ReportConfig, ReportConfigBuilder};
pub use error::{ReportError, Result as ReportResult, ResultExt};
pub use pipeline::{ReportPipeline, ReportStage};
pub use quality::QualityChecker;
pub use reporting::AnalysisReport;
pub use types::{
    ClipSummary, ColumnCount, ColumnDtype, Crosstab, Headlines, MachineRow, MachineTable,
    ParetoRow, ParetoTable, QualityReport, ShiftRow, ShiftTable, TimestampSummary,
};
