//! Report output.
//!
//! [`AnalysisReport`] collects the results of every pipeline stage. It can be:
//! - printed as the console report through its `Display` impl
//! - serialized to stdout (`--json` CLI flag)
//! - written to `<output_dir>/<input_stem>_report.json` (`--emit-report`)
//!
//! # Example
//!
//! ```rust,ignore
//! let report = ReportPipeline::new(config).run()?;
//! println!("{report}");
//! report.write_to_file(Path::new("out"), "manufacturing_defects")?;
//! ```

mod console;
mod report;

pub use report::AnalysisReport;
