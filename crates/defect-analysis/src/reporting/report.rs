use crate::error::Result;
use crate::types::{
    ClipSummary, Crosstab, Headlines, MachineTable, ParetoTable, QualityReport, ShiftTable,
    TimestampSummary,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything one run of the pipeline produced.
///
/// Serialized as-is for `--json` and `--emit-report`; its `Display` impl is
/// the console report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub input_file: String,
    pub cleaned_file: String,

    pub quality: QualityReport,
    pub timestamps: TimestampSummary,
    pub clipping: ClipSummary,

    pub pareto: ParetoTable,
    pub shifts: ShiftTable,
    /// Focus shift share computed during the shift analysis.
    pub shift_share_pct: f64,
    pub machines: MachineTable,
    pub machine_shift_crosstab: Crosstab,

    pub headlines: Headlines,

    /// Rendered chart files; empty when charts are disabled.
    pub charts: Vec<String>,
}

impl AnalysisReport {
    /// Write the report as pretty JSON to `<output_dir>/<base_name>_report.json`.
    pub fn write_to_file(&self, output_dir: &Path, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;

        let report_path = output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}
