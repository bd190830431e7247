//! Plain-text rendering of an [`AnalysisReport`].

use super::AnalysisReport;
use crate::config::OUTLIER_SIGMA;
use crate::stats::round_to;
use std::fmt;

const RULE_WIDTH: usize = 60;

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

impl AnalysisReport {
    fn write_overview(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Manufacturing Quality Analysis")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            f,
            "Original dataset: {} rows, {} columns ({})",
            self.quality.rows, self.quality.columns, self.input_file
        )?;
        writeln!(f)?;
        writeln!(f, "First rows:")?;
        writeln!(f, "{}", self.quality.preview)
    }

    fn write_quality(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "DATA QUALITY CHECK")?;
        writeln!(f, "Missing values:")?;
        for missing in &self.quality.missing_values {
            writeln!(f, "  {:<20} {:>8}", truncate_str(&missing.column, 20), missing.count)?;
        }
        writeln!(f)?;
        writeln!(f, "Duplicate rows: {}", self.quality.duplicate_rows)?;
        writeln!(f)?;
        writeln!(f, "Data types:")?;
        for dtype in &self.quality.dtypes {
            writeln!(f, "  {:<20} {}", truncate_str(&dtype.column, 20), dtype.dtype)?;
        }
        Ok(())
    }

    fn write_cleaning(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "DATA CLEANING")?;
        writeln!(
            f,
            "Timestamps parsed: {} ({} unparseable)",
            self.timestamps.parsed, self.timestamps.unparsed
        )?;
        writeln!(
            f,
            "Outliers clipped: {} -> 0 (upper bound {:.2} PLN = {:.2} + {} x {:.2})",
            self.clipping.outliers_clipped,
            self.clipping.upper_bound,
            self.clipping.mean,
            OUTLIER_SIGMA,
            self.clipping.std
        )?;
        writeln!(
            f,
            "Shape after cleaning: ({}, {})",
            self.clipping.shape_after.0, self.clipping.shape_after.1
        )
    }

    fn write_pareto(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "PARETO ANALYSIS")?;
        writeln!(f, "{:<24} {:>14} {:>12}", "Defect type", "Total cost", "Cumulative %")?;
        writeln!(f, "{}", "-".repeat(52))?;
        for row in &self.pareto.rows {
            writeln!(
                f,
                "{:<24} {:>14.2} {:>12.1}",
                truncate_str(&row.defect_type, 24),
                row.total_cost,
                row.cumulative_pct
            )?;
        }
        Ok(())
    }

    fn write_shifts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "SHIFT ANALYSIS")?;
        writeln!(f, "{:<12} {:>8} {:>12} {:>14}", "Shift", "Count", "Mean cost", "Total cost")?;
        writeln!(f, "{}", "-".repeat(49))?;
        for row in &self.shifts.rows {
            writeln!(
                f,
                "{:<12} {:>8} {:>12.2} {:>14.2}",
                truncate_str(&row.shift, 12),
                row.count,
                round_to(row.mean_cost, 2),
                round_to(row.total_cost, 2)
            )?;
        }
        writeln!(f)?;
        let focus = &self.headlines.focus_shift;
        let count = self.shifts.get(focus).map_or(0, |row| row.count);
        writeln!(
            f,
            "{} shift: {:.1}% of defects ({} recorded)",
            focus, self.shift_share_pct, count
        )
    }

    fn write_machines(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "MACHINE ANALYSIS")?;
        writeln!(f, "{:<12} {:>8} {:>12}", "Machine", "Count", "Mean cost")?;
        writeln!(f, "{}", "-".repeat(34))?;
        for row in &self.machines.rows {
            writeln!(
                f,
                "{:<12} {:>8} {:>12.2}",
                truncate_str(&row.machine_id, 12),
                row.count,
                round_to(row.mean_cost, 2)
            )?;
        }
        writeln!(f)?;

        let crosstab = &self.machine_shift_crosstab;
        writeln!(f, "Shift share by machine (%):")?;
        write!(f, "{:<12}", "")?;
        for column in &crosstab.column_labels {
            write!(f, " {:>10}", truncate_str(column, 10))?;
        }
        writeln!(f)?;
        for (label, row) in crosstab.row_labels.iter().zip(&crosstab.values) {
            write!(f, "{:<12}", truncate_str(label, 12))?;
            for value in row {
                write!(f, " {:>10.1}", value)?;
            }
            writeln!(f)?;
        }

        let machine = &self.headlines.machine_id;
        let shift = &self.headlines.focus_shift;
        if let Some(share) = crosstab.get(machine, shift) {
            writeln!(f)?;
            writeln!(f, "{} on {} shift: {:.1}% of its defects", machine, shift, share)?;
        }
        Ok(())
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headlines = &self.headlines;
        heading(f, "SUMMARY")?;
        writeln!(
            f,
            "- {} shift: {:.1}% of all defects",
            headlines.focus_shift, headlines.shift_pct
        )?;
        writeln!(
            f,
            "- Top {} defect types cover: {:.1}% of total cost",
            headlines.top_n, headlines.top_n_cumulative_pct
        )?;
        writeln!(
            f,
            "- Machine {}: {:.0} PLN mean cost per defect{}",
            headlines.machine_id,
            headlines.machine_mean_cost,
            if headlines.machine_is_highest { " (highest)" } else { "" }
        )?;
        writeln!(f, "- File: {}", self.cleaned_file)?;
        for chart in &self.charts {
            writeln!(f, "- Chart: {}", chart)?;
        }
        Ok(())
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_overview(f)?;
        self.write_quality(f)?;
        self.write_cleaning(f)?;
        self.write_pareto(f)?;
        self.write_shifts(f)?;
        self.write_machines(f)?;
        self.write_summary(f)
    }
}
