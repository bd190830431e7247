use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCount {
    pub column: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDtype {
    pub column: String,
    pub dtype: String,
}

/// Result of the data quality check. The dataset itself is not altered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub rows: usize,
    pub columns: usize,
    /// First rows rendered as a table, for console output only.
    #[serde(skip)]
    pub preview: String,
    pub missing_values: Vec<ColumnCount>,
    /// Rows identical to an earlier row.
    pub duplicate_rows: usize,
    pub dtypes: Vec<ColumnDtype>,
}

impl QualityReport {
    pub fn total_missing(&self) -> usize {
        self.missing_values.iter().map(|m| m.count).sum()
    }
}

/// Outcome of timestamp parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampSummary {
    pub parsed: usize,
    /// Values that were present but could not be parsed; now null.
    pub unparsed: usize,
}

/// Outcome of the mean + kσ cost clipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSummary {
    pub column: String,
    pub mean: f64,
    pub std: f64,
    pub upper_bound: f64,
    pub outliers_clipped: usize,
    pub shape_after: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoRow {
    pub defect_type: String,
    pub total_cost: f64,
    pub cumulative_pct: f64,
}

/// Defect types ordered by descending total cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoTable {
    pub rows: Vec<ParetoRow>,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRow {
    pub shift: String,
    /// Non-null defect identifiers.
    pub count: usize,
    pub mean_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTable {
    pub rows: Vec<ShiftRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRow {
    pub machine_id: String,
    /// Non-null costs.
    pub count: usize,
    pub mean_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineTable {
    pub rows: Vec<MachineRow>,
}

/// Machine × shift shares in percent; each row sums to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crosstab {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

/// The three figures closing the report, recomputed from the cleaned data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headlines {
    pub focus_shift: String,
    pub shift_pct: f64,
    pub top_n: usize,
    pub top_n_cumulative_pct: f64,
    pub machine_id: String,
    pub machine_mean_cost: f64,
    pub machine_is_highest: bool,
}
