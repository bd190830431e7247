use crate::config::ReportConfig;
use crate::error::{ReportError, Result};
use crate::types::{Headlines, MachineTable, ParetoTable};
use polars::prelude::*;

use super::shift_share_pct;

impl Headlines {
    /// Recompute the closing figures from `df`.
    ///
    /// Nothing is carried over from earlier stages, so the figures always
    /// describe the dataset as exported. The focus machine is the configured
    /// one, or else the machine with the highest mean cost.
    pub fn compute(df: &DataFrame, config: &ReportConfig) -> Result<Self> {
        let shift_pct = shift_share_pct(df, &config.focus_shift)?;

        let pareto = ParetoTable::compute(df)?;
        let top_n_cumulative_pct = pareto.top_n_cumulative_pct(config.top_n);

        let machines = MachineTable::compute(df)?;
        let highest = machines
            .highest_mean_cost()
            .ok_or_else(|| ReportError::EmptyDataset("no machine has any defect".to_string()))?;

        let machine_id = config
            .focus_machine
            .clone()
            .unwrap_or_else(|| highest.machine_id.clone());
        let machine_mean_cost = machines.mean_cost_for(&machine_id)?;
        let machine_is_highest = machine_mean_cost >= highest.mean_cost;

        Ok(Self {
            focus_shift: config.focus_shift.clone(),
            shift_pct,
            top_n: config.top_n,
            top_n_cumulative_pct,
            machine_id,
            machine_mean_cost,
            machine_is_highest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{COST, DEFECT_ID, DEFECT_TYPE, MACHINE_ID, SHIFT};

    fn defects() -> DataFrame {
        df![
            DEFECT_ID => ["D1", "D2", "D3", "D4"],
            DEFECT_TYPE => ["Crack", "Crack", "Dent", "Scratch"],
            COST => [500.0, 300.0, 150.0, 50.0],
            SHIFT => ["Night", "Morning", "Night", "Afternoon"],
            MACHINE_ID => ["M001", "M002", "M002", "M001"],
        ]
        .unwrap()
    }

    #[test]
    fn test_defaults_pick_highest_machine() {
        let headlines = Headlines::compute(&defects(), &ReportConfig::default()).unwrap();
        assert_eq!(headlines.shift_pct, 50.0);
        assert_eq!(headlines.top_n, 3);
        assert!((headlines.top_n_cumulative_pct - 100.0).abs() < 1e-9);
        assert_eq!(headlines.machine_id, "M001");
        assert_eq!(headlines.machine_mean_cost, 275.0);
        assert!(headlines.machine_is_highest);
    }

    #[test]
    fn test_focus_machine_not_highest() {
        let config = ReportConfig::builder()
            .focus_machine("M002")
            .top_n(1)
            .build()
            .unwrap();
        let headlines = Headlines::compute(&defects(), &config).unwrap();
        assert_eq!(headlines.machine_mean_cost, 225.0);
        assert!(!headlines.machine_is_highest);
        assert!((headlines.top_n_cumulative_pct - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_focus_machine_fails() {
        let config = ReportConfig::builder().focus_machine("M999").build().unwrap();
        let err = Headlines::compute(&defects(), &config).unwrap_err();
        assert_eq!(err.error_code(), "MACHINE_NOT_FOUND");
    }
}
