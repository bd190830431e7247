//! Pareto cost concentration by defect type.

use crate::error::Result;
use crate::schema::{DEFECT_TYPE, cost_values, string_values};
use crate::stats::percentage;
use crate::types::{ParetoRow, ParetoTable};
use polars::prelude::*;
use std::collections::BTreeMap;

impl ParetoTable {
    /// Sum cost per defect type and rank the types by descending total.
    ///
    /// Rows without a defect type are dropped, null costs add nothing. Equal
    /// totals are ordered by defect type name. When the overall total is zero
    /// every cumulative share is 0%.
    pub fn compute(df: &DataFrame) -> Result<Self> {
        let defect_types = string_values(df, DEFECT_TYPE)?;
        let costs = cost_values(df)?;

        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for (defect_type, cost) in defect_types.into_iter().zip(costs) {
            if let Some(defect_type) = defect_type {
                *totals.entry(defect_type).or_insert(0.0) += cost.unwrap_or(0.0);
            }
        }

        let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let total_cost: f64 = ranked.iter().map(|(_, cost)| cost).sum();
        let mut running = 0.0;
        let rows = ranked
            .into_iter()
            .map(|(defect_type, total)| {
                running += total;
                ParetoRow {
                    defect_type,
                    total_cost: total,
                    cumulative_pct: percentage(running, total_cost),
                }
            })
            .collect();

        Ok(Self { rows, total_cost })
    }

    /// Cumulative share of the `n` costliest defect types, in percent.
    ///
    /// Asking for more types than exist gives the share of all of them.
    pub fn top_n_cumulative_pct(&self, n: usize) -> f64 {
        let take = n.min(self.rows.len());
        if take == 0 {
            return 0.0;
        }
        self.rows[take - 1].cumulative_pct
    }
}
