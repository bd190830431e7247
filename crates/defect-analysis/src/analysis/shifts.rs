//! Defect counts and costs per production shift.

use crate::error::{ReportError, Result};
use crate::schema::{DEFECT_ID, SHIFT, cost_values, string_values};
use crate::stats::percentage;
use crate::types::{ShiftRow, ShiftTable};
use polars::prelude::*;
use std::collections::BTreeMap;

#[derive(Default)]
struct ShiftAccumulator {
    count: usize,
    cost_sum: f64,
    cost_n: usize,
}

impl ShiftTable {
    /// Per shift: number of defect identifiers, mean and total cost.
    ///
    /// Shifts are listed in name order. Rows without a shift are dropped.
    pub fn compute(df: &DataFrame) -> Result<Self> {
        let ids = string_values(df, DEFECT_ID)?;
        let shifts = string_values(df, SHIFT)?;
        let costs = cost_values(df)?;

        let mut groups: BTreeMap<String, ShiftAccumulator> = BTreeMap::new();
        for ((id, shift), cost) in ids.into_iter().zip(shifts).zip(costs) {
            let Some(shift) = shift else { continue };
            let acc = groups.entry(shift).or_default();
            if id.is_some() {
                acc.count += 1;
            }
            if let Some(cost) = cost {
                acc.cost_sum += cost;
                acc.cost_n += 1;
            }
        }

        let rows = groups
            .into_iter()
            .map(|(shift, acc)| ShiftRow {
                shift,
                count: acc.count,
                mean_cost: if acc.cost_n == 0 {
                    0.0
                } else {
                    acc.cost_sum / acc.cost_n as f64
                },
                total_cost: acc.cost_sum,
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn get(&self, shift: &str) -> Option<&ShiftRow> {
        self.rows.iter().find(|row| row.shift == shift)
    }
}

/// Share of all rows, in percent, whose shift equals `shift`.
///
/// The denominator is every row of the dataset, including rows without a
/// shift value.
pub fn shift_share_pct(df: &DataFrame, shift: &str) -> Result<f64> {
    let shifts = string_values(df, SHIFT)?;
    if shifts.is_empty() {
        return Err(ReportError::EmptyDataset(format!(
            "cannot compute the share of shift '{}'",
            shift
        )));
    }

    let matching = shifts
        .iter()
        .filter(|value| value.as_deref() == Some(shift))
        .count();
    Ok(percentage(matching as f64, shifts.len() as f64))
}
