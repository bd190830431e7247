//! Machine cost statistics and the machine × shift crosstab.

use crate::error::{ReportError, Result};
use crate::schema::{MACHINE_ID, cost_values, string_values};
use crate::stats::percentage;
use crate::types::{Crosstab, MachineRow, MachineTable};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

impl MachineTable {
    /// Per machine: number of non-null costs and their mean, in name order.
    pub fn compute(df: &DataFrame) -> Result<Self> {
        let machines = string_values(df, MACHINE_ID)?;
        let costs = cost_values(df)?;

        let mut groups: BTreeMap<String, (usize, f64)> = BTreeMap::new();
        for (machine, cost) in machines.into_iter().zip(costs) {
            let Some(machine) = machine else { continue };
            let entry = groups.entry(machine).or_insert((0, 0.0));
            if let Some(cost) = cost {
                entry.0 += 1;
                entry.1 += cost;
            }
        }

        let rows = groups
            .into_iter()
            .map(|(machine_id, (count, sum))| MachineRow {
                machine_id,
                count,
                mean_cost: if count == 0 { 0.0 } else { sum / count as f64 },
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn get(&self, machine_id: &str) -> Option<&MachineRow> {
        self.rows.iter().find(|row| row.machine_id == machine_id)
    }

    pub fn mean_cost_for(&self, machine_id: &str) -> Result<f64> {
        self.get(machine_id)
            .map(|row| row.mean_cost)
            .ok_or_else(|| ReportError::MachineNotFound(machine_id.to_string()))
    }

    /// The machine with the highest mean cost; the first by name on ties.
    pub fn highest_mean_cost(&self) -> Option<&MachineRow> {
        self.rows.iter().fold(None, |best: Option<&MachineRow>, row| match best {
            Some(current) if current.mean_cost >= row.mean_cost => Some(current),
            _ => Some(row),
        })
    }
}

impl Crosstab {
    /// Row-normalised frequency table of `row_column` × `column_column`.
    ///
    /// Only rows where both values are present are counted. Labels are sorted
    /// by name and each output row sums to 100.
    pub fn compute(df: &DataFrame, row_column: &str, column_column: &str) -> Result<Self> {
        let row_values = string_values(df, row_column)?;
        let column_values = string_values(df, column_column)?;

        let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
        let mut row_labels = BTreeSet::new();
        let mut column_labels = BTreeSet::new();
        for (row, column) in row_values.into_iter().zip(column_values) {
            if let (Some(row), Some(column)) = (row, column) {
                row_labels.insert(row.clone());
                column_labels.insert(column.clone());
                *counts.entry((row, column)).or_insert(0) += 1;
            }
        }

        let row_labels: Vec<String> = row_labels.into_iter().collect();
        let column_labels: Vec<String> = column_labels.into_iter().collect();

        let values = row_labels
            .iter()
            .map(|row| {
                let cells: Vec<usize> = column_labels
                    .iter()
                    .map(|column| {
                        counts
                            .get(&(row.clone(), column.clone()))
                            .copied()
                            .unwrap_or(0)
                    })
                    .collect();
                let row_total: usize = cells.iter().sum();
                cells
                    .into_iter()
                    .map(|count| percentage(count as f64, row_total as f64))
                    .collect()
            })
            .collect();

        Ok(Self {
            row_labels,
            column_labels,
            values,
        })
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|label| label == row)?;
        let c = self.column_labels.iter().position(|label| label == column)?;
        self.values.get(r)?.get(c).copied()
    }
}
