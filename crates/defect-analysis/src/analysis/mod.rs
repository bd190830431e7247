//! Descriptive analyses over the cleaned dataset.
//!
//! Each analysis is a read-only view computed straight from the
//! `DataFrame`:
//!
//! - [`ParetoTable`](crate::types::ParetoTable): cost per defect type with
//!   cumulative share
//! - [`ShiftTable`](crate::types::ShiftTable) and [`shift_share_pct`]
//! - [`MachineTable`](crate::types::MachineTable) and
//!   [`Crosstab`](crate::types::Crosstab) of machine × shift
//! - [`Headlines`](crate::types::Headlines): the closing summary figures

mod headlines;
mod machines;
mod pareto;
mod shifts;

pub use shifts::shift_share_pct;
