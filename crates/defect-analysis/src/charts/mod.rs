//! Static SVG charts for the report.
//!
//! Categorical axes use segmented integer coordinates: category `i` occupies
//! the segment starting at `i`, and its label is drawn at the segment centre.

mod palette;

pub use palette::{viridis, yellow_orange_red};

use crate::error::Result;
use crate::types::{Crosstab, ParetoTable, ShiftTable};
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub const PARETO_FILE: &str = "pareto_defect_costs.svg";
pub const SHIFT_FILE: &str = "defects_by_shift.svg";
pub const HEATMAP_FILE: &str = "machine_shift_heatmap.svg";

const FONT: &str = "sans-serif";

/// Label for a category segment; empty everywhere but segment centres.
fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) if *i >= 0 => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        _ => String::new(),
    }
}

/// Writes charts into one output directory.
pub struct ChartRenderer {
    output_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn prepare(&self, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.join(file_name))
    }

    /// Render the three report charts and return their paths.
    pub fn render_all(
        &self,
        pareto: &ParetoTable,
        top_n: usize,
        shifts: &ShiftTable,
        crosstab: &Crosstab,
    ) -> Result<Vec<PathBuf>> {
        Ok(vec![
            self.pareto_chart(pareto, top_n)?,
            self.shift_count_chart(shifts)?,
            self.heatmap_chart(crosstab)?,
        ])
    }

    /// Bars of total cost per defect type over a cumulative-share panel.
    ///
    /// The reference line sits at the computed share of the `top_n` costliest
    /// types.
    pub fn pareto_chart(&self, table: &ParetoTable, top_n: usize) -> Result<PathBuf> {
        let path = self.prepare(PARETO_FILE)?;
        let labels: Vec<String> = table.rows.iter().map(|r| r.defect_type.clone()).collect();
        let n = labels.len().max(1) as i32;
        let reference_pct = table.top_n_cumulative_pct(top_n);

        let max_cost = table.rows.iter().map(|r| r.total_cost).fold(0.0, f64::max);
        let y_top = if max_cost > 0.0 { max_cost * 1.1 } else { 1.0 };

        {
            let root = SVGBackend::new(&path, (1200, 800)).into_drawing_area();
            root.fill(&WHITE)?;
            let (upper, lower) = root.split_vertically(460);

            let mut bars = ChartBuilder::on(&upper)
                .caption(
                    format!(
                        "Pareto Analysis: Defect Cost by Type (top {} = {:.1}%)",
                        top_n, reference_pct
                    ),
                    (FONT, 26),
                )
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(90)
                .build_cartesian_2d((0..n).into_segmented(), 0f64..y_top)?;

            bars.configure_mesh()
                .disable_x_mesh()
                .x_labels(n as usize + 1)
                .x_label_formatter(&|v| segment_label(&labels, v))
                .x_desc("Defect Type")
                .y_desc("Total Cost (PLN)")
                .draw()?;

            bars.draw_series(table.rows.iter().enumerate().map(|(i, row)| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), row.total_cost),
                    ],
                    palette::BAR_BLUE.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))?;

            let mut cumulative = ChartBuilder::on(&lower)
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(90)
                .build_cartesian_2d((0..n).into_segmented(), 0f64..105f64)?;

            cumulative
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n as usize + 1)
                .x_label_formatter(&|v| segment_label(&labels, v))
                .y_desc("Cumulative %")
                .draw()?;

            let points: Vec<(SegmentValue<i32>, f64)> = table
                .rows
                .iter()
                .enumerate()
                .map(|(i, row)| (SegmentValue::CenterOf(i as i32), row.cumulative_pct))
                .collect();

            cumulative
                .draw_series(LineSeries::new(points.clone(), &RED))?
                .label("Cumulative cost share")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
            cumulative.draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, 4, RED.filled())),
            )?;

            cumulative
                .draw_series(LineSeries::new(
                    vec![
                        (SegmentValue::Exact(0), reference_pct),
                        (SegmentValue::Exact(n), reference_pct),
                    ],
                    BLACK.stroke_width(2),
                ))?
                .label(format!("Pareto {:.1}% (top {})", reference_pct, top_n))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));

            cumulative
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;

            root.present()?;
        }

        info!("Pareto chart saved to {}", path.display());
        Ok(path)
    }

    /// One bar per shift with the number of defects.
    pub fn shift_count_chart(&self, table: &ShiftTable) -> Result<PathBuf> {
        let path = self.prepare(SHIFT_FILE)?;
        let labels: Vec<String> = table.rows.iter().map(|r| r.shift.clone()).collect();
        let n = labels.len().max(1) as i32;
        let max_count = table.rows.iter().map(|r| r.count).max().unwrap_or(0);
        let y_top = (max_count as f64 * 1.15).max(1.0);

        {
            let root = SVGBackend::new(&path, (900, 600)).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Defects by Shift", (FONT, 26))
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(70)
                .build_cartesian_2d((0..n).into_segmented(), 0f64..y_top)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n as usize + 1)
                .x_label_formatter(&|v| segment_label(&labels, v))
                .x_desc("Shift")
                .y_desc("Number of defects")
                .draw()?;

            let colors = table.rows.len();
            chart.draw_series(table.rows.iter().enumerate().map(|(i, row)| {
                let x = i as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(x), 0.0),
                        (SegmentValue::Exact(x + 1), row.count as f64),
                    ],
                    palette::viridis_step(i, colors).filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            }))?;

            chart.draw_series(table.rows.iter().enumerate().map(|(i, row)| {
                EmptyElement::at((SegmentValue::CenterOf(i as i32), row.count as f64))
                    + Text::new(row.count.to_string(), (-8, -20), (FONT, 16).into_font())
            }))?;

            root.present()?;
        }

        info!("Shift chart saved to {}", path.display());
        Ok(path)
    }

    /// Machine × shift shares, annotated with one decimal.
    pub fn heatmap_chart(&self, crosstab: &Crosstab) -> Result<PathBuf> {
        let path = self.prepare(HEATMAP_FILE)?;
        // first machine at the top
        let row_labels: Vec<String> = crosstab.row_labels.iter().rev().cloned().collect();
        let column_labels = crosstab.column_labels.clone();
        let rows = row_labels.len();
        let columns = column_labels.len().max(1) as i32;

        {
            let root = SVGBackend::new(&path, (1000, 600)).into_drawing_area();
            root.fill(&WHITE)?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Shift Share by Machine (%)", (FONT, 26))
                .margin(15)
                .x_label_area_size(50)
                .y_label_area_size(90)
                .build_cartesian_2d(
                    (0..columns).into_segmented(),
                    (0..rows.max(1) as i32).into_segmented(),
                )?;

            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(columns as usize + 1)
                .y_labels(rows + 1)
                .x_label_formatter(&|v| segment_label(&column_labels, v))
                .y_label_formatter(&|v| segment_label(&row_labels, v))
                .x_desc("Shift")
                .y_desc("Machine ID")
                .draw()?;

            let cells: Vec<(i32, i32, f64)> = crosstab
                .values
                .iter()
                .enumerate()
                .flat_map(|(r, row)| {
                    let y = (rows - 1 - r) as i32;
                    row.iter()
                        .enumerate()
                        .map(move |(c, value)| (c as i32, y, *value))
                })
                .collect();

            chart.draw_series(cells.iter().map(|&(x, y, value)| {
                Rectangle::new(
                    [
                        (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                        (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                    ],
                    yellow_orange_red(value / 100.0).filled(),
                )
            }))?;

            chart.draw_series(cells.iter().map(|&(x, y, value)| {
                let ink = if value > 60.0 { WHITE } else { BLACK };
                EmptyElement::at((SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)))
                    + Text::new(
                        format!("{:.1}", value),
                        (-14, -8),
                        (FONT, 16).into_font().color(&ink),
                    )
            }))?;

            root.present()?;
        }

        info!("Heatmap saved to {}", path.display());
        Ok(path)
    }
}
