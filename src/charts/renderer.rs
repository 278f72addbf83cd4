//! Static Chart Renderer
//! Writes the bar and donut charts to PNG files with plotters.
//!
//! Layout mirrors the interactive charts:
//! 1. Bar chart: state codes on the x axis, total exports on the y axis
//! 2. Donut chart: category ring on the left, legend on the right

use super::palette;
use super::plotter::{donut_slices, ring_point, HOLE};
use crate::data::{CategoryTotals, StateTotal};
use plotters::prelude::*;
use std::path::Path;

const TITLE_FONT: (&str, u32) = ("sans-serif", 26);
const LABEL_FONT: (&str, u32) = ("sans-serif", 16);

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the total exports bar chart to a PNG file.
    pub fn render_bar_chart(
        totals: &[StateTotal],
        title: &str,
        path: &Path,
        (width, height): (u32, u32),
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (min, max) =
            palette::value_range(totals.iter().map(|t| t.total_exports)).unwrap_or((0.0, 1.0));
        let y_top = if max > 0.0 { max * 1.1 } else { 1.0 };
        let y_bottom = min.min(0.0);
        let codes: Vec<String> = totals.iter().map(|t| t.code.clone()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(title, TITLE_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d((0..totals.len().max(1)).into_segmented(), y_bottom..y_top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("State")
            .y_desc("Total Exports")
            .x_labels(totals.len().max(1))
            .x_label_formatter(&|x: &SegmentValue<usize>| match x {
                SegmentValue::CenterOf(i) => codes.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .label_style(LABEL_FONT)
            .draw()?;

        chart.draw_series(totals.iter().enumerate().map(|(i, t)| {
            let color = rgb(palette::magenta(t.total_exports, min, max));
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), t.total_exports),
                ],
                color.filled(),
            )
        }))?;

        root.present()?;
        Ok(())
    }

    /// Render the category breakdown donut chart to a PNG file.
    pub fn render_donut_chart(
        breakdown: &CategoryTotals,
        title: &str,
        path: &Path,
        (width, height): (u32, u32),
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(title, TITLE_FONT)?;

        let (area_w, area_h) = area.dim_in_pixel();
        let outer = (area_w as f64 * 0.6).min(area_h as f64) * 0.45;
        let inner = outer * HOLE;
        let center = (area_w as f64 * 0.3 + 10.0, area_h as f64 * 0.5);

        for slice in donut_slices(breakdown) {
            let steps = (((slice.end - slice.start) / 0.02).ceil() as usize).max(1);
            let angle = |s: usize| slice.start + (slice.end - slice.start) * s as f64 / steps as f64;

            let mut points: Vec<(i32, i32)> = (0..=steps)
                .map(|s| ring_point(center, outer, angle(s)))
                .map(|(x, y)| (x.round() as i32, y.round() as i32))
                .collect();
            points.extend(
                (0..=steps)
                    .rev()
                    .map(|s| ring_point(center, inner, angle(s)))
                    .map(|(x, y)| (x.round() as i32, y.round() as i32)),
            );

            area.draw(&Polygon::new(
                points,
                rgb(palette::category(slice.index)).filled(),
            ))?;
        }

        let legend_x = (area_w as f64 * 0.62) as i32;
        let mut y = (area_h as f64 * 0.15) as i32;
        area.draw(&Text::new("Export Categories", (legend_x, y), LABEL_FONT))?;
        y += 30;
        for (index, (category, value)) in breakdown.iter().enumerate() {
            area.draw(&Rectangle::new(
                [(legend_x, y), (legend_x + 14, y + 14)],
                rgb(palette::category(index)).filled(),
            ))?;
            area.draw(&Text::new(
                format!("{} ({:.1})", category, value),
                (legend_x + 22, y),
                LABEL_FONT,
            ))?;
            y += 24;
        }

        root.present()?;
        Ok(())
    }
}
