//! Chart Plotter Module
//! Interactive dashboard charts drawn with egui and egui_plot.

use super::palette;
use super::tiles::{self, GRID_COLUMNS, GRID_ROWS};
use crate::data::{CategoryTotals, StateTotal};
use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Plot};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Tiles without data
const EMPTY_TILE: Color32 = Color32::from_rgb(229, 236, 246);
const COLORBAR_STEPS: usize = 24;
/// Donut hole as a fraction of the outer radius.
pub const HOLE: f64 = 0.4;

/// One ring segment of the donut chart. Angles are radians clockwise from
/// twelve o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSlice {
    pub category: String,
    pub index: usize,
    pub value: f64,
    pub fraction: f64,
    pub start: f64,
    pub end: f64,
}

/// Split category totals into donut slices. Non-positive totals get no slice.
pub fn donut_slices(breakdown: &CategoryTotals) -> Vec<DonutSlice> {
    let positive: f64 = breakdown.iter().map(|(_, v)| v).filter(|v| *v > 0.0).sum();
    if positive <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    breakdown
        .iter()
        .enumerate()
        .filter(|(_, (_, value))| *value > 0.0)
        .map(|(index, (category, value))| {
            let fraction = value / positive;
            let end = start + fraction * TAU;
            let slice = DonutSlice {
                category: category.to_string(),
                index,
                value,
                fraction,
                start,
                end,
            };
            start = end;
            slice
        })
        .collect()
}

/// Point on a circle at a clockwise-from-top angle, in screen coordinates.
pub fn ring_point(center: (f64, f64), radius: f64, angle: f64) -> (f64, f64) {
    let a = angle - FRAC_PI_2;
    (center.0 + radius * a.cos(), center.1 + radius * a.sin())
}

/// Codes that have no tile on the map.
pub fn unplaced_codes(totals: &[StateTotal]) -> Vec<String> {
    totals
        .iter()
        .filter(|t| tiles::tile_position(&t.code).is_none())
        .map(|t| t.code.clone())
        .collect()
}

pub fn to_color32((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Tile-grid choropleth of total exports with a colour bar.
    pub fn draw_choropleth(ui: &mut egui::Ui, totals: &[StateTotal], height: f32) {
        let width = ui.available_width();
        let colorbar_width = 90.0;
        let tile = ((width - colorbar_width) / GRID_COLUMNS as f32)
            .min(height / GRID_ROWS as f32)
            .max(8.0);
        let map_size = Vec2::new(tile * GRID_COLUMNS as f32, tile * GRID_ROWS as f32);

        let (response, painter) =
            ui.allocate_painter(Vec2::new(map_size.x + colorbar_width, map_size.y), Sense::hover());
        let origin = response.rect.min;

        let (min, max) =
            palette::value_range(totals.iter().map(|t| t.total_exports)).unwrap_or((0.0, 1.0));
        let text_color = ui.visuals().text_color();
        let gap = (tile * 0.06).max(1.0);

        let tile_rect = |col: usize, row: usize| {
            Rect::from_min_size(
                origin + Vec2::new(col as f32 * tile + gap, row as f32 * tile + gap),
                Vec2::splat(tile - 2.0 * gap),
            )
        };

        // Grey base layer so states without data still show on the grid
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLUMNS {
                if tiles::code_at(col, row).is_some() {
                    painter.rect_filled(tile_rect(col, row), 3.0, EMPTY_TILE);
                }
            }
        }

        let mut hovered: Option<&StateTotal> = None;
        for total in totals {
            let Some((col, row)) = tiles::tile_position(&total.code) else {
                continue;
            };
            let rect = tile_rect(col, row);
            let fill = to_color32(palette::magenta(total.total_exports, min, max));
            painter.rect_filled(rect, 3.0, fill);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                &total.code,
                FontId::proportional((tile * 0.3).clamp(8.0, 16.0)),
                Color32::from_gray(30),
            );

            if response.hover_pos().is_some_and(|pos| rect.contains(pos)) {
                painter.rect_stroke(rect, 3.0, Stroke::new(2.0, text_color));
                hovered = Some(total);
            }
        }

        Self::draw_colorbar(
            &painter,
            Rect::from_min_size(
                origin + Vec2::new(map_size.x + 20.0, tile * 0.5),
                Vec2::new(18.0, map_size.y - tile),
            ),
            min,
            max,
            text_color,
        );

        if let Some(total) = hovered {
            response.on_hover_text_at_pointer(format!(
                "{}\ntotal exports: {:.1}",
                total.state, total.total_exports
            ));
        }
    }

    fn draw_colorbar(painter: &egui::Painter, rect: Rect, min: f64, max: f64, text_color: Color32) {
        let step_h = rect.height() / COLORBAR_STEPS as f32;
        for i in 0..COLORBAR_STEPS {
            // top of the bar is the maximum
            let t = 1.0 - (i as f64 + 0.5) / COLORBAR_STEPS as f64;
            let value = min + t * (max - min);
            let step = Rect::from_min_size(
                Pos2::new(rect.min.x, rect.min.y + i as f32 * step_h),
                Vec2::new(rect.width(), step_h + 0.5),
            );
            painter.rect_filled(step, 0.0, to_color32(palette::magenta(value, min, max)));
        }

        let font = FontId::proportional(11.0);
        painter.text(
            Pos2::new(rect.min.x, rect.min.y - 6.0),
            Align2::LEFT_BOTTOM,
            "Total Exports",
            font.clone(),
            text_color,
        );
        painter.text(
            Pos2::new(rect.max.x + 4.0, rect.min.y),
            Align2::LEFT_TOP,
            format!("{:.0}", max),
            font.clone(),
            text_color,
        );
        painter.text(
            Pos2::new(rect.max.x + 4.0, rect.max.y),
            Align2::LEFT_BOTTOM,
            format!("{:.0}", min),
            font,
            text_color,
        );
    }

    /// Bar chart of total exports by state code.
    pub fn draw_bar_chart(ui: &mut egui::Ui, totals: &[StateTotal], height: f32) {
        let (min, max) =
            palette::value_range(totals.iter().map(|t| t.total_exports)).unwrap_or((0.0, 1.0));

        let bars: Vec<Bar> = totals
            .iter()
            .enumerate()
            .map(|(i, t)| {
                Bar::new(i as f64, t.total_exports)
                    .name(&t.state)
                    .width(0.7)
                    .fill(to_color32(palette::magenta(t.total_exports, min, max)))
            })
            .collect();

        let x_labels: Vec<String> = totals.iter().map(|t| t.code.clone()).collect();

        Plot::new("total_exports_bars")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("State")
            .y_axis_label("Total Exports")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                x_labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                let chart = BarChart::new(bars).element_formatter(Box::new(
                    |bar: &Bar, _chart: &BarChart| {
                        format!("{}\nTotal Exports: {:.1}", bar.name, bar.value)
                    },
                ));
                plot_ui.bar_chart(chart);
            });
    }

    /// Donut chart of category totals with a legend.
    pub fn draw_donut_chart(ui: &mut egui::Ui, breakdown: &CategoryTotals, height: f32) {
        let slices = donut_slices(breakdown);

        ui.horizontal(|ui| {
            let size = height.min(ui.available_width() * 0.6).max(60.0);
            let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
            let center = response.rect.center();
            let outer = (size * 0.5 - 4.0) as f64;
            let inner = outer * HOLE;
            let c = (center.x as f64, center.y as f64);

            if slices.is_empty() {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    "No exports",
                    FontId::proportional(14.0),
                    ui.visuals().weak_text_color(),
                );
            }

            for slice in &slices {
                let fill = to_color32(palette::category(slice.index));
                let steps = (((slice.end - slice.start) / 0.05).ceil() as usize).max(1);
                let step = (slice.end - slice.start) / steps as f64;
                for s in 0..steps {
                    let a0 = slice.start + s as f64 * step;
                    let a1 = a0 + step;
                    let points = [
                        ring_point(c, outer, a0),
                        ring_point(c, outer, a1),
                        ring_point(c, inner, a1),
                        ring_point(c, inner, a0),
                    ]
                    .iter()
                    .map(|&(x, y)| Pos2::new(x as f32, y as f32))
                    .collect();
                    painter.add(Shape::convex_polygon(points, fill, Stroke::NONE));
                }
            }

            let hovered = response.hover_pos().and_then(|pos| {
                let (dx, dy) = (pos.x as f64 - c.0, pos.y as f64 - c.1);
                let r = dx.hypot(dy);
                if r < inner || r > outer {
                    return None;
                }
                let angle = (dy.atan2(dx) + FRAC_PI_2).rem_euclid(TAU);
                slices.iter().find(|s| angle >= s.start && angle < s.end)
            });
            if let Some(slice) = hovered {
                response.on_hover_text_at_pointer(format!(
                    "{}\nexport: {:.1} ({:.1}%)",
                    slice.category,
                    slice.value,
                    slice.fraction * 100.0
                ));
            }

            ui.add_space(12.0);
            Self::draw_category_legend(ui, breakdown);
        });
    }

    fn draw_category_legend(ui: &mut egui::Ui, breakdown: &CategoryTotals) {
        ui.vertical(|ui| {
            ui.label(RichText::new("Export Categories").size(13.0).strong());
            ui.add_space(4.0);
            for (index, (category, value)) in breakdown.iter().enumerate() {
                ui.horizontal(|ui| {
                    let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                    ui.painter()
                        .rect_filled(rect, 2.0, to_color32(palette::category(index)));
                    ui.label(RichText::new(format!("{} ({:.1})", category, value)).size(12.0));
                });
            }
        });
    }
}
