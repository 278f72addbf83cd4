//! Chart Viewer Widget
//! Central panel with the choropleth on top and the bar and donut charts
//! side by side below it.

use crate::charts::ChartPlotter;
use crate::dashboard::DashboardView;
use crate::data::StateTotal;
use egui::{Color32, RichText, ScrollArea};

/// Window title and dashboard heading.
pub const DASHBOARD_TITLE: &str = "US Agricultural Exports in 2011 in USD";

const MAP_HEIGHT: f32 = 400.0;
const CHART_HEIGHT: f32 = 320.0;

/// Scrollable dashboard area.
#[derive(Default)]
pub struct ChartViewer {
    map_totals: Vec<StateTotal>,
    bar_totals: Vec<StateTotal>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.map_totals.clear();
        self.bar_totals.clear();
    }

    /// Cache the per-state rows of a freshly rendered view.
    pub fn set_view(&mut self, view: &DashboardView) -> polars::prelude::PolarsResult<()> {
        self.map_totals = view.map.state_totals()?;
        self.bar_totals = view.bars.state_totals()?;
        Ok(())
    }

    /// Draw the dashboard, or a placeholder message when there is no view
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        view: Option<&DashboardView>,
        message: &str,
    ) -> ChartViewerAction {
        let mut action = ChartViewerAction::None;

        let Some(view) = view else {
            ui.centered_and_justified(|ui| {
                let color = if message.contains("Error") {
                    Color32::from_rgb(220, 53, 69)
                } else {
                    ui.visuals().text_color()
                };
                ui.label(RichText::new(message).size(20.0).color(color));
            });
            return action;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(format!("🌱 {}", DASHBOARD_TITLE));
                ui.add_space(10.0);

                ui.label(
                    RichText::new("US Total Exports by State in Million USD")
                        .size(16.0)
                        .strong(),
                );
                ChartPlotter::draw_choropleth(ui, &self.map_totals, MAP_HEIGHT);
                ui.add_space(15.0);

                ui.columns(2, |columns| {
                    columns[0].horizontal(|ui| {
                        ui.label(
                            RichText::new(format!("Total Exports - {}", view.subtitle))
                                .size(16.0)
                                .strong(),
                        );
                        if ui.small_button("💾 PNG").clicked() {
                            action = ChartViewerAction::ExportBars;
                        }
                    });
                    ChartPlotter::draw_bar_chart(&mut columns[0], &self.bar_totals, CHART_HEIGHT);

                    columns[1].horizontal(|ui| {
                        ui.label(
                            RichText::new(format!("Categories Breakdown - {}", view.subtitle))
                                .size(16.0)
                                .strong(),
                        );
                        if ui.small_button("💾 PNG").clicked() {
                            action = ChartViewerAction::ExportBreakdown;
                        }
                    });
                    ChartPlotter::draw_donut_chart(&mut columns[1], &view.breakdown, CHART_HEIGHT);
                });
            });

        action
    }

    pub fn bar_totals(&self) -> &[StateTotal] {
        &self.bar_totals
    }
}

/// Actions triggered by chart viewer
#[derive(Debug, Clone, PartialEq)]
pub enum ChartViewerAction {
    None,
    ExportBars,
    ExportBreakdown,
}
