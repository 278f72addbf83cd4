//! Dashboard Main Application
//! Main window with the state filter panel and the chart viewer.

use crate::charts::{unplaced_codes, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::dashboard::{self, DashboardView};
use crate::data::{DataLoader, StateSelection};
use crate::gui::{ChartViewer, ChartViewerAction, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use polars::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{error, info, warn};

const EXPORT_SIZE: (u32, u32) = (1200, 800);

/// CSV loading result from background thread
enum LoadResult {
    Complete(DataFrame),
    Error(String),
}

/// Main application window.
pub struct ExportsApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    raw: Option<DataFrame>,
    view: Option<DashboardView>,
    message: String,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ExportsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            raw: None,
            view: None,
            message: String::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading(&config);
        app
    }

    /// Fetch the CSV on a background thread
    fn start_loading(&mut self, config: &DashboardConfig) {
        let source = config.data_source();
        let loader = DataLoader::new(config.http_timeout());

        self.message = format!("Loading {}...", source);
        self.control_panel.set_status("Loading data...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match loader.load(&source) {
                Ok(df) => LoadResult::Complete(df),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(df)) => {
                self.is_loading = false;
                self.raw = Some(df);
                self.refresh_view();
                match self.view.as_ref().map(|view| view.map.states()) {
                    Some(Ok(states)) => {
                        let count = states.len();
                        self.control_panel.update_states(states);
                        self.control_panel
                            .set_status(&format!("Loaded {} states", count));
                    }
                    Some(Err(e)) => self.fail(&e.to_string()),
                    None => {}
                }
            }
            Ok(LoadResult::Error(e)) => {
                self.is_loading = false;
                self.fail(&e);
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => self.load_rx = Some(rx),
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.is_loading = false;
                self.fail("loader thread exited without a result");
            }
        }
    }

    /// Re-run the whole pipeline for the current selection
    fn refresh_view(&mut self) {
        let Some(raw) = &self.raw else {
            return;
        };

        match dashboard::render(raw, &self.control_panel.selection) {
            Ok(view) => {
                if let Err(e) = self.chart_viewer.set_view(&view) {
                    self.fail(&e.to_string());
                    return;
                }
                if self.control_panel.selection.is_empty() {
                    if let Ok(totals) = view.map.state_totals() {
                        for code in unplaced_codes(&totals) {
                            warn!(%code, "state code has no map tile");
                        }
                    }
                }
                self.view = Some(view);
            }
            Err(e) => self.fail(&e.to_string()),
        }
    }

    fn fail(&mut self, reason: &str) {
        error!(%reason, "dashboard unavailable");
        self.view = None;
        self.chart_viewer.clear();
        self.message = format!("Error: {}", reason);
        self.control_panel.set_status(&format!("Error: {}", reason));
    }

    fn handle_export(&mut self, action: ChartViewerAction) {
        let Some(view) = &self.view else {
            return;
        };

        let (file_name, title) = match action {
            ChartViewerAction::ExportBars => (
                "total_exports.png",
                format!("Total Exports - {}", view.subtitle),
            ),
            ChartViewerAction::ExportBreakdown => (
                "categories_breakdown.png",
                format!("Categories Breakdown - {}", view.subtitle),
            ),
            ChartViewerAction::None => return,
        };

        let Some(path) = Self::pick_png_path(file_name) else {
            return; // User cancelled
        };

        let result = match action {
            ChartViewerAction::ExportBars => StaticChartRenderer::render_bar_chart(
                self.chart_viewer.bar_totals(),
                &title,
                &path,
                EXPORT_SIZE,
            ),
            _ => StaticChartRenderer::render_donut_chart(
                &view.breakdown,
                &title,
                &path,
                EXPORT_SIZE,
            ),
        };

        match result {
            Ok(()) => {
                info!(path = %path.display(), "exported chart");
                self.control_panel
                    .set_status(&format!("Exported {}", path.display()));
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "chart export failed");
                self.control_panel
                    .set_status(&format!("Error: export failed: {}", e));
            }
        }
    }

    fn pick_png_path(file_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(file_name)
            .save_file()
    }

    pub fn selection(&self) -> &StateSelection {
        &self.control_panel.selection
    }
}

impl eframe::App for ExportsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                if self.control_panel.show(ui) == ControlPanelAction::SelectionChanged {
                    info!(selection = %self.selection().label(), "state selection changed");
                    self.refresh_view();
                }
            });

        // Central panel - Chart Viewer
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                self.chart_viewer
                    .show(ui, self.view.as_ref(), &self.message)
            })
            .inner;

        if action != ChartViewerAction::None {
            self.handle_export(action);
        }
    }
}
