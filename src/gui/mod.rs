//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::ExportsApp;
pub use chart_viewer::{ChartViewer, ChartViewerAction, DASHBOARD_TITLE};
pub use control_panel::{ControlPanel, ControlPanelAction};
