//! US Agricultural Exports Dashboard
//!
//! Loads the 2011 US agricultural exports CSV and shows a state map, a bar
//! chart and a category breakdown, filtered by a sidebar state selection.

use ag_exports::config::DashboardConfig;
use ag_exports::gui::{ExportsApp, DASHBOARD_TITLE};
use anyhow::{anyhow, Context, Result};
use eframe::egui;
use std::io::stdout;
use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Install the tracing subscriber. `RUST_LOG` overrides the default `info` level.
fn start_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let subscriber = Registry::default().with(
        fmt::layer()
            .without_time()
            .with_writer(stdout)
            .with_filter(filter),
    );

    set_global_default(subscriber).context("unable to set global subscriber")?;
    Ok(())
}

fn main() -> Result<()> {
    start_logging()?;

    let config = DashboardConfig::new().context("failed to load dashboard configuration")?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(DASHBOARD_TITLE),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "US Agricultural Exports",
        options,
        Box::new(|cc| Ok(Box::new(ExportsApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
