//! Charts module - Chart rendering

mod palette;
mod plotter;
mod renderer;
mod tiles;

pub use plotter::{donut_slices, unplaced_codes, ChartPlotter, DonutSlice};
pub use renderer::StaticChartRenderer;
