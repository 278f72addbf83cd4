//! Dashboard pipeline: raw table and selection in, chart payloads out.
//!
//! Runs fresh on every selection change. Nothing is cached between calls.

use crate::data::{
    CategoryTotals, ExportProcessor, ProcessorError, StateSelection, WideExportTable,
};
use polars::prelude::DataFrame;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Dashboard unavailable: {0}")]
    Processor(#[from] ProcessorError),
}

/// Everything the chart layer needs for one frame of the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardView {
    /// Unfiltered wide table for the choropleth.
    pub map: WideExportTable,
    /// Filtered wide table, largest exporters first, for the bar chart.
    pub bars: WideExportTable,
    /// Category totals of the filtered states for the donut chart.
    pub breakdown: CategoryTotals,
    /// Selected state names joined for the chart headings.
    pub subtitle: String,
}

/// Build, reshape, filter and aggregate in one pass.
pub fn render(
    raw: &DataFrame,
    selection: &StateSelection,
) -> Result<DashboardView, DashboardError> {
    let wide = ExportProcessor::build(raw)?;
    let long = ExportProcessor::melt(&wide)?;
    let (filtered_wide, filtered_long) = ExportProcessor::filter(&wide, &long, selection)?;

    Ok(DashboardView {
        bars: ExportProcessor::sort_by_exports_descending(&filtered_wide)?,
        breakdown: ExportProcessor::aggregate_by_category(&filtered_long)?,
        subtitle: selection.label(),
        map: wide,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_raw;
    use crate::data::schema::CATEGORIES_WITH_MISC;

    #[test]
    fn unfiltered_view_covers_every_state() {
        let view = render(&sample_raw(), &StateSelection::new()).unwrap();

        assert_eq!(view.map.codes().unwrap(), ["AL", "CA", "IA", "TX"]);
        assert_eq!(view.bars.codes().unwrap(), ["CA", "TX", "AL", "IA"]);
        assert_eq!(view.breakdown.len(), CATEGORIES_WITH_MISC.len());
        assert!((view.breakdown.grand_total() - 540.5).abs() < 1e-9);
        assert_eq!(view.subtitle, "");
    }

    #[test]
    fn selection_filters_bars_and_breakdown_but_not_map() {
        let selection: StateSelection = ["Texas", "California"].into_iter().collect();
        let view = render(&sample_raw(), &selection).unwrap();

        assert_eq!(view.map.height(), 4);
        assert_eq!(view.bars.codes().unwrap(), ["CA", "TX"]);
        assert!((view.breakdown.grand_total() - 350.0).abs() < 1e-9);
        assert_eq!(view.subtitle, "Texas, California");
    }

    #[test]
    fn render_is_repeatable() {
        let raw = sample_raw();
        let selection: StateSelection = ["Iowa"].into_iter().collect();

        let first = render(&raw, &selection).unwrap();
        let second = render(&raw, &selection).unwrap();
        assert!(first.bars.dataframe().equals(second.bars.dataframe()));
        assert_eq!(first.breakdown, second.breakdown);
    }

    #[test]
    fn header_only_csv_renders_an_empty_dashboard() {
        let header = crate::data::fixtures::SAMPLE_CSV
            .lines()
            .next()
            .unwrap()
            .to_string();
        let raw =
            crate::data::DataLoader::parse_csv(format!("{}\n", header).into_bytes()).unwrap();

        let view = render(&raw, &StateSelection::new()).unwrap();
        assert!(view.map.is_empty());
        assert!(view.bars.is_empty());
        assert_eq!(view.breakdown.len(), CATEGORIES_WITH_MISC.len());
        assert_eq!(view.breakdown.grand_total(), 0.0);
    }

    #[test]
    fn schema_errors_surface_as_dashboard_errors() {
        let raw = sample_raw().drop("code").unwrap();
        let err = render(&raw, &StateSelection::new()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Processor(ProcessorError::SchemaMismatch(ref m)) if m.contains("code")
        ));
    }
}
