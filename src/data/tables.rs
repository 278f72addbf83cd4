//! Export Tables Module
//! DataFrame-backed wide and long export tables plus the category totals.

use super::schema::{CATEGORIES_WITH_MISC, CATEGORY, CODE, EXPORT, STATE, TOTAL_EXPORTS};
use polars::prelude::*;

/// One row per state: state, code, total exports, every category and `misc.`.
#[derive(Debug, Clone)]
pub struct WideExportTable {
    df: DataFrame,
}

/// One row per (state, category): state, code, category, export.
#[derive(Debug, Clone)]
pub struct LongExportTable {
    df: DataFrame,
}

/// Per-state total used by the map and the bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTotal {
    pub state: String,
    pub code: String,
    pub total_exports: f64,
}

/// Summed exports per category, in fixed category order with `misc.` last.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<(String, f64)>,
}

impl WideExportTable {
    pub(crate) fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn states(&self) -> PolarsResult<Vec<String>> {
        string_values(&self.df, STATE)
    }

    pub fn codes(&self) -> PolarsResult<Vec<String>> {
        string_values(&self.df, CODE)
    }

    /// Values of a numeric column (`total exports` or any category).
    pub fn values(&self, column: &str) -> PolarsResult<Vec<f64>> {
        float_values(&self.df, column)
    }

    pub fn state_totals(&self) -> PolarsResult<Vec<StateTotal>> {
        let states = self.states()?;
        let codes = self.codes()?;
        let totals = self.values(TOTAL_EXPORTS)?;

        Ok(states
            .into_iter()
            .zip(codes)
            .zip(totals)
            .map(|((state, code), total_exports)| StateTotal {
                state,
                code,
                total_exports,
            })
            .collect())
    }
}

impl LongExportTable {
    pub(crate) fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn states(&self) -> PolarsResult<Vec<String>> {
        string_values(&self.df, STATE)
    }

    pub fn codes(&self) -> PolarsResult<Vec<String>> {
        string_values(&self.df, CODE)
    }

    pub fn categories(&self) -> PolarsResult<Vec<String>> {
        string_values(&self.df, CATEGORY)
    }

    pub fn exports(&self) -> PolarsResult<Vec<f64>> {
        float_values(&self.df, EXPORT)
    }
}

impl CategoryTotals {
    /// Zeroed totals for every category.
    pub fn zeroed() -> Self {
        Self {
            entries: CATEGORIES_WITH_MISC
                .iter()
                .map(|c| (c.to_string(), 0.0))
                .collect(),
        }
    }

    /// Add to a known category. Returns false for unknown names.
    pub(crate) fn add(&mut self, category: &str, value: f64) -> bool {
        match self.entries.iter_mut().find(|(name, _)| name == category) {
            Some((_, total)) => {
                *total += value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, total)| *total)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, total)| (name.as_str(), *total))
    }

    /// Sum over all categories.
    pub fn grand_total(&self) -> f64 {
        self.entries.iter().map(|(_, total)| total).sum()
    }
}

/// Read a string column into owned values. Nulls become empty strings.
pub(crate) fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
    let column = df.column(name)?;
    let ca = column.as_materialized_series().str()?;
    Ok(ca
        .into_iter()
        .map(|v| v.map(str::to_string).unwrap_or_default())
        .collect())
}

/// Read a numeric column as f64. Nulls become NaN.
pub(crate) fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let ca = column.f64()?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}
