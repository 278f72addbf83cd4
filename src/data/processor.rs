//! Export Processor Module
//! Builds the wide and long export tables and derives the filtered views.

use super::schema::{
    self, CATEGORIES, CATEGORIES_WITH_MISC, CATEGORY, CODE, EXPORT, MISC, RAW_CATEGORY, STATE,
    TOTAL_EXPORTS,
};
use super::selection::StateSelection;
use super::tables::{CategoryTotals, LongExportTable, WideExportTable};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Handles the export table transformations.
pub struct ExportProcessor;

impl ExportProcessor {
    /// Build the wide table from the raw CSV table.
    ///
    /// Drops `category`, renames the fruit and vegetable totals, derives
    /// `misc.` and sorts by code. Output columns: [state, code, total exports,
    /// beef, ..., cotton, misc.]
    pub fn build(raw: &DataFrame) -> Result<WideExportTable, ProcessorError> {
        Self::check_required_columns(raw)?;

        let mut df = raw.drop(RAW_CATEGORY)?;
        for (from, to) in schema::RENAMES {
            df.rename(from, to.into())?;
        }

        let states = Self::key_values(&df, STATE)?;
        let codes = Self::key_values(&df, CODE)?;
        Self::check_unique_codes(&codes)?;

        let totals = Self::numeric_values(&df, TOTAL_EXPORTS)?;
        let category_values = CATEGORIES
            .iter()
            .map(|category| Self::numeric_values(&df, category))
            .collect::<Result<Vec<_>, _>>()?;

        // misc. is recorded as-is, negative values included
        let misc: Vec<f64> = (0..df.height())
            .map(|i| totals[i] - category_values.iter().map(|values| values[i]).sum::<f64>())
            .collect();

        for (code, value) in codes.iter().zip(&misc) {
            if *value < 0.0 {
                debug!(code = %code, misc = value, "category sum exceeds total exports");
            }
        }

        let mut columns = vec![
            Column::new(STATE.into(), states),
            Column::new(CODE.into(), codes),
            Column::new(TOTAL_EXPORTS.into(), totals),
        ];
        for (category, values) in CATEGORIES.iter().zip(category_values) {
            columns.push(Column::new((*category).into(), values));
        }
        columns.push(Column::new(MISC.into(), misc));

        let wide = DataFrame::new(columns)?.sort(
            [CODE],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;

        debug!(rows = wide.height(), "built wide export table");
        Ok(WideExportTable::from_dataframe(wide))
    }

    /// Reshape the wide table to long format (melt).
    ///
    /// Output columns: [state, code, category, export], one row per state
    /// and category, states in wide order, categories in fixed order.
    pub fn melt(wide: &WideExportTable) -> Result<LongExportTable, ProcessorError> {
        let states = wide.states()?;
        let codes = wide.codes()?;
        let category_values = CATEGORIES_WITH_MISC
            .iter()
            .map(|category| wide.values(category))
            .collect::<PolarsResult<Vec<_>>>()?;

        let capacity = wide.height() * CATEGORIES_WITH_MISC.len();
        let mut long_states: Vec<String> = Vec::with_capacity(capacity);
        let mut long_codes: Vec<String> = Vec::with_capacity(capacity);
        let mut long_categories: Vec<String> = Vec::with_capacity(capacity);
        let mut exports: Vec<f64> = Vec::with_capacity(capacity);

        for (i, (state, code)) in states.iter().zip(&codes).enumerate() {
            for (category, values) in CATEGORIES_WITH_MISC.iter().zip(&category_values) {
                long_states.push(state.clone());
                long_codes.push(code.clone());
                long_categories.push(category.to_string());
                exports.push(values[i]);
            }
        }

        let df = DataFrame::new(vec![
            Column::new(STATE.into(), long_states),
            Column::new(CODE.into(), long_codes),
            Column::new(CATEGORY.into(), long_categories),
            Column::new(EXPORT.into(), exports),
        ])?;

        Ok(LongExportTable::from_dataframe(df))
    }

    /// Pivot a long table back to wide format.
    ///
    /// `total exports` is recovered as the sum over every category
    /// including `misc.`.
    pub fn widen(long: &LongExportTable) -> Result<WideExportTable, ProcessorError> {
        let states = long.states()?;
        let codes = long.codes()?;
        let categories = long.categories()?;
        let exports = long.exports()?;

        let mut order: Vec<(String, String)> = Vec::new();
        let mut cells: HashMap<(String, String), HashMap<String, f64>> = HashMap::new();

        for (((state, code), category), export) in
            states.into_iter().zip(codes).zip(categories).zip(exports)
        {
            let key = (state, code);
            if !cells.contains_key(&key) {
                order.push(key.clone());
            }
            cells.entry(key).or_default().insert(category, export);
        }

        let mut wide_states = Vec::with_capacity(order.len());
        let mut wide_codes = Vec::with_capacity(order.len());
        let mut totals = Vec::with_capacity(order.len());
        let mut category_values: Vec<Vec<f64>> =
            vec![Vec::with_capacity(order.len()); CATEGORIES_WITH_MISC.len()];

        for key in &order {
            let row = &cells[key];
            let mut total = 0.0;
            for (category, values) in CATEGORIES_WITH_MISC.iter().zip(&mut category_values) {
                let value = row.get(*category).copied().ok_or_else(|| {
                    ProcessorError::SchemaMismatch(format!(
                        "state '{}' has no '{}' row",
                        key.0, category
                    ))
                })?;
                total += value;
                values.push(value);
            }
            wide_states.push(key.0.clone());
            wide_codes.push(key.1.clone());
            totals.push(total);
        }

        let mut columns = vec![
            Column::new(STATE.into(), wide_states),
            Column::new(CODE.into(), wide_codes),
            Column::new(TOTAL_EXPORTS.into(), totals),
        ];
        for (category, values) in CATEGORIES_WITH_MISC.iter().zip(category_values) {
            columns.push(Column::new((*category).into(), values));
        }

        Ok(WideExportTable::from_dataframe(DataFrame::new(columns)?))
    }

    /// Restrict both tables to the selected states.
    ///
    /// An empty selection returns both tables unchanged. Row order is kept.
    pub fn filter(
        wide: &WideExportTable,
        long: &LongExportTable,
        selection: &StateSelection,
    ) -> Result<(WideExportTable, LongExportTable), ProcessorError> {
        if selection.is_empty() {
            return Ok((wide.clone(), long.clone()));
        }

        let wide_df = Self::filter_by_state(wide.dataframe(), selection)?;
        let long_df = Self::filter_by_state(long.dataframe(), selection)?;

        Ok((
            WideExportTable::from_dataframe(wide_df),
            LongExportTable::from_dataframe(long_df),
        ))
    }

    /// Stable sort by total exports, largest first.
    pub fn sort_by_exports_descending(
        wide: &WideExportTable,
    ) -> Result<WideExportTable, ProcessorError> {
        let sorted = wide.dataframe().sort(
            [TOTAL_EXPORTS],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )?;
        Ok(WideExportTable::from_dataframe(sorted))
    }

    /// Sum exports per category. Every category appears, zero or not.
    pub fn aggregate_by_category(long: &LongExportTable) -> Result<CategoryTotals, ProcessorError> {
        let categories = long.categories()?;
        let exports = long.exports()?;

        let mut totals = CategoryTotals::zeroed();
        for (category, export) in categories.iter().zip(exports) {
            if !totals.add(category, export) {
                return Err(ProcessorError::SchemaMismatch(format!(
                    "unknown export category '{}'",
                    category
                )));
            }
        }
        Ok(totals)
    }

    fn filter_by_state(
        df: &DataFrame,
        selection: &StateSelection,
    ) -> Result<DataFrame, ProcessorError> {
        let states = df.column(STATE)?.as_materialized_series().str()?;
        let mask: BooleanChunked = states
            .into_iter()
            .map(|state| Some(state.is_some_and(|s| selection.contains(s))))
            .collect();
        Ok(df.filter(&mask)?)
    }

    fn check_required_columns(raw: &DataFrame) -> Result<(), ProcessorError> {
        let present: HashSet<String> = raw
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing: Vec<&str> = schema::required_raw_columns()
            .into_iter()
            .filter(|name| !present.contains(*name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProcessorError::SchemaMismatch(format!(
                "missing column(s): {}",
                missing.join(", ")
            )))
        }
    }

    fn check_unique_codes(codes: &[String]) -> Result<(), ProcessorError> {
        let mut seen = HashSet::new();
        for code in codes {
            if !seen.insert(code.as_str()) {
                return Err(ProcessorError::SchemaMismatch(format!(
                    "duplicate state code '{}'",
                    code
                )));
            }
        }
        Ok(())
    }

    /// Non-null string values of a key column.
    fn key_values(df: &DataFrame, name: &str) -> Result<Vec<String>, ProcessorError> {
        let column = df.column(name)?;
        let ca = column.as_materialized_series().str().map_err(|_| {
            ProcessorError::SchemaMismatch(format!("column '{}' is not text", name))
        })?;

        ca.into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.map(|v| v.trim().to_string()).ok_or_else(|| {
                    ProcessorError::SchemaMismatch(format!("null '{}' in row {}", name, row))
                })
            })
            .collect()
    }

    /// Numeric column values; non-numeric or missing cells are a schema mismatch.
    fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, ProcessorError> {
        let column = df.column(name)?;
        let nulls_before = column.null_count();
        let cast = column.cast(&DataType::Float64).map_err(|e| {
            ProcessorError::SchemaMismatch(format!("column '{}' is not numeric: {}", name, e))
        })?;

        if nulls_before > 0 || cast.null_count() > 0 {
            return Err(ProcessorError::SchemaMismatch(format!(
                "column '{}' has missing or non-numeric values",
                name
            )));
        }

        let ca = cast.f64()?;
        Ok(ca.into_no_null_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_raw;
    use test_log::test;

    const EPS: f64 = 1e-9;

    fn sample_tables() -> (WideExportTable, LongExportTable) {
        let wide = ExportProcessor::build(&sample_raw()).unwrap();
        let long = ExportProcessor::melt(&wide).unwrap();
        (wide, long)
    }

    fn selection(states: &[&str]) -> StateSelection {
        states.iter().copied().collect()
    }

    #[test]
    fn build_keeps_one_row_per_state_sorted_by_code() {
        let raw = sample_raw();
        let (wide, _) = sample_tables();

        assert_eq!(wide.height(), raw.height());
        assert_eq!(wide.codes().unwrap(), ["AL", "CA", "IA", "TX"]);
        assert_eq!(
            wide.states().unwrap(),
            ["Alabama", "California", "Iowa", "Texas"]
        );
    }

    #[test]
    fn build_emits_exactly_the_wide_columns() {
        let (wide, _) = sample_tables();
        let names: Vec<String> = wide
            .dataframe()
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, schema::wide_columns());
    }

    #[test]
    fn misc_is_total_minus_categories() {
        let (wide, _) = sample_tables();
        let totals = wide.values(TOTAL_EXPORTS).unwrap();
        let misc = wide.values(MISC).unwrap();

        for row in 0..wide.height() {
            let sum: f64 = CATEGORIES
                .iter()
                .map(|c| wide.values(c).unwrap()[row])
                .sum();
            assert!((misc[row] - (totals[row] - sum)).abs() < EPS);
        }
        assert_eq!(misc, [5.0, 20.0, 5.0, 0.0]);
    }

    #[test]
    fn negative_misc_is_kept() {
        let mut raw = sample_raw();
        raw.with_column(Series::new(TOTAL_EXPORTS.into(), [150.0, 200.0, 90.5, 50.0]))
            .unwrap();

        let wide = ExportProcessor::build(&raw).unwrap();
        let misc = wide.values(MISC).unwrap();
        // Alabama sums to 95 against a total of 50
        assert!((misc[0] + 45.0).abs() < EPS);
    }

    #[test]
    fn missing_column_is_a_schema_mismatch() {
        let raw = sample_raw().drop("total fruits").unwrap();
        let err = ExportProcessor::build(&raw).unwrap_err();
        assert!(matches!(err, ProcessorError::SchemaMismatch(ref m) if m.contains("total fruits")));
    }

    #[test]
    fn missing_key_columns_are_a_schema_mismatch() {
        for key in [STATE, CODE] {
            let raw = sample_raw().drop(key).unwrap();
            let err = ExportProcessor::build(&raw).unwrap_err();
            assert!(matches!(err, ProcessorError::SchemaMismatch(ref m) if m.contains(key)));
        }
    }

    #[test]
    fn non_numeric_exports_are_a_schema_mismatch() {
        let mut raw = sample_raw();
        raw.with_column(Series::new("beef".into(), ["40", "n/a", "10", "10"]))
            .unwrap();
        let err = ExportProcessor::build(&raw).unwrap_err();
        assert!(matches!(err, ProcessorError::SchemaMismatch(_)));
    }

    #[test]
    fn duplicate_codes_are_a_schema_mismatch() {
        let mut raw = sample_raw();
        raw.with_column(Series::new(CODE.into(), ["TX", "CA", "TX", "AL"]))
            .unwrap();
        let err = ExportProcessor::build(&raw).unwrap_err();
        assert!(matches!(err, ProcessorError::SchemaMismatch(ref m) if m.contains("TX")));
    }

    #[test]
    fn melt_emits_one_row_per_state_and_category() {
        let (wide, long) = sample_tables();
        assert_eq!(long.height(), wide.height() * CATEGORIES_WITH_MISC.len());

        let categories = long.categories().unwrap();
        assert_eq!(categories[..10], CATEGORIES_WITH_MISC.map(String::from));
        assert_eq!(categories[9], MISC);

        let codes = long.codes().unwrap();
        assert!(codes[..10].iter().all(|c| c == "AL"));
        assert!(codes[30..].iter().all(|c| c == "TX"));
    }

    #[test]
    fn melt_then_widen_recovers_the_wide_table() {
        let (wide, long) = sample_tables();
        let recovered = ExportProcessor::widen(&long).unwrap();

        assert_eq!(recovered.states().unwrap(), wide.states().unwrap());
        assert_eq!(recovered.codes().unwrap(), wide.codes().unwrap());
        for category in CATEGORIES_WITH_MISC {
            assert_eq!(
                recovered.values(category).unwrap(),
                wide.values(category).unwrap()
            );
        }
        let totals = wide.values(TOTAL_EXPORTS).unwrap();
        for (got, want) in recovered.values(TOTAL_EXPORTS).unwrap().iter().zip(totals) {
            assert!((got - want).abs() < EPS);
        }
    }

    #[test]
    fn empty_selection_is_identity() {
        let (wide, long) = sample_tables();
        let (f_wide, f_long) =
            ExportProcessor::filter(&wide, &long, &StateSelection::new()).unwrap();

        assert!(f_wide.dataframe().equals(wide.dataframe()));
        assert!(f_long.dataframe().equals(long.dataframe()));
    }

    #[test]
    fn filter_keeps_selected_states_in_order() {
        let (wide, long) = sample_tables();
        let (f_wide, f_long) =
            ExportProcessor::filter(&wide, &long, &selection(&["Texas", "California"])).unwrap();

        assert_eq!(f_wide.states().unwrap(), ["California", "Texas"]);
        assert_eq!(f_long.height(), 2 * CATEGORIES_WITH_MISC.len());
    }

    #[test]
    fn filtered_tables_share_state_code_pairs() {
        let (wide, long) = sample_tables();
        let (f_wide, f_long) =
            ExportProcessor::filter(&wide, &long, &selection(&["Iowa", "Alabama"])).unwrap();

        let wide_pairs: HashSet<(String, String)> = f_wide
            .states()
            .unwrap()
            .into_iter()
            .zip(f_wide.codes().unwrap())
            .collect();
        let long_pairs: HashSet<(String, String)> = f_long
            .states()
            .unwrap()
            .into_iter()
            .zip(f_long.codes().unwrap())
            .collect();
        assert_eq!(wide_pairs, long_pairs);
    }

    #[test]
    fn unknown_states_contribute_no_rows() {
        let (wide, long) = sample_tables();
        let (f_wide, f_long) =
            ExportProcessor::filter(&wide, &long, &selection(&["Atlantis", "Iowa"])).unwrap();
        assert_eq!(f_wide.codes().unwrap(), ["IA"]);
        assert_eq!(f_long.height(), CATEGORIES_WITH_MISC.len());

        let (f_wide, f_long) =
            ExportProcessor::filter(&wide, &long, &selection(&["Atlantis"])).unwrap();
        assert!(f_wide.is_empty());
        assert_eq!(f_long.height(), 0);
    }

    #[test]
    fn sort_descending_is_stable_on_ties() {
        let (wide, _) = sample_tables();
        let sorted = ExportProcessor::sort_by_exports_descending(&wide).unwrap();
        assert_eq!(sorted.codes().unwrap(), ["CA", "TX", "AL", "IA"]);

        let mut raw = sample_raw();
        raw.with_column(Series::new(TOTAL_EXPORTS.into(), [150.0, 150.0, 150.0, 100.0]))
            .unwrap();
        let wide = ExportProcessor::build(&raw).unwrap();
        let sorted = ExportProcessor::sort_by_exports_descending(&wide).unwrap();
        assert_eq!(sorted.codes().unwrap(), ["CA", "IA", "TX", "AL"]);
    }

    #[test]
    fn aggregate_lists_every_category_regardless_of_filter() {
        let (wide, long) = sample_tables();

        let all = ExportProcessor::aggregate_by_category(&long).unwrap();
        assert_eq!(all.len(), CATEGORIES.len() + 1);
        assert!((all.get("beef").unwrap() - 80.0).abs() < EPS);
        assert!((all.get(MISC).unwrap() - 30.0).abs() < EPS);

        let (_, f_long) =
            ExportProcessor::filter(&wide, &long, &selection(&["Nowhere"])).unwrap();
        let none = ExportProcessor::aggregate_by_category(&f_long).unwrap();
        assert_eq!(none.len(), CATEGORIES.len() + 1);
        assert_eq!(none.grand_total(), 0.0);
    }

    #[test]
    fn alabama_and_california_scenario() {
        let (wide, long) = sample_tables();
        let (f_wide, _) = ExportProcessor::filter(
            &wide,
            &long,
            &selection(&["Alabama", "California"]),
        )
        .unwrap();
        assert_eq!(f_wide.codes().unwrap(), ["AL", "CA"]);
        assert_eq!(f_wide.values(MISC).unwrap(), [5.0, 20.0]);

        let (f_wide, f_long) =
            ExportProcessor::filter(&wide, &long, &selection(&["California"])).unwrap();
        assert_eq!(f_wide.height(), 1);
        assert_eq!(f_wide.values(MISC).unwrap(), [20.0]);
        let breakdown = ExportProcessor::aggregate_by_category(&f_long).unwrap();
        assert!((breakdown.grand_total() - 200.0).abs() < EPS);
    }
}
