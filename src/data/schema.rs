//! Dataset Schema Module
//! Column names of the raw export CSV and the fixed export category list.

/// State name column.
pub const STATE: &str = "state";
/// Two-letter state code column.
pub const CODE: &str = "code";
/// Total exports in million USD.
pub const TOTAL_EXPORTS: &str = "total exports";
/// Derived remainder column, always the last category.
pub const MISC: &str = "misc.";

/// Metadata column in the raw CSV, dropped by the builder.
pub const RAW_CATEGORY: &str = "category";
pub const RAW_TOTAL_FRUITS: &str = "total fruits";
pub const RAW_TOTAL_VEGGIES: &str = "total veggies";

/// Long table columns.
pub const CATEGORY: &str = "category";
pub const EXPORT: &str = "export";

/// Measured export categories, in display order.
pub const CATEGORIES: [&str; 9] = [
    "beef", "pork", "poultry", "dairy", "fruits", "veggies", "corn", "wheat", "cotton",
];

/// Categories including `misc.` as the last entry.
pub const CATEGORIES_WITH_MISC: [&str; 10] = [
    "beef", "pork", "poultry", "dairy", "fruits", "veggies", "corn", "wheat", "cotton", MISC,
];

/// Raw column renames applied before the categories are read.
pub const RENAMES: [(&str, &str); 2] = [(RAW_TOTAL_FRUITS, "fruits"), (RAW_TOTAL_VEGGIES, "veggies")];

/// Name a category has in the raw CSV header.
pub fn raw_column_name(category: &str) -> &str {
    RENAMES
        .iter()
        .find(|(_, renamed)| *renamed == category)
        .map(|(raw, _)| *raw)
        .unwrap_or(category)
}

/// Columns the raw table must carry for the builder to succeed.
pub fn required_raw_columns() -> Vec<&'static str> {
    let mut columns = vec![STATE, CODE, TOTAL_EXPORTS, RAW_CATEGORY];
    columns.extend(CATEGORIES.iter().map(|c| raw_column_name(c)));
    columns
}

/// Output columns of the wide table, in order.
pub fn wide_columns() -> Vec<&'static str> {
    let mut columns = vec![STATE, CODE, TOTAL_EXPORTS];
    columns.extend(CATEGORIES_WITH_MISC);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misc_is_appended_last() {
        assert_eq!(CATEGORIES_WITH_MISC[..CATEGORIES.len()], CATEGORIES);
        assert_eq!(CATEGORIES_WITH_MISC.last(), Some(&MISC));
    }

    #[test]
    fn renamed_categories_map_back_to_raw_headers() {
        assert_eq!(raw_column_name("fruits"), "total fruits");
        assert_eq!(raw_column_name("veggies"), "total veggies");
        assert_eq!(raw_column_name("beef"), "beef");
    }

    #[test]
    fn required_columns_cover_every_category() {
        let required = required_raw_columns();
        assert_eq!(required.len(), 4 + CATEGORIES.len());
        assert!(required.contains(&"total fruits"));
        assert!(!required.contains(&"fruits"));
    }
}
