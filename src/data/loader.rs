//! CSV Data Loader Module
//! Fetches the export CSV from a URL or a local path and parses it with Polars.

use polars::prelude::*;
use std::fmt::{Display, Formatter};
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data unavailable from {locator}: {reason}")]
    DataUnavailable { locator: String, reason: String },
}

impl LoaderError {
    fn unavailable(source: &DataSource, reason: impl ToString) -> Self {
        LoaderError::DataUnavailable {
            locator: source.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Where the export CSV lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` locators are URLs, anything else is a path.
    pub fn parse(locator: &str) -> Self {
        let locator = locator.trim();
        let lower = locator.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(locator.to_string())
        } else {
            DataSource::File(PathBuf::from(locator))
        }
    }
}

impl Display for DataSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads the raw export table. One fetch per call, no retries.
pub struct DataLoader {
    timeout: Duration,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl DataLoader {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Fetch and parse the CSV behind `source`.
    pub fn load(&self, source: &DataSource) -> Result<DataFrame, LoaderError> {
        info!(%source, "loading export data");

        let df = match source {
            DataSource::Url(url) => {
                let bytes = self.fetch(url).map_err(|e| LoaderError::unavailable(source, e))?;
                Self::parse_csv(bytes)
            }
            DataSource::File(path) => {
                if !path.is_file() {
                    return Err(LoaderError::unavailable(source, "no such file"));
                }
                LazyCsvReader::new(path)
                    .with_has_header(true)
                    .with_infer_schema_length(Some(10000))
                    .finish()
                    .and_then(|lazy| lazy.collect())
            }
        }
        .map_err(|e| LoaderError::unavailable(source, e))?;

        if df.width() == 0 {
            return Err(LoaderError::unavailable(source, "no columns"));
        }

        info!(rows = df.height(), columns = df.width(), "loaded export data");
        Ok(df)
    }

    /// Parse CSV bytes with a header row.
    pub fn parse_csv(bytes: Vec<u8>) -> PolarsResult<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::SAMPLE_CSV;
    use std::io::Write;
    use test_log::test;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            DataSource::parse("https://example.com/a.csv"),
            DataSource::Url("https://example.com/a.csv".to_string())
        );
        assert_eq!(
            DataSource::parse(" HTTP://example.com/a.csv "),
            DataSource::Url("HTTP://example.com/a.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/exports.csv"),
            DataSource::File(PathBuf::from("data/exports.csv"))
        );
    }

    #[test]
    fn loads_csv_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();

        let df = DataLoader::default()
            .load(&DataSource::File(file.path().to_path_buf()))
            .unwrap();
        assert_eq!(df.height(), 4);
        assert!(df
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == "total exports"));
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::File(dir.path().join("missing.csv"));

        let err = DataLoader::default().load(&source).unwrap_err();
        let LoaderError::DataUnavailable { locator, .. } = err;
        assert!(locator.ends_with("missing.csv"));
    }

    #[test]
    fn unparseable_file_is_data_unavailable() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"code,state\nTX,Texas,state,150,40\n\x00\x01,,,,,,,\n")
            .unwrap();

        let err = DataLoader::default()
            .load(&DataSource::File(file.path().to_path_buf()))
            .unwrap_err();
        let LoaderError::DataUnavailable { locator, reason } = err;
        assert!(locator.ends_with(".csv"));
        assert!(!reason.is_empty());
    }

    #[test]
    fn parses_csv_bytes() {
        let df = DataLoader::parse_csv(SAMPLE_CSV.as_bytes().to_vec()).unwrap();
        assert_eq!(df.height(), 4);
        assert_eq!(df.width(), 17);
    }
}
