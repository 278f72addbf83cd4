//! Dashboard configuration.
//!
//! Built-in defaults, then `ag_exports.toml` in the working directory, then
//! `AG_EXPORTS_*` environment variables.

use crate::data::DataSource;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

const CONFIG_FILE: &str = "ag_exports.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// CSV locator, URL or local path
    pub source: String,
    pub window_width: f32,
    pub window_height: f32,
    pub http_timeout_secs: u64,
}

impl DashboardConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(
                include_str!("../default_config.toml"),
                FileFormat::Toml,
            ))
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("ag_exports").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn new_from_toml(overrides: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(
                include_str!("../default_config.toml"),
                FileFormat::Toml,
            ))
            .add_source(File::from_str(overrides, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
