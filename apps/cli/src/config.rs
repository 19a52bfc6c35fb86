use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use temperature_heatmap::{ExportFormat, DEFAULT_SOURCE_URL};

pub const ENV_SOURCE_URL: &str = "HEATMAP_SOURCE_URL";
pub const ENV_INPUT: &str = "HEATMAP_INPUT";
pub const ENV_OUTPUT: &str = "HEATMAP_OUTPUT";
pub const ENV_FORMAT: &str = "HEATMAP_FORMAT";
pub const ENV_TIMEOUT_SECS: &str = "HEATMAP_TIMEOUT_SECS";
pub const ENV_LOG: &str = "HEATMAP_LOG";

const DEFAULT_OUTPUT: &str = "heatmap.html";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILTER: &str = "info";

/// Where the temperature document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub source: Source,
    pub output: PathBuf,
    pub format: ExportFormat,
    pub timeout: Duration,
    pub log_filter: String,
}

/// Loads `.env`, then reads the configuration from the process environment
pub fn init_app_config() -> Result<AppConfig> {
    dotenv().ok();
    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    /// Builds the configuration from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let source = match get(ENV_INPUT) {
            Some(path) => Source::File(PathBuf::from(path)),
            None => Source::Url(get(ENV_SOURCE_URL).unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string())),
        };

        let output = get(ENV_OUTPUT).map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);

        let format = match get(ENV_FORMAT) {
            Some(name) => ExportFormat::parse(&name)
                .ok_or_else(|| eyre!("Unknown export format {name:?}, expected svg or html"))?,
            None => format_from_extension(&output).unwrap_or(ExportFormat::Html),
        };

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|e| eyre!("Invalid {ENV_TIMEOUT_SECS} value {value:?}: {e}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let log_filter = get(ENV_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            source,
            output,
            format,
            timeout: Duration::from_secs(timeout_secs),
            log_filter,
        })
    }
}

fn format_from_extension(path: &Path) -> Option<ExportFormat> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .and_then(ExportFormat::parse)
}
