use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use scanner_engine::{ServiceSettings, DEFAULT_MAX_DOWNLOAD_BYTES};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;
use crate::logging::LogDestination;

pub const SERVICE_URL_ENV: &str = "SCANNER_SERVICE_URL";
const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_OUTPUT_DIR: &str = "downloads";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid service url {url:?}: {message}")]
    ServiceUrl { url: String, message: String },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

/// Optional settings read from a RON file, e.g.
/// `(service_url: Some("http://scanner.local:5000"), log_level: Some("debug"))`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub service_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_destination: Option<LogDestination>,
    pub request_timeout_secs: Option<u64>,
    pub max_download_bytes: Option<u64>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_url: Url,
    pub output_dir: PathBuf,
    pub log_level: LevelFilter,
    pub log_destination: LogDestination,
    pub request_timeout: Option<Duration>,
    pub max_download_bytes: u64,
}

impl AppConfig {
    /// Defaults, then the `--config` file, then environment and flags (which
    /// clap has already merged into `cli`).
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::merge(file, cli)
    }

    fn merge(file: FileConfig, cli: &Cli) -> Result<Self, ConfigError> {
        let raw_url = cli
            .service_url
            .clone()
            .or(file.service_url)
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());
        let service_url = Url::parse(&raw_url).map_err(|err| ConfigError::ServiceUrl {
            url: raw_url.clone(),
            message: err.to_string(),
        })?;

        let log_level = match cli.log_level.clone().or(file.log_level) {
            Some(name) => {
                scanner_logging::parse_level(&name).ok_or(ConfigError::LogLevel(name))?
            }
            None => LevelFilter::Info,
        };

        Ok(Self {
            service_url,
            output_dir: cli
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            log_level,
            log_destination: cli
                .log_destination
                .or(file.log_destination)
                .unwrap_or_default(),
            request_timeout: cli
                .request_timeout_secs
                .or(file.request_timeout_secs)
                .map(Duration::from_secs),
            max_download_bytes: cli
                .max_download_bytes
                .or(file.max_download_bytes)
                .unwrap_or(DEFAULT_MAX_DOWNLOAD_BYTES),
        })
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            request_timeout: self.request_timeout,
            max_download_bytes: self.max_download_bytes,
            ..ServiceSettings::new(self.service_url.clone())
        }
    }
}
