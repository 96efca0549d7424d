use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ScanId = u64;

/// Body of `POST /scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    pub urls: Vec<String>,
}

/// Body of a 2xx `/scan` reply. A server-side stop replies with only `status`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ScanReply {
    #[serde(default)]
    pub results: Vec<SiteSummary>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub zip_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SiteSummary {
    pub base_url: String,
    pub pages_crawled: u64,
    pub pdf_count: u64,
    pub count_accessible: u64,
    pub count_likely: u64,
    pub count_inaccessible: u64,
    pub error_pages: Option<u64>,
    pub report_path: Option<String>,
}

#[derive(Debug)]
pub enum EngineEvent {
    ScanCompleted {
        scan_id: ScanId,
        result: Result<ScanReply, ServiceError>,
    },
    StopCompleted {
        result: Result<(), ServiceError>,
    },
    DownloadCompleted {
        scan_id: ScanId,
        result: Result<PathBuf, ServiceError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Json,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Json => write!(f, "malformed json"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
