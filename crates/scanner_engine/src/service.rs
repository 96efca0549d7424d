use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use scanner_logging::scan_debug;
use url::Url;

use crate::{FailureKind, ScanReply, ScanRequest, ServiceError};

pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Root of the scan service; `/scan`, `/stop` and relative archive links
    /// resolve against it.
    pub base_url: Url,
    pub connect_timeout: Option<Duration>,
    /// No timeout by default: a scan may legitimately run for a long time.
    pub request_timeout: Option<Duration>,
    pub max_download_bytes: u64,
}

impl ServiceSettings {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            connect_timeout: None,
            request_timeout: None,
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
        }
    }
}

#[async_trait::async_trait]
pub trait ScanService: Send + Sync {
    /// `POST /scan`. Any non-2xx status is an error and the body is not read.
    async fn scan(&self, request: &ScanRequest) -> Result<ScanReply, ServiceError>;

    /// `POST /stop`. The reply is not inspected beyond the request going through.
    async fn stop(&self) -> Result<(), ServiceError>;

    /// `GET` the archive at `zip_file`, resolved against the service root.
    async fn download(&self, zip_file: &str) -> Result<Bytes, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestScanService {
    settings: ServiceSettings,
    root: Url,
    client: reqwest::Client,
}

impl ReqwestScanService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;

        // Joining only keeps the base path when it ends with a slash.
        let mut root = settings.base_url.clone();
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }

        Ok(Self {
            settings,
            root,
            client,
        })
    }

    /// Resolves `reference` against the service root. Absolute URLs pass
    /// through unchanged.
    pub fn resolve(&self, reference: &str) -> Result<Url, ServiceError> {
        self.root
            .join(reference)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ScanService for ReqwestScanService {
    async fn scan(&self, request: &ScanRequest) -> Result<ScanReply, ServiceError> {
        let url = self.resolve("scan")?;
        let body = serde_json::to_vec(request)
            .map_err(|err| ServiceError::new(FailureKind::Json, err.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ServiceError::new(FailureKind::Json, err.to_string()))
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        let url = self.resolve("stop")?;
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        scan_debug!("Stop request answered with {}", response.status());
        Ok(())
    }

    async fn download(&self, zip_file: &str) -> Result<Bytes, ServiceError> {
        let url = self.resolve(zip_file)?;
        let max_bytes = self.settings.max_download_bytes;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = buffer.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(buffer.freeze())
    }
}

fn too_large(max_bytes: u64, actual: u64) -> ServiceError {
    ServiceError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "archive too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
