//! Scanner engine: remote scan service client and effect execution.
mod engine;
mod persist;
mod service;
mod types;

pub use engine::{EngineHandle, EventSink};
pub use persist::{archive_file_name, ensure_output_dir, AtomicFileWriter, PersistError};
pub use service::{ReqwestScanService, ScanService, ServiceSettings, DEFAULT_MAX_DOWNLOAD_BYTES};
pub use types::{
    EngineEvent, FailureKind, ScanId, ScanReply, ScanRequest, ServiceError, SiteSummary,
};
