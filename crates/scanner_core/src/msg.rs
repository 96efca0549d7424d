use crate::{ScanId, ScanResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input text.
    InputChanged(String),
    /// User clicked Start.
    StartClicked,
    /// User clicked Stop/Reset.
    StopClicked,
    /// The `/scan` request for `scan_id` completed.
    ScanFinished {
        scan_id: ScanId,
        outcome: Result<ScanResponse, TransportFailure>,
    },
    /// The archive download for `scan_id` completed, with the saved location
    /// or a failure reason.
    DownloadFinished {
        scan_id: ScanId,
        result: Result<String, String>,
    },
}

/// The scan request threw or the service answered with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub reason: String,
}

impl TransportFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
