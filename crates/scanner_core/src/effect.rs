use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitScan { scan_id: crate::ScanId, urls: Vec<String> },
    /// Best-effort cancellation; the outcome never feeds back into state.
    RequestStop,
    Download { scan_id: crate::ScanId, zip_file: String },
    Notify(Notice),
}

/// User-visible notices that do not change the lifecycle phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoUrls,
    ScanAlreadyRunning,
    DownloadFailed { reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoUrls => write!(f, "Please enter at least one URL to scan."),
            Notice::ScanAlreadyRunning => {
                write!(f, "A scan is already running. Stop it before starting another.")
            }
            Notice::DownloadFailed { reason } => {
                write!(f, "Could not download the report archive: {reason}")
            }
        }
    }
}
