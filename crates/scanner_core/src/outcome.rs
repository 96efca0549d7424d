use crate::{LifecyclePhase, ScanResponse, ScanResultEntry};

/// Terminal phase for a reply that arrived without transport failure.
///
/// First match wins: a stopped reply is idle, a reply without an archive link
/// is a warning, otherwise success requires a qualifying finding.
pub fn aggregate(response: &ScanResponse) -> LifecyclePhase {
    if response.is_stopped() {
        return LifecyclePhase::Idle;
    }
    if response.download_link().is_none() {
        return LifecyclePhase::Warning;
    }
    if has_qualifying_finding(&response.results) {
        LifecyclePhase::Success
    } else {
        LifecyclePhase::Warning
    }
}

/// True when some site has PDFs and more than a single crawled page.
///
/// Stricter than card classification, which only checks `pdf_count`.
pub fn has_qualifying_finding(results: &[ScanResultEntry]) -> bool {
    results
        .iter()
        .any(|entry| entry.pdf_count > 0 && entry.pages_crawled > 1)
}
