use std::sync::{mpsc, Arc};

use chrono::Local;
use scanner_core::{Effect, Msg, ScanResponse, ScanResultEntry, TransportFailure};
use scanner_engine::{EngineEvent, EngineHandle, EventSink, ScanReply, SiteSummary};
use scanner_logging::{scan_debug, scan_info};

use crate::app::LoopEvent;
use crate::config::AppConfig;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, loop_tx: mpsc::Sender<LoopEvent>) -> anyhow::Result<Self> {
        let sink: Arc<dyn EventSink> = Arc::new(MsgSink { loop_tx });
        let engine =
            EngineHandle::new(config.service_settings(), config.output_dir.clone(), sink)?;
        Ok(Self { engine })
    }

    pub fn run(&self, effect: Effect) {
        match effect {
            Effect::SubmitScan { scan_id, urls } => {
                scan_info!("SubmitScan scan_id={} urls={:?}", scan_id, urls);
                self.engine.submit_scan(scan_id, urls);
            }
            Effect::RequestStop => {
                scan_info!("RequestStop");
                self.engine.request_stop();
            }
            Effect::Download { scan_id, zip_file } => {
                scan_info!("Download scan_id={} zip_file={}", scan_id, zip_file);
                self.engine.download(scan_id, zip_file, fallback_archive_name());
            }
            Effect::Notify(notice) => {
                scan_info!("Notice: {}", notice);
            }
        }
    }
}

/// Translates engine events into core messages for the app loop.
struct MsgSink {
    loop_tx: mpsc::Sender<LoopEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        if let Some(msg) = map_event(event) {
            let _ = self.loop_tx.send(LoopEvent::Msg(msg));
        }
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::ScanCompleted { scan_id, result } => Some(Msg::ScanFinished {
            scan_id,
            outcome: result
                .map(map_reply)
                .map_err(|err| TransportFailure::new(err.to_string())),
        }),
        // Stop outcomes never reach the core; the engine has logged them.
        EngineEvent::StopCompleted { result } => {
            scan_debug!("Stop completed ok={}", result.is_ok());
            None
        }
        EngineEvent::DownloadCompleted { scan_id, result } => Some(Msg::DownloadFinished {
            scan_id,
            result: result
                .map(|path| path.display().to_string())
                .map_err(|err| err.to_string()),
        }),
    }
}

fn map_reply(reply: ScanReply) -> ScanResponse {
    ScanResponse {
        results: reply.results.into_iter().map(map_site).collect(),
        status: reply.status,
        zip_file: reply.zip_file,
    }
}

fn map_site(site: SiteSummary) -> ScanResultEntry {
    ScanResultEntry {
        base_url: site.base_url,
        pages_crawled: site.pages_crawled,
        pdf_count: site.pdf_count,
        count_accessible: site.count_accessible,
        count_likely: site.count_likely,
        count_inaccessible: site.count_inaccessible,
        error_pages: site.error_pages,
        report_path: site.report_path,
    }
}

/// Used when the archive link has no usable file name.
fn fallback_archive_name() -> String {
    format!("pdf_reports_{}.zip", Local::now().format("%Y%m%d_%H%M%S"))
}
