use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use scanner_logging::{scan_debug, scan_info, scan_warn};

use crate::persist::{archive_file_name, AtomicFileWriter};
use crate::service::{ReqwestScanService, ScanService, ServiceSettings};
use crate::{EngineEvent, FailureKind, ScanId, ScanRequest, ServiceError};

/// Receives engine events. Called from the engine's runtime threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

impl EventSink for mpsc::Sender<EngineEvent> {
    fn emit(&self, event: EngineEvent) {
        let _ = self.send(event);
    }
}

enum EngineCommand {
    Scan { scan_id: ScanId, urls: Vec<String> },
    Stop,
    Download {
        scan_id: ScanId,
        zip_file: String,
        fallback_name: String,
    },
}

/// Runs service requests on a background runtime.
///
/// Commands are independent tasks, so a stop request goes out while a scan
/// request is still waiting for its reply.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ServiceSettings,
        output_dir: PathBuf,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ServiceError> {
        let service = ReqwestScanService::new(settings)?;
        Self::with_service(Arc::new(service), output_dir, sink)
            .map_err(|err| ServiceError::new(FailureKind::Io, err.to_string()))
    }

    pub fn with_service(
        service: Arc<dyn ScanService>,
        output_dir: PathBuf,
        sink: Arc<dyn EventSink>,
    ) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let writer = Arc::new(AtomicFileWriter::new(output_dir));

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let service = service.clone();
                let writer = writer.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    handle_command(service.as_ref(), writer.as_ref(), command, sink.as_ref())
                        .await;
                });
            }
        });

        Ok(Self { cmd_tx })
    }

    pub fn submit_scan(&self, scan_id: ScanId, urls: Vec<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Scan { scan_id, urls });
    }

    pub fn request_stop(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Stop);
    }

    /// Downloads the archive `scan_id` linked to, saving it under
    /// `fallback_name` when the link carries no usable file name.
    pub fn download(
        &self,
        scan_id: ScanId,
        zip_file: impl Into<String>,
        fallback_name: impl Into<String>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::Download {
            scan_id,
            zip_file: zip_file.into(),
            fallback_name: fallback_name.into(),
        });
    }
}

async fn handle_command(
    service: &dyn ScanService,
    writer: &AtomicFileWriter,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Scan { scan_id, urls } => {
            scan_info!("Submitting scan {} with {} url(s)", scan_id, urls.len());
            let result = service.scan(&ScanRequest { urls }).await;
            match &result {
                Ok(reply) => scan_info!(
                    "Scan {} replied: status={:?} entries={} zip_file={:?}",
                    scan_id,
                    reply.status,
                    reply.results.len(),
                    reply.zip_file
                ),
                Err(err) => scan_warn!("Scan {} failed: {}", scan_id, err),
            }
            sink.emit(EngineEvent::ScanCompleted { scan_id, result });
        }
        EngineCommand::Stop => {
            let result = service.stop().await;
            match &result {
                Ok(()) => scan_debug!("Stop request delivered"),
                Err(err) => scan_warn!("Stop request failed (ignored): {}", err),
            }
            sink.emit(EngineEvent::StopCompleted { result });
        }
        EngineCommand::Download {
            scan_id,
            zip_file,
            fallback_name,
        } => {
            let result = download_archive(service, writer, &zip_file, &fallback_name).await;
            match &result {
                Ok(path) => scan_info!("Saved archive of scan {} to {:?}", scan_id, path),
                Err(err) => scan_warn!("Download of {} failed: {}", zip_file, err),
            }
            sink.emit(EngineEvent::DownloadCompleted { scan_id, result });
        }
    }
}

async fn download_archive(
    service: &dyn ScanService,
    writer: &AtomicFileWriter,
    zip_file: &str,
    fallback_name: &str,
) -> Result<PathBuf, ServiceError> {
    let bytes = service.download(zip_file).await?;
    let filename = archive_file_name(zip_file).unwrap_or_else(|| fallback_name.to_string());
    writer
        .write(&filename, &bytes)
        .map_err(|err| ServiceError::new(FailureKind::Io, err.to_string()))
}
