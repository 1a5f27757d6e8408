//! Background icon-set export.
//!
//! A job owns everything it needs, including its own copy of the
//! configuration, so edits made after the job is created never reach it.

use std::io;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::debug;

use super::{CancelToken, ExportError, ExportReport, Exporter};
use crate::catalog::{ExportMode, Platform};
use crate::config::IconConfiguration;
use crate::glyph::GlyphResolver;

/// Progress reported by a running export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
    /// One PNG was written.
    AssetWritten { filename: String, path: PathBuf },
    /// The export ended; the outcome is returned by [`ExportHandle::wait`].
    Finished { success: bool },
}

/// An export request with its own configuration snapshot.
#[derive(Debug, Clone)]
pub struct ExportJob<R> {
    pub exporter: Exporter<R>,
    pub config: IconConfiguration,
    pub mode: ExportMode,
    pub platforms: Vec<Platform>,
    pub destination: PathBuf,
}

impl<R: GlyphResolver> ExportJob<R> {
    pub fn new(
        resolver: R,
        config: &IconConfiguration,
        mode: ExportMode,
        platforms: &[Platform],
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            exporter: Exporter::new(resolver),
            config: config.clone(),
            mode,
            platforms: platforms.to_vec(),
            destination: destination.into(),
        }
    }
}

/// Handle to an export running on a worker thread.
pub struct ExportHandle {
    events: Receiver<ExportEvent>,
    cancel: CancelToken,
    thread: JoinHandle<Result<ExportReport, ExportError>>,
}

impl ExportHandle {
    /// Progress events, ending with [`ExportEvent::Finished`].
    pub fn events(&self) -> &Receiver<ExportEvent> {
        &self.events
    }

    /// Asks the export to stop before its next asset.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Blocks until the export ends and returns its outcome.
    pub fn wait(self) -> Result<ExportReport, ExportError> {
        self.thread.join().unwrap_or(Err(ExportError::WorkerFailed))
    }
}

/// Starts `job` on a named worker thread.
pub fn spawn_export<R>(job: ExportJob<R>) -> io::Result<ExportHandle>
where
    R: GlyphResolver + Send + 'static,
{
    let (tx, events) = unbounded();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    let thread = thread::Builder::new()
        .name("sigil-export".to_string())
        .spawn(move || run_job(job, &worker_cancel, &tx))?;

    Ok(ExportHandle {
        events,
        cancel,
        thread,
    })
}

fn run_job<R: GlyphResolver>(
    job: ExportJob<R>,
    cancel: &CancelToken,
    tx: &Sender<ExportEvent>,
) -> Result<ExportReport, ExportError> {
    debug!(destination = %job.destination.display(), mode = ?job.mode, "export job started");

    let result = job.exporter.run(
        &job.config,
        job.mode,
        &job.platforms,
        &job.destination,
        cancel,
        &mut |asset, path| {
            // The receiver may already be gone; the export still completes.
            let _ = tx.send(ExportEvent::AssetWritten {
                filename: asset.filename.to_string(),
                path: path.to_path_buf(),
            });
        },
    );

    let _ = tx.send(ExportEvent::Finished {
        success: result.is_ok(),
    });
    result
}
