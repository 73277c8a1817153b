use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::debug;

/// Error reported by a movie output when a file could not be finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkFailure {
    /// Error domain of the platform error.
    pub domain: String,
    /// Platform error code.
    pub code: i64,
    /// Localized description.
    pub description: String,
}

/// Asynchronous notification from a movie output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    /// Data started flowing into `path`.
    Started {
        /// File being written.
        path: PathBuf,
    },
    /// Writing `path` ended, successfully when `error` is `None`.
    Finished {
        /// File that was written.
        path: PathBuf,
        /// Failure, if any.
        error: Option<SinkFailure>,
    },
}

/// Channel a movie output uses to report progress back to the recorder.
///
/// Safe to call from any thread; events are queued behind pending recorder
/// commands.
#[derive(Debug, Clone)]
pub struct SinkEventSender {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl SinkEventSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SinkEvent>) -> Self {
        Self { tx }
    }

    /// Report that writing to `path` has begun.
    pub fn started(&self, path: &Path) {
        self.send(SinkEvent::Started {
            path: path.to_path_buf(),
        });
    }

    /// Report that writing to `path` has ended.
    pub fn finished(&self, path: &Path, error: Option<SinkFailure>) {
        self.send(SinkEvent::Finished {
            path: path.to_path_buf(),
            error,
        });
    }

    fn send(&self, event: SinkEvent) {
        if self.tx.send(event).is_err() {
            debug!("Recorder worker gone, dropping sink event");
        }
    }
}
