use std::{fmt, path::PathBuf, time::Instant};

use uuid::Uuid;

/// Where a recording is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Nothing is being recorded.
    Idle,
    /// Hardware is being prepared for a new recording.
    Starting,
    /// A file is being written.
    Recording,
    /// The file was asked to finalize; completion has not arrived yet.
    Stopping,
}

/// The authoritative in-flight recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingHandle {
    /// Correlation id for logs and events.
    pub session_id: Uuid,
    /// Output file name.
    pub file_name: String,
    /// Full output path.
    pub output_path: PathBuf,
    /// [`RecordingState::Recording`] or [`RecordingState::Stopping`].
    pub state: RecordingState,
    /// When writing began.
    pub started_at: Instant,
}

impl RecordingHandle {
    pub(crate) fn new(file_name: String, output_path: PathBuf) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            file_name,
            output_path,
            state: RecordingState::Recording,
            started_at: Instant::now(),
        }
    }
}

/// Result of a stop request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// The named recording was asked to finalize.
    Stopped {
        /// File being finalized.
        file_name: String,
    },
    /// Nothing was recording.
    Idle,
}

impl StopOutcome {
    /// Sentinel reported when a stop finds nothing to stop.
    pub const IDLE_SENTINEL: &'static str = "idle";

    /// The stopped file name, or the idle sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            StopOutcome::Stopped { file_name } => file_name,
            StopOutcome::Idle => Self::IDLE_SENTINEL,
        }
    }
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state owned by the recorder worker.
///
/// `current` is `None` exactly when idle or starting.
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    pub(crate) current: Option<RecordingHandle>,
    pub(crate) starting: bool,
}

impl Lifecycle {
    pub(crate) fn state(&self) -> RecordingState {
        match &self.current {
            Some(handle) => handle.state,
            None if self.starting => RecordingState::Starting,
            None => RecordingState::Idle,
        }
    }

    /// Drop the current handle, returning the lifecycle to idle.
    pub(crate) fn clear(&mut self) -> Option<RecordingHandle> {
        self.starting = false;
        self.current.take()
    }
}
