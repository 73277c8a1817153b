//! Reconciles asynchronous movie output callbacks with the lifecycle.

use crate::{lifecycle::Lifecycle, platform::SinkFailure};

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// What was left on disk when a recording failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteDiagnosis {
    /// Error domain reported by the platform.
    pub domain: String,
    /// Error code reported by the platform.
    pub code: i64,
    /// Error description reported by the platform.
    pub description: String,
    /// Whether the output file exists after the failure.
    pub file_exists: bool,
    /// Size of the output file, when it exists.
    pub file_size: Option<u64>,
}

impl WriteDiagnosis {
    /// A missing or empty file: the recording halted before any data was
    /// captured, typically because the audio route or video connection was
    /// not ready.
    pub fn is_early_stop(&self) -> bool {
        !self.file_exists || self.file_size == Some(0)
    }
}

/// How a recording ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishOutcome {
    /// The file was finalized.
    Completed,
    /// The file could not be finalized.
    Failed(WriteDiagnosis),
}

/// Final word on a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishReport {
    /// Correlation id, if the finish matched the active recording.
    pub session_id: Option<Uuid>,
    /// Output file name.
    pub file_name: String,
    /// Output path.
    pub output_path: PathBuf,
    /// How it ended.
    pub outcome: FinishOutcome,
}

impl FinishReport {
    /// Whether the file was finalized.
    pub fn succeeded(&self) -> bool {
        self.outcome == FinishOutcome::Completed
    }
}

#[derive(Debug, Default)]
pub(crate) struct CompletionReporter;

impl CompletionReporter {
    pub(crate) fn on_started(&self, lifecycle: &Lifecycle, path: &Path) {
        match &lifecycle.current {
            Some(handle) => info!(
                session_id = %handle.session_id,
                file_name = %handle.file_name,
                "Movie output started writing"
            ),
            None => debug!(path = ?path, "Movie output started writing with no active recording"),
        }
    }

    /// Clear the active recording and classify how it ended.
    pub(crate) fn on_finished(
        &self,
        lifecycle: &mut Lifecycle,
        path: &Path,
        failure: Option<SinkFailure>,
    ) -> FinishReport {
        let handle = lifecycle.clear();

        if let Some(handle) = &handle
            && handle.output_path != path
        {
            warn!(
                expected = ?handle.output_path,
                finished = ?path,
                "Finish reported for a different path than the active recording"
            );
        }

        let session_id = handle.as_ref().map(|h| h.session_id);
        let file_name = handle.map(|h| h.file_name).unwrap_or_else(|| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        let outcome = match failure {
            None => {
                info!(session_id = ?session_id, file_name = %file_name, "Recording finished");
                FinishOutcome::Completed
            }
            Some(failure) => {
                let diagnosis = Self::diagnose(path, failure);
                error!(
                    session_id = ?session_id,
                    file_name = %file_name,
                    domain = %diagnosis.domain,
                    code = diagnosis.code,
                    description = %diagnosis.description,
                    file_exists = diagnosis.file_exists,
                    file_size = ?diagnosis.file_size,
                    early_stop = diagnosis.is_early_stop(),
                    "Recording failed"
                );
                FinishOutcome::Failed(diagnosis)
            }
        };

        FinishReport {
            session_id,
            file_name,
            output_path: path.to_path_buf(),
            outcome,
        }
    }

    fn diagnose(path: &Path, failure: SinkFailure) -> WriteDiagnosis {
        let metadata = fs::metadata(path).ok();
        WriteDiagnosis {
            domain: failure.domain,
            code: failure.code,
            description: failure.description,
            file_exists: metadata.is_some(),
            file_size: metadata.map(|m| m.len()),
        }
    }
}
