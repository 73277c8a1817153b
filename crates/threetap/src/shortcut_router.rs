//! Turns shortcut launches into recorder calls.
//!
//! A start checks camera and microphone access first and only reaches the
//! recorder when both are granted. A stop goes straight to the recorder.

use crate::ShortcutAction;

use threetap_core::{PermissionGate, Recorder, StopOutcome};
use tracing::{debug, error, info, instrument, warn};

/// What a shortcut launch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutResult {
    /// Recording to `file_name`, newly started or already running.
    Started {
        /// Active recording.
        file_name: String,
    },
    /// `file_name` was asked to finalize.
    Stopped {
        /// Recording being finalized.
        file_name: String,
    },
    /// Stop arrived with nothing recording.
    Idle,
    /// Camera or microphone access was not granted.
    PermissionDenied,
    /// The recorder reported an error.
    Failed {
        /// Error description.
        reason: String,
    },
    /// Unrecognized action.
    Ignored,
}

/// Routes shortcut actions to the recorder.
#[derive(Clone)]
pub struct ShortcutRouter {
    recorder: Recorder,
    permissions: PermissionGate,
}

impl ShortcutRouter {
    /// Create a router over a recorder and permission gate.
    pub fn new(recorder: Recorder, permissions: PermissionGate) -> Self {
        Self {
            recorder,
            permissions,
        }
    }

    /// Handle one shortcut launch.
    #[instrument(skip(self))]
    pub async fn handle_shortcut(&self, action: ShortcutAction) -> ShortcutResult {
        match action {
            ShortcutAction::Start => {
                if !self.permissions.request_permission().await {
                    warn!("Shortcut start refused: capture access not granted");
                    return ShortcutResult::PermissionDenied;
                }

                match self.recorder.start().await {
                    Ok(file_name) => {
                        info!(file_name = %file_name, "Shortcut start succeeded");
                        ShortcutResult::Started { file_name }
                    }
                    Err(e) => {
                        error!(error = ?e, "Shortcut start failed");
                        ShortcutResult::Failed {
                            reason: e.to_string(),
                        }
                    }
                }
            }
            ShortcutAction::Stop => match self.recorder.stop().await {
                Ok(StopOutcome::Stopped { file_name }) => {
                    info!(file_name = %file_name, "Shortcut stop succeeded");
                    ShortcutResult::Stopped { file_name }
                }
                Ok(StopOutcome::Idle) => {
                    info!("Shortcut stop: nothing recording");
                    ShortcutResult::Idle
                }
                Err(e) => {
                    error!(error = ?e, "Shortcut stop failed");
                    ShortcutResult::Failed {
                        reason: e.to_string(),
                    }
                }
            },
            ShortcutAction::Other(name) => {
                debug!(action = %name, "Ignoring unrecognized shortcut");
                ShortcutResult::Ignored
            }
        }
    }
}
