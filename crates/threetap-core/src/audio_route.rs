//! Keeps the shared audio route in a mode that allows capture.
//!
//! A launch from a shortcut does not go through the app's own UI, so the
//! route may still be in a playback-only category. Capturing in that state
//! starts a file and immediately halts it with no data. The OS may also reset
//! the route between recordings, so the check runs on every start.

use crate::{
    CaptureError, CoreResult,
    platform::{AudioCategory, AudioMode, AudioSessionBackend, RouteOptions},
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Options applied when switching to [`AudioCategory::PlayAndRecord`].
pub(crate) const RECORDING_ROUTE_OPTIONS: RouteOptions = RouteOptions {
    default_to_speaker: true,
    allow_bluetooth: true,
};

pub(crate) struct AudioRouteConfigurator {
    session: Arc<dyn AudioSessionBackend>,
}

impl AudioRouteConfigurator {
    pub(crate) fn new(session: Arc<dyn AudioSessionBackend>) -> Self {
        Self { session }
    }

    /// Switch to a recording-capable category if needed, then activate the route.
    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn ensure_recording_audio_route(&self) -> CoreResult<()> {
        let current = self.session.category();

        if current.supports_recording() {
            debug!(category = ?current, "Audio route already supports recording");
        } else {
            if let Err(e) = self.session.set_category(
                AudioCategory::PlayAndRecord,
                AudioMode::VideoRecording,
                RECORDING_ROUTE_OPTIONS,
            ) {
                return Err(CaptureError::AudioRouteError {
                    reason: format!("Failed to set category: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            info!(from = ?current, "Audio route switched to play-and-record");
        }

        if let Err(e) = self.session.set_active(true) {
            return Err(CaptureError::AudioRouteError {
                reason: format!("Failed to activate route: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
