//! Camera and microphone access grants.

use crate::platform::{AuthorizationStatus, MediaKind, PermissionBackend};

use std::sync::Arc;

use tracing::{info, instrument, warn};

/// Snapshot of both grants. Never cached: the OS is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionState {
    /// Camera access granted.
    pub camera_granted: bool,
    /// Microphone access granted.
    pub microphone_granted: bool,
}

impl PermissionState {
    /// Both grants present.
    pub fn all_granted(&self) -> bool {
        self.camera_granted && self.microphone_granted
    }
}

/// Queries and requests camera and microphone access.
#[derive(Clone)]
pub struct PermissionGate {
    backend: Arc<dyn PermissionBackend>,
}

impl PermissionGate {
    /// Create a gate over the platform's permission prompts.
    pub fn new(backend: Arc<dyn PermissionBackend>) -> Self {
        Self { backend }
    }

    /// Read both grants without prompting.
    pub fn status(&self) -> PermissionState {
        PermissionState {
            camera_granted: self.backend.authorization_status(MediaKind::Video)
                == AuthorizationStatus::Authorized,
            microphone_granted: self.backend.authorization_status(MediaKind::Audio)
                == AuthorizationStatus::Authorized,
        }
    }

    /// Ask for camera and microphone access.
    ///
    /// Both prompts run concurrently and both answers are awaited before
    /// resolving, so a denial of one never hides the outcome of the other.
    /// Resolves `true` only when both are granted.
    #[instrument(skip(self))]
    pub async fn request_permission(&self) -> bool {
        let (camera_granted, microphone_granted) = tokio::join!(
            self.backend.request_access(MediaKind::Video),
            self.backend.request_access(MediaKind::Audio),
        );

        let state = PermissionState {
            camera_granted,
            microphone_granted,
        };

        if state.all_granted() {
            info!("Camera and microphone access granted");
        } else {
            warn!(camera_granted, microphone_granted, "Capture access not granted");
        }

        state.all_granted()
    }
}
