//! Seams between the capture core and the operating system's media stack.
//!
//! Native backends implement these traits; [`simulated`] provides a complete
//! in-process implementation used by tests and on hosts without camera access.

mod audio_session;
mod capture;
mod permission;
mod sink_event;
pub mod simulated;

pub use {
    audio_session::{AudioCategory, AudioMode, AudioSessionBackend, RouteOptions},
    capture::{
        CameraPosition, CaptureBackend, CaptureDevice, CaptureGraph, DeviceInput, DeviceKind,
        MovieSink,
    },
    permission::{AuthorizationStatus, MediaKind, PermissionBackend},
    sink_event::{SinkEvent, SinkEventSender, SinkFailure},
};

use std::sync::Arc;

use thiserror::Error;

/// Failure reported by a platform backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(pub String);

/// The set of platform backends a recorder runs against.
#[derive(Clone)]
pub struct Platform {
    /// Camera, microphone and movie output access.
    pub capture: Arc<dyn CaptureBackend>,
    /// Shared audio route.
    pub audio_session: Arc<dyn AudioSessionBackend>,
    /// Camera and microphone access grants.
    pub permissions: Arc<dyn PermissionBackend>,
}
