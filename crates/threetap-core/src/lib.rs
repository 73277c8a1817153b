//! Threetap Core Library
//!
//! Capture session manager for a trigger-driven camera recorder. Owns the
//! camera/microphone session, serializes start/stop requests, guarantees at
//! most one active recording, and reports how each recording finished.
//!
//! # Example
//!
//! ```no_run
//! use threetap_core::{
//!     CoreResult, PermissionGate, Recorder, RecorderSettings,
//!     platform::simulated::{SimulatedPlatform, SimulationOptions},
//! };
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let simulated = SimulatedPlatform::new(SimulationOptions::default());
//!     let platform = simulated.platform();
//!
//!     if PermissionGate::new(platform.permissions.clone()).request_permission().await {
//!         let (recorder, _worker) = Recorder::spawn(&platform, RecorderSettings::default());
//!         let file_name = recorder.start().await?;
//!         println!("Recording to {}", file_name);
//!         recorder.stop().await?;
//!     }
//!     Ok(())
//! }
//! ```

mod audio_route;
mod completion;
mod error;
mod hardware;
mod lifecycle;
mod naming;
mod permission;
pub mod platform;

pub use {
    completion::{FinishOutcome, FinishReport, WriteDiagnosis},
    error::{CaptureError, Result as CoreResult},
    hardware::{DEFAULT_WARMUP_POLL_INTERVAL, DEFAULT_WARMUP_TIMEOUT, WarmupPolicy},
    lifecycle::{
        Recorder, RecorderEvent, RecorderSettings, RecordingHandle, RecordingState, StopOutcome,
    },
    naming::{
        Clock, DEFAULT_CONTAINER_EXTENSION, DEFAULT_FILE_PREFIX, FileNamer, FixedClock,
        OutputLocation, SystemClock,
    },
    permission::{PermissionGate, PermissionState},
};

#[cfg(test)]
mod tests;
