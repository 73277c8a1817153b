use crate::platform::{BackendError, SinkEventSender};

use std::{path::Path, sync::Arc};

/// Physical placement of a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraPosition {
    /// Facing away from the user.
    Back,
    /// Facing the user.
    Front,
    /// External or position-less device.
    Unspecified,
}

/// What a capture device produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Video source at the given position.
    Camera(CameraPosition),
    /// Audio source.
    Microphone,
}

/// A camera or microphone known to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDevice {
    /// Stable platform identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Device kind.
    pub kind: DeviceKind,
}

/// An opened device, ready to be attached to a capture graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInput {
    /// The device backing this input.
    pub device: CaptureDevice,
}

/// Device discovery and factory for capture graphs and movie outputs.
pub trait CaptureBackend: Send + Sync {
    /// Camera at the requested position, if one exists.
    fn camera(&self, position: CameraPosition) -> Option<CaptureDevice>;

    /// System default camera.
    fn default_camera(&self) -> Option<CaptureDevice>;

    /// System default microphone.
    fn default_microphone(&self) -> Option<CaptureDevice>;

    /// Open a device for capture.
    fn open_input(&self, device: &CaptureDevice) -> Result<DeviceInput, BackendError>;

    /// Create an empty, stopped capture graph.
    fn new_graph(&self) -> Box<dyn CaptureGraph>;

    /// Create a movie output that writes finished containers to files.
    fn new_movie_sink(&self) -> Arc<dyn MovieSink>;
}

/// The live camera/microphone capture graph.
///
/// Additions must be checked with the matching `can_add_*` call first.
/// The recorder holds the graph across awaits on a multi-threaded runtime, so
/// implementations must be `Sync`.
pub trait CaptureGraph: Send + Sync {
    /// Start batching configuration changes.
    fn begin_configuration(&mut self);

    /// Apply batched configuration changes.
    fn commit_configuration(&mut self);

    /// Whether `input` can be attached.
    fn can_add_input(&self, input: &DeviceInput) -> bool;

    /// Attach an input.
    fn add_input(&mut self, input: DeviceInput);

    /// Whether `sink` can be attached.
    fn can_add_output(&self, sink: &dyn MovieSink) -> bool;

    /// Attach an output.
    fn add_output(&mut self, sink: Arc<dyn MovieSink>);

    /// Detach every input and output.
    fn remove_all(&mut self);

    /// Begin running the hardware.
    fn start_running(&mut self);

    /// Stop running the hardware.
    fn stop_running(&mut self);

    /// Whether the hardware is running.
    fn is_running(&self) -> bool;
}

/// File-writing movie output attached to a capture graph.
///
/// Methods take `&self`: implementations are internally synchronized so
/// `is_recording` can be read from any thread.
pub trait MovieSink: Send + Sync {
    /// Begin writing to `path`. Progress is reported through `events`.
    fn start_recording(&self, path: &Path, events: SinkEventSender);

    /// Request the current file be finalized. Returns before finalization completes.
    fn stop_recording(&self);

    /// Whether a file is currently being written or finalized.
    fn is_recording(&self) -> bool;

    /// Whether the video connection feeding this output is active.
    fn is_connection_active(&self) -> bool;
}
