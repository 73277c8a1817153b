use crate::platform::BackendError;

/// Category of the shared audio route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCategory {
    /// Mixable playback, silenced by the ringer switch.
    Ambient,
    /// Non-mixable playback, silenced by the ringer switch.
    SoloAmbient,
    /// Playback only.
    Playback,
    /// Input only.
    Record,
    /// Simultaneous input and output.
    PlayAndRecord,
}

impl AudioCategory {
    /// Whether microphone capture works in this category.
    pub fn supports_recording(self) -> bool {
        matches!(self, AudioCategory::Record | AudioCategory::PlayAndRecord)
    }
}

/// Signal processing mode applied on top of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMode {
    /// Platform default processing.
    Default,
    /// Tuned for video capture.
    VideoRecording,
}

/// Routing options applied with a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Route output to the built-in speaker instead of the receiver.
    pub default_to_speaker: bool,
    /// Allow Bluetooth hands-free accessories as input/output.
    pub allow_bluetooth: bool,
}

/// The process-wide audio route shared with other apps.
pub trait AudioSessionBackend: Send + Sync {
    /// Currently configured category.
    fn category(&self) -> AudioCategory;

    /// Switch category, mode and options.
    fn set_category(
        &self,
        category: AudioCategory,
        mode: AudioMode,
        options: RouteOptions,
    ) -> Result<(), BackendError>;

    /// Activate or deactivate the route.
    fn set_active(&self, active: bool) -> Result<(), BackendError>;
}
