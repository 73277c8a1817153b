use error_location::ErrorLocation;
use thiserror::Error;

/// Capture session errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Neither a rear-facing nor a default camera is available.
    #[error("No camera device found {location}")]
    NoCameraDevice {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The camera input could not be opened or attached to the capture graph.
    #[error("Camera input rejected: {reason} {location}")]
    CameraInputRejected {
        /// Description of the rejection.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The movie file output could not be attached to the capture graph.
    #[error("Movie output rejected by capture graph {location}")]
    OutputRejected {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The shared audio route could not be put into a recording-capable mode.
    #[error("Audio route error: {reason} {location}")]
    AudioRouteError {
        /// Description of the route failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The output directory could not be resolved or created.
    #[error("Documents directory unavailable {location}")]
    DocumentsDirectoryUnavailable {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A start arrived while the previous recording was still being finalized.
    #[error("Previous recording {file_name} is still finalizing {location}")]
    PreviousRecordingFinalizing {
        /// File name of the recording being finalized.
        file_name: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The serialized recorder worker is no longer running.
    #[error("Recorder unavailable: {reason} {location}")]
    RecorderUnavailable {
        /// Description of the channel failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
