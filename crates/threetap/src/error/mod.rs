use threetap_core::CaptureError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the threetap binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Capture subsystem error from threetap-core.
    #[error("Capture error: {source} {location}")]
    Capture {
        /// The underlying capture error.
        #[source]
        source: CaptureError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to send message through async channel.
    #[error("Channel send failed: {message} {location}")]
    ChannelSendFailed {
        /// Human-readable error message.
        message: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

// Manual From<CaptureError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<CaptureError> for AppError {
    #[track_caller]
    fn from(source: CaptureError) -> Self {
        AppError::Capture {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
