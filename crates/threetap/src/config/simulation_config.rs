use crate::config::{default_connection_activation_ms, default_finalize_delay_ms, default_true};

use serde::{Deserialize, Serialize};

/// Behaviour of the bundled simulated camera stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// A rear-facing camera is present.
    #[serde(default = "default_true")]
    pub rear_camera: bool,

    /// A default camera is present.
    #[serde(default = "default_true")]
    pub default_camera: bool,

    /// A microphone is present.
    #[serde(default = "default_true")]
    pub microphone: bool,

    /// Answer to the camera permission prompt.
    #[serde(default = "default_true")]
    pub grant_camera: bool,

    /// Answer to the microphone permission prompt.
    #[serde(default = "default_true")]
    pub grant_microphone: bool,

    /// Delay before the video connection activates (None = never).
    #[serde(default = "default_connection_activation_ms")]
    pub connection_activation_ms: Option<u64>,

    /// Time a stopped recording takes to finalize.
    #[serde(default = "default_finalize_delay_ms")]
    pub finalize_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rear_camera: true,
            default_camera: true,
            microphone: true,
            grant_camera: true,
            grant_microphone: true,
            connection_activation_ms: default_connection_activation_ms(),
            finalize_delay_ms: default_finalize_delay_ms(),
        }
    }
}
