use crate::config::{default_true, default_warmup_poll_interval_ms, default_warmup_timeout_ms};

use serde::{Deserialize, Serialize};

/// Capture hardware behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Upper bound on waiting for the video connection after startup.
    #[serde(default = "default_warmup_timeout_ms")]
    pub warmup_timeout_ms: u64,

    /// Sleep between connection checks during warm-up.
    #[serde(default = "default_warmup_poll_interval_ms")]
    pub warmup_poll_interval_ms: u64,

    /// Use the rear camera when one exists.
    #[serde(default = "default_true")]
    pub prefer_rear_camera: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            warmup_timeout_ms: default_warmup_timeout_ms(),
            warmup_poll_interval_ms: default_warmup_poll_interval_ms(),
            prefer_rear_camera: true,
        }
    }
}
