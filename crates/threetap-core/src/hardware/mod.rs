mod session;

pub(crate) use session::{HardwareSession, SinkSlot};

use std::time::Duration;

/// Upper bound on waiting for the video connection after the graph starts.
pub const DEFAULT_WARMUP_TIMEOUT: Duration = Duration::from_millis(1000);

/// Sleep between connection checks during warm-up.
pub const DEFAULT_WARMUP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Bounded wait for the output connection to become active.
///
/// When the timeout elapses the recording starts anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupPolicy {
    /// Total time to wait.
    pub timeout: Duration,
    /// Time between checks.
    pub poll_interval: Duration,
}

impl Default for WarmupPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WARMUP_TIMEOUT,
            poll_interval: DEFAULT_WARMUP_POLL_INTERVAL,
        }
    }
}
