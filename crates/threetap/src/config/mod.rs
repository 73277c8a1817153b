mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod recording_config;
mod simulation_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, recording_config::RecordingConfig,
    simulation_config::SimulationConfig,
};

use threetap_core::{DEFAULT_CONTAINER_EXTENSION, DEFAULT_FILE_PREFIX};

pub(crate) const DEFAULT_WARMUP_TIMEOUT_MS: u64 = 1000;
pub(crate) const DEFAULT_WARMUP_POLL_INTERVAL_MS: u64 = 50;
pub(crate) const DEFAULT_CONNECTION_ACTIVATION_MS: u64 = 150;
pub(crate) const DEFAULT_FINALIZE_DELAY_MS: u64 = 200;

pub(crate) fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

pub(crate) fn default_container_extension() -> String {
    DEFAULT_CONTAINER_EXTENSION.to_string()
}

pub(crate) fn default_warmup_timeout_ms() -> u64 {
    DEFAULT_WARMUP_TIMEOUT_MS
}

pub(crate) fn default_warmup_poll_interval_ms() -> u64 {
    DEFAULT_WARMUP_POLL_INTERVAL_MS
}

pub(crate) fn default_connection_activation_ms() -> Option<u64> {
    Some(DEFAULT_CONNECTION_ACTIVATION_MS)
}

pub(crate) fn default_finalize_delay_ms() -> u64 {
    DEFAULT_FINALIZE_DELAY_MS
}

pub(crate) fn default_true() -> bool {
    true
}
