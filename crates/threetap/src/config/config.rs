//! Configuration management for threetap.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations, and maps the file onto recorder and
//! simulation settings.

use crate::{
    AppError, AppResult,
    config::{CaptureConfig, RecordingConfig, SimulationConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use threetap_core::{
    OutputLocation, RecorderSettings, SystemClock, WarmupPolicy,
    platform::simulated::SimulationOptions,
};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Output naming and placement.
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Capture hardware behaviour.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Simulated camera stack behaviour.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load configuration from an explicit file.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to `config_path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Where recordings are written.
    pub fn output_location(&self) -> OutputLocation {
        match &self.recording.output_dir {
            Some(dir) => OutputLocation::Directory(dir.clone()),
            None => OutputLocation::Documents,
        }
    }

    /// Resolve the recordings directory, creating it if needed.
    #[track_caller]
    pub fn recordings_dir(&self) -> AppResult<PathBuf> {
        Ok(self.output_location().resolve()?)
    }

    /// Recorder settings derived from this configuration.
    pub fn recorder_settings(&self) -> RecorderSettings {
        RecorderSettings {
            file_prefix: self.recording.file_prefix.clone(),
            container_extension: self.recording.container_extension.clone(),
            output_location: self.output_location(),
            warmup: WarmupPolicy {
                timeout: Duration::from_millis(self.capture.warmup_timeout_ms),
                poll_interval: Duration::from_millis(self.capture.warmup_poll_interval_ms),
            },
            prefer_rear_camera: self.capture.prefer_rear_camera,
            clock: Arc::new(SystemClock),
        }
    }

    /// Simulated camera stack options derived from this configuration.
    pub fn simulation_options(&self) -> SimulationOptions {
        let simulation = &self.simulation;
        SimulationOptions {
            rear_camera: simulation.rear_camera,
            default_camera: simulation.default_camera,
            microphone: simulation.microphone,
            video_grant: simulation.grant_camera,
            audio_grant: simulation.grant_microphone,
            connection_activation_delay: simulation
                .connection_activation_ms
                .map(Duration::from_millis),
            finalize_delay: Duration::from_millis(simulation.finalize_delay_ms),
            ..SimulationOptions::default()
        }
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let Some(proj_dirs) = ProjectDirs::from("com", "threetap", "Threetap") else {
            return Err(AppError::ConfigError {
                reason: "Failed to get config directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        Self::config_file_in(proj_dirs.config_dir())
    }

    /// Path of `config.toml` inside `config_dir`, creating the directory if needed.
    #[track_caller]
    pub(crate) fn config_file_in(config_dir: &Path) -> AppResult<PathBuf> {
        if !config_dir.exists() {
            match fs::create_dir_all(config_dir) {
                Ok(()) => debug!(config_dir = ?config_dir, "Created config directory"),
                Err(e) => {
                    return Err(AppError::ConfigError {
                        reason: format!("Failed to create config directory: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }

        Ok(config_dir.join("config.toml"))
    }
}
