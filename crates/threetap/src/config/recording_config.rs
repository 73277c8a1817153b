use crate::config::{default_container_extension, default_file_prefix};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output naming and placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// File name prefix.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Container extension, without the dot.
    #[serde(default = "default_container_extension")]
    pub container_extension: String,

    /// Output directory (None = the user's documents directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            container_extension: default_container_extension(),
            output_dir: None,
        }
    }
}
