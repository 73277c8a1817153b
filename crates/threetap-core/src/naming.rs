//! Output file identity and placement.

use crate::{CaptureError, CoreResult};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, FixedOffset, Local};
use directories::UserDirs;
use error_location::ErrorLocation;
use tracing::{debug, warn};

/// Default file name prefix.
pub const DEFAULT_FILE_PREFIX: &str = "3tapvideo";

/// Default container extension.
pub const DEFAULT_CONTAINER_EXTENSION: &str = "mov";

/// Timestamp layout. chrono formats numerically regardless of system locale.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Source of wall-clock time for file names.
pub trait Clock: Send + Sync {
    /// Current time with its UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Builds `<prefix>-<yyyyMMdd_HHmmss>.<extension>` names.
///
/// Names have one-second resolution. Two starts within the same second map
/// to the same path; the previous file at that path is deleted before writing.
#[derive(Clone)]
pub struct FileNamer {
    prefix: String,
    extension: String,
    clock: Arc<dyn Clock>,
}

impl FileNamer {
    /// Create a namer reading time from `clock`.
    pub fn new(
        prefix: impl Into<String>,
        extension: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
            clock,
        }
    }

    /// File name for a recording starting now.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.{}",
            self.prefix,
            self.clock.now().format(TIMESTAMP_FORMAT),
            self.extension
        )
    }

    /// File name and full path for a recording starting now under `dir`.
    pub fn output_path(&self, dir: &Path) -> (String, PathBuf) {
        let name = self.file_name();
        let path = dir.join(&name);
        (name, path)
    }
}

impl Default for FileNamer {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_PREFIX, DEFAULT_CONTAINER_EXTENSION, Arc::new(SystemClock))
    }
}

/// Directory recordings are written to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputLocation {
    /// The user's documents directory.
    #[default]
    Documents,
    /// An explicit directory.
    Directory(PathBuf),
}

impl OutputLocation {
    /// Resolve to an existing directory, creating it if needed.
    #[track_caller]
    pub fn resolve(&self) -> CoreResult<PathBuf> {
        let target = match self {
            OutputLocation::Documents => {
                UserDirs::new().and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
            }
            OutputLocation::Directory(dir) => Some(dir.clone()),
        };
        let Some(dir) = target else {
            return Err(CaptureError::DocumentsDirectoryUnavailable {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if !dir.is_dir() {
            match fs::create_dir_all(&dir) {
                Ok(()) => debug!(dir = ?dir, "Created output directory"),
                Err(e) => {
                    warn!(dir = ?dir, error = %e, "Failed to create output directory");
                    return Err(CaptureError::DocumentsDirectoryUnavailable {
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }

        Ok(dir)
    }
}
