//! Saved recordings in the output directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

/// Container extensions shown in the recordings list.
pub const RECORDING_EXTENSIONS: [&str; 2] = ["mov", "mp4"];

/// One saved recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingEntry {
    /// File name.
    pub name: String,
    /// Full path.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub date: DateTime<Local>,
}

/// List recordings in `dir`, newest first.
///
/// Any enumeration failure yields an empty list; it is logged, never returned.
pub fn list_recordings(dir: &Path) -> Vec<RecordingEntry> {
    match read_recordings(dir) {
        Ok(entries) => {
            debug!(dir = ?dir, count = entries.len(), "Listed recordings");
            entries
        }
        Err(e) => {
            warn!(dir = ?dir, error = %e, "Failed to list recordings");
            Vec::new()
        }
    }
}

fn read_recordings(dir: &Path) -> io::Result<Vec<RecordingEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if !is_recording_file(&path) {
            continue;
        }

        let metadata = fs::metadata(&path)?;
        if !metadata.is_file() {
            continue;
        }

        entries.push(RecordingEntry {
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: metadata.len(),
            date: DateTime::<Local>::from(metadata.modified()?),
            path,
        });
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(entries)
}

fn is_recording_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            RECORDING_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
