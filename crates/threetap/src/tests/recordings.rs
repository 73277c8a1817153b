use crate::recordings::list_recordings;

use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};

#[allow(clippy::unwrap_used)]
fn write_with_mtime(path: &Path, bytes: &[u8], age: Duration) {
    fs::write(path, bytes).unwrap();
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

/// WHAT: Recordings are listed newest first with name, size and path
/// WHY: The recordings screen shows the latest capture at the top
#[test]
#[allow(clippy::unwrap_used)]
fn given_recordings_when_listing_then_sorted_newest_first() {
    // Given: Three recordings with different ages
    let dir = tempfile::tempdir().unwrap();
    write_with_mtime(
        &dir.path().join("3tapvideo-20240101_080000.mov"),
        b"old",
        Duration::from_secs(3600),
    );
    write_with_mtime(
        &dir.path().join("3tapvideo-20240301_101530.mov"),
        b"newest",
        Duration::from_secs(0),
    );
    write_with_mtime(
        &dir.path().join("clip.mp4"),
        b"middle",
        Duration::from_secs(60),
    );

    // When: Listing
    let entries = list_recordings(dir.path());

    // Then: Newest first, with sizes and full paths
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "3tapvideo-20240301_101530.mov",
            "clip.mp4",
            "3tapvideo-20240101_080000.mov"
        ]
    );
    assert_eq!(entries[0].size, 6);
    assert_eq!(
        entries[0].path,
        dir.path().join("3tapvideo-20240301_101530.mov")
    );
}

/// WHAT: Only known container extensions are listed
/// WHY: Config files and partial downloads must not appear as recordings
#[test]
#[allow(clippy::unwrap_used)]
fn given_mixed_files_when_listing_then_only_containers() {
    // Given: Containers alongside unrelated files and a directory
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.MOV"), b"x").unwrap();
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    fs::write(dir.path().join("no_extension"), b"x").unwrap();
    fs::create_dir(dir.path().join("folder.mov")).unwrap();

    // When: Listing
    let entries = list_recordings(dir.path());

    // Then: Only the container file is listed
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "a.MOV");
}

/// WHAT: A missing directory yields an empty list
/// WHY: Enumeration failures are absorbed, never shown as errors
#[test]
fn given_missing_directory_when_listing_then_empty() {
    // Given: A directory that does not exist
    let missing = Path::new("/nonexistent/threetap/recordings");

    // When: Listing
    let entries = list_recordings(missing);

    // Then: Empty list
    assert!(entries.is_empty());
}
