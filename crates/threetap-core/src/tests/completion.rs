use crate::{
    FinishOutcome,
    completion::CompletionReporter,
    lifecycle::{Lifecycle, RecordingHandle, RecordingState},
    platform::SinkFailure,
};

use std::path::PathBuf;

fn recording_lifecycle(path: &std::path::Path) -> Lifecycle {
    let mut handle = RecordingHandle::new(
        "3tapvideo-20240301_101530.mov".to_string(),
        path.to_path_buf(),
    );
    handle.state = RecordingState::Stopping;
    Lifecycle {
        current: Some(handle),
        starting: false,
    }
}

fn failure() -> SinkFailure {
    SinkFailure {
        domain: "AVFoundationErrorDomain".to_string(),
        code: -11805,
        description: "Cannot Record".to_string(),
    }
}

/// WHAT: A successful finish clears the handle and reports completion
/// WHY: The next start must be accepted immediately
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopping_recording_when_finished_ok_then_cleared_and_completed() {
    // Given: A lifecycle in Stopping
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("3tapvideo-20240301_101530.mov");
    let mut lifecycle = recording_lifecycle(&path);
    let session_id = lifecycle.current.as_ref().unwrap().session_id;

    // When: The finish callback reports success
    let report = CompletionReporter.on_finished(&mut lifecycle, &path, None);

    // Then: Idle again with a completed report for that session
    assert_eq!(lifecycle.state(), RecordingState::Idle);
    assert!(report.succeeded());
    assert_eq!(report.session_id, Some(session_id));
    assert_eq!(report.file_name, "3tapvideo-20240301_101530.mov");
}

/// WHAT: A failure with no file on disk is classified as an early stop
/// WHY: Missing output alongside an error points at route/warm-up problems
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_file_when_finished_with_error_then_early_stop_diagnosed() {
    // Given: A stopping recording whose file was never created
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.mov");
    let mut lifecycle = recording_lifecycle(&path);

    // When: The finish callback reports an error
    let report = CompletionReporter.on_finished(&mut lifecycle, &path, Some(failure()));

    // Then: Handle cleared, failure diagnosed with domain/code and early stop
    assert!(lifecycle.current.is_none());
    let FinishOutcome::Failed(diagnosis) = report.outcome else {
        unreachable!("expected a failed outcome");
    };
    assert_eq!(diagnosis.domain, "AVFoundationErrorDomain");
    assert_eq!(diagnosis.code, -11805);
    assert!(!diagnosis.file_exists);
    assert!(diagnosis.is_early_stop());
}

/// WHAT: A failure with data on disk records its size and is not an early stop
/// WHY: Late write failures need different follow-up than empty files
#[test]
#[allow(clippy::unwrap_used)]
fn given_partial_file_when_finished_with_error_then_size_recorded() {
    // Given: A partially written file
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.mov");
    std::fs::write(&path, vec![0u8; 512]).unwrap();
    let mut lifecycle = recording_lifecycle(&path);

    // When: The finish callback reports an error
    let report = CompletionReporter.on_finished(&mut lifecycle, &path, Some(failure()));

    // Then: Size is captured and it is not an early stop
    let FinishOutcome::Failed(diagnosis) = report.outcome else {
        unreachable!("expected a failed outcome");
    };
    assert!(diagnosis.file_exists);
    assert_eq!(diagnosis.file_size, Some(512));
    assert!(!diagnosis.is_early_stop());
}

/// WHAT: A finish with no active recording still produces a report
/// WHY: Stray callbacks must not panic or leave state inconsistent
#[test]
fn given_idle_lifecycle_when_finished_then_report_uses_path_name() {
    // Given: An idle lifecycle
    let mut lifecycle = Lifecycle::default();
    let path = PathBuf::from("/tmp/stray.mov");

    // When: A finish callback arrives
    let report = CompletionReporter.on_finished(&mut lifecycle, &path, None);

    // Then: Report names the file from the path, no session id
    assert_eq!(report.file_name, "stray.mov");
    assert_eq!(report.session_id, None);
    assert_eq!(lifecycle.state(), RecordingState::Idle);
}
