use crate::{
    CaptureError, WarmupPolicy,
    hardware::HardwareSession,
    platform::{
        SinkEvent, SinkEventSender,
        simulated::{SimulatedPlatform, SimulationOptions},
    },
    tests::fast_options,
};

use std::{
    sync::{Arc, OnceLock},
    time::{Duration, Instant},
};

use tokio::sync::mpsc;

const TEST_WARMUP: WarmupPolicy = WarmupPolicy {
    timeout: Duration::from_millis(100),
    poll_interval: Duration::from_millis(5),
};

fn session(
    simulated: &SimulatedPlatform,
) -> (HardwareSession, mpsc::UnboundedReceiver<SinkEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let session = HardwareSession::new(
        Arc::clone(&simulated.platform().capture),
        Arc::new(OnceLock::new()),
        SinkEventSender::new(tx),
        TEST_WARMUP,
        true,
    );
    (session, rx)
}

/// WHAT: Configuring twice builds the capture graph once
/// WHY: The graph is kept warm across recordings for fast restarts
#[test]
#[allow(clippy::unwrap_used)]
fn given_configured_session_when_configuring_again_then_no_op() {
    // Given: A session configured once
    let simulated = SimulatedPlatform::new(fast_options());
    let (mut session, _rx) = session(&simulated);
    session.ensure_configured().unwrap();

    // When: Configuring again
    let result = session.ensure_configured();

    // Then: Success without building a second graph
    assert!(result.is_ok());
    assert_eq!(simulated.graphs_built(), 1);
}

/// WHAT: Missing cameras yield NoCameraDevice and leave nothing behind
/// WHY: A later attempt must be able to configure from scratch
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_camera_when_configuring_then_no_camera_error_and_retry_possible() {
    // Given: A platform with neither rear nor default camera
    let simulated = SimulatedPlatform::new(SimulationOptions {
        rear_camera: false,
        default_camera: false,
        ..fast_options()
    });
    let (mut session, _rx) = session(&simulated);

    // When: Configuring
    let result = session.ensure_configured();

    // Then: NoCameraDevice, and a retry after a camera appears succeeds
    assert!(matches!(result, Err(CaptureError::NoCameraDevice { .. })));
    simulated.update_options(|o| o.default_camera = true);
    session.ensure_configured().unwrap();
    assert_eq!(simulated.graphs_built(), 2);
}

/// WHAT: Without a rear camera the default camera is used
/// WHY: Devices without a back camera must still record
#[test]
fn given_only_default_camera_when_configuring_then_succeeds() {
    // Given: No rear camera, default camera present
    let simulated = SimulatedPlatform::new(SimulationOptions {
        rear_camera: false,
        ..fast_options()
    });
    let (mut session, _rx) = session(&simulated);

    // When: Configuring
    let result = session.ensure_configured();

    // Then: Configuration succeeds
    assert!(result.is_ok());
}

/// WHAT: A camera that cannot be opened yields CameraInputRejected
/// WHY: Input failures must be distinguishable from missing hardware
#[test]
fn given_camera_in_use_when_configuring_then_camera_input_rejected() {
    // Given: A camera that refuses to open
    let simulated = SimulatedPlatform::new(SimulationOptions {
        reject_camera_input: true,
        ..fast_options()
    });
    let (mut session, _rx) = session(&simulated);

    // When: Configuring
    let result = session.ensure_configured();

    // Then: CameraInputRejected and no movie output was published
    assert!(matches!(
        result,
        Err(CaptureError::CameraInputRejected { .. })
    ));
    assert!(!session.is_writing());
    assert!(matches!(
        session.begin_writing(std::path::Path::new("/unused.mov")),
        Err(CaptureError::OutputRejected { .. })
    ));
}

/// WHAT: A refused movie output yields OutputRejected
/// WHY: Without an output nothing can be written
#[test]
fn given_output_refused_when_configuring_then_output_rejected() {
    // Given: A graph that refuses outputs
    let simulated = SimulatedPlatform::new(SimulationOptions {
        reject_output: true,
        ..fast_options()
    });
    let (mut session, _rx) = session(&simulated);

    // When: Configuring
    let result = session.ensure_configured();

    // Then: OutputRejected
    assert!(matches!(result, Err(CaptureError::OutputRejected { .. })));
}

/// WHAT: A missing or refused microphone is tolerated
/// WHY: Video-only recordings are better than none
#[test]
fn given_no_microphone_when_configuring_then_succeeds() {
    // Given: No microphone on one platform, a refused one on another
    let missing = SimulatedPlatform::new(SimulationOptions {
        microphone: false,
        ..fast_options()
    });
    let refused = SimulatedPlatform::new(SimulationOptions {
        reject_microphone_input: true,
        ..fast_options()
    });

    // When: Configuring both
    let (mut missing_session, _rx1) = session(&missing);
    let (mut refused_session, _rx2) = session(&refused);

    // Then: Both succeed
    assert!(missing_session.ensure_configured().is_ok());
    assert!(refused_session.ensure_configured().is_ok());
}

/// WHAT: Starting a running graph is a no-op
/// WHY: Every recording calls start; only the first should touch hardware
#[test]
#[allow(clippy::unwrap_used)]
fn given_running_graph_when_starting_again_then_runs_once() {
    // Given: A configured, running session
    let simulated = SimulatedPlatform::new(fast_options());
    let (mut session, _rx) = session(&simulated);
    session.ensure_configured().unwrap();
    session.start();

    // When: Starting again
    session.start();

    // Then: The graph was started exactly once
    assert_eq!(simulated.runs_started(), 1);
}

/// WHAT: Warm-up gives up after its timeout without failing
/// WHY: Persistently inactive hardware must not hang a start
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_connection_never_active_when_waiting_then_returns_after_timeout() {
    // Given: A connection that never activates
    let simulated = SimulatedPlatform::new(SimulationOptions {
        connection_activation_delay: None,
        ..fast_options()
    });
    let (mut session, _rx) = session(&simulated);
    session.ensure_configured().unwrap();
    session.start();

    // When: Waiting for the connection
    let started = Instant::now();
    let active = session.wait_for_connection().await;

    // Then: Returns false once the bounded window elapsed
    assert!(!active);
    assert!(started.elapsed() >= TEST_WARMUP.timeout);
    assert!(started.elapsed() < Duration::from_secs(2));
}

/// WHAT: Warm-up returns as soon as the connection activates
/// WHY: Devices that activate promptly should not pay the full timeout
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_connection_activates_when_waiting_then_true() {
    // Given: A connection that activates after 10ms
    let simulated = SimulatedPlatform::new(fast_options());
    let (mut session, _rx) = session(&simulated);
    session.ensure_configured().unwrap();
    session.start();

    // When: Waiting for the connection
    let active = session.wait_for_connection().await;

    // Then: Active
    assert!(active);
}

/// WHAT: Warm-up can be awaited from a spawned task
/// WHY: The recorder worker runs on the multi-threaded runtime and holds the session across awaits
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_started_session_when_warmup_awaited_on_spawned_task_then_true() {
    // Given: A configured, running session moved onto another task
    let simulated = SimulatedPlatform::new(fast_options());
    let (mut session, _rx) = session(&simulated);
    session.ensure_configured().unwrap();
    session.start();

    // When: Waiting for the connection on a spawned task
    let active = tokio::spawn(async move { session.wait_for_connection().await })
        .await
        .unwrap();

    // Then: Active
    assert!(active);
}

/// WHAT: Writing replaces a stale file and reports start and finish
/// WHY: Collisions at the computed path must not block a new recording
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_stale_file_when_writing_then_replaced_and_events_reported() {
    // Given: A running session and a stale file at the target path
    let simulated = SimulatedPlatform::new(fast_options());
    let (mut session, mut rx) = session(&simulated);
    session.ensure_configured().unwrap();
    session.start();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("3tapvideo-20240301_101530.mov");
    std::fs::write(&path, b"stale recording").unwrap();

    // When: Writing to that path, then ending the write
    session.begin_writing(&path).unwrap();
    let started = rx.recv().await.unwrap();
    assert!(session.is_writing());
    session.end_writing();
    let finished = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();

    // Then: The stale content is gone and both events arrived in order
    assert_ne!(std::fs::read(&path).unwrap(), b"stale recording");
    assert_eq!(started, SinkEvent::Started { path: path.clone() });
    assert_eq!(finished, SinkEvent::Finished { path, error: None });
    assert!(!session.is_writing());
}
