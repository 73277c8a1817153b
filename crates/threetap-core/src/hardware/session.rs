use crate::{
    CaptureError, CoreResult,
    hardware::WarmupPolicy,
    platform::{
        CameraPosition, CaptureBackend, CaptureDevice, CaptureGraph, MovieSink, SinkEventSender,
    },
};

use std::{
    fs, io,
    panic::Location,
    path::Path,
    sync::{Arc, OnceLock},
    time::Instant,
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};

/// The movie output, published once the graph is configured.
///
/// Shared with [`crate::Recorder`] so `is_recording` can be answered without
/// going through the worker.
pub(crate) type SinkSlot = Arc<OnceLock<Arc<dyn MovieSink>>>;

/// Owns the capture graph for the life of the recorder.
///
/// The graph is built on the first start and kept running between
/// recordings so later starts skip device setup.
pub(crate) struct HardwareSession {
    backend: Arc<dyn CaptureBackend>,
    graph: Option<Box<dyn CaptureGraph>>,
    sink: SinkSlot,
    events: SinkEventSender,
    warmup: WarmupPolicy,
    prefer_rear_camera: bool,
}

impl HardwareSession {
    pub(crate) fn new(
        backend: Arc<dyn CaptureBackend>,
        sink: SinkSlot,
        events: SinkEventSender,
        warmup: WarmupPolicy,
        prefer_rear_camera: bool,
    ) -> Self {
        Self {
            backend,
            graph: None,
            sink,
            events,
            warmup,
            prefer_rear_camera,
        }
    }

    /// Build the capture graph. No-op once built.
    ///
    /// On failure every input and output added so far is detached and the
    /// graph is discarded, so the next attempt starts from scratch.
    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn ensure_configured(&mut self) -> CoreResult<()> {
        if self.graph.is_some() {
            return Ok(());
        }

        let mut graph = self.backend.new_graph();

        graph.begin_configuration();
        let result = self.configure(graph.as_mut());
        if result.is_err() {
            graph.remove_all();
        }
        graph.commit_configuration();

        let sink = result?;

        if self.sink.set(sink).is_err() {
            warn!("Movie output already published");
        }
        self.graph = Some(graph);

        info!("Capture graph configured");

        Ok(())
    }

    #[track_caller]
    fn configure(&self, graph: &mut dyn CaptureGraph) -> CoreResult<Arc<dyn MovieSink>> {
        let camera = self.select_camera().ok_or(CaptureError::NoCameraDevice {
            location: ErrorLocation::from(Location::caller()),
        })?;

        let camera_input = match self.backend.open_input(&camera) {
            Ok(input) => input,
            Err(e) => {
                return Err(CaptureError::CameraInputRejected {
                    reason: format!("Failed to open {}: {}", camera.name, e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if !graph.can_add_input(&camera_input) {
            return Err(CaptureError::CameraInputRejected {
                reason: format!("Capture graph refused {}", camera.name),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        graph.add_input(camera_input);
        debug!(camera = %camera.name, "Camera input added");

        // Recording without sound beats not recording at all.
        match self.backend.default_microphone() {
            Some(microphone) => match self.backend.open_input(&microphone) {
                Ok(input) if graph.can_add_input(&input) => {
                    graph.add_input(input);
                    debug!(microphone = %microphone.name, "Microphone input added");
                }
                Ok(_) => warn!(microphone = %microphone.name, "Capture graph refused microphone"),
                Err(e) => warn!(error = %e, "Failed to open microphone"),
            },
            None => warn!("No microphone found, recording video only"),
        }

        let sink = self.backend.new_movie_sink();
        if !graph.can_add_output(sink.as_ref()) {
            return Err(CaptureError::OutputRejected {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        graph.add_output(Arc::clone(&sink));

        Ok(sink)
    }

    fn select_camera(&self) -> Option<CaptureDevice> {
        let rear = if self.prefer_rear_camera {
            self.backend.camera(CameraPosition::Back)
        } else {
            None
        };
        rear.or_else(|| self.backend.default_camera())
    }

    /// Start the hardware running. No-op when already running.
    pub(crate) fn start(&mut self) {
        if let Some(graph) = self.graph.as_mut()
            && !graph.is_running()
        {
            graph.start_running();
            info!("Capture graph running");
        }
    }

    /// Wait for the video connection to become active, bounded by the warm-up policy.
    ///
    /// Returns whether the connection became active. Timing out is not an
    /// error: most devices activate promptly and the write is attempted anyway.
    #[instrument(skip(self))]
    pub(crate) async fn wait_for_connection(&self) -> bool {
        let Some(sink) = self.sink.get() else {
            return false;
        };

        let started = Instant::now();
        loop {
            if sink.is_connection_active() {
                debug!(
                    waited_ms = started.elapsed().as_millis(),
                    "Video connection active"
                );
                return true;
            }
            if started.elapsed() >= self.warmup.timeout {
                warn!(
                    timeout_ms = self.warmup.timeout.as_millis(),
                    "Video connection still inactive, starting anyway"
                );
                return false;
            }
            tokio::time::sleep(self.warmup.poll_interval).await;
        }
    }

    /// Point the movie output at `path` and begin writing.
    ///
    /// An existing file at `path` is deleted first. A failed delete is only
    /// logged; the write reports its own error if the path is unusable.
    #[track_caller]
    #[instrument(skip(self))]
    pub(crate) fn begin_writing(&self, path: &Path) -> CoreResult<()> {
        let sink = self.sink.get().ok_or(CaptureError::OutputRejected {
            location: ErrorLocation::from(Location::caller()),
        })?;

        match fs::remove_file(path) {
            Ok(()) => info!(path = ?path, "Removed existing file at output path"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = ?path, error = %e, "Failed to remove existing file"),
        }

        sink.start_recording(path, self.events.clone());

        Ok(())
    }

    /// Ask the movie output to finalize. Completion arrives as a sink event.
    pub(crate) fn end_writing(&self) {
        if let Some(sink) = self.sink.get() {
            sink.stop_recording();
        }
    }

    /// Whether the movie output is writing or finalizing.
    pub(crate) fn is_writing(&self) -> bool {
        self.sink.get().is_some_and(|sink| sink.is_recording())
    }
}

impl Drop for HardwareSession {
    fn drop(&mut self) {
        if let Some(graph) = self.graph.as_mut()
            && graph.is_running()
        {
            graph.stop_running();
            info!("Capture graph stopped");
        }
    }
}
