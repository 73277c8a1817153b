use crate::{
    CaptureError, Clock, CoreResult, FileNamer, OutputLocation, SystemClock, WarmupPolicy,
    audio_route::AudioRouteConfigurator,
    completion::CompletionReporter,
    hardware::{HardwareSession, SinkSlot},
    lifecycle::{
        Lifecycle, RecorderCommand, RecorderEvent, RecorderWorker, RecordingHandle, StopOutcome,
    },
    naming::{DEFAULT_CONTAINER_EXTENSION, DEFAULT_FILE_PREFIX},
    platform::{Platform, SinkEventSender},
};

use std::{
    panic::Location,
    sync::{Arc, OnceLock},
};

use error_location::ErrorLocation;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{info, instrument};

/// Pending commands the worker will queue before callers wait on send.
const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// Lifecycle events buffered per subscriber.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How recordings are named, placed and started.
#[derive(Clone)]
pub struct RecorderSettings {
    /// File name prefix.
    pub file_prefix: String,
    /// Container extension, without the dot.
    pub container_extension: String,
    /// Directory recordings are written to.
    pub output_location: OutputLocation,
    /// Bounded wait for the video connection after the graph starts.
    pub warmup: WarmupPolicy,
    /// Use the rear camera when one exists.
    pub prefer_rear_camera: bool,
    /// Clock used for file names.
    pub clock: Arc<dyn Clock>,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            container_extension: DEFAULT_CONTAINER_EXTENSION.to_string(),
            output_location: OutputLocation::Documents,
            warmup: WarmupPolicy::default(),
            prefer_rear_camera: true,
            clock: Arc::new(SystemClock),
        }
    }
}

/// Cloneable handle to the capture session manager.
///
/// Every start and stop funnels through one worker task, so concurrent
/// triggers cannot both pass the idle check. At most one recording is active
/// at a time.
#[derive(Clone)]
pub struct Recorder {
    command_tx: mpsc::Sender<RecorderCommand>,
    sink: SinkSlot,
    event_tx: broadcast::Sender<RecorderEvent>,
}

impl Recorder {
    /// Spawn the worker on the current Tokio runtime.
    ///
    /// Hardware is not touched until the first start.
    #[instrument(skip_all)]
    pub fn spawn(platform: &Platform, settings: RecorderSettings) -> (Self, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (sink_tx, sink_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let sink: SinkSlot = Arc::new(OnceLock::new());

        let worker = RecorderWorker {
            audio_route: AudioRouteConfigurator::new(Arc::clone(&platform.audio_session)),
            hardware: HardwareSession::new(
                Arc::clone(&platform.capture),
                Arc::clone(&sink),
                SinkEventSender::new(sink_tx),
                settings.warmup,
                settings.prefer_rear_camera,
            ),
            namer: FileNamer::new(
                settings.file_prefix,
                settings.container_extension,
                settings.clock,
            ),
            location: settings.output_location,
            reporter: CompletionReporter,
            lifecycle: Lifecycle::default(),
            command_rx,
            sink_rx,
            event_tx: event_tx.clone(),
        };

        let handle = tokio::spawn(worker.run());

        info!("Recorder spawned");

        (
            Self {
                command_tx,
                sink,
                event_tx,
            },
            handle,
        )
    }

    /// Start recording, or return the active file name if already recording.
    ///
    /// # Errors
    ///
    /// Returns the configuration, route or placement error that prevented the
    /// start. The recorder is idle afterwards.
    pub async fn start(&self) -> CoreResult<String> {
        let (reply, rx) = oneshot::channel();
        self.send(RecorderCommand::Start { reply }).await?;
        match rx.await {
            Ok(result) => result,
            Err(e) => Err(CaptureError::RecorderUnavailable {
                reason: format!("Failed to receive start response: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Ask the active recording to finalize.
    ///
    /// Returns as soon as the request is submitted. Whether the file was
    /// written successfully is reported later through [`Recorder::subscribe`].
    pub async fn stop(&self) -> CoreResult<StopOutcome> {
        let (reply, rx) = oneshot::channel();
        self.send(RecorderCommand::Stop { reply }).await?;
        match rx.await {
            Ok(reply) => Ok(reply),
            Err(e) => Err(CaptureError::RecorderUnavailable {
                reason: format!("Failed to receive stop response: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Snapshot of the active recording, if any.
    pub async fn current(&self) -> CoreResult<Option<RecordingHandle>> {
        let (reply, rx) = oneshot::channel();
        self.send(RecorderCommand::Current { reply }).await?;
        match rx.await {
            Ok(reply) => Ok(reply),
            Err(e) => Err(CaptureError::RecorderUnavailable {
                reason: format!("Failed to receive status response: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Whether the movie output is writing. Does not wait on the worker.
    pub fn is_recording(&self) -> bool {
        self.sink.get().is_some_and(|sink| sink.is_recording())
    }

    /// Receive lifecycle events, including write failures.
    pub fn subscribe(&self) -> broadcast::Receiver<RecorderEvent> {
        self.event_tx.subscribe()
    }

    /// Stop the worker after the commands already queued.
    ///
    /// An active recording is finalized first; the worker exits once its
    /// `Finished` event has been sent or the finalize wait runs out.
    pub async fn shutdown(&self) -> CoreResult<()> {
        self.send(RecorderCommand::Shutdown).await
    }

    async fn send(&self, command: RecorderCommand) -> CoreResult<()> {
        if self.command_tx.send(command).await.is_err() {
            return Err(CaptureError::RecorderUnavailable {
                reason: "Recorder worker has shut down".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}
