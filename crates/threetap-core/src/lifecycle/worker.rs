use crate::{
    CaptureError, CoreResult, FileNamer, OutputLocation,
    audio_route::AudioRouteConfigurator,
    completion::CompletionReporter,
    hardware::HardwareSession,
    lifecycle::{
        Lifecycle, RecorderCommand, RecorderEvent, RecordingHandle, RecordingState, StopOutcome,
    },
    platform::SinkEvent,
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::{
    sync::{broadcast, mpsc},
    time::timeout,
};
use tracing::{debug, error, info, instrument, warn};

/// Longest wait at shutdown for the active recording's finish callback.
pub(crate) const SHUTDOWN_FINALIZE_TIMEOUT: Duration = Duration::from_secs(5);

/// The single serialized context owning the hardware session and the
/// recording handle.
///
/// Commands run to completion one at a time. Movie output callbacks arrive
/// from other threads as [`SinkEvent`]s and are applied between commands, so
/// a late finish can never interleave with a start.
pub(crate) struct RecorderWorker {
    pub(crate) audio_route: AudioRouteConfigurator,
    pub(crate) hardware: HardwareSession,
    pub(crate) namer: FileNamer,
    pub(crate) location: OutputLocation,
    pub(crate) reporter: CompletionReporter,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) command_rx: mpsc::Receiver<RecorderCommand>,
    pub(crate) sink_rx: mpsc::UnboundedReceiver<SinkEvent>,
    pub(crate) event_tx: broadcast::Sender<RecorderEvent>,
}

impl RecorderWorker {
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) {
        info!("Recorder worker started");

        loop {
            tokio::select! {
                // Sink events first: a pending finish must clear the handle
                // before the next queued start is looked at.
                biased;

                Some(event) = self.sink_rx.recv() => {
                    self.handle_sink_event(event);
                }

                cmd = self.command_rx.recv() => match cmd {
                    Some(RecorderCommand::Start { reply }) => {
                        let result = self.start().await;
                        let _ = reply.send(result);
                    }
                    Some(RecorderCommand::Stop { reply }) => {
                        let outcome = self.stop();
                        let _ = reply.send(outcome);
                    }
                    Some(RecorderCommand::Current { reply }) => {
                        let _ = reply.send(self.lifecycle.current.clone());
                    }
                    Some(RecorderCommand::Shutdown) | None => {
                        self.shutdown().await;
                        break;
                    }
                },
            }
        }

        info!("Recorder worker stopped");
    }

    #[instrument(skip(self))]
    async fn start(&mut self) -> CoreResult<String> {
        if let Some(handle) = &self.lifecycle.current {
            if handle.state == RecordingState::Recording {
                info!(
                    session_id = %handle.session_id,
                    file_name = %handle.file_name,
                    "Already recording, returning active file"
                );
                return Ok(handle.file_name.clone());
            }

            warn!(
                session_id = %handle.session_id,
                file_name = %handle.file_name,
                "Start rejected while previous recording finalizes"
            );
            return Err(CaptureError::PreviousRecordingFinalizing {
                file_name: handle.file_name.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.lifecycle.starting = true;
        debug!(state = ?self.lifecycle.state(), "Preparing recording");

        let result = self.begin_recording().await;
        self.lifecycle.starting = false;

        match result {
            Ok(handle) => {
                let file_name = handle.file_name.clone();
                info!(
                    session_id = %handle.session_id,
                    file_name = %file_name,
                    "Recording started"
                );
                let _ = self.event_tx.send(RecorderEvent::Started {
                    session_id: handle.session_id,
                    file_name: file_name.clone(),
                });
                self.lifecycle.current = Some(handle);
                Ok(file_name)
            }
            Err(e) => {
                error!(error = ?e, "Failed to start recording");
                Err(e)
            }
        }
    }

    async fn begin_recording(&mut self) -> CoreResult<RecordingHandle> {
        self.audio_route.ensure_recording_audio_route()?;
        self.hardware.ensure_configured()?;
        self.hardware.start();
        self.hardware.wait_for_connection().await;

        let dir = self.location.resolve()?;
        let (file_name, output_path) = self.namer.output_path(&dir);
        self.hardware.begin_writing(&output_path)?;

        Ok(RecordingHandle::new(file_name, output_path))
    }

    #[instrument(skip(self))]
    fn stop(&mut self) -> StopOutcome {
        let Some(handle) = self.lifecycle.current.as_mut() else {
            debug!("Stop requested while idle");
            return StopOutcome::Idle;
        };

        if handle.state == RecordingState::Recording {
            self.hardware.end_writing();
            handle.state = RecordingState::Stopping;

            info!(
                session_id = %handle.session_id,
                file_name = %handle.file_name,
                duration_ms = handle.started_at.elapsed().as_millis(),
                "Recording stopping"
            );
            let _ = self.event_tx.send(RecorderEvent::Stopping {
                session_id: handle.session_id,
                file_name: handle.file_name.clone(),
            });
        } else {
            debug!(file_name = %handle.file_name, "Stop requested while already stopping");
        }

        StopOutcome::Stopped {
            file_name: handle.file_name.clone(),
        }
    }

    fn handle_sink_event(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::Started { path } => self.reporter.on_started(&self.lifecycle, &path),
            SinkEvent::Finished { path, error } => {
                let report = self.reporter.on_finished(&mut self.lifecycle, &path, error);
                let _ = self.event_tx.send(RecorderEvent::Finished(report));
            }
        }
    }

    /// Finalize the active recording, if any, and wait for its finish report.
    async fn shutdown(&mut self) {
        if self.lifecycle.current.is_none() {
            return;
        }

        warn!("Shutting down during a recording, finalizing it");
        self.stop();

        if timeout(SHUTDOWN_FINALIZE_TIMEOUT, self.drain_until_finished())
            .await
            .is_err()
        {
            warn!(
                timeout_ms = SHUTDOWN_FINALIZE_TIMEOUT.as_millis(),
                still_writing = self.hardware.is_writing(),
                "Recording did not finalize before shutdown"
            );
        }

        if let Some(handle) = self.lifecycle.clear() {
            info!(
                session_id = %handle.session_id,
                file_name = %handle.file_name,
                "Recording abandoned at shutdown"
            );
        }
    }

    async fn drain_until_finished(&mut self) {
        while self.lifecycle.current.is_some() {
            let Some(event) = self.sink_rx.recv().await else {
                break;
            };
            self.handle_sink_event(event);
        }
    }
}
