use crate::{
    AppCommand, AppResult, ShortcutResult, ShortcutRouter, config::Config,
    recordings::list_recordings,
};

use threetap_core::{FinishOutcome, PermissionGate, Recorder, RecorderEvent};
use tokio::sync::{broadcast::error::RecvError, mpsc, watch};
use tracing::{error, info, instrument, warn};

/// Main application state.
///
/// Shortcut launches are handled on their own tasks so a slow start never
/// holds up the input loop; the recorder serializes them.
pub struct App {
    pub(crate) recorder: Recorder,
    pub(crate) router: ShortcutRouter,
    pub(crate) permissions: PermissionGate,
    pub(crate) config: Config,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Threetap starting");

        let mut events = self.recorder.subscribe();

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::Shortcut { action } => {
                            let router = self.router.clone();
                            tokio::spawn(async move {
                                let result = router.handle_shortcut(action).await;
                                Self::report_shortcut(&result);
                            });
                        }
                        AppCommand::ListRecordings => self.print_recordings(),
                        AppCommand::Status => self.print_status().await,
                        AppCommand::RequestPermissions => {
                            let permissions = self.permissions.clone();
                            tokio::spawn(async move {
                                let granted = permissions.request_permission().await;
                                println!("permissions granted: {}", granted);
                            });
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                event = events.recv() => match event {
                    Ok(event) => Self::report_event(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Recorder events dropped");
                    }
                    Err(RecvError::Closed) => {
                        info!("Recorder event stream closed");
                        break;
                    }
                },

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        if let Err(e) = self.recorder.shutdown().await {
            error!(error = ?e, "Failed to shut down recorder");
        }

        let _ = self.shutdown_tx.send(true);
        info!("Threetap shut down successfully");

        Ok(())
    }

    fn print_recordings(&self) {
        let dir = match self.config.recordings_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!(error = ?e, "Recordings directory unavailable");
                return;
            }
        };

        let entries = list_recordings(&dir);
        if entries.is_empty() {
            println!("no recordings in {}", dir.display());
        }
        for entry in entries {
            println!(
                "{}\t{} bytes\t{}\t{}",
                entry.name,
                entry.size,
                entry.date.format("%Y-%m-%d %H:%M:%S"),
                entry.path.display()
            );
        }
    }

    async fn print_status(&self) {
        match self.recorder.current().await {
            Ok(Some(handle)) => println!(
                "{:?}: {} ({}s)",
                handle.state,
                handle.file_name,
                handle.started_at.elapsed().as_secs()
            ),
            Ok(None) => println!("idle"),
            Err(e) => error!(error = ?e, "Failed to query recorder"),
        }

        let permissions = self.permissions.status();
        println!(
            "camera granted: {}, microphone granted: {}, writing: {}",
            permissions.camera_granted,
            permissions.microphone_granted,
            self.recorder.is_recording()
        );
    }

    fn report_shortcut(result: &ShortcutResult) {
        match result {
            ShortcutResult::Started { file_name } => println!("start: {}", file_name),
            ShortcutResult::Stopped { file_name } => println!("stop: {}", file_name),
            ShortcutResult::Idle => println!("stop: idle"),
            ShortcutResult::PermissionDenied => println!("start: camera or microphone denied"),
            ShortcutResult::Failed { reason } => println!("failed: {}", reason),
            ShortcutResult::Ignored => {}
        }
    }

    fn report_event(event: RecorderEvent) {
        match event {
            RecorderEvent::Started { file_name, .. } => println!("recording {}", file_name),
            RecorderEvent::Stopping { file_name, .. } => println!("saving {}", file_name),
            RecorderEvent::Finished(report) => match report.outcome {
                FinishOutcome::Completed => println!("saved {}", report.file_name),
                FinishOutcome::Failed(diagnosis) => println!(
                    "failed to save {}: {} ({} {})",
                    report.file_name, diagnosis.description, diagnosis.domain, diagnosis.code
                ),
            },
        }
    }
}
