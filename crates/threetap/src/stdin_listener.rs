//! Line-oriented trigger input.
//!
//! Each line is a shortcut URL (`threetap://start`) or a console command
//! (`list`, `status`, `permissions`, `quit`). This is the desktop stand-in for
//! URL-scheme launches.

use crate::{AppCommand, AppError, AppResult};

use std::{io::BufRead, panic::Location};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Forwards input lines to the application as commands.
pub struct StdinListener {
    command_tx: mpsc::Sender<AppCommand>,
}

impl StdinListener {
    /// Create a listener sending to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run until shutdown is signalled or input ends.
    ///
    /// End of input is treated as a shutdown request.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Not spawn_blocking: runtime shutdown must not wait on a pending read.
        // Exits on EOF or once line_rx is dropped.
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Input listener shutting down");
                    break;
                }
                line = line_rx.recv() => match line {
                    Some(line) => {
                        let Some(command) = AppCommand::parse(&line) else {
                            continue;
                        };
                        debug!(command = ?command, "Input command received");
                        self.send(command).await?;
                    }
                    None => {
                        info!("Input closed, requesting shutdown");
                        if let Err(e) = self.send(AppCommand::Shutdown).await {
                            warn!(error = ?e, "Application already stopped");
                        }
                        break;
                    }
                },
            }
        }

        Ok(())
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        if let Err(e) = self.command_tx.send(command).await {
            return Err(AppError::ChannelSendFailed {
                message: format!("Failed to send command: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}
