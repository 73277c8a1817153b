//! Threetap: trigger-driven camera recorder.

mod app;
mod app_command;
mod config;
mod error;
mod recordings;
mod shortcut_action;
mod shortcut_router;
mod stdin_listener;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    shortcut_action::ShortcutAction,
    shortcut_router::{ShortcutResult, ShortcutRouter},
    stdin_listener::StdinListener,
};

use crate::config::Config;

use std::sync::Arc;

use threetap_core::{PermissionGate, Recorder, platform::simulated::SimulatedPlatform};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "threetap=debug,threetap_core=debug";

/// Application entry point.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    // No native capture backend is linked; run against the simulated stack.
    let simulated = SimulatedPlatform::new(config.simulation_options());
    let platform = simulated.platform();

    let (recorder, worker) = Recorder::spawn(&platform, config.recorder_settings());
    let permissions = PermissionGate::new(Arc::clone(&platform.permissions));
    let router = ShortcutRouter::new(recorder.clone(), permissions.clone());

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let listener = StdinListener::new(command_tx);

    let app = App {
        recorder,
        router,
        permissions,
        config,
        command_rx,
        shutdown_tx,
    };

    info!("Enter threetap://start, threetap://stop, list, status, permissions or quit");

    tokio::join!(
        async {
            if let Err(e) = listener.run(shutdown_rx).await {
                error!(error = ?e, "Input listener error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );

    if let Err(e) = worker.await {
        error!(error = ?e, "Recorder worker task panicked");
    }
}
