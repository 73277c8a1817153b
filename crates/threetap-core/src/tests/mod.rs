#![allow(clippy::unwrap_used)]

mod completion;
mod hardware;
mod permission;

use crate::{
    FinishReport, FixedClock, OutputLocation, Recorder, RecorderEvent, RecorderSettings,
    WarmupPolicy,
    platform::simulated::{SimulatedPlatform, SimulationOptions},
};

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, FixedOffset, TimeZone};
use tempfile::TempDir;
use tokio::{sync::broadcast, task::JoinHandle};

/// 2024-03-01 10:15:30 in Japan Standard Time.
pub(crate) fn jst_fixed_time() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(9 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 1, 10, 15, 30)
        .single()
        .unwrap()
}

/// Simulation tuned for fast tests.
pub(crate) fn fast_options() -> SimulationOptions {
    SimulationOptions {
        connection_activation_delay: Some(Duration::from_millis(10)),
        finalize_delay: Duration::from_millis(10),
        video_prompt_delay: Duration::from_millis(1),
        audio_prompt_delay: Duration::from_millis(1),
        ..SimulationOptions::default()
    }
}

pub(crate) struct Fixture {
    pub(crate) simulated: SimulatedPlatform,
    pub(crate) recorder: Recorder,
    pub(crate) worker: JoinHandle<()>,
    pub(crate) dir: TempDir,
}

/// Spawn a recorder over a simulated platform writing into a temp dir with
/// the clock fixed at [`jst_fixed_time`].
pub(crate) fn spawn_recorder(options: SimulationOptions) -> Fixture {
    let simulated = SimulatedPlatform::new(options);
    let dir = tempfile::tempdir().unwrap();

    let settings = RecorderSettings {
        output_location: OutputLocation::Directory(dir.path().to_path_buf()),
        warmup: WarmupPolicy {
            timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(5),
        },
        clock: Arc::new(FixedClock(jst_fixed_time())),
        ..RecorderSettings::default()
    };

    let (recorder, worker) = Recorder::spawn(&simulated.platform(), settings);

    Fixture {
        simulated,
        recorder,
        worker,
        dir,
    }
}

/// Wait for the next finish report, skipping other events.
pub(crate) async fn next_finished(
    events: &mut broadcast::Receiver<RecorderEvent>,
) -> Option<FinishReport> {
    let wait = async {
        loop {
            match events.recv().await {
                Ok(RecorderEvent::Finished(report)) => return Some(report),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(2), wait)
        .await
        .ok()
        .flatten()
}
