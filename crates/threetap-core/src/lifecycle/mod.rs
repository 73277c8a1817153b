mod command;
mod event;
mod recorder;
mod state;
mod worker;

pub(crate) use {command::RecorderCommand, state::Lifecycle, worker::RecorderWorker};

pub use {
    event::RecorderEvent,
    recorder::{Recorder, RecorderSettings},
    state::{RecordingHandle, RecordingState, StopOutcome},
};
