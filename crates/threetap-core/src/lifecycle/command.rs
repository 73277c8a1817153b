use crate::{CoreResult, RecordingHandle, StopOutcome};

use tokio::sync::oneshot;

/// Requests processed by the recorder worker, one at a time, in order.
pub(crate) enum RecorderCommand {
    Start {
        reply: oneshot::Sender<CoreResult<String>>,
    },
    Stop {
        reply: oneshot::Sender<StopOutcome>,
    },
    Current {
        reply: oneshot::Sender<Option<RecordingHandle>>,
    },
    Shutdown,
}
