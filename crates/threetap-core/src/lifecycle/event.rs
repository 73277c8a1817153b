use crate::FinishReport;

use uuid::Uuid;

/// Lifecycle notifications broadcast to subscribers.
#[derive(Debug, Clone)]
pub enum RecorderEvent {
    /// A recording began writing.
    Started {
        /// Correlation id.
        session_id: Uuid,
        /// Output file name.
        file_name: String,
    },
    /// A recording was asked to finalize.
    Stopping {
        /// Correlation id.
        session_id: Uuid,
        /// Output file name.
        file_name: String,
    },
    /// A recording finished writing, successfully or not.
    Finished(FinishReport),
}
