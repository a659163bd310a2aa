use std::sync::mpsc;

use imgstatus_core::StatusEvent;

/// Records decode progress from any thread.
///
/// Events are queued for the owning [`StatusTracker`](crate::StatusTracker),
/// which applies them when its controlling context calls
/// [`process_recorded_events`](crate::StatusTracker::process_recorded_events).
#[derive(Debug, Clone)]
pub struct DecodeRecorder {
    tx: mpsc::Sender<StatusEvent>,
}

impl DecodeRecorder {
    pub(crate) fn new(tx: mpsc::Sender<StatusEvent>) -> Self {
        Self { tx }
    }

    /// Queues `event`. Returns `false` once the tracker is gone.
    pub fn record(&self, event: StatusEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}
