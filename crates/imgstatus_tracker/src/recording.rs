use imgstatus_core::{
    FailureKind, ImageSize, Milestone, NotificationReplayer, StatusEvent, StatusState, Transition,
};

/// Anything that exposes a load's status flags.
pub trait TracksStatus {
    fn status_state(&self) -> StatusState;
}

/// Status of one load without any consumers attached.
///
/// This is what a [`StatusTracker`](crate::StatusTracker) records into, and
/// what [`clone_for_recording`](crate::StatusTracker::clone_for_recording)
/// hands to a background decode path. It is `Send`, unlike the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingTracker {
    state: StatusState,
    container: Option<ImageSize>,
    failure: Option<FailureKind>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `event`, remembering the container size and the first failure.
    pub fn record(&mut self, event: &StatusEvent) -> Transition {
        let transition = self.state.apply_transition(event);
        if let StatusEvent::StartContainer(size) = event {
            if transition.set.contains(Milestone::HasSize) {
                self.container = Some(*size);
            }
        }
        self.note_failure(event.failure());
        transition
    }

    pub fn state(&self) -> StatusState {
        self.state
    }

    pub fn container_size(&self) -> Option<ImageSize> {
        self.container
    }

    /// The first failure recorded, once the error flag has latched.
    pub fn failure(&self) -> Option<&FailureKind> {
        if self.state.contains(Milestone::HasError) {
            self.failure.as_ref()
        } else {
            None
        }
    }

    pub(crate) fn state_mut(&mut self) -> &mut StatusState {
        &mut self.state
    }

    pub(crate) fn set_multipart(&mut self) -> bool {
        self.state.insert(Milestone::IsMultipart)
    }

    /// Takes over details another recording learned that flags cannot carry.
    pub(crate) fn adopt_details(&mut self, other: &RecordingTracker) {
        if self.container.is_none() {
            self.container = other.container;
        }
        if self.failure.is_none() {
            self.failure = other.failure.clone();
        }
    }

    pub(crate) fn note_failure(&mut self, reported: Option<FailureKind>) {
        if self.failure.is_none() && self.state.contains(Milestone::HasError) {
            self.failure = Some(reported.unwrap_or(FailureKind::Unspecified));
        }
    }

    /// Replayer for the current state; `fallback_size` is used until a container is recorded.
    pub(crate) fn replayer(&self, fallback_size: Option<ImageSize>) -> NotificationReplayer {
        let failure = self.state.contains(Milestone::HasError).then(|| {
            self.failure
                .clone()
                .unwrap_or(FailureKind::Unspecified)
        });
        NotificationReplayer::new(self.container.or(fallback_size), failure)
    }
}

impl TracksStatus for RecordingTracker {
    fn status_state(&self) -> StatusState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_container_and_first_failure() {
        let mut recording = RecordingTracker::new();
        recording.record(&StatusEvent::StartRequest);
        recording.record(&StatusEvent::StartContainer(ImageSize::new(8, 8)));
        recording.record(&StatusEvent::StartContainer(ImageSize::new(9, 9)));
        recording.record(&StatusEvent::StopDecode(Err(FailureKind::Network)));
        recording.record(&StatusEvent::Cancel);

        assert_eq!(recording.container_size(), Some(ImageSize::new(8, 8)));
        assert_eq!(recording.failure(), Some(&FailureKind::Network));
    }

    #[test]
    fn cancel_after_completion_records_no_failure() {
        let mut recording = RecordingTracker::new();
        recording.record(&StatusEvent::StartRequest);
        recording.record(&StatusEvent::StopRequest {
            last_part: true,
            result: Ok(()),
        });
        recording.record(&StatusEvent::Cancel);

        assert_eq!(recording.failure(), None);
    }

    #[test]
    fn recording_can_move_to_a_decode_thread() {
        fn assert_send<T: Send>() {}
        assert_send::<RecordingTracker>();
    }
}
