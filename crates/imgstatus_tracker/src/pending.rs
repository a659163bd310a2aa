use std::collections::VecDeque;
use std::rc::Weak;

use imgstatus_core::{StatusDiff, StatusState, Transition};

use crate::consumer::ImageConsumer;
use crate::ids::{ConsumerId, ReplayTaskId};

/// What a pending replay delivers when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayMode {
    /// The snapshot plus everything recorded before the replay runs.
    FollowUpdates,
    /// Only the snapshot taken when the replay was scheduled.
    CurrentState,
}

/// A scheduled catch-up for exactly one consumer.
#[derive(Debug)]
pub(crate) struct PendingReplay {
    pub(crate) id: ReplayTaskId,
    pub(crate) target: Weak<dyn ImageConsumer>,
    /// Set when the target is in the registry; removal cancels the replay.
    pub(crate) consumer_id: Option<ConsumerId>,
    pub(crate) mode: ReplayMode,
    snapshot: StatusState,
    accumulated: StatusDiff,
    /// Parts of a multipart load that finished while this replay waited.
    earlier_parts: Vec<StatusState>,
    /// Decoded frames of the consumer's current part were discarded meanwhile.
    discarded: bool,
}

impl PendingReplay {
    pub(crate) fn new(
        id: ReplayTaskId,
        target: Weak<dyn ImageConsumer>,
        consumer_id: Option<ConsumerId>,
        mode: ReplayMode,
        snapshot: StatusState,
    ) -> Self {
        Self {
            id,
            target,
            consumer_id,
            mode,
            snapshot,
            accumulated: StatusDiff::no_change(),
            earlier_parts: Vec::new(),
            discarded: false,
        }
    }

    /// Turns a snapshot into the follow-updates replay of an attached consumer.
    pub(crate) fn follow_from(&mut self, consumer_id: ConsumerId, state: StatusState) {
        self.consumer_id = Some(consumer_id);
        self.mode = ReplayMode::FollowUpdates;
        self.snapshot = state;
        self.accumulated = StatusDiff::no_change();
        self.earlier_parts.clear();
    }

    /// Whether the consumer must be told about a discard before the replay.
    pub(crate) fn discarded(&self) -> bool {
        self.discarded
    }

    /// Folds a recorded transition into what this replay will deliver.
    pub(crate) fn fold(&mut self, transition: &Transition) {
        if self.mode == ReplayMode::CurrentState {
            return;
        }
        if transition.new_part {
            self.earlier_parts.push(self.current_part());
            self.snapshot = StatusState::empty();
            self.accumulated = StatusDiff::no_change();
        } else if !transition.cleared.is_no_change() {
            self.snapshot.clear_diff(&transition.cleared);
            self.accumulated = self.accumulated.without(transition.cleared);
            // After a part boundary the consumer's baseline is reset anyway.
            if self.earlier_parts.is_empty() {
                self.discarded = true;
            }
        }
        self.accumulated.combine(&transition.set);
    }

    /// The states to replay, oldest part first.
    pub(crate) fn parts(&self) -> Vec<StatusState> {
        let mut parts = self.earlier_parts.clone();
        parts.push(self.current_part());
        parts
    }

    fn current_part(&self) -> StatusState {
        self.snapshot.with_diff(&self.accumulated)
    }

    fn targets(&self, key: *const ()) -> bool {
        self.target.as_ptr() as *const () == key
    }
}

/// FIFO of scheduled replays for one tracker.
#[derive(Debug, Default)]
pub(crate) struct PendingReplays {
    queue: VecDeque<PendingReplay>,
}

impl PendingReplays {
    pub(crate) fn push(&mut self, replay: PendingReplay) {
        self.queue.push_back(replay);
    }

    pub(crate) fn pop_front(&mut self) -> Option<PendingReplay> {
        self.queue.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn contains_target(&self, key: *const ()) -> bool {
        self.queue.iter().any(|replay| replay.targets(key))
    }

    /// The snapshot replay queued for a consumer that was not attached yet.
    pub(crate) fn snapshot_for_mut(&mut self, key: *const ()) -> Option<&mut PendingReplay> {
        self.queue
            .iter_mut()
            .find(|replay| replay.consumer_id.is_none() && replay.targets(key))
    }

    /// Drops the replays of attached consumers, keeping snapshots. Returns how many were dropped.
    pub(crate) fn drop_attached(&mut self) -> usize {
        let before = self.queue.len();
        self.queue.retain(|replay| replay.consumer_id.is_none());
        before - self.queue.len()
    }

    /// Removes the replay scheduled for a registered consumer.
    pub(crate) fn take_for(&mut self, consumer_id: ConsumerId) -> Option<PendingReplay> {
        let index = self
            .queue
            .iter()
            .position(|replay| replay.consumer_id == Some(consumer_id))?;
        self.queue.remove(index)
    }

    pub(crate) fn fold_all(&mut self, transition: &Transition) {
        for replay in &mut self.queue {
            replay.fold(transition);
        }
    }
}
