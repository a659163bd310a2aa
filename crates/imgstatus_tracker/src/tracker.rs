use std::fmt;
use std::rc::Rc;
use std::sync::mpsc;

use imgstatus_core::{
    FailureKind, ImageRect, ImageSize, LoadResult, Milestone, Notification, StatusDiff,
    StatusEvent, StatusState, Transition,
};
use imgstatus_logging::{status_debug, status_error, status_trace, status_warn};

use crate::consumer::{ConsumerHandle, FailureSink, ImageConsumer};
use crate::ids::{ConsumerId, IdAllocator};
use crate::image::{Image, ImageLink, ImageScope};
use crate::pending::{PendingReplay, PendingReplays, ReplayMode};
use crate::recorder::DecodeRecorder;
use crate::recording::{RecordingTracker, TracksStatus};
use crate::registry::{handle_key, ConsumerRegistry};
use crate::settings::TrackerSettings;

/// Loading and decoding status of one image, replayed to any number of consumers.
///
/// The decode pipeline calls the `record_*` methods as milestones occur. Each
/// record updates the status and synchronously notifies every attached
/// consumer of what changed. A consumer that attaches mid-load calls
/// [`notify`](Self::notify), which schedules a replay of everything it missed;
/// the replay runs when the controlling context calls
/// [`run_pending_replays`](Self::run_pending_replays) and also covers whatever
/// was recorded in between.
///
/// Every consumer has a delivered baseline, so no notification is ever sent to
/// the same consumer twice, and each consumer sees notifications in canonical
/// order regardless of the order they were recorded in.
///
/// The tracker is `!Send`: it and its consumers live on one controlling
/// context. Progress recorded on other threads goes through a
/// [`DecodeRecorder`].
pub struct StatusTracker {
    status: RecordingTracker,
    image: ImageLink,
    consumers: ConsumerRegistry,
    pending: PendingReplays,
    ids: IdAllocator,
    settings: TrackerSettings,
    failure_sink: Option<Box<dyn FailureSink>>,
    failure_reported: bool,
    recorded: Option<(mpsc::Sender<StatusEvent>, mpsc::Receiver<StatusEvent>)>,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::with_settings(TrackerSettings::default())
    }

    pub fn with_settings(settings: TrackerSettings) -> Self {
        Self {
            status: RecordingTracker::new(),
            image: ImageLink::Unset,
            consumers: ConsumerRegistry::new(),
            pending: PendingReplays::default(),
            ids: IdAllocator::default(),
            settings,
            failure_sink: None,
            failure_reported: false,
            recorded: None,
        }
    }

    pub fn with_image(image: &Rc<dyn Image>) -> Self {
        let mut tracker = Self::new();
        tracker.set_image(image);
        tracker
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn set_failure_sink(&mut self, sink: Box<dyn FailureSink>) {
        self.failure_sink = Some(sink);
    }

    // Image link

    /// Links the image this tracker reports on. Only valid once, on a tracker
    /// created without an image.
    pub fn set_image(&mut self, image: &Rc<dyn Image>) {
        debug_assert!(self.image.is_unset(), "tracker image set twice");
        if !self.image.is_unset() {
            status_warn!("Ignoring a second image for this tracker");
            return;
        }
        self.image = ImageLink::Attached(Rc::downgrade(image));
    }

    /// Called when the image is destroyed. Recording afterwards is a contract violation.
    pub fn reset_image(&mut self) {
        self.image = ImageLink::Reset;
    }

    /// Links `image` until the returned scope is dropped, which resets the link.
    pub fn scoped_image(&mut self, image: &Rc<dyn Image>) -> ImageScope<'_> {
        ImageScope::new(self, image)
    }

    pub fn image(&self) -> Option<Rc<dyn Image>> {
        self.image.upgrade()
    }

    pub fn has_image(&self) -> bool {
        self.image().is_some()
    }

    pub fn set_is_multipart(&mut self) {
        if self.status.set_multipart() {
            let set = StatusDiff::no_change().with(Milestone::IsMultipart);
            self.pending.fold_all(&Transition {
                set,
                ..Transition::default()
            });
        }
    }

    // Introspection

    pub fn state(&self) -> StatusState {
        self.status.state()
    }

    /// Current status in the legacy request status bit layout.
    pub fn image_status(&self) -> u32 {
        self.status.state().image_status()
    }

    /// Whether the current part has not yet stopped.
    pub fn is_loading(&self) -> bool {
        self.status.state().is_loading()
    }

    pub fn is_multipart(&self) -> bool {
        self.status.state().contains(Milestone::IsMultipart)
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    pub fn consumers(&self) -> &ConsumerRegistry {
        &self.consumers
    }

    pub fn pending_replay_count(&self) -> usize {
        self.pending.len()
    }

    /// Recorded container size, falling back to the image's own size.
    pub fn container_size(&self) -> Option<ImageSize> {
        self.status.container_size().or_else(|| self.image_size())
    }

    pub fn failure(&self) -> Option<&FailureKind> {
        self.status.failure()
    }

    // Consumers

    /// Attaches `consumer` without telling it anything. Idempotent.
    ///
    /// A snapshot replay already queued for `consumer` is taken over and
    /// follows updates from then on, so the consumer is caught up exactly once.
    pub fn add_consumer(&mut self, consumer: &ConsumerHandle) -> ConsumerId {
        let ids = &mut self.ids;
        let (id, added) = self.consumers.add(consumer, || ids.consumer());
        if added {
            status_debug!("{} attached", id);
            self.claim_snapshot(consumer, id);
        }
        id
    }

    /// Detaches `consumer`, returning whether it was attached.
    ///
    /// A consumer still waiting for its replay is dropped silently and the
    /// replay is cancelled. Otherwise it is told the request finished with
    /// `status`, unless it already saw the request stop.
    pub fn remove_consumer(&mut self, consumer: &ConsumerHandle, status: LoadResult) -> bool {
        let Some(mut entry) = self.consumers.remove(consumer) else {
            status_debug!("remove_consumer: consumer was not attached");
            return false;
        };
        status_debug!("{} detached", entry.id);

        if entry.awaiting_replay {
            if let Some(replay) = self.pending.take_for(entry.id) {
                status_debug!("{} cancelled with {}", replay.id, entry.id);
            }
            return true;
        }

        let notifications = self
            .status
            .replayer(self.image_size())
            .request_finished(&mut entry.delivered, status);
        deliver(Some(entry.id), consumer.as_ref(), &notifications);
        true
    }

    pub fn first_consumer_is(&self, consumer: &ConsumerHandle) -> bool {
        self.consumers.first_is(consumer)
    }

    /// Takes over the consumers of `other`, including what each was told.
    ///
    /// Replays of the consumers being replaced are dropped. Adopted consumers
    /// that were still waiting for a replay get a fresh one from this tracker.
    pub fn adopt_consumers(&mut self, other: &StatusTracker) {
        let dropped = self.pending.drop_attached();
        if dropped > 0 {
            status_debug!("dropped {} replays of replaced consumers", dropped);
        }
        let ids = &mut self.ids;
        self.consumers = other.consumers.adopted(|| ids.consumer());

        let state = self.status.state();
        for entry in self.consumers.entries_mut() {
            if let Some(replay) = self.pending.snapshot_for_mut(entry.key()) {
                replay.follow_from(entry.id, state);
                entry.awaiting_replay = true;
            } else if entry.awaiting_replay {
                let replay = PendingReplay::new(
                    self.ids.task(),
                    entry.weak(),
                    Some(entry.id),
                    ReplayMode::FollowUpdates,
                    state,
                );
                status_debug!("{} rescheduled for adopted {}", replay.id, entry.id);
                self.pending.push(replay);
            }
        }
        status_debug!("adopted {} consumers", self.consumers.len());
    }

    /// Schedules a replay of everything `consumer` needs to catch up.
    ///
    /// Anything recorded before the replay runs is folded into it, and live
    /// notifications to `consumer` are held back until then.
    pub fn notify(&mut self, consumer: &ConsumerHandle) {
        let id = self.add_consumer(consumer);
        let Some(entry) = self.consumers.get_by_id_mut(id) else {
            return;
        };
        if entry.awaiting_replay {
            status_debug!("{} already has a replay scheduled", id);
            return;
        }
        entry.awaiting_replay = true;

        let state = self.status.state();
        let replay = PendingReplay::new(
            self.ids.task(),
            Rc::downgrade(consumer),
            Some(id),
            ReplayMode::FollowUpdates,
            state,
        );
        status_debug!("{} scheduled for {} at {:?}", replay.id, id, state);
        self.pending.push(replay);
    }

    /// Schedules a replay of the status as it is now, ignoring later records.
    ///
    /// Meant for consumers that are never attached, such as static snapshots.
    /// An attached consumer would miss later records, so it gets [`notify`](Self::notify) instead.
    pub fn notify_current_state(&mut self, consumer: &ConsumerHandle) {
        if self.consumers.contains(consumer) {
            status_debug!("notify_current_state on an attached consumer follows updates");
            self.notify(consumer);
            return;
        }
        if self.pending.contains_target(handle_key(consumer)) {
            status_debug!("snapshot replay already scheduled for this consumer");
            return;
        }

        let state = self.status.state();
        let replay = PendingReplay::new(
            self.ids.task(),
            Rc::downgrade(consumer),
            None,
            ReplayMode::CurrentState,
            state,
        );
        status_debug!("{} scheduled as snapshot {:?}", replay.id, state);
        self.pending.push(replay);
    }

    /// Replays to `consumer` right away, on the calling context.
    ///
    /// Only for callers already running from an asynchronous callback. A
    /// replay scheduled for `consumer` runs now instead of later.
    pub fn sync_notify(&mut self, consumer: &ConsumerHandle) {
        let id = self.add_consumer(consumer);
        if let Some(replay) = self.pending.take_for(id) {
            self.run_replay(replay);
            return;
        }

        let replayer = self.status.replayer(self.image_size());
        let state = self.status.state();
        let Some(entry) = self.consumers.get_by_id_mut(id) else {
            return;
        };
        let notifications = replayer.replay(&state, &mut entry.delivered);
        deliver(Some(id), consumer.as_ref(), &notifications);
    }

    /// Tells `consumer` the request finished, without replaying decode progress.
    ///
    /// Sends only an unblock and a final stop-request, each only if the
    /// consumer has not already seen it.
    pub fn emulate_request_finished(&mut self, consumer: &ConsumerHandle, status: LoadResult) {
        let waiting = self
            .consumers
            .get(consumer)
            .filter(|entry| entry.awaiting_replay)
            .map(|entry| entry.id);
        if let Some(replay) = waiting.and_then(|id| self.pending.take_for(id)) {
            // The consumer must see the start of the load before it finishes.
            self.run_replay(replay);
        }

        let replayer = self.status.replayer(self.image_size());
        let (id, notifications) = match self.consumers.get_mut(consumer) {
            Some(entry) => (
                Some(entry.id),
                replayer.request_finished(&mut entry.delivered, status),
            ),
            None => {
                let mut seen = self.status.state();
                (None, replayer.request_finished(&mut seen, status))
            }
        };
        deliver(id, consumer.as_ref(), &notifications);
    }

    /// Runs scheduled replays in the order they were scheduled.
    ///
    /// At most `replay_batch_limit` replays run per call; the rest stay queued.
    /// Returns how many ran.
    pub fn run_pending_replays(&mut self) -> usize {
        if imgstatus_logging::dispatch_depth() > 0 {
            status_warn!("pending replays flushed from inside a notification");
        }
        let limit = self.settings.replay_batch_limit.unwrap_or(usize::MAX);
        let mut ran = 0;
        while ran < limit {
            let Some(replay) = self.pending.pop_front() else {
                break;
            };
            self.run_replay(replay);
            ran += 1;
        }
        ran
    }

    // Recording

    /// Records `event`, notifies attached consumers and feeds pending replays.
    pub fn record(&mut self, event: StatusEvent) {
        debug_assert!(
            !self.image.is_reset(),
            "{} recorded after the image was destroyed",
            event.name()
        );
        if self.image.is_reset() {
            status_error!(
                "Ignoring {} recorded after the image was destroyed",
                event.name()
            );
            return;
        }

        let transition = self.status.record(&event);
        if transition.out_of_order && self.settings.warn_on_out_of_order {
            status_warn!(
                "{} recorded before its predecessor, state {:?}",
                event.name(),
                self.status.state()
            );
        }
        if transition.short_circuited {
            status_debug!("{} ignored: the load already failed", event.name());
        }
        self.after_transition(&transition);

        match event {
            StatusEvent::UnlockedDraw => self.broadcast(Notification::UnlockedDraw),
            StatusEvent::Discard => self.broadcast(Notification::Discard),
            StatusEvent::DataAvailable(rect) => {
                if !transition.short_circuited && !rect.is_empty() {
                    self.broadcast(Notification::FrameUpdate(rect));
                }
            }
            _ => self.fan_out_difference(&transition.set),
        }
        if transition.set.contains(Milestone::HasError) {
            self.fire_failure_notification();
        }
    }

    pub fn record_start_request(&mut self) {
        self.record(StatusEvent::StartRequest);
    }

    pub fn record_start_container(&mut self, size: ImageSize) {
        self.record(StatusEvent::StartContainer(size));
    }

    pub fn record_start_decode(&mut self) {
        self.record(StatusEvent::StartDecode);
    }

    /// Decoded pixels in `rect` changed. Consumers get a frame update.
    pub fn record_data_available(&mut self, rect: ImageRect) {
        self.record(StatusEvent::DataAvailable(rect));
    }

    pub fn record_stop_frame(&mut self) {
        self.record(StatusEvent::StopFrame);
    }

    pub fn record_stop_decode(&mut self, result: LoadResult) {
        self.record(StatusEvent::StopDecode(result));
    }

    pub fn record_stop_request(&mut self, last_part: bool, result: LoadResult) {
        self.record(StatusEvent::StopRequest { last_part, result });
    }

    pub fn record_block_onload(&mut self) {
        self.record(StatusEvent::BlockOnload);
    }

    pub fn record_unblock_onload(&mut self) {
        self.record(StatusEvent::UnblockOnload);
    }

    pub fn record_image_is_animated(&mut self) {
        self.record(StatusEvent::ImageIsAnimated);
    }

    pub fn record_unlocked_draw(&mut self) {
        self.record(StatusEvent::UnlockedDraw);
    }

    pub fn record_discard(&mut self) {
        self.record(StatusEvent::Discard);
    }

    pub fn record_error(&mut self) {
        self.record(StatusEvent::Error);
    }

    pub fn record_cancel(&mut self) {
        self.record(StatusEvent::Cancel);
    }

    /// Shorthand for a load that completed from cache: start, container, stop.
    pub fn record_loaded(&mut self, size: ImageSize) {
        self.record_start_request();
        self.record_start_container(size);
        self.record_stop_request(true, Ok(()));
    }

    /// Shorthand for a complete decode: start, frame, stop.
    ///
    /// When the size is known the whole image is reported as updated before the frame stops.
    pub fn record_decoded(&mut self) {
        self.record_start_decode();
        if let Some(size) = self.container_size() {
            self.record_data_available(ImageRect::covering(size));
        }
        self.record_stop_frame();
        self.record_stop_decode(Ok(()));
    }

    /// Unblocks onload if it is blocked and not yet unblocked.
    pub fn maybe_unblock_onload(&mut self) {
        let state = self.status.state();
        if !state.contains(Milestone::OnloadBlocked) || state.contains(Milestone::OnloadUnblocked) {
            return;
        }
        self.record_unblock_onload();
    }

    /// Returns a handle for recording progress from another thread.
    pub fn recorder(&mut self) -> DecodeRecorder {
        let (tx, _) = self.recorded.get_or_insert_with(mpsc::channel);
        DecodeRecorder::new(tx.clone())
    }

    /// Applies every event queued through a [`DecodeRecorder`], in order.
    pub fn process_recorded_events(&mut self) -> usize {
        let events: Vec<StatusEvent> = match &self.recorded {
            Some((_, rx)) => rx.try_iter().collect(),
            None => return 0,
        };
        let count = events.len();
        for event in events {
            self.record(event);
        }
        count
    }

    // Sending to one consumer

    pub fn send_start_request(&mut self, consumer: &ConsumerHandle) {
        self.send(consumer, Notification::StartRequest);
    }

    pub fn send_start_container(&mut self, consumer: &ConsumerHandle) {
        let size = self.container_size();
        self.send(consumer, Notification::StartContainer(size));
    }

    pub fn send_start_decode(&mut self, consumer: &ConsumerHandle) {
        self.send(consumer, Notification::StartDecode);
    }

    pub fn send_stop_frame(&mut self, consumer: &ConsumerHandle) {
        self.send(consumer, Notification::StopFrame);
    }

    pub fn send_stop_decode(&mut self, consumer: &ConsumerHandle, result: LoadResult) {
        self.send(consumer, Notification::StopDecode(result));
    }

    pub fn send_stop_request(
        &mut self,
        consumer: &ConsumerHandle,
        last_part: bool,
        result: LoadResult,
    ) {
        self.send(consumer, Notification::StopRequest { last_part, result });
    }

    pub fn send_block_onload(&mut self, consumer: &ConsumerHandle) {
        self.send(consumer, Notification::BlockOnload);
    }

    pub fn send_unblock_onload(&mut self, consumer: &ConsumerHandle) {
        self.send(consumer, Notification::UnblockOnload);
    }

    pub fn send_discard(&mut self, consumer: &ConsumerHandle) {
        self.send(consumer, Notification::Discard);
    }

    pub fn send_unlocked_draw(&mut self, consumer: &ConsumerHandle) {
        self.send(consumer, Notification::UnlockedDraw);
    }

    pub fn send_image_is_animated(&mut self, consumer: &ConsumerHandle) {
        self.send(consumer, Notification::ImageIsAnimated);
    }

    // Moving state between trackers

    /// Flags `other` has that this tracker does not.
    pub fn difference<T: TracksStatus + ?Sized>(&self, other: &T) -> StatusDiff {
        other.status_state().difference_from(&self.status.state())
    }

    /// Everything recorded so far except the request start and stop.
    pub fn decode_state_as_difference(&self) -> StatusDiff {
        self.status.state().decode_phase()
    }

    /// Sets the flags in `diff` without notifying anyone.
    pub fn apply_difference(&mut self, diff: &StatusDiff) {
        let set = self.status.state_mut().merge_diff(diff);
        self.status.note_failure(None);
        self.pending.fold_all(&Transition {
            set,
            ..Transition::default()
        });
    }

    /// Notifies attached consumers of the flags in `diff` they have not seen.
    ///
    /// A non-empty `invalid` rect is announced as a frame update after them.
    pub fn sync_notify_difference(&mut self, diff: &StatusDiff, invalid: Option<ImageRect>) {
        let effective = diff.intersection(self.status.state().as_diff());
        self.fan_out_difference(&effective);
        if let Some(rect) = invalid.filter(|rect| !rect.is_empty()) {
            self.broadcast(Notification::FrameUpdate(rect));
        }
        if effective.contains(Milestone::HasError) {
            self.fire_failure_notification();
        }
    }

    /// A consumer-free copy of the status, for recording on a background path.
    pub fn clone_for_recording(&self) -> RecordingTracker {
        self.status.clone()
    }

    /// Absorbs progress recorded on a clone, returning the flags that were new.
    ///
    /// Follow with [`sync_notify_difference`](Self::sync_notify_difference) to
    /// tell consumers.
    pub fn apply_recording(&mut self, recording: &RecordingTracker) -> StatusDiff {
        let diff = self.difference(recording);
        self.status.adopt_details(recording);
        self.apply_difference(&diff);
        diff
    }

    fn image_size(&self) -> Option<ImageSize> {
        self.image.upgrade().and_then(|image| image.size())
    }

    fn claim_snapshot(&mut self, consumer: &ConsumerHandle, id: ConsumerId) {
        let state = self.status.state();
        let Some(replay) = self.pending.snapshot_for_mut(handle_key(consumer)) else {
            return;
        };
        replay.follow_from(id, state);
        status_debug!("{} now follows updates for {}", replay.id, id);
        if let Some(entry) = self.consumers.get_by_id_mut(id) {
            entry.awaiting_replay = true;
        }
    }

    /// A consumer awaiting its replay keeps its baseline; the replay announces the discard itself.
    fn after_transition(&mut self, transition: &Transition) {
        if !transition.cleared.is_no_change() {
            for entry in self
                .consumers
                .entries_mut()
                .filter(|entry| !entry.awaiting_replay)
            {
                entry.delivered.clear_diff(&transition.cleared);
            }
        }
        self.pending.fold_all(transition);
    }

    fn fan_out_difference(&mut self, diff: &StatusDiff) {
        if diff.is_no_change() {
            return;
        }
        let replayer = self.status.replayer(self.image_size());
        let mut deliveries = Vec::new();
        let mut saw_dead = false;
        for entry in self.consumers.entries_mut() {
            if entry.awaiting_replay {
                continue;
            }
            let Some(consumer) = entry.upgrade() else {
                saw_dead = true;
                continue;
            };
            let notifications = replayer.replay_difference(diff, &mut entry.delivered);
            if !notifications.is_empty() {
                deliveries.push((entry.id, consumer, notifications));
            }
        }
        if saw_dead {
            self.prune_consumers();
        }
        for (id, consumer, notifications) in deliveries {
            deliver(Some(id), consumer.as_ref(), &notifications);
        }
    }

    fn broadcast(&mut self, notification: Notification) {
        let targets: Vec<(ConsumerId, ConsumerHandle)> = self
            .consumers
            .entries()
            .filter(|entry| !entry.awaiting_replay)
            .filter_map(|entry| entry.upgrade().map(|consumer| (entry.id, consumer)))
            .collect();
        for (id, consumer) in targets {
            deliver(
                Some(id),
                consumer.as_ref(),
                std::slice::from_ref(&notification),
            );
        }
    }

    fn send(&mut self, consumer: &ConsumerHandle, notification: Notification) {
        let id = match self.consumers.get_mut(consumer) {
            Some(entry) if entry.awaiting_replay => {
                status_debug!(
                    "{} held back: {} awaits its replay",
                    notification.name(),
                    entry.id
                );
                return;
            }
            Some(entry) => {
                if matches!(notification, Notification::Discard) {
                    entry.delivered.discard_decode();
                }
                entry.delivered.merge_diff(&notification.milestones());
                Some(entry.id)
            }
            None => None,
        };
        deliver(id, consumer.as_ref(), std::slice::from_ref(&notification));
    }

    fn run_replay(&mut self, replay: PendingReplay) {
        let Some(consumer) = replay.target.upgrade() else {
            status_debug!("{} dropped: its consumer is gone", replay.id);
            if replay.consumer_id.is_some() {
                self.prune_consumers();
            }
            return;
        };

        let replayer = self.status.replayer(self.image_size());
        let parts = replay.parts();
        let notifications = match replay.consumer_id {
            Some(id) => {
                let Some(entry) = self.consumers.get_by_id_mut(id) else {
                    status_warn!("{} has no attached {}", replay.id, id);
                    return;
                };
                entry.awaiting_replay = false;
                let mut notifications = Vec::new();
                if replay.discarded() && !entry.delivered.discard_decode().is_no_change() {
                    notifications.push(Notification::Discard);
                }
                notifications.extend(replayer.replay_parts(&parts, &mut entry.delivered));
                notifications
            }
            None => replayer.replay_parts(&parts, &mut StatusState::empty()),
        };
        status_debug!(
            "{} delivers {} notifications ({:?})",
            replay.id,
            notifications.len(),
            replay.mode
        );
        deliver(replay.consumer_id, consumer.as_ref(), &notifications);
    }

    fn prune_consumers(&mut self) {
        let pruned = self.consumers.prune();
        if pruned > 0 {
            status_debug!("pruned {} dropped consumers", pruned);
        }
    }

    fn fire_failure_notification(&mut self) {
        if self.failure_reported || !self.settings.fire_failure_notifications {
            return;
        }
        self.failure_reported = true;
        let failure = self
            .status
            .failure()
            .cloned()
            .unwrap_or(FailureKind::Unspecified);
        status_warn!("image load failed: {}", failure);
        if let Some(sink) = &self.failure_sink {
            sink.on_failure(&failure);
        }
    }
}

impl TracksStatus for StatusTracker {
    fn status_state(&self) -> StatusState {
        self.status.state()
    }
}

impl fmt::Debug for StatusTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusTracker")
            .field("state", &self.status.state())
            .field("consumers", &self.consumers.len())
            .field("pending_replays", &self.pending.len())
            .field("has_image", &self.has_image())
            .finish()
    }
}

fn deliver(id: Option<ConsumerId>, consumer: &dyn ImageConsumer, notifications: &[Notification]) {
    if notifications.is_empty() {
        return;
    }
    let _dispatch = imgstatus_logging::enter_dispatch();
    for notification in notifications {
        match id {
            Some(id) => status_trace!("{} -> {}", notification.name(), id),
            None => status_trace!("{} -> detached consumer", notification.name()),
        }
        consumer.notify(notification);
    }
}
