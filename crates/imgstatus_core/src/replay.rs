use crate::{FailureKind, ImageSize, LoadResult, Milestone, Notification, StatusDiff, StatusState};

/// Turns status flags into the canonical notification sequence for one consumer.
///
/// Every plan is computed against the consumer's `delivered` baseline: flags the
/// consumer has already been told about are never emitted again, and the
/// baseline is advanced to cover everything planned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationReplayer {
    container: Option<ImageSize>,
    failure: Option<FailureKind>,
}

impl NotificationReplayer {
    /// `failure` is the load's failure when the error flag has latched.
    pub fn new(container: Option<ImageSize>, failure: Option<FailureKind>) -> Self {
        Self { container, failure }
    }

    /// Plans the notifications that bring a consumer at `delivered` up to `target`.
    ///
    /// Order is fixed regardless of the order milestones were recorded in:
    /// start-request, start-container, start-decode, animated, stop-frame,
    /// stop-decode, onload, stop-request.
    pub fn replay(&self, target: &StatusState, delivered: &mut StatusState) -> Vec<Notification> {
        let pending = target.difference_from(delivered);
        if pending.is_no_change() {
            return Vec::new();
        }
        let view = target.union(delivered);
        let mut out = Vec::new();

        if pending.contains(Milestone::RequestStarted) {
            out.push(Notification::StartRequest);
        }
        if pending.contains(Milestone::HasSize) {
            out.push(Notification::StartContainer(self.container));
        }
        if pending.contains(Milestone::DecodeStarted) {
            out.push(Notification::StartDecode);
        }
        if pending.contains(Milestone::IsAnimated) {
            out.push(Notification::ImageIsAnimated);
        }
        if pending.contains(Milestone::FrameStopped) {
            out.push(Notification::StopFrame);
        }
        if pending.contains(Milestone::DecodeStopped) {
            out.push(Notification::StopDecode(self.result_for(&view)));
        }
        if pending.contains(Milestone::OnloadUnblocked) {
            // A consumer that never saw the block is told nothing: the load is
            // already unblocked from its point of view.
            if delivered.contains(Milestone::OnloadBlocked) {
                out.push(Notification::UnblockOnload);
            }
        } else if pending.contains(Milestone::OnloadBlocked) {
            out.push(Notification::BlockOnload);
        }
        if pending.contains(Milestone::RequestStopped) {
            out.push(Notification::StopRequest {
                last_part: view.contains(Milestone::MultipartStopped),
                result: self.result_for(&view),
            });
        }

        delivered.merge_diff(&pending);
        out
    }

    /// Plans only the flags in `diff`, on top of what the consumer already saw.
    pub fn replay_difference(
        &self,
        diff: &StatusDiff,
        delivered: &mut StatusState,
    ) -> Vec<Notification> {
        let target = delivered.with_diff(diff);
        self.replay(&target, delivered)
    }

    /// Replays consecutive multipart parts, resetting the per-part flags in between.
    pub fn replay_parts(
        &self,
        parts: &[StatusState],
        delivered: &mut StatusState,
    ) -> Vec<Notification> {
        let mut out = Vec::new();
        for (index, part) in parts.iter().enumerate() {
            if index > 0 {
                delivered.reset_for_next_part();
            }
            out.extend(self.replay(part, delivered));
        }
        out
    }

    /// Tells a consumer the request finished without replaying any decode progress.
    ///
    /// Only an unblock (if the consumer saw a block but no unblock) and a final
    /// stop-request (if it has not seen one) are planned. A load that already
    /// failed finishes with its failure even when `status` is `Ok`.
    pub fn request_finished(
        &self,
        delivered: &mut StatusState,
        status: LoadResult,
    ) -> Vec<Notification> {
        let status = match (status, &self.failure) {
            (Ok(()), Some(failure)) => Err(failure.clone()),
            (status, _) => status,
        };
        let mut out = Vec::new();
        if delivered.contains(Milestone::OnloadBlocked)
            && !delivered.contains(Milestone::OnloadUnblocked)
        {
            out.push(Notification::UnblockOnload);
            delivered.insert(Milestone::OnloadUnblocked);
        }
        if !delivered.contains(Milestone::RequestStopped) {
            out.push(Notification::StopRequest {
                last_part: true,
                result: status,
            });
            delivered.insert(Milestone::RequestStopped);
            delivered.insert(Milestone::MultipartStopped);
        }
        out
    }

    fn result_for(&self, view: &StatusState) -> LoadResult {
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None if view.contains(Milestone::HasError) => Err(FailureKind::Unspecified),
            None => Ok(()),
        }
    }
}
