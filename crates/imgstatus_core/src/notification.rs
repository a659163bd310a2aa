use crate::{ImageRect, ImageSize, LoadResult, Milestone, StatusDiff};

/// A single notification delivered to one consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    StartRequest,
    StartContainer(Option<ImageSize>),
    StartDecode,
    ImageIsAnimated,
    StopFrame,
    StopDecode(LoadResult),
    BlockOnload,
    UnblockOnload,
    StopRequest { last_part: bool, result: LoadResult },
    Discard,
    UnlockedDraw,
    /// Part of the frame changed and should be redrawn.
    FrameUpdate(ImageRect),
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::StartRequest => "start-request",
            Notification::StartContainer(_) => "start-container",
            Notification::StartDecode => "start-decode",
            Notification::ImageIsAnimated => "image-is-animated",
            Notification::StopFrame => "stop-frame",
            Notification::StopDecode(_) => "stop-decode",
            Notification::BlockOnload => "block-onload",
            Notification::UnblockOnload => "unblock-onload",
            Notification::StopRequest { .. } => "stop-request",
            Notification::Discard => "discard",
            Notification::UnlockedDraw => "unlocked-draw",
            Notification::FrameUpdate(_) => "frame-update",
        }
    }

    /// Milestones a consumer has observed once it received this notification.
    pub fn milestones(&self) -> StatusDiff {
        let none = StatusDiff::no_change();
        match self {
            Notification::StartRequest => none.with(Milestone::RequestStarted),
            Notification::StartContainer(_) => none.with(Milestone::HasSize),
            Notification::StartDecode => none.with(Milestone::DecodeStarted),
            Notification::ImageIsAnimated => none.with(Milestone::IsAnimated),
            Notification::StopFrame => none.with(Milestone::FrameStopped),
            Notification::StopDecode(_) => none.with(Milestone::DecodeStopped),
            Notification::BlockOnload => none.with(Milestone::OnloadBlocked),
            Notification::UnblockOnload => none.with(Milestone::OnloadUnblocked),
            Notification::StopRequest { last_part, .. } => {
                let stopped = none.with(Milestone::RequestStopped);
                if *last_part {
                    stopped.with(Milestone::MultipartStopped)
                } else {
                    stopped
                }
            }
            Notification::Discard | Notification::UnlockedDraw | Notification::FrameUpdate(_) => {
                none
            }
        }
    }
}
