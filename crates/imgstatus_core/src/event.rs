use crate::{FailureKind, ImageRect, ImageSize, LoadResult};

/// A lifecycle event reported by the decode pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    StartRequest,
    StartContainer(ImageSize),
    StartDecode,
    /// Newly decoded pixels in the given region of the current frame.
    DataAvailable(ImageRect),
    StopFrame,
    StopDecode(LoadResult),
    StopRequest { last_part: bool, result: LoadResult },
    BlockOnload,
    UnblockOnload,
    ImageIsAnimated,
    UnlockedDraw,
    Discard,
    Error,
    Cancel,
}

impl StatusEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StatusEvent::StartRequest => "start-request",
            StatusEvent::StartContainer(_) => "start-container",
            StatusEvent::StartDecode => "start-decode",
            StatusEvent::DataAvailable(_) => "data-available",
            StatusEvent::StopFrame => "stop-frame",
            StatusEvent::StopDecode(_) => "stop-decode",
            StatusEvent::StopRequest { .. } => "stop-request",
            StatusEvent::BlockOnload => "block-onload",
            StatusEvent::UnblockOnload => "unblock-onload",
            StatusEvent::ImageIsAnimated => "image-is-animated",
            StatusEvent::UnlockedDraw => "unlocked-draw",
            StatusEvent::Discard => "discard",
            StatusEvent::Error => "error",
            StatusEvent::Cancel => "cancel",
        }
    }

    /// The failure this event reports, if any.
    pub fn failure(&self) -> Option<FailureKind> {
        match self {
            StatusEvent::StopDecode(Err(kind)) => Some(kind.clone()),
            StatusEvent::StopRequest {
                result: Err(kind), ..
            } => Some(kind.clone()),
            StatusEvent::Cancel => Some(FailureKind::Cancelled),
            _ => None,
        }
    }
}
