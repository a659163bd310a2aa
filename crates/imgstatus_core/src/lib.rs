//! Image status core: milestone flags, state diffs and the canonical replay plan.
mod diff;
mod event;
mod milestone;
mod notification;
mod replay;
mod state;
mod status_bits;
mod types;

pub use diff::StatusDiff;
pub use event::StatusEvent;
pub use milestone::Milestone;
pub use notification::Notification;
pub use replay::NotificationReplayer;
pub use state::{StatusState, Transition};
pub use status_bits::{
    STATUS_DECODE_COMPLETE, STATUS_DECODE_STARTED, STATUS_ERROR, STATUS_FRAME_COMPLETE,
    STATUS_LOAD_COMPLETE, STATUS_NONE, STATUS_SIZE_AVAILABLE,
};
pub use types::{FailureKind, ImageRect, ImageSize, LoadResult};
