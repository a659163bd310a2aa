//! Image status tracker: records load progress and replays it to attached consumers.
mod consumer;
mod ids;
mod image;
mod pending;
mod recorder;
mod recording;
mod registry;
mod settings;
mod tracker;

pub use consumer::{ConsumerHandle, FailureSink, ImageConsumer};
pub use ids::{ConsumerId, ReplayTaskId};
pub use image::{Image, ImageScope};
pub use pending::ReplayMode;
pub use recorder::DecodeRecorder;
pub use recording::{RecordingTracker, TracksStatus};
pub use registry::ConsumerRegistry;
pub use settings::{SettingsError, TrackerSettings};
pub use tracker::StatusTracker;

pub use imgstatus_core::{
    FailureKind, ImageRect, ImageSize, LoadResult, Milestone, Notification, StatusDiff,
    StatusEvent, StatusState,
};
