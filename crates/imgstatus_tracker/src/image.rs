use std::ops::{Deref, DerefMut};
use std::rc::{Rc, Weak};

use imgstatus_core::ImageSize;

use crate::tracker::StatusTracker;

/// The image whose load is being tracked.
pub trait Image {
    /// Intrinsic size, once the decoder has read the header.
    fn size(&self) -> Option<ImageSize>;
}

/// Weak link from a tracker to its image.
#[derive(Debug, Default)]
pub(crate) enum ImageLink {
    #[default]
    Unset,
    Attached(Weak<dyn Image>),
    /// The image was destroyed; recording further progress is a contract violation.
    Reset,
}

impl ImageLink {
    pub(crate) fn upgrade(&self) -> Option<Rc<dyn Image>> {
        match self {
            ImageLink::Attached(image) => image.upgrade(),
            ImageLink::Unset | ImageLink::Reset => None,
        }
    }

    pub(crate) fn is_reset(&self) -> bool {
        matches!(self, ImageLink::Reset)
    }

    pub(crate) fn is_unset(&self) -> bool {
        matches!(self, ImageLink::Unset)
    }
}

/// Keeps an image linked to a tracker while the scope lives.
///
/// Dropping the scope resets the link, after which the tracker must not
/// record any more progress.
pub struct ImageScope<'a> {
    tracker: &'a mut StatusTracker,
}

impl<'a> ImageScope<'a> {
    pub fn new(tracker: &'a mut StatusTracker, image: &Rc<dyn Image>) -> Self {
        tracker.set_image(image);
        Self { tracker }
    }
}

impl Deref for ImageScope<'_> {
    type Target = StatusTracker;

    fn deref(&self) -> &StatusTracker {
        self.tracker
    }
}

impl DerefMut for ImageScope<'_> {
    fn deref_mut(&mut self) -> &mut StatusTracker {
        self.tracker
    }
}

impl Drop for ImageScope<'_> {
    fn drop(&mut self) {
        self.tracker.reset_image();
    }
}
