use std::rc::Rc;

use imgstatus_core::{FailureKind, Notification};

/// An observer of one image load.
///
/// Consumers are held weakly by the tracker and are notified on the
/// controlling context only. A consumer must not call back into the tracker
/// from `notify`; it should queue the work and call [`notify`] later instead.
///
/// [`notify`]: crate::StatusTracker::notify
pub trait ImageConsumer {
    fn notify(&self, notification: &Notification);
}

/// Shared handle to a consumer, owned by whoever manages its lifetime.
pub type ConsumerHandle = Rc<dyn ImageConsumer>;

/// Told once when a load first fails.
pub trait FailureSink {
    fn on_failure(&self, failure: &FailureKind);
}
