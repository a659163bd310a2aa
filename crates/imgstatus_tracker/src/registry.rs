use std::rc::{Rc, Weak};

use imgstatus_core::StatusState;

use crate::consumer::{ConsumerHandle, ImageConsumer};
use crate::ids::ConsumerId;

/// Identity of a consumer allocation, stable while any handle to it exists.
pub(crate) fn handle_key(consumer: &ConsumerHandle) -> *const () {
    Rc::as_ptr(consumer) as *const ()
}

#[derive(Debug, Clone)]
pub(crate) struct ConsumerEntry {
    pub(crate) id: ConsumerId,
    handle: Weak<dyn ImageConsumer>,
    /// Milestones this consumer has been told about.
    pub(crate) delivered: StatusState,
    /// A pending replay owns delivery to this consumer until it runs.
    pub(crate) awaiting_replay: bool,
}

impl ConsumerEntry {
    pub(crate) fn upgrade(&self) -> Option<ConsumerHandle> {
        self.handle.upgrade()
    }

    pub(crate) fn weak(&self) -> Weak<dyn ImageConsumer> {
        self.handle.clone()
    }

    pub(crate) fn key(&self) -> *const () {
        self.handle.as_ptr() as *const ()
    }

    fn is_alive(&self) -> bool {
        self.handle.strong_count() > 0
    }

    fn is(&self, key: *const ()) -> bool {
        // The allocation outlives our weak handle, so the address cannot be reused.
        self.key() == key
    }
}

/// Insertion-ordered, non-owning set of the consumers attached to one load.
///
/// Entries whose consumer was dropped are skipped and pruned when observed.
#[derive(Debug, Default, Clone)]
pub struct ConsumerRegistry {
    entries: Vec<ConsumerEntry>,
}

impl ConsumerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `consumer` unless it is already present.
    /// Returns its id and whether it was newly added.
    pub(crate) fn add(
        &mut self,
        consumer: &ConsumerHandle,
        next_id: impl FnOnce() -> ConsumerId,
    ) -> (ConsumerId, bool) {
        if let Some(entry) = self.get(consumer) {
            return (entry.id, false);
        }
        let id = next_id();
        self.entries.push(ConsumerEntry {
            id,
            handle: Rc::downgrade(consumer),
            delivered: StatusState::empty(),
            awaiting_replay: false,
        });
        (id, true)
    }

    pub(crate) fn get(&self, consumer: &ConsumerHandle) -> Option<&ConsumerEntry> {
        let key = handle_key(consumer);
        self.entries.iter().find(|entry| entry.is(key))
    }

    pub(crate) fn get_mut(&mut self, consumer: &ConsumerHandle) -> Option<&mut ConsumerEntry> {
        let key = handle_key(consumer);
        self.entries.iter_mut().find(|entry| entry.is(key))
    }

    pub(crate) fn get_by_id_mut(&mut self, id: ConsumerId) -> Option<&mut ConsumerEntry> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub(crate) fn remove(&mut self, consumer: &ConsumerHandle) -> Option<ConsumerEntry> {
        let key = handle_key(consumer);
        let index = self.entries.iter().position(|entry| entry.is(key))?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = &mut ConsumerEntry> {
        self.entries.iter_mut()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &ConsumerEntry> {
        self.entries.iter()
    }

    /// Drops entries whose consumer is gone. Returns how many were dropped.
    pub(crate) fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(ConsumerEntry::is_alive);
        before - self.entries.len()
    }

    pub fn contains(&self, consumer: &ConsumerHandle) -> bool {
        self.get(consumer).is_some()
    }

    /// Whether `consumer` is the earliest-added consumer still alive.
    pub fn first_is(&self, consumer: &ConsumerHandle) -> bool {
        let key = handle_key(consumer);
        self.entries
            .iter()
            .find(|entry| entry.is_alive())
            .is_some_and(|entry| entry.is(key))
    }

    /// Number of live consumers.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_alive()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the entries under fresh ids.
    ///
    /// Entries keep their awaiting flag; the adopting tracker schedules their replays.
    pub(crate) fn adopted(&self, mut next_id: impl FnMut() -> ConsumerId) -> ConsumerRegistry {
        let entries = self
            .entries
            .iter()
            .filter(|entry| entry.is_alive())
            .map(|entry| ConsumerEntry {
                id: next_id(),
                handle: entry.handle.clone(),
                delivered: entry.delivered,
                awaiting_replay: entry.awaiting_replay,
            })
            .collect();
        ConsumerRegistry { entries }
    }
}
