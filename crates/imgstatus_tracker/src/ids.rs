use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplayTaskId(pub u64);

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "consumer#{}", self.0)
    }
}

impl fmt::Display for ReplayTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "replay#{}", self.0)
    }
}

/// Hands out ids for one tracker. Ids are never reused within its lifetime.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn consumer(&mut self) -> ConsumerId {
        ConsumerId(self.bump())
    }

    pub(crate) fn task(&mut self) -> ReplayTaskId {
        ReplayTaskId(self.bump())
    }

    fn bump(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.consumer(), ConsumerId(1));
        assert_eq!(ids.task(), ReplayTaskId(2));
        assert_eq!(ids.consumer(), ConsumerId(3));
    }
}
