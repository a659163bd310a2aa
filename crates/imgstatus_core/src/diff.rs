use std::fmt;
use std::ops::BitOr;

use crate::Milestone;

/// Set of milestones that fired between two status snapshots.
///
/// Only records *which* flags changed. Firing is one-directional within a
/// load part, so the values are implied.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct StatusDiff {
    bits: u16,
}

impl StatusDiff {
    pub const fn no_change() -> Self {
        Self { bits: 0 }
    }

    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self {
            bits: bits & Milestone::MASK,
        }
    }

    pub const fn bits(&self) -> u16 {
        self.bits
    }

    pub const fn is_no_change(&self) -> bool {
        self.bits == 0
    }

    pub const fn contains(&self, milestone: Milestone) -> bool {
        self.bits & milestone.bit() != 0
    }

    pub const fn with(self, milestone: Milestone) -> Self {
        Self {
            bits: self.bits | milestone.bit(),
        }
    }

    /// Unions `other` into this diff.
    pub fn combine(&mut self, other: &StatusDiff) {
        self.bits |= other.bits;
    }

    pub const fn combined(self, other: StatusDiff) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub const fn intersection(self, other: StatusDiff) -> Self {
        Self {
            bits: self.bits & other.bits,
        }
    }

    pub const fn without(self, other: StatusDiff) -> Self {
        Self {
            bits: self.bits & !other.bits,
        }
    }

    pub fn iter(self) -> impl Iterator<Item = Milestone> {
        Milestone::ALL
            .into_iter()
            .filter(move |milestone| self.contains(*milestone))
    }
}

impl BitOr for StatusDiff {
    type Output = StatusDiff;

    fn bitor(self, rhs: StatusDiff) -> StatusDiff {
        self.combined(rhs)
    }
}

impl FromIterator<Milestone> for StatusDiff {
    fn from_iter<I: IntoIterator<Item = Milestone>>(iter: I) -> Self {
        iter.into_iter()
            .fold(StatusDiff::no_change(), StatusDiff::with)
    }
}

impl fmt::Debug for StatusDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
