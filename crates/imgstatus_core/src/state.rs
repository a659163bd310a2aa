use std::fmt;

use crate::{Milestone, StatusDiff, StatusEvent};

/// Flags cleared when the next part of a multipart load starts.
const PART_RESET: [Milestone; 8] = [
    Milestone::RequestStarted,
    Milestone::DecodeStarted,
    Milestone::DecodeStopped,
    Milestone::FrameStopped,
    Milestone::RequestStopped,
    Milestone::OnloadBlocked,
    Milestone::OnloadUnblocked,
    Milestone::IsAnimated,
];

/// Flags cleared when the decoded frames are discarded.
const DISCARDED: [Milestone; 3] = [
    Milestone::DecodeStarted,
    Milestone::DecodeStopped,
    Milestone::FrameStopped,
];

/// Flags describing the request rather than the decode.
const REQUEST_PHASE: [Milestone; 3] = [
    Milestone::RequestStarted,
    Milestone::RequestStopped,
    Milestone::MultipartStopped,
];

/// Which lifecycle milestones have occurred for one image load.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct StatusState {
    bits: u16,
}

/// What applying one event did to a [`StatusState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// Flags newly set by the event.
    pub set: StatusDiff,
    /// Flags the event cleared (part reset or discard).
    pub cleared: StatusDiff,
    /// The event started the next part of a multipart load.
    pub new_part: bool,
    /// The event's causal predecessor had not been recorded.
    pub out_of_order: bool,
    /// A decode-phase event was dropped because the load already failed.
    pub short_circuited: bool,
}

impl StatusState {
    pub const fn empty() -> Self {
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

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub const fn contains(&self, milestone: Milestone) -> bool {
        self.bits & milestone.bit() != 0
    }

    /// Sets `milestone`, returning whether it was newly set.
    pub fn insert(&mut self, milestone: Milestone) -> bool {
        let was_set = self.contains(milestone);
        self.bits |= milestone.bit();
        !was_set
    }

    /// Clears `milestone`, returning whether it was set.
    pub fn remove(&mut self, milestone: Milestone) -> bool {
        let was_set = self.contains(milestone);
        self.bits &= !milestone.bit();
        was_set
    }

    pub fn iter(self) -> impl Iterator<Item = Milestone> {
        Milestone::ALL
            .into_iter()
            .filter(move |milestone| self.contains(*milestone))
    }

    /// Flags present in `self` but not in `snapshot`.
    pub const fn difference_from(&self, snapshot: &StatusState) -> StatusDiff {
        StatusDiff::from_bits_truncate(self.bits & !snapshot.bits)
    }

    /// Every flag of this state, as a diff against the empty state.
    pub const fn as_diff(&self) -> StatusDiff {
        StatusDiff::from_bits_truncate(self.bits)
    }

    pub const fn union(&self, other: &StatusState) -> StatusState {
        Self {
            bits: self.bits | other.bits,
        }
    }

    pub const fn with_diff(&self, diff: &StatusDiff) -> StatusState {
        Self {
            bits: self.bits | diff.bits(),
        }
    }

    /// Sets every flag in `diff`, returning the flags that were newly set.
    pub fn merge_diff(&mut self, diff: &StatusDiff) -> StatusDiff {
        let before = *self;
        self.bits |= diff.bits();
        self.difference_from(&before)
    }

    pub fn clear_diff(&mut self, diff: &StatusDiff) {
        self.bits &= !diff.bits();
    }

    /// Clears the per-part flags ahead of the next multipart part.
    pub fn reset_for_next_part(&mut self) -> StatusDiff {
        self.clear_all(&PART_RESET)
    }

    /// Clears the flags describing decoded frames.
    pub fn discard_decode(&mut self) -> StatusDiff {
        self.clear_all(&DISCARDED)
    }

    /// This state without its request-phase flags.
    pub fn decode_phase(&self) -> StatusDiff {
        let request: StatusDiff = REQUEST_PHASE.into_iter().collect();
        self.as_diff().without(request)
    }

    pub const fn is_loading(&self) -> bool {
        !self.contains(Milestone::RequestStopped)
    }

    /// Applies `event` and returns the flags it actually changed.
    ///
    /// Applying an event the state already reflects returns an empty diff.
    pub fn apply(&mut self, event: &StatusEvent) -> StatusDiff {
        self.apply_transition(event).set
    }

    pub fn apply_transition(&mut self, event: &StatusEvent) -> Transition {
        let mut transition = Transition::default();

        match event {
            StatusEvent::StartRequest if self.contains(Milestone::RequestStopped) => {
                transition.cleared = self.reset_for_next_part();
                transition.new_part = true;
            }
            StatusEvent::Discard => transition.cleared = self.discard_decode(),
            _ => {}
        }
        let baseline = *self;

        match event {
            StatusEvent::StartRequest => {
                self.insert(Milestone::RequestStarted);
            }
            StatusEvent::StartContainer(_) => {
                self.insert_decode_phase(Milestone::HasSize, &mut transition);
            }
            StatusEvent::StartDecode => {
                self.insert_decode_phase(Milestone::DecodeStarted, &mut transition);
            }
            StatusEvent::DataAvailable(_) => {
                transition.out_of_order = !self.contains(Milestone::DecodeStarted);
                transition.short_circuited = self.contains(Milestone::HasError);
            }
            StatusEvent::StopFrame => {
                transition.out_of_order = !self.contains(Milestone::DecodeStarted);
                self.insert_decode_phase(Milestone::FrameStopped, &mut transition);
            }
            StatusEvent::ImageIsAnimated => {
                self.insert_decode_phase(Milestone::IsAnimated, &mut transition);
            }
            StatusEvent::StopDecode(result) => {
                transition.out_of_order = !self.contains(Milestone::DecodeStarted);
                self.insert(Milestone::DecodeStopped);
                if result.is_err() {
                    self.insert(Milestone::HasError);
                }
            }
            StatusEvent::StopRequest { last_part, result } => {
                transition.out_of_order = !self.contains(Milestone::RequestStarted);
                self.insert(Milestone::RequestStopped);
                if *last_part {
                    self.insert(Milestone::MultipartStopped);
                }
                if result.is_err() {
                    self.insert(Milestone::HasError);
                }
            }
            StatusEvent::BlockOnload => {
                self.insert(Milestone::OnloadBlocked);
            }
            StatusEvent::UnblockOnload => {
                transition.out_of_order = !self.contains(Milestone::OnloadBlocked);
                self.insert(Milestone::OnloadUnblocked);
            }
            StatusEvent::Error => {
                self.insert(Milestone::HasError);
            }
            StatusEvent::Cancel => {
                if !self.contains(Milestone::RequestStopped) {
                    self.insert(Milestone::HasError);
                }
            }
            StatusEvent::Discard | StatusEvent::UnlockedDraw => {}
        }

        transition.set = self.difference_from(&baseline);
        transition
    }

    fn insert_decode_phase(&mut self, milestone: Milestone, transition: &mut Transition) {
        if self.contains(Milestone::HasError) {
            transition.short_circuited = true;
        } else {
            self.insert(milestone);
        }
    }

    fn clear_all(&mut self, milestones: &[Milestone]) -> StatusDiff {
        let before = *self;
        for milestone in milestones {
            self.remove(*milestone);
        }
        before.difference_from(self)
    }
}

impl fmt::Debug for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Milestone> for StatusState {
    fn from_iter<I: IntoIterator<Item = Milestone>>(iter: I) -> Self {
        let mut state = StatusState::empty();
        for milestone in iter {
            state.insert(milestone);
        }
        state
    }
}
