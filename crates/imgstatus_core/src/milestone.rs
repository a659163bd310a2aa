use std::fmt;

/// One-way lifecycle flags of an image load.
///
/// The discriminant is the flag's bit position in [`StatusState`](crate::StatusState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Milestone {
    RequestStarted,
    HasSize,
    DecodeStarted,
    DecodeStopped,
    FrameStopped,
    RequestStopped,
    OnloadBlocked,
    OnloadUnblocked,
    IsAnimated,
    IsMultipart,
    MultipartStopped,
    HasError,
}

impl Milestone {
    pub const ALL: [Milestone; 12] = [
        Milestone::RequestStarted,
        Milestone::HasSize,
        Milestone::DecodeStarted,
        Milestone::DecodeStopped,
        Milestone::FrameStopped,
        Milestone::RequestStopped,
        Milestone::OnloadBlocked,
        Milestone::OnloadUnblocked,
        Milestone::IsAnimated,
        Milestone::IsMultipart,
        Milestone::MultipartStopped,
        Milestone::HasError,
    ];

    /// Mask covering every milestone bit.
    pub(crate) const MASK: u16 = (1 << Self::ALL.len()) - 1;

    pub const fn bit(self) -> u16 {
        1 << self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            Milestone::RequestStarted => "request-started",
            Milestone::HasSize => "has-size",
            Milestone::DecodeStarted => "decode-started",
            Milestone::DecodeStopped => "decode-stopped",
            Milestone::FrameStopped => "frame-stopped",
            Milestone::RequestStopped => "request-stopped",
            Milestone::OnloadBlocked => "onload-blocked",
            Milestone::OnloadUnblocked => "onload-unblocked",
            Milestone::IsAnimated => "is-animated",
            Milestone::IsMultipart => "is-multipart",
            Milestone::MultipartStopped => "multipart-stopped",
            Milestone::HasError => "has-error",
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
