use crate::{Milestone, StatusState};

// Legacy request status layout exposed to embedders.
pub const STATUS_NONE: u32 = 0x0;
pub const STATUS_SIZE_AVAILABLE: u32 = 0x1;
pub const STATUS_LOAD_COMPLETE: u32 = 0x4;
pub const STATUS_ERROR: u32 = 0x8;
pub const STATUS_DECODE_STARTED: u32 = 0x10;
pub const STATUS_FRAME_COMPLETE: u32 = 0x20;
pub const STATUS_DECODE_COMPLETE: u32 = 0x40;

const LEGACY_BITS: [(Milestone, u32); 6] = [
    (Milestone::HasSize, STATUS_SIZE_AVAILABLE),
    (Milestone::DecodeStarted, STATUS_DECODE_STARTED),
    (Milestone::DecodeStopped, STATUS_DECODE_COMPLETE),
    (Milestone::FrameStopped, STATUS_FRAME_COMPLETE),
    (Milestone::RequestStopped, STATUS_LOAD_COMPLETE),
    (Milestone::HasError, STATUS_ERROR),
];

impl StatusState {
    /// Projects the state onto the legacy request status bits.
    pub fn image_status(&self) -> u32 {
        LEGACY_BITS
            .iter()
            .filter(|(milestone, _)| self.contains(*milestone))
            .fold(STATUS_NONE, |status, (_, bit)| status | bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onload_and_multipart_flags_have_no_legacy_bit() {
        let state: StatusState = [
            Milestone::RequestStarted,
            Milestone::OnloadBlocked,
            Milestone::IsMultipart,
        ]
        .into_iter()
        .collect();
        assert_eq!(state.image_status(), STATUS_NONE);
    }

    #[test]
    fn completed_load_reports_load_and_decode_bits() {
        let state: StatusState = [
            Milestone::RequestStarted,
            Milestone::HasSize,
            Milestone::DecodeStarted,
            Milestone::FrameStopped,
            Milestone::DecodeStopped,
            Milestone::RequestStopped,
        ]
        .into_iter()
        .collect();
        assert_eq!(
            state.image_status(),
            STATUS_SIZE_AVAILABLE
                | STATUS_DECODE_STARTED
                | STATUS_FRAME_COMPLETE
                | STATUS_DECODE_COMPLETE
                | STATUS_LOAD_COMPLETE
        );
    }
}
