use std::sync::Once;

use imgstatus_core::{FailureKind, ImageRect, ImageSize, Milestone, StatusEvent, StatusState};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(imgstatus_logging::initialize_for_tests);
}

fn all_events() -> Vec<StatusEvent> {
    vec![
        StatusEvent::StartRequest,
        StatusEvent::StartContainer(ImageSize::new(16, 16)),
        StatusEvent::StartDecode,
        StatusEvent::DataAvailable(ImageRect::new(0, 0, 16, 4)),
        StatusEvent::StopFrame,
        StatusEvent::StopDecode(Ok(())),
        StatusEvent::StopDecode(Err(FailureKind::Decode("truncated".into()))),
        StatusEvent::StopRequest {
            last_part: false,
            result: Ok(()),
        },
        StatusEvent::StopRequest {
            last_part: true,
            result: Err(FailureKind::Network),
        },
        StatusEvent::BlockOnload,
        StatusEvent::UnblockOnload,
        StatusEvent::ImageIsAnimated,
        StatusEvent::UnlockedDraw,
        StatusEvent::Discard,
        StatusEvent::Error,
        StatusEvent::Cancel,
    ]
}

fn loading_state() -> StatusState {
    let mut state = StatusState::empty();
    state.apply(&StatusEvent::StartRequest);
    state.apply(&StatusEvent::StartContainer(ImageSize::new(4, 4)));
    state.apply(&StatusEvent::StartDecode);
    state
}

#[test]
fn applying_a_reflected_event_is_a_no_op() {
    init_logging();
    for base in [StatusState::empty(), loading_state()] {
        for event in all_events() {
            let mut state = base;
            state.apply(&event);
            let after_first = state;

            let second = state.apply(&event);
            assert!(
                second.is_no_change(),
                "{} changed {:?} on second apply",
                event.name(),
                second
            );
            assert_eq!(state, after_first, "{} is not idempotent", event.name());
        }
    }
}

#[test]
fn apply_reports_only_changed_flags() {
    init_logging();
    let mut state = StatusState::empty();
    let diff = state.apply(&StatusEvent::StopRequest {
        last_part: true,
        result: Err(FailureKind::Network),
    });

    let expected = [
        Milestone::RequestStopped,
        Milestone::MultipartStopped,
        Milestone::HasError,
    ];
    assert_eq!(diff.iter().collect::<Vec<_>>(), expected);
}

#[test]
fn out_of_order_events_are_accepted_and_flagged() {
    init_logging();
    let mut state = StatusState::empty();

    let transition = state.apply_transition(&StatusEvent::StopDecode(Ok(())));
    assert!(transition.out_of_order);
    assert!(state.contains(Milestone::DecodeStopped));

    let transition = state.apply_transition(&StatusEvent::UnblockOnload);
    assert!(transition.out_of_order);
    assert!(state.contains(Milestone::OnloadUnblocked));

    let transition = state.apply_transition(&StatusEvent::StartRequest);
    assert!(!transition.out_of_order);
}

#[test]
fn next_part_resets_per_part_flags() {
    init_logging();
    let mut state = loading_state();
    state.insert(Milestone::IsMultipart);
    state.apply(&StatusEvent::BlockOnload);
    state.apply(&StatusEvent::StopDecode(Ok(())));
    state.apply(&StatusEvent::StopRequest {
        last_part: false,
        result: Ok(()),
    });

    let transition = state.apply_transition(&StatusEvent::StartRequest);

    assert!(transition.new_part);
    assert!(transition.set.contains(Milestone::RequestStarted));
    assert!(transition.cleared.contains(Milestone::RequestStopped));
    assert!(transition.cleared.contains(Milestone::OnloadBlocked));
    assert!(state.contains(Milestone::RequestStarted));
    assert!(state.contains(Milestone::HasSize));
    assert!(state.contains(Milestone::IsMultipart));
    assert!(!state.contains(Milestone::DecodeStarted));
    assert!(!state.contains(Milestone::RequestStopped));
}

#[test]
fn cancel_after_stop_is_not_an_error() {
    init_logging();
    let mut state = loading_state();
    state.apply(&StatusEvent::StopRequest {
        last_part: true,
        result: Ok(()),
    });

    assert!(state.apply(&StatusEvent::Cancel).is_no_change());
    assert!(!state.contains(Milestone::HasError));
}

#[test]
fn discard_clears_decoded_frames_only() {
    init_logging();
    let mut state = loading_state();
    state.apply(&StatusEvent::StopFrame);
    state.apply(&StatusEvent::StopDecode(Ok(())));

    let transition = state.apply_transition(&StatusEvent::Discard);

    assert!(transition.set.is_no_change());
    assert_eq!(
        transition.cleared.iter().collect::<Vec<_>>(),
        vec![
            Milestone::DecodeStarted,
            Milestone::DecodeStopped,
            Milestone::FrameStopped
        ]
    );
    assert!(state.contains(Milestone::HasSize));
}

#[test]
fn loading_ends_with_stop_request() {
    init_logging();
    let mut state = loading_state();
    assert!(state.is_loading());
    state.apply(&StatusEvent::StopRequest {
        last_part: true,
        result: Ok(()),
    });
    assert!(!state.is_loading());
}

#[test]
fn data_available_sets_no_flag_and_stops_after_failure() {
    init_logging();
    let mut state = loading_state();
    let before = state;
    let transition =
        state.apply_transition(&StatusEvent::DataAvailable(ImageRect::new(0, 0, 4, 1)));
    assert!(transition.set.is_no_change());
    assert!(!transition.out_of_order);
    assert!(!transition.short_circuited);
    assert_eq!(state, before);

    state.apply(&StatusEvent::Error);
    let transition =
        state.apply_transition(&StatusEvent::DataAvailable(ImageRect::new(0, 1, 4, 1)));
    assert!(transition.short_circuited);
}
