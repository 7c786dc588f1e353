//! Transport state machine tests
//!
//! These tests drive the transport against a scripted engine endpoint:
//! assert the request arrived, inject the engine's reply, poll, and check
//! the resulting state and clip store.

use loopdeck::clips::ClipStore;
use loopdeck::engine::{self, EngineEndpoint, EngineEvent, EngineRequest};
use loopdeck::transport::{Transport, TransportEvent, TransportState};

fn transport_with_stub() -> (Transport, EngineEndpoint) {
    let (bridge, endpoint) = engine::channel();
    (Transport::new(bridge, ClipStore::new()), endpoint)
}

#[test]
fn test_initial_state_is_idle() {
    let (transport, _endpoint) = transport_with_stub();

    assert_eq!(
        transport.state(),
        TransportState::Idle,
        "Initial state should be Idle"
    );
    assert!(!transport.metronome_on());
    assert!(transport.clips().is_empty());
    assert!(transport.last_error().is_none());
}

#[test]
fn test_start_recording_issues_request_and_transitions() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.start_recording().unwrap();

    assert_eq!(transport.state(), TransportState::Recording);
    assert_eq!(
        endpoint.try_next_request(),
        Some(EngineRequest::RecordClip),
        "A record request should reach the engine"
    );
}

#[test]
fn test_recording_completion_appends_exactly_one_clip() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.start_recording().unwrap();
    endpoint.try_next_request().unwrap();
    endpoint
        .reply(EngineEvent::ClipRecorded(vec![0.1, -0.5, 0.9]))
        .unwrap();

    let events = transport.poll();

    assert_eq!(transport.state(), TransportState::Idle);
    assert_eq!(transport.clips().len(), 1, "Exactly one clip per take");
    assert_eq!(transport.clips().snapshot()[0].samples, vec![0.1, -0.5, 0.9]);
    assert!(matches!(
        events.as_slice(),
        [TransportEvent::ClipRecorded { index: 0 }]
    ));
}

#[test]
fn test_reentrant_record_is_ignored() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.start_recording().unwrap();
    transport.start_recording().unwrap();

    assert_eq!(
        endpoint.try_next_request(),
        Some(EngineRequest::RecordClip)
    );
    assert_eq!(
        endpoint.try_next_request(),
        None,
        "A re-entrant start must not issue a second request"
    );
    assert!(transport.clips().is_empty());
}

#[test]
fn test_playback_rejected_while_recording() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.start_recording().unwrap();
    transport.start_playback().unwrap();

    assert_eq!(
        transport.state(),
        TransportState::Recording,
        "Recording and playing are mutually exclusive"
    );
    assert_eq!(
        endpoint.try_next_request(),
        Some(EngineRequest::RecordClip)
    );
    assert_eq!(
        endpoint.try_next_request(),
        None,
        "No play request may be queued while recording"
    );
}

#[test]
fn test_record_rejected_while_playing() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.start_playback().unwrap();
    transport.start_recording().unwrap();

    assert_eq!(transport.state(), TransportState::Playing);
    assert_eq!(endpoint.try_next_request(), Some(EngineRequest::PlayClips));
    assert_eq!(endpoint.try_next_request(), None);
    assert!(transport.clips().is_empty());
}

#[test]
fn test_clip_order_matches_completion_order() {
    let (mut transport, endpoint) = transport_with_stub();

    for i in 0..3 {
        transport.start_recording().unwrap();
        endpoint.try_next_request().unwrap();
        endpoint
            .reply(EngineEvent::ClipRecorded(vec![i as f32]))
            .unwrap();
        transport.poll();
    }

    let clips = transport.clips().snapshot();
    assert_eq!(clips.len(), 3);
    for (i, clip) in clips.iter().enumerate() {
        assert_eq!(
            clip.samples,
            vec![i as f32],
            "Clip {} should hold the take recorded {}th",
            i,
            i
        );
    }
}

#[test]
fn test_playback_completion_returns_to_idle() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.start_playback().unwrap();
    assert_eq!(transport.state(), TransportState::Playing);

    endpoint.reply(EngineEvent::PlaybackFinished).unwrap();
    let events = transport.poll();

    assert_eq!(transport.state(), TransportState::Idle);
    assert!(matches!(
        events.as_slice(),
        [TransportEvent::PlaybackFinished]
    ));
    assert!(
        transport.clips().is_empty(),
        "Playback must not touch the clip store"
    );
}

#[test]
fn test_first_metronome_toggle_sends_start() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.toggle_metronome().unwrap();

    assert!(transport.metronome_on());
    assert_eq!(
        endpoint.try_next_request(),
        Some(EngineRequest::StartMetronome),
        "The request must follow the post-toggle flag value"
    );
}

#[test]
fn test_metronome_double_toggle_sends_start_then_stop() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.toggle_metronome().unwrap();
    transport.toggle_metronome().unwrap();

    assert!(!transport.metronome_on(), "Flag returns to its original value");
    assert_eq!(
        endpoint.try_next_request(),
        Some(EngineRequest::StartMetronome)
    );
    assert_eq!(
        endpoint.try_next_request(),
        Some(EngineRequest::StopMetronome)
    );
    assert_eq!(endpoint.try_next_request(), None);
}

#[test]
fn test_record_failure_restores_idle_without_append() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.start_recording().unwrap();
    endpoint.try_next_request().unwrap();
    endpoint
        .reply(EngineEvent::RequestFailed {
            request: EngineRequest::RecordClip,
            message: "No input device available".into(),
        })
        .unwrap();

    let events = transport.poll();

    assert_eq!(
        transport.state(),
        TransportState::Idle,
        "A failed recording must not leave the transport stuck"
    );
    assert!(transport.clips().is_empty(), "Failed takes are not stored");
    assert_eq!(transport.last_error(), Some("No input device available"));
    assert!(matches!(
        events.as_slice(),
        [TransportEvent::OperationFailed {
            request: EngineRequest::RecordClip,
            ..
        }]
    ));
}

#[test]
fn test_playback_failure_restores_idle() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.start_playback().unwrap();
    endpoint
        .reply(EngineEvent::RequestFailed {
            request: EngineRequest::PlayClips,
            message: "No output device available".into(),
        })
        .unwrap();

    transport.poll();

    assert_eq!(transport.state(), TransportState::Idle);
    assert!(transport.last_error().is_some());
}

#[test]
fn test_metronome_start_failure_restores_flag() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.toggle_metronome().unwrap();
    assert!(transport.metronome_on());

    endpoint
        .reply(EngineEvent::RequestFailed {
            request: EngineRequest::StartMetronome,
            message: "No output device available".into(),
        })
        .unwrap();

    transport.poll();

    assert!(
        !transport.metronome_on(),
        "A failed start must restore the prior metronome state"
    );
}

#[test]
fn test_operations_fail_cleanly_when_engine_gone() {
    let (mut transport, endpoint) = transport_with_stub();
    drop(endpoint);

    assert!(transport.start_recording().is_err());
    assert_eq!(
        transport.state(),
        TransportState::Idle,
        "A send failure must leave the state unchanged"
    );

    let was_on = transport.metronome_on();
    assert!(transport.toggle_metronome().is_err());
    assert_eq!(
        transport.metronome_on(),
        was_on,
        "A send failure must roll the metronome flag back"
    );
}

#[test]
fn test_error_can_be_dismissed() {
    let (mut transport, endpoint) = transport_with_stub();

    transport.start_playback().unwrap();
    endpoint
        .reply(EngineEvent::RequestFailed {
            request: EngineRequest::PlayClips,
            message: "stream died".into(),
        })
        .unwrap();
    transport.poll();

    assert!(transport.last_error().is_some());
    transport.clear_error();
    assert!(transport.last_error().is_none());
}

#[test]
fn test_full_session_cycle() {
    let (mut transport, endpoint) = transport_with_stub();

    // Record a take
    transport.start_recording().unwrap();
    endpoint.try_next_request().unwrap();
    endpoint
        .reply(EngineEvent::ClipRecorded(vec![0.2, 0.4]))
        .unwrap();
    transport.poll();
    assert_eq!(transport.state(), TransportState::Idle);
    assert_eq!(transport.clips().len(), 1);

    // Play it back
    transport.start_playback().unwrap();
    endpoint.try_next_request().unwrap();
    endpoint.reply(EngineEvent::PlaybackFinished).unwrap();
    transport.poll();
    assert_eq!(transport.state(), TransportState::Idle);

    // Metronome on, then off
    transport.toggle_metronome().unwrap();
    endpoint.reply(EngineEvent::MetronomeStarted).unwrap();
    transport.poll();
    assert!(transport.metronome_on());

    transport.toggle_metronome().unwrap();
    endpoint.reply(EngineEvent::MetronomeStopped).unwrap();
    transport.poll();
    assert!(!transport.metronome_on());

    assert_eq!(transport.clips().len(), 1, "Playback and metronome never touch the store");
}
