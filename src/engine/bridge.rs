//! Request/event bridge between the looper client and the audio engine.
//!
//! The client fires a request and returns to its event loop; the engine
//! answers with an event the client drains on its next poll. The engine side
//! services requests strictly in receive order, so completions are observed
//! in the order the requests were issued.

use crate::{LoopdeckError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};

const CHANNEL_CAPACITY: usize = 64;

/// Requests the client issues to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRequest {
    /// Capture one take and return its downsampled display amplitudes.
    RecordClip,
    /// Play the engine's full clip collection to completion.
    PlayClips,
    StartMetronome,
    StopMetronome,
}

/// Completions and failures the engine reports back.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    ClipRecorded(Vec<f32>),
    PlaybackFinished,
    MetronomeStarted,
    MetronomeStopped,
    RequestFailed {
        request: EngineRequest,
        message: String,
    },
}

/// Client side of the bridge, held by the transport.
#[derive(Debug, Clone)]
pub struct EngineBridge {
    request_tx: Sender<EngineRequest>,
    event_rx: Receiver<EngineEvent>,
}

impl EngineBridge {
    /// Issue a request to the engine without waiting for its completion.
    pub fn send(&self, request: EngineRequest) -> Result<()> {
        self.request_tx
            .send(request)
            .map_err(|e| LoopdeckError::Channel(format!("Failed to send {:?}: {}", request, e)))
    }

    /// Drain one pending engine event, if any.
    pub fn try_recv_event(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

/// Engine side of the bridge, consumed by whatever services the requests.
#[derive(Debug, Clone)]
pub struct EngineEndpoint {
    request_rx: Receiver<EngineRequest>,
    event_tx: Sender<EngineEvent>,
}

impl EngineEndpoint {
    /// Block until the next request arrives. Returns an error once the
    /// client side has gone away.
    pub fn next_request(&self) -> Result<EngineRequest> {
        self.request_rx
            .recv()
            .map_err(|e| LoopdeckError::Channel(format!("Request channel closed: {}", e)))
    }

    /// Non-blocking variant of [`next_request`](Self::next_request).
    pub fn try_next_request(&self) -> Option<EngineRequest> {
        self.request_rx.try_recv().ok()
    }

    /// Report a completion or failure back to the client.
    pub fn reply(&self, event: EngineEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .map_err(|e| LoopdeckError::Channel(format!("Event channel closed: {}", e)))
    }
}

/// Create a connected bridge/endpoint pair.
pub fn channel() -> (EngineBridge, EngineEndpoint) {
    let (request_tx, request_rx) = bounded(CHANNEL_CAPACITY);
    let (event_tx, event_rx) = bounded(CHANNEL_CAPACITY);

    (
        EngineBridge {
            request_tx,
            event_rx,
        },
        EngineEndpoint {
            request_rx,
            event_tx,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_round_trip() {
        let (bridge, endpoint) = channel();

        bridge.send(EngineRequest::RecordClip).unwrap();
        assert_eq!(
            endpoint.try_next_request(),
            Some(EngineRequest::RecordClip)
        );
        assert_eq!(endpoint.try_next_request(), None);
    }

    #[test]
    fn test_event_round_trip() {
        let (bridge, endpoint) = channel();

        endpoint.reply(EngineEvent::PlaybackFinished).unwrap();
        assert!(matches!(
            bridge.try_recv_event(),
            Some(EngineEvent::PlaybackFinished)
        ));
        assert!(bridge.try_recv_event().is_none());
    }

    #[test]
    fn test_send_fails_when_endpoint_dropped() {
        let (bridge, endpoint) = channel();
        drop(endpoint);

        assert!(bridge.send(EngineRequest::PlayClips).is_err());
    }
}
