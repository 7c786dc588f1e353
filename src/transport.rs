//! Transport state machine for the looper client.
//!
//! Tracks recording/playing/metronome status, guards mutually-exclusive
//! actions before any engine request is issued, and completes in-flight
//! operations from engine events drained by [`Transport::poll`].

use crate::clips::{AudioClip, ClipStore};
use crate::engine::{EngineBridge, EngineEvent, EngineRequest};
use crate::Result;
use tracing::{debug, info, warn};

/// Mutually-exclusive transport states. The metronome flag is orthogonal and
/// lives next to this on [`Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    /// A record request is in flight with the engine.
    Recording,
    /// A playback request is in flight with the engine.
    Playing,
}

/// Completions surfaced to the caller by [`Transport::poll`].
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A new clip landed in the store at this index.
    ClipRecorded { index: usize },
    PlaybackFinished,
    MetronomeStarted,
    MetronomeStopped,
    /// An engine request failed; transport state has already been restored.
    OperationFailed {
        request: EngineRequest,
        message: String,
    },
}

/// The looper's transport: record, play, metronome.
pub struct Transport {
    state: TransportState,
    metronome_on: bool,
    bridge: EngineBridge,
    clips: ClipStore,
    last_error: Option<String>,
}

impl Transport {
    pub fn new(bridge: EngineBridge, clips: ClipStore) -> Self {
        Self {
            state: TransportState::Idle,
            metronome_on: false,
            bridge,
            clips,
            last_error: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn metronome_on(&self) -> bool {
        self.metronome_on
    }

    pub fn clips(&self) -> &ClipStore {
        &self.clips
    }

    /// Message from the most recent failed engine request, for display.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Ask the engine to record one take. Ignored unless the transport is
    /// idle; re-entrant starts issue no request.
    pub fn start_recording(&mut self) -> Result<()> {
        if self.state != TransportState::Idle {
            debug!("Ignoring record request while {:?}", self.state);
            return Ok(());
        }

        self.bridge.send(EngineRequest::RecordClip)?;
        self.state = TransportState::Recording;
        info!("Recording started");
        Ok(())
    }

    /// Ask the engine to play the full clip collection. Ignored unless the
    /// transport is idle.
    pub fn start_playback(&mut self) -> Result<()> {
        if self.state != TransportState::Idle {
            debug!("Ignoring play request while {:?}", self.state);
            return Ok(());
        }

        self.bridge.send(EngineRequest::PlayClips)?;
        self.state = TransportState::Playing;
        info!("Playback started");
        Ok(())
    }

    /// Flip the metronome flag, then send the request matching the
    /// post-toggle value. On a send failure the flag is flipped back.
    pub fn toggle_metronome(&mut self) -> Result<()> {
        self.metronome_on = !self.metronome_on;

        let request = if self.metronome_on {
            EngineRequest::StartMetronome
        } else {
            EngineRequest::StopMetronome
        };

        if let Err(e) = self.bridge.send(request) {
            self.metronome_on = !self.metronome_on;
            return Err(e);
        }

        info!(
            "Metronome {}",
            if self.metronome_on { "on" } else { "off" }
        );
        Ok(())
    }

    /// Drain pending engine events, completing in-flight operations. Exactly
    /// one clip is appended per successful recording; failures restore the
    /// idle state (or the prior metronome flag) and are returned to the
    /// caller rather than swallowed.
    pub fn poll(&mut self) -> Vec<TransportEvent> {
        let mut events = Vec::new();

        while let Some(event) = self.bridge.try_recv_event() {
            match event {
                EngineEvent::ClipRecorded(samples) => {
                    if self.state != TransportState::Recording {
                        warn!("Dropping clip, transport is {:?}", self.state);
                        continue;
                    }

                    self.clips.push(AudioClip::new(samples));
                    self.state = TransportState::Idle;

                    let index = self.clips.len() - 1;
                    info!("Recorded clip {:02}", index);
                    events.push(TransportEvent::ClipRecorded { index });
                }
                EngineEvent::PlaybackFinished => {
                    if self.state != TransportState::Playing {
                        warn!("Unexpected playback completion while {:?}", self.state);
                        continue;
                    }

                    self.state = TransportState::Idle;
                    info!("Playback finished");
                    events.push(TransportEvent::PlaybackFinished);
                }
                EngineEvent::MetronomeStarted => {
                    events.push(TransportEvent::MetronomeStarted);
                }
                EngineEvent::MetronomeStopped => {
                    events.push(TransportEvent::MetronomeStopped);
                }
                EngineEvent::RequestFailed { request, message } => {
                    warn!("{:?} failed: {}", request, message);

                    match request {
                        EngineRequest::RecordClip | EngineRequest::PlayClips => {
                            self.state = TransportState::Idle;
                        }
                        EngineRequest::StartMetronome => self.metronome_on = false,
                        EngineRequest::StopMetronome => self.metronome_on = true,
                    }

                    self.last_error = Some(message.clone());
                    events.push(TransportEvent::OperationFailed { request, message });
                }
            }
        }

        events
    }
}
