//! Reference engine servicing bridge requests with real audio I/O.
//!
//! Runs on its own worker thread and owns the full-resolution takes; the
//! client only ever sees the bridge and the downsampled display amplitudes.

use crate::engine::bridge::{EngineEndpoint, EngineEvent, EngineRequest};
use crate::engine::config::EngineConfig;
use crate::engine::resample::resample_mono;
use crate::{LoopdeckError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const CLICK_FREQ_HZ: f32 = 1000.0;

/// Audio engine backed by the default cpal input/output devices.
pub struct NativeEngine {
    config: EngineConfig,
    endpoint: EngineEndpoint,
    /// Full-resolution takes, one per recorded clip, in recording order.
    takes: Vec<Vec<f32>>,
    /// Capture rate of the retained takes.
    take_rate: u32,
    metronome: Option<MetronomeHandle>,
}

struct MetronomeHandle {
    running: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl NativeEngine {
    pub fn new(config: EngineConfig, endpoint: EngineEndpoint) -> Self {
        Self {
            config,
            endpoint,
            takes: Vec::new(),
            take_rate: 0,
            metronome: None,
        }
    }

    /// Spawn the engine on a worker thread.
    pub fn spawn(config: EngineConfig, endpoint: EngineEndpoint) -> JoinHandle<()> {
        thread::spawn(move || NativeEngine::new(config, endpoint).run())
    }

    /// Service requests until the client side goes away.
    pub fn run(mut self) {
        info!("Native engine started");

        while let Ok(request) = self.endpoint.next_request() {
            let event = self.handle(request);
            if self.endpoint.reply(event).is_err() {
                warn!("Client went away, stopping engine");
                break;
            }
        }

        let _ = self.stop_metronome();
        info!("Native engine stopped");
    }

    fn handle(&mut self, request: EngineRequest) -> EngineEvent {
        debug!("Handling {:?}", request);

        let result = match request {
            EngineRequest::RecordClip => self.record_clip().map(EngineEvent::ClipRecorded),
            EngineRequest::PlayClips => self.play_clips().map(|_| EngineEvent::PlaybackFinished),
            EngineRequest::StartMetronome => {
                self.start_metronome().map(|_| EngineEvent::MetronomeStarted)
            }
            EngineRequest::StopMetronome => {
                self.stop_metronome().map(|_| EngineEvent::MetronomeStopped)
            }
        };

        match result {
            Ok(event) => event,
            Err(e) => {
                warn!("Request {:?} failed: {}", request, e);
                EngineEvent::RequestFailed {
                    request,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Capture one fixed-length take from the default input device. Retains
    /// the full take for playback and returns the downsampled display
    /// amplitudes.
    fn record_clip(&mut self) -> Result<Vec<f32>> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| LoopdeckError::AudioDevice("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported = device.default_input_config().map_err(|e| {
            LoopdeckError::AudioDevice(format!("Failed to get input config: {}", e))
        })?;
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = Arc::clone(&buffer);

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = device
            .build_input_stream(
                &supported.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let mut buf = writer.lock();
                    // Fold interleaved channels down to mono
                    for frame in data.chunks(channels) {
                        buf.push(frame.iter().sum::<f32>() / channels as f32);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                LoopdeckError::AudioDevice(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            LoopdeckError::AudioDevice(format!("Failed to start input stream: {}", e))
        })?;

        thread::sleep(Duration::from_secs_f32(self.config.record_secs));
        drop(stream);

        let take = std::mem::take(&mut *buffer.lock());
        info!("Captured {} samples at {} Hz", take.len(), sample_rate);

        let display = downsample(&take, self.config.downsample_len);
        self.takes.push(take);
        self.take_rate = sample_rate;

        Ok(display)
    }

    /// Mix every retained take into one buffer and play it to completion on
    /// the default output device.
    fn play_clips(&mut self) -> Result<()> {
        if self.takes.is_empty() {
            debug!("No takes to play");
            return Ok(());
        }

        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| LoopdeckError::AudioDevice("No output device available".into()))?;

        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported = device.default_output_config().map_err(|e| {
            LoopdeckError::AudioDevice(format!("Failed to get output config: {}", e))
        })?;
        let out_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;

        let mut mix = mix_takes(&self.takes);
        if self.take_rate != out_rate {
            mix = resample_mono(&mix, self.take_rate, out_rate)?;
        }

        let total = mix.len();
        let cursor = Arc::new(Mutex::new((0usize, mix)));
        let reader = Arc::clone(&cursor);
        let (done_tx, done_rx) = bounded::<()>(1);

        let err_fn = |err| {
            error!("Audio output stream error: {}", err);
        };

        let stream = device
            .build_output_stream(
                &supported.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut guard = reader.lock();
                    let (position, samples) = &mut *guard;

                    for frame in data.chunks_mut(channels) {
                        let sample = samples.get(*position).copied().unwrap_or(0.0);
                        for slot in frame.iter_mut() {
                            *slot = sample;
                        }
                        *position += 1;
                    }

                    if *position >= samples.len() {
                        let _ = done_tx.try_send(());
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                LoopdeckError::AudioDevice(format!("Failed to build output stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            LoopdeckError::AudioDevice(format!("Failed to start output stream: {}", e))
        })?;

        done_rx.recv().map_err(|e| {
            LoopdeckError::Channel(format!("Playback stream ended unexpectedly: {}", e))
        })?;
        drop(stream);

        info!("Finished playback, {} samples", total);
        Ok(())
    }

    /// Start the click generator. Idempotent if already running.
    fn start_metronome(&mut self) -> Result<()> {
        if self.metronome.is_some() {
            return Ok(());
        }

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let bpm = self.config.bpm;
        let (ready_tx, ready_rx) = bounded(1);

        let thread = thread::spawn(move || run_metronome(bpm, flag, ready_tx));

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("Metronome started at {} BPM", bpm);
                self.metronome = Some(MetronomeHandle { running, thread });
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(e) => {
                let _ = thread.join();
                Err(LoopdeckError::Channel(format!(
                    "Metronome thread died: {}",
                    e
                )))
            }
        }
    }

    /// Stop the click generator. Idempotent if already stopped.
    fn stop_metronome(&mut self) -> Result<()> {
        if let Some(handle) = self.metronome.take() {
            handle.running.store(false, Ordering::SeqCst);
            if handle.thread.join().is_err() {
                warn!("Metronome thread panicked");
            }
            info!("Metronome stopped");
        }
        Ok(())
    }
}

/// Metronome worker: owns the output stream for its whole lifetime. Device
/// setup errors are reported once through `ready_tx`.
fn run_metronome(bpm: u32, running: Arc<AtomicBool>, ready_tx: Sender<Result<()>>) {
    let stream = match build_click_stream(bpm) {
        Ok(stream) => {
            let _ = ready_tx.send(Ok(()));
            stream
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(20));
    }

    drop(stream);
}

fn build_click_stream(bpm: u32) -> Result<cpal::Stream> {
    let host = cpal::default_host();

    let device = host
        .default_output_device()
        .ok_or_else(|| LoopdeckError::AudioDevice("No output device available".into()))?;

    let supported = device.default_output_config().map_err(|e| {
        LoopdeckError::AudioDevice(format!("Failed to get output config: {}", e))
    })?;
    let rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;

    let samples_per_beat = ((rate as u64 * 60 / bpm as u64).max(1)) as usize;
    let click_len = (rate / 50) as usize; // 20 ms burst
    let mut position = 0usize;

    let err_fn = |err| {
        error!("Metronome stream error: {}", err);
    };

    let stream = device
        .build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let offset = position % samples_per_beat;
                    let sample = if offset < click_len {
                        let t = offset as f32 / rate as f32;
                        let envelope = 1.0 - offset as f32 / click_len as f32;
                        (t * CLICK_FREQ_HZ * std::f32::consts::TAU).sin() * envelope * 0.5
                    } else {
                        0.0
                    };
                    for slot in frame.iter_mut() {
                        *slot = sample;
                    }
                    position += 1;
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| {
            LoopdeckError::AudioDevice(format!("Failed to build output stream: {}", e))
        })?;

    stream.play().map_err(|e| {
        LoopdeckError::AudioDevice(format!("Failed to start output stream: {}", e))
    })?;

    Ok(stream)
}

/// Chunk-average a take down to roughly `target_len` points for display.
fn downsample(samples: &[f32], target_len: usize) -> Vec<f32> {
    if target_len == 0 || samples.len() <= target_len {
        return samples.to_vec();
    }

    let chunk_size = samples.len() / target_len;
    samples
        .chunks(chunk_size)
        .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
        .collect()
}

/// Sum takes sample-wise and clamp, so layered loops play together.
fn mix_takes(takes: &[Vec<f32>]) -> Vec<f32> {
    let len = takes.iter().map(Vec::len).max().unwrap_or(0);
    let mut mix = vec![0.0f32; len];

    for take in takes {
        for (slot, sample) in mix.iter_mut().zip(take) {
            *slot += sample;
        }
    }

    for sample in mix.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }

    mix
}
