//! Sine tone-engine backends.
//!
//! [`CpalTone`] renders a fixed sine waveform on the default audio output;
//! the control thread only flips a gate and retunes a frequency, both held
//! in atomics shared with the audio callback (f32 bit patterns in an
//! `AtomicU32` — no locks on the audio path).  [`NullTone`] is the silent
//! stand-in when no usable device exists, so the instrument still runs.

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use pose_notes::{ToneEngine, VoiceError};

const VOICE_LEVEL: f32 = 0.2;

// ════════════════════════════════════════════════════════════════════════════
// SineVoice — the opaque voice handle
// ════════════════════════════════════════════════════════════════════════════

/// Handle for one sounding tone.  Only ever held by the voice manager.
#[derive(Debug)]
pub struct SineVoice {
    pub generation: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// CpalTone — real audio output
// ════════════════════════════════════════════════════════════════════════════

struct SharedTone {
    /// f32 bit pattern of the target frequency in Hz.
    frequency_bits: AtomicU32,
    /// Whether the voice is sounding.
    gate: AtomicBool,
}

/// Tone engine on the default cpal output device.
pub struct CpalTone {
    _stream: cpal::Stream,
    shared: Arc<SharedTone>,
    generation: u64,
}

impl CpalTone {
    /// Open the default output device and start a silent stream.
    pub fn new() -> Result<Self, VoiceError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or_else(|| VoiceError::Unavailable {
            reason: "no default audio output device".to_string(),
        })?;

        let supported = device.default_output_config().map_err(|e| VoiceError::Unavailable {
            reason: format!("no output config: {}", e),
        })?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(VoiceError::Unavailable {
                reason: format!("unsupported sample format {:?}", supported.sample_format()),
            });
        }

        let config: cpal::StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        let shared = Arc::new(SharedTone {
            frequency_bits: AtomicU32::new(440f32.to_bits()),
            gate: AtomicBool::new(false),
        });

        let cb_shared = Arc::clone(&shared);
        let mut phase = 0f32;
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let gate = cb_shared.gate.load(Ordering::Relaxed);
                    let hz = f32::from_bits(cb_shared.frequency_bits.load(Ordering::Relaxed));
                    let step = hz / sample_rate * TAU;

                    for frame in data.chunks_mut(channels) {
                        let sample = if gate { phase.sin() * VOICE_LEVEL } else { 0.0 };
                        phase += step;
                        if phase > TAU {
                            phase -= TAU;
                        }
                        for out in frame {
                            *out = sample;
                        }
                    }
                },
                |err| log::error!("audio stream error: {}", err),
                None,
            )
            .map_err(|e| VoiceError::Unavailable { reason: format!("stream refused: {}", e) })?;

        stream.play().map_err(|e| VoiceError::Unavailable {
            reason: format!("stream would not start: {}", e),
        })?;

        log::info!(
            "audio: default output open at {} Hz, {} channel(s)",
            config.sample_rate.0,
            channels
        );

        Ok(CpalTone {
            _stream: stream,
            shared,
            generation: 0,
        })
    }
}

impl ToneEngine for CpalTone {
    type Voice = SineVoice;

    fn start(&mut self, hz: f32) -> Result<SineVoice, VoiceError> {
        self.shared.frequency_bits.store(hz.to_bits(), Ordering::Relaxed);
        self.shared.gate.store(true, Ordering::Relaxed);
        self.generation += 1;
        Ok(SineVoice { generation: self.generation })
    }

    fn stop(&mut self, _voice: SineVoice) {
        self.shared.gate.store(false, Ordering::Relaxed);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NullTone — silent fallback
// ════════════════════════════════════════════════════════════════════════════

/// Tone engine that sounds nothing.  Used when no audio device is
/// available so the rest of the instrument keeps working.
#[derive(Default)]
pub struct NullTone {
    generation: u64,
}

impl ToneEngine for NullTone {
    type Voice = SineVoice;

    fn start(&mut self, hz: f32) -> Result<SineVoice, VoiceError> {
        log::debug!("null voice at {:.2} Hz", hz);
        self.generation += 1;
        Ok(SineVoice { generation: self.generation })
    }

    fn stop(&mut self, _voice: SineVoice) {}
}

// ════════════════════════════════════════════════════════════════════════════
// open_tone_engine — pick the best available backend
// ════════════════════════════════════════════════════════════════════════════

/// Open the cpal backend, falling back to silence with a warning.
pub fn open_tone_engine() -> Box<dyn ToneEngine<Voice = SineVoice>> {
    match CpalTone::new() {
        Ok(engine) => Box::new(engine),
        Err(err) => {
            log::warn!("audio unavailable: {} — running silent", err);
            Box::new(NullTone::default())
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
