//! Tone-engine interface and the monophonic voice manager.
//!
//! The tone engine is an external collaborator ("start a sine tone at F Hz" /
//! "stop that tone"); [`ToneEngine`] is its seam, so the state machine can be
//! exercised against fakes and the application can pick a backend at runtime.
//!
//! [`VoiceManager`] enforces the resource discipline: at most one voice alive
//! at any instant, replacement is stop-then-start, and a released handle can
//! never be touched again (the slot is taken before release).

use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// VoiceError
// ════════════════════════════════════════════════════════════════════════════

/// Failure to produce a voice from the tone-engine backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceError {
    /// The backend could not start output — no device, no permission,
    /// stream refused.  Recoverable: the caller may retry next frame.
    Unavailable { reason: String },
}

impl fmt::Display for VoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceError::Unavailable { reason } => write!(f, "voice unavailable: {}", reason),
        }
    }
}

impl std::error::Error for VoiceError {}

// ════════════════════════════════════════════════════════════════════════════
// ToneEngine
// ════════════════════════════════════════════════════════════════════════════

/// A backend that can sound one sine tone at a time.
///
/// `start` begins output at `hz` (a positive frequency, waveform fixed to
/// sine by contract) and hands back an opaque voice handle; `stop` halts
/// output and consumes the handle.  Backends need not tolerate overlapping
/// voices — callers go through [`VoiceManager`], which never holds two.
pub trait ToneEngine {
    /// Opaque handle for one sounding tone.
    type Voice;

    fn start(&mut self, hz: f32) -> Result<Self::Voice, VoiceError>;
    fn stop(&mut self, voice: Self::Voice);
}

// Lets the application hand the machine a runtime-selected backend.
impl<E: ToneEngine + ?Sized> ToneEngine for Box<E> {
    type Voice = E::Voice;

    fn start(&mut self, hz: f32) -> Result<Self::Voice, VoiceError> {
        (**self).start(hz)
    }

    fn stop(&mut self, voice: Self::Voice) {
        (**self).stop(voice)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// VoiceManager
// ════════════════════════════════════════════════════════════════════════════

/// Exclusive owner of the at-most-one live voice.
pub struct VoiceManager<E: ToneEngine> {
    engine: E,
    voice: Option<E::Voice>,
}

impl<E: ToneEngine> VoiceManager<E> {
    pub fn new(engine: E) -> Self {
        VoiceManager { engine, voice: None }
    }

    /// Replace the active voice: stop the old one first (if any), then
    /// start a new one at `hz`.  On failure the slot is left empty — the
    /// old voice is already gone, never half-replaced.
    pub fn start(&mut self, hz: f32) -> Result<(), VoiceError> {
        if let Some(old) = self.voice.take() {
            self.engine.stop(old);
        }
        self.voice = Some(self.engine.start(hz)?);
        Ok(())
    }

    /// Stop the active voice.  No-op when nothing is sounding, so a held
    /// rest releases exactly once.
    pub fn stop(&mut self) {
        if let Some(voice) = self.voice.take() {
            self.engine.stop(voice);
        }
    }

    pub fn is_active(&self) -> bool {
        self.voice.is_some()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: ToneEngine> Drop for VoiceManager<E> {
    fn drop(&mut self) {
        self.stop();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
