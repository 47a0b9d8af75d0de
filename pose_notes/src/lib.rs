//! # pose_notes
//!
//! Converts a per-frame stream of classified hand gestures into monophonic
//! note events against a tone engine.
//!
//! * [`pitch`] — gesture → semitone offset, and equal-tempered tuning.
//! * [`voice`] — the [`ToneEngine`] seam and the [`VoiceManager`] that owns
//!   the single live voice.
//! * [`trigger`] — the per-hand edge-trigger state machine and the
//!   frame-level [`NoteMachine`] entry point.
//!
//! The core rule: a held gesture sounds its note exactly once (the attack
//! latch), a gesture *change* re-arms the trigger, `Rest` silences, and
//! `Repeat` re-articulates the last sounded pitch.

pub mod pitch;
pub mod trigger;
pub mod voice;

pub use pitch::{pitch_offset, Tuning};
pub use trigger::{Articulation, NoteEffect, NoteMachine, NoteTrigger};
pub use voice::{ToneEngine, VoiceError, VoiceManager};
