//! Top-level application state and run loop.
//!
//! `AppState` owns the `NoteMachine` and the per-frame display state; `run`
//! wires the landmark source, the visualizer, and the tone engine together
//! and drives the event/render loop at ~60 fps.

use std::sync::mpsc::{self, TryRecvError};

use hand_pose::{classify, FingerOpenness, OpennessThresholds};
use pose_notes::{NoteEffect, NoteMachine, ToneEngine, Tuning};

use crate::source::{spawn_landmark_source, FrameEvent, SimInput};
use crate::tone::open_tone_engine;
use crate::visualizer::{HandView, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppConfig {
    pub thresholds: OpennessThresholds,
    pub tuning: Tuning,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState<E: ToneEngine> {
    machine: NoteMachine<E>,

    // ── display state ────────────────────────────────────────────────────
    hands: Vec<HandView>,
    sounding_hz: Option<f32>,
    pub status: String,
}

impl<E: ToneEngine> AppState<E> {
    pub fn new(cfg: AppConfig, engine: E) -> Self {
        AppState {
            machine: NoteMachine::new(engine, cfg.thresholds, cfg.tuning),
            hands: Vec::new(),
            sounding_hz: None,
            status: "READY - HOLD A POSE TO PLAY".to_string(),
        }
    }

    /// Process one frame of hand observations.
    pub fn on_frame(&mut self, frame: FrameEvent) {
        self.hands = frame
            .hands
            .iter()
            .map(|&(slot, ref obs)| {
                let openness = FingerOpenness::evaluate(obs, self.machine.thresholds());
                HandView {
                    slot,
                    observation: *obs,
                    openness,
                    gesture: classify(openness),
                }
            })
            .collect();

        for effect in self.machine.on_frame(&frame.hands) {
            match effect {
                NoteEffect::Start { hz } => {
                    self.sounding_hz = Some(hz);
                    self.status = format!("NOTE {:.2} HZ", hz);
                }
                NoteEffect::Stop => {
                    self.sounding_hz = None;
                    self.status = "REST".to_string();
                }
            }
        }
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn hands(&self) -> &[HandView] {
        &self.hands
    }

    pub fn sounding_hz(&self) -> Option<f32> {
        self.sounding_hz
    }

    pub fn is_sounding(&self) -> bool {
        self.machine.is_sounding()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the landmark source (simulation by default, external tracker
/// with `--features tracker`), the window, and the tone engine, then loops:
/// poll input, drain frames through the machine, render.
pub fn run(cfg: AppConfig) -> Result<(), String> {
    // ── Sim input channel (visualizer → sim source) ───────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    #[cfg(feature = "tracker")]
    let frame_rx = {
        drop(sim_rx);
        spawn_landmark_source(crate::source::TrackerSource::default())
    };
    #[cfg(not(feature = "tracker"))]
    let frame_rx = spawn_landmark_source(crate::source::SimPoseSource { rx: sim_rx });

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    // ── App state around the best available tone engine ──────────────────
    let mut app = AppState::new(cfg, open_tone_engine());

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        // Drain every pending frame in arrival order — the trigger latches
        // depend on seeing each frame, not just the freshest one.
        loop {
            match frame_rx.try_recv() {
                Ok(frame) => app.on_frame(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        vis.render(app.hands(), app.sounding_hz(), &app.status);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
