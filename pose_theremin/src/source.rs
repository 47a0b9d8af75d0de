//! Landmark sources — keyboard simulation and the external tracker bridge.
//!
//! The public interface is [`FrameEvent`] delivered over a `mpsc` channel:
//! one event per video frame, carrying every tracked hand's 21-point
//! observation keyed by slot id.  Consumers don't care whether the frames
//! came from a real tracker or the keyboard simulator.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use hand_pose::{index, FingerOpenness, HandObservation, Landmark, LANDMARK_COUNT};

// ════════════════════════════════════════════════════════════════════════════
// FrameEvent
// ════════════════════════════════════════════════════════════════════════════

/// One video frame's worth of hand observations.
///
/// Zero hands is a valid frame (nothing in view).  Slot ids are
/// detector-assigned and stable while a hand stays in view.
#[derive(Clone, Debug, Default)]
pub struct FrameEvent {
    pub hands: Vec<(u32, HandObservation)>,
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for tracker and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`FrameEvent`]s over a channel.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<FrameEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// Simulation input — keyboard-held poses
// ════════════════════════════════════════════════════════════════════════════

/// Pose selected by the keyboard for one simulated hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    /// Numbered gesture 1–9.
    Digit(u8),
    /// Pinky only — REPEAT.
    Repeat,
    /// All fingers curled — rests via the all-closed fallthrough.
    Fist,
    /// Thumb + ring only — a combination no table row covers; also rests.
    Splay,
}

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// The held poses changed.  `None` means that hand left the frame.
    Poses {
        primary: Option<SimPose>,
        secondary: Option<SimPose>,
    },
}

/// Openness flags a simulated pose should produce.
pub fn openness_for(pose: SimPose) -> FingerOpenness {
    match pose {
        SimPose::Digit(1) => FingerOpenness::new(false, true,  false, false, false),
        SimPose::Digit(2) => FingerOpenness::new(false, true,  true,  false, false),
        SimPose::Digit(3) => FingerOpenness::new(false, true,  true,  true,  false),
        SimPose::Digit(4) => FingerOpenness::new(false, true,  true,  true,  true),
        SimPose::Digit(5) => FingerOpenness::new(true,  true,  true,  true,  true),
        SimPose::Digit(6) => FingerOpenness::new(true,  false, false, false, false),
        SimPose::Digit(7) => FingerOpenness::new(true,  true,  false, false, false),
        SimPose::Digit(8) => FingerOpenness::new(true,  true,  true,  false, false),
        SimPose::Digit(9) => FingerOpenness::new(true,  true,  true,  true,  false),
        SimPose::Digit(_) => FingerOpenness::default(),
        SimPose::Repeat   => FingerOpenness::new(false, false, false, false, true),
        SimPose::Fist     => FingerOpenness::default(),
        SimPose::Splay    => FingerOpenness::new(true,  false, false, true,  false),
    }
}

/// Build a synthetic observation showing the given openness flags.
///
/// Fingers fan upward from a wrist anchored low-center in the image; an
/// open finger runs straight along its ray, a closed one folds through
/// three 120° turns — comfortably past both default thresholds.
pub fn synthetic_hand(open: FingerOpenness) -> HandObservation {
    let flags = [open.thumb, open.index, open.middle, open.ring, open.pinky];
    let mut pts = [Landmark::default(); LANDMARK_COUNT];
    let wrist = Landmark::new(0.5, 0.8, 0.0);
    pts[index::WRIST] = wrist;

    for (f, &is_open) in flags.iter().enumerate() {
        let dir = (-140.0_f32 + f as f32 * 25.0).to_radians();
        let base = 1 + f * 4;
        let mut x = wrist.x;
        let mut y = wrist.y;
        let mut step = dir;
        for j in 0..4 {
            if !is_open && j > 0 {
                step += 120.0_f32.to_radians();
            }
            x += step.cos() * 0.05;
            y += step.sin() * 0.05;
            pts[base + j] = Landmark::new(x, y, 0.0);
        }
    }
    HandObservation::new(pts)
}

/// Assemble one simulated frame from the currently held poses.
/// Primary is slot 0, secondary slot 1.
pub fn frame_from_poses(primary: Option<SimPose>, secondary: Option<SimPose>) -> FrameEvent {
    let mut hands = Vec::new();
    if let Some(pose) = primary {
        hands.push((0, synthetic_hand(openness_for(pose))));
    }
    if let Some(pose) = secondary {
        hands.push((1, synthetic_hand(openness_for(pose))));
    }
    FrameEvent { hands }
}

// ════════════════════════════════════════════════════════════════════════════
// SimPoseSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source driven by [`SimInput`] events from the visualizer's
/// window.  Emits frames at a steady ~30 fps from whatever poses are held,
/// like a camera that keeps delivering frames while nothing moves.
pub struct SimPoseSource {
    pub rx: Receiver<SimInput>,
}

impl LandmarkSource for SimPoseSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        const FRAME_INTERVAL: Duration = Duration::from_millis(33);

        let mut primary: Option<SimPose> = None;
        let mut secondary: Option<SimPose> = None;

        loop {
            // Drain pose changes since the last frame.
            loop {
                match self.rx.try_recv() {
                    Ok(SimInput::Poses { primary: p, secondary: s }) => {
                        primary = p;
                        secondary = s;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            if tx.send(frame_from_poses(primary, secondary)).is_err() {
                return;
            }
            thread::sleep(FRAME_INTERVAL);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackerSource — external MediaPipe tracker (feature = "tracker")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by an external tracker process.
///
/// The tracker writes one JSON object per frame on stdout:
///
/// ```json
/// {"hands":[{"slot":0,"landmarks":[{"x":0.51,"y":0.78,"z":0.0}, …]}]}
/// ```
///
/// A hand with other than 21 landmarks is a tracker contract failure; it is
/// dropped with a warning rather than padded into shape.
#[cfg(feature = "tracker")]
pub struct TrackerSource {
    pub command: String,
    pub args: Vec<String>,
}

#[cfg(feature = "tracker")]
impl Default for TrackerSource {
    fn default() -> Self {
        TrackerSource {
            command: "python3".to_string(),
            args: vec!["tracker/hand_tracker.py".to_string()],
        }
    }
}

#[cfg(feature = "tracker")]
impl LandmarkSource for TrackerSource {
    fn run(self: Box<Self>, tx: Sender<FrameEvent>) {
        use serde::Deserialize;
        use std::io::{BufRead, BufReader};
        use std::process::{Command, Stdio};

        #[derive(Deserialize)]
        struct WireLandmark {
            x: f32,
            y: f32,
            #[serde(default)]
            z: f32,
        }

        #[derive(Deserialize)]
        struct WireHand {
            slot: u32,
            landmarks: Vec<WireLandmark>,
        }

        #[derive(Deserialize)]
        struct WireFrame {
            hands: Vec<WireHand>,
        }

        let mut child = match Command::new(&self.command)
            .args(&self.args)
            .stdout(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                log::error!("tracker `{}` failed to spawn: {}", self.command, err);
                return;
            }
        };

        let stdout = match child.stdout.take() {
            Some(out) => out,
            None => {
                log::error!("tracker spawned without a stdout pipe");
                let _ = child.kill();
                return;
            }
        };

        log::info!("tracker `{}` running", self.command);

        for line in BufReader::new(stdout).lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::warn!("tracker stream ended: {}", err);
                    break;
                }
            };

            let frame: WireFrame = match serde_json::from_str(&line) {
                Ok(frame) => frame,
                Err(err) => {
                    log::warn!("unparseable tracker frame: {}", err);
                    continue;
                }
            };

            let mut hands = Vec::with_capacity(frame.hands.len());
            for hand in frame.hands {
                let pts: Vec<Landmark> = hand
                    .landmarks
                    .iter()
                    .map(|l| Landmark::new(l.x, l.y, l.z))
                    .collect();
                match HandObservation::from_slice(&pts) {
                    Ok(obs) => hands.push((hand.slot, obs)),
                    Err(err) => log::warn!("hand {} dropped: {}", hand.slot, err),
                }
            }

            if tx.send(FrameEvent { hands }).is_err() {
                break;
            }
        }

        let _ = child.kill();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
