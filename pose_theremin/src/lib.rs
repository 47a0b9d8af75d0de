//! # pose_theremin
//!
//! Play notes by holding hand poses in front of a camera — or, by default,
//! by holding keys that simulate the poses.
//!
//! Each video frame, every detected hand is classified into a gesture code
//! and fed through an edge-triggered note machine: holding a pose sounds
//! its note once and sustains, changing poses re-triggers, a fist (or any
//! unrecognized pose) rests, and the pinky-only pose repeats the last note.
//! One sine voice for the whole instrument — strictly monophonic.
//!
//! ## Pose → note mapping
//!
//! | Pose | Gesture | Note |
//! |---|---|---|
//! | index only | ONE | A4 (reference) |
//! | index+middle … four fingers | TWO..FOUR | +1..+3 semitones |
//! | all five open | FIVE | +4 semitones |
//! | thumb only … thumb+3 | SIX..NINE | +5..+8 semitones |
//! | pinky only | REPEAT | last sounded note again |
//! | anything else | REST | silence |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: keyboard poses, no camera needed.
//! * `tracker` — **Tracker mode**: landmarks stream in from an external
//!   MediaPipe tracker process over JSON lines.
//!
//! ### Simulation keyboard
//!
//! | Key | Pose |
//! |---|---|
//! | `1`–`9` (hold) | numbered gesture |
//! | `P` (hold) | REPEAT (pinky only) |
//! | `F` (hold) | fist — rests |
//! | `0` (hold) | splayed thumb+ring — unrecognized, rests |
//! | `Shift` + pose | pose on the second hand slot |
//! | release all | hand leaves the frame |
//! | `Q` | quit |

pub mod app;
pub mod source;
pub mod tone;
pub mod visualizer;
