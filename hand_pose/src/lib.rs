//! # hand_pose
//!
//! Turns a 21-point hand-landmark observation into a discrete gesture code.
//!
//! The pipeline is three pure layers, each built on the one below:
//!
//! 1. [`geometry`] — 3-point joint angles and cumulative finger bend.
//! 2. [`openness`] — per-finger boolean "open" flags from bend thresholds.
//! 3. [`classifier`] — the ordered decision table mapping the five flags
//!    to a [`Gesture`].
//!
//! Landmarks arrive from an external detector (one ordered set of 21
//! normalized points per detected hand per frame); this crate never talks
//! to a camera or a model, it only interprets the points.
//!
//! ## Gesture alphabet
//!
//! | Gesture | Pose |
//! |---|---|
//! | `One`..`Five` | counting poses — index first, thumb joins at five |
//! | `Six`..`Nine` | thumb-anchored poses — thumb plus 0–3 fingers |
//! | `Repeat` | pinky only — re-articulate the last sounded pose |
//! | `Rest` | anything unrecognized — the explicit catch-all |

pub mod classifier;
pub mod geometry;
pub mod landmark;
pub mod openness;

pub use classifier::{classify, Gesture};
pub use geometry::{finger_bend_sum, joint_angle};
pub use landmark::{index, HandObservation, Landmark, PoseError, LANDMARK_COUNT};
pub use openness::{FingerOpenness, OpennessThresholds};
