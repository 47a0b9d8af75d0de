//! Finger-openness evaluation.
//!
//! Each finger's cumulative bend ([`finger_bend_sum`]) is compared against a
//! per-finger threshold: under the threshold the finger counts as open
//! (extended), at or over it as closed (curled).  The thumb gets a tighter
//! threshold than the other four fingers — its kinematic chain is shorter
//! and flexes less.

use crate::geometry::finger_bend_sum;
use crate::landmark::{index, HandObservation};

// ════════════════════════════════════════════════════════════════════════════
// OpennessThresholds
// ════════════════════════════════════════════════════════════════════════════

/// Openness thresholds in degrees of cumulative bend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpennessThresholds {
    /// Thumb chain threshold.
    pub thumb_deg: f32,
    /// Threshold for index, middle, ring, and pinky.
    pub finger_deg: f32,
}

impl Default for OpennessThresholds {
    fn default() -> Self {
        OpennessThresholds {
            thumb_deg: 70.0,
            finger_deg: 100.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerOpenness
// ════════════════════════════════════════════════════════════════════════════

/// Per-finger open flags for one frame.  Derived, never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerOpenness {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerOpenness {
    /// Evaluate all five fingers of an observation.
    ///
    /// Comparison is strict `<` — a bend sum exactly at the threshold counts
    /// as closed, and a NaN sum (degenerate geometry) also compares false,
    /// so broken chains fail closed rather than open.
    pub fn evaluate(obs: &HandObservation, thresholds: &OpennessThresholds) -> Self {
        let chain = |base: usize| {
            finger_bend_sum(
                obs[index::WRIST],
                obs[base],
                obs[base + 1],
                obs[base + 2],
                obs[base + 3],
            )
        };

        FingerOpenness {
            thumb:  chain(index::THUMB_CMC) < thresholds.thumb_deg,
            index:  chain(index::INDEX_FINGER_MCP) < thresholds.finger_deg,
            middle: chain(index::MIDDLE_FINGER_MCP) < thresholds.finger_deg,
            ring:   chain(index::RING_FINGER_MCP) < thresholds.finger_deg,
            pinky:  chain(index::PINKY_MCP) < thresholds.finger_deg,
        }
    }

    pub const fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        FingerOpenness { thumb, index, middle, ring, pinky }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LANDMARK_COUNT};

    /// Build an observation with each finger either straight (≈0° bend) or
    /// folded through three 120° turns (360° bend, over every threshold).
    fn hand(open: [bool; 5]) -> HandObservation {
        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        let wrist = Landmark::new(0.5, 0.8, 0.0);
        pts[index::WRIST] = wrist;

        for (f, &is_open) in open.iter().enumerate() {
            // Fan the five fingers out over ~100° so chains never overlap.
            let dir = (-140.0_f32 + f as f32 * 25.0).to_radians();
            let (dx, dy) = (dir.cos() * 0.05, dir.sin() * 0.05);
            let base = 1 + f * 4;

            let mut x = wrist.x;
            let mut y = wrist.y;
            let mut step = dir;
            for j in 0..4 {
                if !is_open && j > 0 {
                    step += 120.0_f32.to_radians();
                }
                x += if is_open { dx } else { step.cos() * 0.05 };
                y += if is_open { dy } else { step.sin() * 0.05 };
                pts[base + j] = Landmark::new(x, y, 0.0);
            }
        }
        HandObservation::new(pts)
    }

    #[test]
    fn straight_fingers_read_open() {
        let o = FingerOpenness::evaluate(&hand([true; 5]), &OpennessThresholds::default());
        assert_eq!(o, FingerOpenness::new(true, true, true, true, true));
    }

    #[test]
    fn folded_fingers_read_closed() {
        let o = FingerOpenness::evaluate(&hand([false; 5]), &OpennessThresholds::default());
        assert_eq!(o, FingerOpenness::default());
    }

    #[test]
    fn mixed_hand_reads_per_finger() {
        let o = FingerOpenness::evaluate(
            &hand([false, true, true, false, false]),
            &OpennessThresholds::default(),
        );
        assert_eq!(o, FingerOpenness::new(false, true, true, false, false));
    }

    #[test]
    fn degenerate_geometry_fails_closed() {
        // A zeroed observation has every chain degenerate (NaN bend sums);
        // strict `<` must fail closed on all of them.
        let obs = HandObservation::new([Landmark::default(); LANDMARK_COUNT]);
        let o = FingerOpenness::evaluate(&obs, &OpennessThresholds::default());
        assert_eq!(o, FingerOpenness::default());
    }

    #[test]
    fn bend_exactly_at_threshold_counts_closed() {
        // One 90° turn then straight: bend sum is exactly 90.
        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        pts[index::WRIST] = Landmark::new(0.0, 0.0, 0.0);
        pts[index::INDEX_FINGER_MCP] = Landmark::new(0.1, 0.0, 0.0);
        pts[index::INDEX_FINGER_PIP] = Landmark::new(0.1, 0.1, 0.0);
        pts[index::INDEX_FINGER_DIP] = Landmark::new(0.1, 0.2, 0.0);
        pts[index::INDEX_FINGER_TIP] = Landmark::new(0.1, 0.3, 0.0);
        let obs = HandObservation::new(pts);
        let sum = finger_bend_sum(
            obs[index::WRIST],
            obs[index::INDEX_FINGER_MCP],
            obs[index::INDEX_FINGER_PIP],
            obs[index::INDEX_FINGER_DIP],
            obs[index::INDEX_FINGER_TIP],
        );

        let at = OpennessThresholds { thumb_deg: 70.0, finger_deg: sum };
        assert!(!FingerOpenness::evaluate(&obs, &at).index);

        let above = OpennessThresholds { thumb_deg: 70.0, finger_deg: sum + 0.001 };
        assert!(FingerOpenness::evaluate(&obs, &above).index);
    }

    #[test]
    fn thresholds_are_tunable() {
        // With an absurdly generous threshold even folded fingers read open.
        let loose = OpennessThresholds { thumb_deg: 1000.0, finger_deg: 1000.0 };
        let o = FingerOpenness::evaluate(&hand([false; 5]), &loose);
        assert_eq!(o, FingerOpenness::new(true, true, true, true, true));
    }
}
