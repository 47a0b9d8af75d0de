//! Joint-angle geometry.
//!
//! Angles are computed in the x–y image plane; the detector's z channel is
//! too noisy to help with finger curl and is ignored here.

use crate::landmark::Landmark;

/// Angle in degrees at `p1` between the segments `p0→p1` and `p1→p2`.
///
/// 0° means the chain continues straight through `p1`; 180° means it folds
/// back on itself.  Degenerate input (a zero-length segment from coincident
/// landmarks) yields NaN — callers compare with `<`, which is false for
/// NaN, so degenerate fingers read as closed.
pub fn joint_angle(p0: Landmark, p1: Landmark, p2: Landmark) -> f32 {
    let a1 = p1.x - p0.x;
    let a2 = p1.y - p0.y;
    let b1 = p2.x - p1.x;
    let b2 = p2.y - p1.y;

    let dot = a1 * b1 + a2 * b2;
    let norm = ((a1 * a1 + a2 * a2) * (b1 * b1 + b2 * b2)).sqrt();

    // clamp guards acos against rounding just past ±1; NaN passes through
    (dot / norm).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Cumulative bend along a four-segment finger chain.
///
/// `p0` is the wrist, `p1..p4` the finger joints base→tip.  A straight
/// (extended) finger sums near 0°, a curled one several hundred degrees;
/// the theoretical range is [0, 540].
pub fn finger_bend_sum(p0: Landmark, p1: Landmark, p2: Landmark, p3: Landmark, p4: Landmark) -> f32 {
    joint_angle(p0, p1, p2) + joint_angle(p1, p2, p3) + joint_angle(p2, p3, p4)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn lm(x: f32, y: f32) -> Landmark {
        Landmark::new(x, y, 0.0)
    }

    #[test]
    fn straight_chain_is_zero() {
        let a = joint_angle(lm(0.0, 0.0), lm(0.1, 0.0), lm(0.2, 0.0));
        assert!(a.abs() < 1e-3, "got {}", a);
    }

    #[test]
    fn right_angle_is_ninety() {
        let a = joint_angle(lm(0.0, 0.0), lm(0.1, 0.0), lm(0.1, 0.1));
        assert!((a - 90.0).abs() < 1e-3, "got {}", a);
    }

    #[test]
    fn full_fold_is_one_eighty() {
        let a = joint_angle(lm(0.0, 0.0), lm(0.1, 0.0), lm(0.0, 0.0));
        assert!((a - 180.0).abs() < 1e-3, "got {}", a);
    }

    #[test]
    fn coincident_points_are_nan() {
        let p = lm(0.3, 0.3);
        assert!(joint_angle(p, p, lm(0.5, 0.5)).is_nan());
        assert!(joint_angle(lm(0.1, 0.1), p, p).is_nan());
    }

    #[test]
    fn angle_bounds_hold_for_non_degenerate_triples() {
        // Sweep a fan of point triples; every defined angle must land in [0, 180].
        for i in 0..36 {
            let theta = i as f32 * 10.0_f32.to_radians();
            let p0 = lm(0.0, 0.0);
            let p1 = lm(0.1, 0.0);
            let p2 = lm(0.1 + theta.cos() * 0.1, theta.sin() * 0.1);
            let a = joint_angle(p0, p1, p2);
            assert!((0.0..=180.0).contains(&a), "angle {} out of bounds at step {}", a, i);
        }
    }

    #[test]
    fn bend_sum_accumulates_three_joints() {
        // Chain with two 90° turns and one straight joint: 90 + 90 + 0.
        let sum = finger_bend_sum(
            lm(0.0, 0.0),
            lm(0.1, 0.0),
            lm(0.1, 0.1),
            lm(0.0, 0.1),
            lm(-0.1, 0.1),
        );
        assert!((sum - 180.0).abs() < 1e-2, "got {}", sum);
    }

    #[test]
    fn bend_sum_of_straight_chain_is_zero() {
        let sum = finger_bend_sum(
            lm(0.0, 0.0),
            lm(0.1, 0.1),
            lm(0.2, 0.2),
            lm(0.3, 0.3),
            lm(0.4, 0.4),
        );
        assert!(sum.abs() < 1e-2, "got {}", sum);
    }
}
