//! Gesture → pitch mapping and equal-tempered tuning.

use hand_pose::Gesture;

/// Semitone offset of a numbered gesture: its 0-based ordinal, `One` = 0
/// through `Nine` = 8.  `Rest` and `Repeat` carry no pitch.
pub fn pitch_offset(gesture: Gesture) -> Option<u8> {
    match gesture {
        Gesture::One    => Some(0),
        Gesture::Two    => Some(1),
        Gesture::Three  => Some(2),
        Gesture::Four   => Some(3),
        Gesture::Five   => Some(4),
        Gesture::Six    => Some(5),
        Gesture::Seven  => Some(6),
        Gesture::Eight  => Some(7),
        Gesture::Nine   => Some(8),
        Gesture::Rest | Gesture::Repeat => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tuning
// ════════════════════════════════════════════════════════════════════════════

/// Twelve-tone equal-tempered tuning anchored at a reference frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    /// Frequency sounded at offset 0 (with `reference_offset` 0).
    pub reference_hz: f32,
    /// Semitone shift applied to every offset — transposes the whole
    /// instrument without retuning the reference.
    pub reference_offset: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            reference_hz: 440.0,
            reference_offset: 0,
        }
    }
}

impl Tuning {
    /// Frequency in Hz for a semitone offset: `ref · 2^((offset+shift)/12)`.
    pub fn frequency(&self, offset: u8) -> f32 {
        let semitones = offset as i32 + self.reference_offset;
        self.reference_hz * 2f32.powf(semitones as f32 / 12.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
