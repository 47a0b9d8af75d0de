//! Open-hand gesture classification.
//!
//! The classifier is a fixed decision table over the five openness flags.
//! Rows are listed specials-first; they are mutually exclusive, and every
//! combination missing from the table falls through to [`Gesture::Rest`],
//! which is most of the 32 combinations.

use crate::openness::FingerOpenness;

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// The classified hand pose for one frame.
///
/// `One..Nine` double as pitch indices (ordinal 0..8).  `Rest` and `Repeat`
/// carry no pitch of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    /// No recognized pose — the explicit catch-all, not an error.
    Rest,
    /// Pinky only: re-articulate the most recently sounded pose.
    Repeat,
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::One    => "one",
            Gesture::Two    => "two",
            Gesture::Three  => "three",
            Gesture::Four   => "four",
            Gesture::Five   => "five",
            Gesture::Six    => "six",
            Gesture::Seven  => "seven",
            Gesture::Eight  => "eight",
            Gesture::Nine   => "nine",
            Gesture::Rest   => "rest",
            Gesture::Repeat => "repeat",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify
// ════════════════════════════════════════════════════════════════════════════

/// Map the five openness flags to a gesture code.
///
/// Pure and total: same flags, same gesture, for all 32 combinations.
pub fn classify(open: FingerOpenness) -> Gesture {
    let FingerOpenness { thumb, index, middle, ring, pinky } = open;

    match (thumb, index, middle, ring, pinky) {
        (false, false, false, false, true ) => Gesture::Repeat,
        (true,  true,  true,  true,  false) => Gesture::Nine,
        (true,  true,  true,  false, false) => Gesture::Eight,
        (true,  true,  false, false, false) => Gesture::Seven,
        (true,  false, false, false, false) => Gesture::Six,
        (true,  true,  true,  true,  true ) => Gesture::Five,
        (false, true,  true,  true,  true ) => Gesture::Four,
        (false, true,  true,  true,  false) => Gesture::Three,
        (false, true,  true,  false, false) => Gesture::Two,
        (false, true,  false, false, false) => Gesture::One,
        _ => Gesture::Rest,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(bits: u8) -> FingerOpenness {
        FingerOpenness::new(
            bits & 0b10000 != 0,
            bits & 0b01000 != 0,
            bits & 0b00100 != 0,
            bits & 0b00010 != 0,
            bits & 0b00001 != 0,
        )
    }

    #[test]
    fn table_rows_classify_exactly() {
        let rows = [
            (FingerOpenness::new(false, false, false, false, true),  Gesture::Repeat),
            (FingerOpenness::new(true,  true,  true,  true,  false), Gesture::Nine),
            (FingerOpenness::new(true,  true,  true,  false, false), Gesture::Eight),
            (FingerOpenness::new(true,  true,  false, false, false), Gesture::Seven),
            (FingerOpenness::new(true,  false, false, false, false), Gesture::Six),
            (FingerOpenness::new(true,  true,  true,  true,  true),  Gesture::Five),
            (FingerOpenness::new(false, true,  true,  true,  true),  Gesture::Four),
            (FingerOpenness::new(false, true,  true,  true,  false), Gesture::Three),
            (FingerOpenness::new(false, true,  true,  false, false), Gesture::Two),
            (FingerOpenness::new(false, true,  false, false, false), Gesture::One),
        ];
        for (open, expect) in rows {
            assert_eq!(classify(open), expect, "flags {:?}", open);
        }
    }

    #[test]
    fn unlisted_combinations_fall_through_to_rest() {
        // All closed, and a few poses no row covers.
        assert_eq!(classify(FingerOpenness::default()), Gesture::Rest);
        assert_eq!(classify(FingerOpenness::new(true, false, false, true, false)), Gesture::Rest);
        assert_eq!(classify(FingerOpenness::new(false, false, true, false, false)), Gesture::Rest);
        assert_eq!(classify(FingerOpenness::new(true, false, false, false, true)), Gesture::Rest);
    }

    #[test]
    fn total_and_deterministic_over_all_32_combinations() {
        let mut rest_count = 0;
        for bits in 0u8..32 {
            let first = classify(flags(bits));
            let second = classify(flags(bits));
            assert_eq!(first, second, "bits {:05b}", bits);
            if first == Gesture::Rest {
                rest_count += 1;
            }
        }
        // Ten rows match a single combination each; the other 22 are Rest.
        assert_eq!(rest_count, 22);
    }
}
