//! Per-hand note triggering and the frame-level state machine.
//!
//! Each tracked hand slot owns a [`NoteTrigger`] — the attack latch that
//! makes triggering edge-based: a gesture sounds its note on the frame it
//! appears and then sustains silently until it changes.  [`NoteMachine`]
//! runs one frame for all hands: classify each observation, advance that
//! hand's trigger, and play the result on the shared monophonic voice.
//!
//! The machine is synchronous and scheduler-agnostic: feed it frames from a
//! detector callback, a dedicated thread, or a test harness — one call per
//! frame, no locking needed.

use hand_pose::{classify, FingerOpenness, Gesture, HandObservation, OpennessThresholds};

use crate::pitch::{pitch_offset, Tuning};
use crate::voice::{ToneEngine, VoiceManager};

// ════════════════════════════════════════════════════════════════════════════
// Articulation — what one hand's trigger wants this frame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Articulation {
    /// Sound this gesture's pitch, replacing any active voice.
    /// Always carries a numbered gesture — `Repeat` resolves to the
    /// hand's last sounded gesture before it gets here.
    Attack(Gesture),
    /// Silence the active voice.
    Release,
}

// ════════════════════════════════════════════════════════════════════════════
// NoteTrigger — edge-trigger state for one hand slot
// ════════════════════════════════════════════════════════════════════════════

/// Trigger state for one tracked hand.  Created when the hand slot first
/// appears, discarded when it disappears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteTrigger {
    last_gesture: Gesture,
    attacked: bool,
    last_sounded: Gesture,
}

impl Default for NoteTrigger {
    fn default() -> Self {
        NoteTrigger {
            last_gesture: Gesture::Rest,
            attacked: false,
            // Seed for a Repeat that arrives before any note has sounded.
            last_sounded: Gesture::One,
        }
    }
}

impl NoteTrigger {
    /// Advance one frame and propose an articulation.
    ///
    /// A gesture change always clears the attack latch — that is what makes
    /// the trigger edge-based rather than level-based.  A latched numbered
    /// or repeat gesture proposes nothing (sustain); `Rest` always proposes
    /// a release and leaves deduplication to the voice owner.
    pub fn advance(&mut self, gesture: Gesture) -> Option<Articulation> {
        if gesture != self.last_gesture {
            self.attacked = false;
        }
        self.last_gesture = gesture;

        match gesture {
            Gesture::Rest => Some(Articulation::Release),
            Gesture::Repeat if !self.attacked => Some(Articulation::Attack(self.last_sounded)),
            Gesture::Repeat => None,
            numbered if !self.attacked => Some(Articulation::Attack(numbered)),
            _ => None,
        }
    }

    /// Latch the attack after the voice actually started.
    ///
    /// Kept separate from [`NoteTrigger::advance`] so that a failed voice
    /// start leaves the latch clear and the next frame retries instead of
    /// permanently muting the held gesture.
    pub fn confirm(&mut self, sounded: Gesture) {
        self.last_sounded = sounded;
        self.attacked = true;
    }

    pub fn last_gesture(&self) -> Gesture {
        self.last_gesture
    }

    pub fn attacked(&self) -> bool {
        self.attacked
    }

    pub fn last_sounded(&self) -> Gesture {
        self.last_sounded
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NoteEffect — what actually happened against the tone engine
// ════════════════════════════════════════════════════════════════════════════

/// An effect performed this frame.  At most one per hand per frame; a
/// replacement (stop-then-start) reports as the single `Start` it is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoteEffect {
    Start { hz: f32 },
    Stop,
}

// ════════════════════════════════════════════════════════════════════════════
// NoteMachine — one frame for all hands
// ════════════════════════════════════════════════════════════════════════════

/// The frame-level state machine: per-hand triggers around one shared
/// monophonic [`VoiceManager`].
pub struct NoteMachine<E: ToneEngine> {
    thresholds: OpennessThresholds,
    tuning: Tuning,
    voices: VoiceManager<E>,
    slots: Vec<(u32, NoteTrigger)>,
}

impl<E: ToneEngine> NoteMachine<E> {
    pub fn new(engine: E, thresholds: OpennessThresholds, tuning: Tuning) -> Self {
        NoteMachine {
            thresholds,
            tuning,
            voices: VoiceManager::new(engine),
            slots: Vec::new(),
        }
    }

    /// Process one frame of observations, keyed by detector slot id.
    ///
    /// Returns the effects performed, in hand order.  Hands absent from the
    /// frame lose their trigger state; the voice is *not* silenced by a
    /// vanishing hand — it persists until an explicit rest or teardown.
    pub fn on_frame(&mut self, hands: &[(u32, HandObservation)]) -> Vec<NoteEffect> {
        self.slots.retain(|(id, _)| hands.iter().any(|(h, _)| h == id));

        hands
            .iter()
            .filter_map(|&(slot, ref obs)| {
                let open = FingerOpenness::evaluate(obs, &self.thresholds);
                self.step(slot, classify(open))
            })
            .collect()
    }

    /// Advance one hand slot by an already-classified gesture.
    ///
    /// This is the gesture-level entry point `on_frame` is built on; alternate
    /// frontends that classify elsewhere can drive it directly.
    pub fn step(&mut self, slot: u32, gesture: Gesture) -> Option<NoteEffect> {
        let idx = match self.slots.iter().position(|(id, _)| *id == slot) {
            Some(idx) => idx,
            None => {
                self.slots.push((slot, NoteTrigger::default()));
                self.slots.len() - 1
            }
        };

        match self.slots[idx].1.advance(gesture)? {
            Articulation::Release => {
                if !self.voices.is_active() {
                    return None;
                }
                self.voices.stop();
                Some(NoteEffect::Stop)
            }
            Articulation::Attack(sounded) => {
                // Attack carries a numbered gesture by construction.
                let hz = self.tuning.frequency(pitch_offset(sounded)?);
                match self.voices.start(hz) {
                    Ok(()) => {
                        self.slots[idx].1.confirm(sounded);
                        Some(NoteEffect::Start { hz })
                    }
                    Err(err) => {
                        log::warn!("note at {:.2} Hz not started: {}", hz, err);
                        None
                    }
                }
            }
        }
    }

    pub fn is_sounding(&self) -> bool {
        self.voices.is_active()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn thresholds(&self) -> &OpennessThresholds {
        &self.thresholds
    }

    /// Trigger state of a tracked hand slot, if it is currently tracked.
    pub fn trigger(&self, slot: u32) -> Option<&NoteTrigger> {
        self.slots.iter().find(|(id, _)| *id == slot).map(|(_, t)| t)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::VoiceError;
    use hand_pose::{index, Landmark, LANDMARK_COUNT};
    use std::cell::RefCell;
    use std::rc::Rc;

    // ── fake engine ───────────────────────────────────────────────────────

    #[derive(Default)]
    struct Probe {
        alive: usize,
        max_alive: usize,
        fail_next: usize,
    }

    #[derive(Clone, Default)]
    struct FakeEngine {
        probe: Rc<RefCell<Probe>>,
    }

    impl ToneEngine for FakeEngine {
        type Voice = ();

        fn start(&mut self, _hz: f32) -> Result<(), VoiceError> {
            let mut p = self.probe.borrow_mut();
            if p.fail_next > 0 {
                p.fail_next -= 1;
                return Err(VoiceError::Unavailable { reason: "probe refused".into() });
            }
            p.alive += 1;
            p.max_alive = p.max_alive.max(p.alive);
            Ok(())
        }

        fn stop(&mut self, _voice: ()) {
            self.probe.borrow_mut().alive -= 1;
        }
    }

    fn machine() -> (NoteMachine<FakeEngine>, Rc<RefCell<Probe>>) {
        let engine = FakeEngine::default();
        let probe = Rc::clone(&engine.probe);
        let m = NoteMachine::new(engine, OpennessThresholds::default(), Tuning::default());
        (m, probe)
    }

    fn start_hz(effect: Option<NoteEffect>) -> f32 {
        match effect {
            Some(NoteEffect::Start { hz }) => hz,
            other => panic!("expected a start, got {:?}", other),
        }
    }

    // ── trigger unit behavior ─────────────────────────────────────────────

    #[test]
    fn trigger_defaults() {
        let t = NoteTrigger::default();
        assert_eq!(t.last_gesture(), Gesture::Rest);
        assert!(!t.attacked());
        assert_eq!(t.last_sounded(), Gesture::One);
    }

    #[test]
    fn gesture_change_clears_the_latch() {
        let mut t = NoteTrigger::default();
        t.advance(Gesture::Four);
        t.confirm(Gesture::Four);
        assert!(t.attacked());
        t.advance(Gesture::Five);
        assert_eq!(t.last_gesture(), Gesture::Five);
        assert!(!t.attacked());
    }

    #[test]
    fn latched_gesture_proposes_nothing() {
        let mut t = NoteTrigger::default();
        assert_eq!(t.advance(Gesture::Two), Some(Articulation::Attack(Gesture::Two)));
        t.confirm(Gesture::Two);
        assert_eq!(t.advance(Gesture::Two), None);
    }

    #[test]
    fn repeat_resolves_to_last_sounded() {
        let mut t = NoteTrigger::default();
        t.advance(Gesture::Seven);
        t.confirm(Gesture::Seven);
        assert_eq!(t.advance(Gesture::Repeat), Some(Articulation::Attack(Gesture::Seven)));
    }

    // ── single-hand scenarios ─────────────────────────────────────────────

    #[test]
    fn held_gesture_sounds_exactly_once() {
        let (mut m, _) = machine();
        assert!(matches!(m.step(0, Gesture::One), Some(NoteEffect::Start { .. })));
        for _ in 0..5 {
            assert_eq!(m.step(0, Gesture::One), None);
        }
    }

    #[test]
    fn sequence_one_one_three() {
        // ONE, ONE, THREE → start(440), no-op, replace-start a major second up.
        let (mut m, probe) = machine();
        let hz1 = start_hz(m.step(0, Gesture::One));
        assert!((hz1 - 440.0).abs() < 0.01, "got {}", hz1);

        assert_eq!(m.step(0, Gesture::One), None);

        let hz3 = start_hz(m.step(0, Gesture::Three));
        assert!((hz3 - 493.88).abs() < 0.01, "got {}", hz3);
        assert_eq!(probe.borrow().max_alive, 1);
    }

    #[test]
    fn rest_stops_exactly_once() {
        let (mut m, _) = machine();
        m.step(0, Gesture::One);
        assert_eq!(m.step(0, Gesture::Rest), Some(NoteEffect::Stop));
        for _ in 0..3 {
            assert_eq!(m.step(0, Gesture::Rest), None);
        }
        assert!(!m.is_sounding());
    }

    #[test]
    fn rest_with_nothing_sounding_is_silent() {
        let (mut m, _) = machine();
        assert_eq!(m.step(0, Gesture::Rest), None);
    }

    #[test]
    fn repeat_rearticulates_across_a_rest() {
        // THREE (sounded), REST, REPEAT → the REPEAT re-sounds THREE's pitch.
        let (mut m, _) = machine();
        let sounded = start_hz(m.step(0, Gesture::Three));
        assert_eq!(m.step(0, Gesture::Rest), Some(NoteEffect::Stop));
        let repeated = start_hz(m.step(0, Gesture::Repeat));
        assert_eq!(repeated, sounded);
    }

    #[test]
    fn repeat_held_sounds_once() {
        let (mut m, _) = machine();
        m.step(0, Gesture::Five);
        m.step(0, Gesture::Repeat);
        assert_eq!(m.step(0, Gesture::Repeat), None);
        assert_eq!(m.step(0, Gesture::Repeat), None);
    }

    #[test]
    fn repeat_before_any_note_sounds_the_seed() {
        let (mut m, _) = machine();
        let hz = start_hz(m.step(0, Gesture::Repeat));
        assert!((hz - 440.0).abs() < 0.01, "got {}", hz);
    }

    #[test]
    fn returning_to_an_earlier_gesture_retriggers() {
        let (mut m, probe) = machine();
        let first = start_hz(m.step(0, Gesture::One));
        start_hz(m.step(0, Gesture::Three));
        let again = start_hz(m.step(0, Gesture::One));
        assert_eq!(first, again);
        assert_eq!(probe.borrow().max_alive, 1);
    }

    #[test]
    fn transposed_tuning_flows_through() {
        let engine = FakeEngine::default();
        let tuning = Tuning { reference_hz: 220.0, reference_offset: 0 };
        let mut m = NoteMachine::new(engine, OpennessThresholds::default(), tuning);
        let hz = start_hz(m.step(0, Gesture::One));
        assert!((hz - 220.0).abs() < 0.01, "got {}", hz);
    }

    // ── voice failure ─────────────────────────────────────────────────────

    #[test]
    fn failed_start_leaves_latch_clear_and_retries() {
        let (mut m, probe) = machine();
        probe.borrow_mut().fail_next = 1;

        assert_eq!(m.step(0, Gesture::One), None);
        assert!(!m.trigger(0).unwrap().attacked());

        // Same gesture held — the retry succeeds now that the engine recovered.
        assert!(matches!(m.step(0, Gesture::One), Some(NoteEffect::Start { .. })));
        assert!(m.trigger(0).unwrap().attacked());
    }

    #[test]
    fn failed_start_does_not_move_last_sounded() {
        let (mut m, probe) = machine();
        start_hz(m.step(0, Gesture::Two));
        probe.borrow_mut().fail_next = 1;
        assert_eq!(m.step(0, Gesture::Six), None);
        assert_eq!(m.trigger(0).unwrap().last_sounded(), Gesture::Two);
    }

    // ── two hands, one voice ──────────────────────────────────────────────

    #[test]
    fn two_hands_share_the_single_voice() {
        let (mut m, probe) = machine();
        m.step(0, Gesture::One);
        m.step(1, Gesture::Five);
        assert_eq!(probe.borrow().max_alive, 1);
        assert!(m.is_sounding());

        // Either hand's rest silences the shared voice.
        assert_eq!(m.step(1, Gesture::Rest), Some(NoteEffect::Stop));
        assert!(!m.is_sounding());
    }

    #[test]
    fn hand_latches_are_independent() {
        let (mut m, _) = machine();
        m.step(0, Gesture::One);
        m.step(1, Gesture::Two);
        // Both hands hold: neither re-triggers, even though the voice now
        // sounds hand 1's pitch.
        assert_eq!(m.step(0, Gesture::One), None);
        assert_eq!(m.step(1, Gesture::Two), None);
    }

    // ── observations and slot lifecycle ──────────────────────────────────

    /// Observation with each finger straight (open) or folded (closed),
    /// classifying under default thresholds.
    fn posed_hand(open: [bool; 5]) -> HandObservation {
        let mut pts = [Landmark::default(); LANDMARK_COUNT];
        let wrist = Landmark::new(0.5, 0.8, 0.0);
        pts[index::WRIST] = wrist;

        for (f, &is_open) in open.iter().enumerate() {
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

    #[test]
    fn on_frame_classifies_and_sounds() {
        let (mut m, _) = machine();
        // Index + middle open → TWO → a semitone above the reference.
        let two = posed_hand([false, true, true, false, false]);
        let effects = m.on_frame(&[(0, two)]);
        assert_eq!(effects.len(), 1);
        let hz = start_hz(Some(effects[0]));
        assert!((hz - 466.16).abs() < 0.01, "got {}", hz);
    }

    #[test]
    fn on_frame_handles_multiple_hands_in_order() {
        let (mut m, probe) = machine();
        let one = posed_hand([false, true, false, false, false]);
        let fist = posed_hand([false, false, false, false, false]);
        let effects = m.on_frame(&[(0, one), (1, fist)]);
        // Hand 0 starts, hand 1's rest immediately stops.
        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[0], NoteEffect::Start { .. }));
        assert_eq!(effects[1], NoteEffect::Stop);
        assert_eq!(probe.borrow().max_alive, 1);
    }

    #[test]
    fn vanished_hand_drops_its_trigger_but_not_the_voice() {
        let (mut m, _) = machine();
        let one = posed_hand([false, true, false, false, false]);

        assert_eq!(m.on_frame(&[(0, one)]).len(), 1);
        assert!(m.trigger(0).is_some());

        // Hand leaves the frame: state goes, sound stays.
        assert!(m.on_frame(&[]).is_empty());
        assert!(m.trigger(0).is_none());
        assert!(m.is_sounding());

        // Hand returns with the same pose: fresh trigger, fresh attack.
        let effects = m.on_frame(&[(0, one)]);
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], NoteEffect::Start { .. }));
    }
}
