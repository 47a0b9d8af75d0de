//! Interactive driver for the note-trigger state machine.
//!
//! Type one gesture per line (`one`..`nine`, `rest`, `repeat`) and watch
//! which effects the machine performs.  No audio — the engine just prints.

use hand_pose::{Gesture, OpennessThresholds};
use pose_notes::{NoteEffect, NoteMachine, ToneEngine, Tuning, VoiceError};
use std::io::{self, Write};

/// Engine that narrates instead of sounding.
struct ConsoleEngine {
    next_id: u32,
}

impl ToneEngine for ConsoleEngine {
    type Voice = u32;

    fn start(&mut self, hz: f32) -> Result<u32, VoiceError> {
        self.next_id += 1;
        println!("      ♪ start voice #{} at {:.2} Hz", self.next_id, hz);
        Ok(self.next_id)
    }

    fn stop(&mut self, voice: u32) {
        println!("      ∅ stop voice #{}", voice);
    }
}

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║          Note Trigger — Frame Sequence Driver        ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  One line = one frame for hand slot 0.");
    println!("  Gestures: one..nine, rest, repeat (or 1..9, r, p). q quits.");
    println!();

    let mut machine = NoteMachine::new(
        ConsoleEngine { next_id: 0 },
        OpennessThresholds::default(),
        Tuning::default(),
    );

    loop {
        let line = read_line("frame> ");
        let word = line.trim().to_lowercase();

        if word == "q" {
            println!("\nGoodbye!\n");
            break;
        }

        let gesture = match parse_gesture(&word) {
            Some(g) => g,
            None => {
                println!("  ⚠  Unknown gesture \"{}\".", word);
                continue;
            }
        };

        match machine.step(0, gesture) {
            Some(NoteEffect::Start { hz }) => {
                println!("  {} → start at {:.2} Hz", gesture.name(), hz)
            }
            Some(NoteEffect::Stop) => println!("  {} → stop", gesture.name()),
            None => println!("  {} → (no effect)", gesture.name()),
        }
    }
}

fn parse_gesture(word: &str) -> Option<Gesture> {
    Some(match word {
        "one" | "1"   => Gesture::One,
        "two" | "2"   => Gesture::Two,
        "three" | "3" => Gesture::Three,
        "four" | "4"  => Gesture::Four,
        "five" | "5"  => Gesture::Five,
        "six" | "6"   => Gesture::Six,
        "seven" | "7" => Gesture::Seven,
        "eight" | "8" => Gesture::Eight,
        "nine" | "9"  => Gesture::Nine,
        "rest" | "r"  => Gesture::Rest,
        "repeat" | "p" => Gesture::Repeat,
        _ => return None,
    })
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
