//! Interactive explorer for the openness → gesture decision table.

use hand_pose::{classify, FingerOpenness, Gesture};
use std::io::{self, Write};

fn main() {
    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║          Hand Pose — Decision Table Explorer         ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Enter five flags — thumb index middle ring pinky —");
    println!("  as o (open) / x (closed), e.g. \"oxxxo\" or \"x o o x x\".");
    println!();

    loop {
        let line = read_line("flags (or q to quit, t for the table): ");
        let line = line.trim().to_lowercase();

        if line == "q" {
            println!("\nGoodbye!\n");
            break;
        }
        if line == "t" {
            print_table();
            continue;
        }

        let flags: Vec<bool> = line
            .chars()
            .filter_map(|c| match c {
                'o' => Some(true),
                'x' => Some(false),
                _   => None,
            })
            .collect();

        if flags.len() != 5 {
            println!("  ⚠  Need exactly five o/x flags.\n");
            continue;
        }

        let open = FingerOpenness::new(flags[0], flags[1], flags[2], flags[3], flags[4]);
        let gesture = classify(open);
        println!("  {} → {}\n", render(open), gesture.name().to_uppercase());
    }
}

fn print_table() {
    println!();
    println!("  thumb index middle ring pinky");
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
    for (open, gesture) in rows {
        println!("  {}  →  {}", render(open), gesture.name().to_uppercase());
    }
    println!("  (anything else)  →  REST");
    println!();
}

fn render(open: FingerOpenness) -> String {
    let c = |b: bool| if b { 'o' } else { 'x' };
    format!(
        "{}{}{}{}{}",
        c(open.thumb), c(open.index), c(open.middle), c(open.ring), c(open.pinky)
    )
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
