//! pose_theremin — interactive entry point.

use pose_theremin::app::{run, AppConfig};

use hand_pose::OpennessThresholds;
use pose_notes::Tuning;
use std::io::{self, Write};

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Pose Theremin — Hand Gesture Note Controller          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "tracker")]
    println!("  Mode: external tracker");
    #[cfg(not(feature = "tracker"))]
    println!("  Mode: keyboard simulation  (use --features tracker for a camera)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: A4 = 440 Hz, default thresholds\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let reference_hz: f32 = {
        let hz: f32 = read_line("  Reference pitch Hz (default 440): ")
            .trim().parse().unwrap_or(440.0);
        hz.max(55.0).min(1760.0)
    };

    let reference_offset: i32 = {
        let semis = read_line("  Transpose semitones (default 0): ")
            .trim().parse().unwrap_or(0);
        semis.max(-24).min(24)
    };

    let thumb_deg: f32 = {
        let deg: f32 = read_line("  Thumb open threshold ° (default 70): ")
            .trim().parse().unwrap_or(70.0);
        deg.max(10.0).min(400.0)
    };

    let finger_deg: f32 = {
        let deg: f32 = read_line("  Finger open threshold ° (default 100): ")
            .trim().parse().unwrap_or(100.0);
        deg.max(10.0).min(400.0)
    };

    AppConfig {
        thresholds: OpennessThresholds { thumb_deg, finger_deg },
        tuning: Tuning { reference_hz, reference_offset },
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
