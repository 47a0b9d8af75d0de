//! Software-rendered skeleton view using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ SOUNDING 466.16 HZ          HAND 0: TWO     │
//! │                                             │
//! │              (hand skeletons,               │
//! │         fingertips lit when open)           │
//! │                                             │
//! │ status bar                                  │
//! │ key legend                                  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The window doubles as the simulation input surface: held keys select
//! the pose, and pose changes are forwarded to the [`SimPoseSource`]
//! through the `SimInput` channel.
//!
//! [`SimPoseSource`]: crate::source::SimPoseSource

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use std::sync::mpsc::Sender;

use hand_pose::{index, FingerOpenness, Gesture, HandObservation};

use crate::source::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 900;
pub const WIN_H: usize = 560;

const SKELETON_H:   usize = WIN_H - 80;   // hands render above the text rows
const STATUS_Y:     usize = WIN_H - 52;
const LEGEND_Y:     usize = WIN_H - 20;

const BG_COLOR:     u32 = 0xFF101624;
const BONE_COLOR:   u32 = 0xFF5577AA;
const JOINT_COLOR:  u32 = 0xFF8899BB;
const OPEN_TIP:     u32 = 0xFF55DD88;
const CLOSED_TIP:   u32 = 0xFF666666;
const TEXT_COLOR:   u32 = 0xFFEEEEEE;
const ACCENT_COLOR: u32 = 0xFFFFD24D;
const DIM_COLOR:    u32 = 0xFF777777;
const TEXT_BG:      u32 = 0xFF1A2438;

/// Bone segments of the 21-point hand model, palm edges included.
const BONES: [(usize, usize); 21] = [
    // thumb
    (index::WRIST, index::THUMB_CMC),
    (index::THUMB_CMC, index::THUMB_MCP),
    (index::THUMB_MCP, index::THUMB_IP),
    (index::THUMB_IP, index::THUMB_TIP),
    // index
    (index::WRIST, index::INDEX_FINGER_MCP),
    (index::INDEX_FINGER_MCP, index::INDEX_FINGER_PIP),
    (index::INDEX_FINGER_PIP, index::INDEX_FINGER_DIP),
    (index::INDEX_FINGER_DIP, index::INDEX_FINGER_TIP),
    // middle
    (index::INDEX_FINGER_MCP, index::MIDDLE_FINGER_MCP),
    (index::MIDDLE_FINGER_MCP, index::MIDDLE_FINGER_PIP),
    (index::MIDDLE_FINGER_PIP, index::MIDDLE_FINGER_DIP),
    (index::MIDDLE_FINGER_DIP, index::MIDDLE_FINGER_TIP),
    // ring
    (index::MIDDLE_FINGER_MCP, index::RING_FINGER_MCP),
    (index::RING_FINGER_MCP, index::RING_FINGER_PIP),
    (index::RING_FINGER_PIP, index::RING_FINGER_DIP),
    (index::RING_FINGER_DIP, index::RING_FINGER_TIP),
    // pinky
    (index::RING_FINGER_MCP, index::PINKY_MCP),
    (index::WRIST, index::PINKY_MCP),
    (index::PINKY_MCP, index::PINKY_PIP),
    (index::PINKY_PIP, index::PINKY_DIP),
    (index::PINKY_DIP, index::PINKY_TIP),
];

/// Fingertip landmark per finger, paired with its openness accessor.
const TIPS: [usize; 5] = [
    index::THUMB_TIP,
    index::INDEX_FINGER_TIP,
    index::MIDDLE_FINGER_TIP,
    index::RING_FINGER_TIP,
    index::PINKY_TIP,
];

// ════════════════════════════════════════════════════════════════════════════
// HandView — what the renderer needs to know about one hand
// ════════════════════════════════════════════════════════════════════════════

/// Per-hand display state assembled by the application each frame.
#[derive(Clone, Copy, Debug)]
pub struct HandView {
    pub slot: u32,
    pub observation: HandObservation,
    pub openness: FingerOpenness,
    pub gesture: Gesture,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf: Vec<u32>,
    sim_tx: Sender<SimInput>,
    last_poses: (Option<SimPose>, Option<SimPose>),
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, String> {
        let mut window = Window::new(
            "Pose Theremin — Hand Gesture Notes",
            WIN_W,
            WIN_H,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            sim_tx,
            last_poses: (None, None),
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll keyboard input and forward pose changes to the sim source.
    /// Returns false when the app should quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }
        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            return false;
        }

        let shift = self.window.is_key_down(Key::LeftShift)
                 || self.window.is_key_down(Key::RightShift);
        let pose = self.held_pose();

        let poses = if shift { (None, pose) } else { (pose, None) };
        if poses != self.last_poses {
            self.last_poses = poses;
            let _ = self.sim_tx.send(SimInput::Poses {
                primary: poses.0,
                secondary: poses.1,
            });
        }

        true
    }

    fn held_pose(&self) -> Option<SimPose> {
        const DIGIT_KEYS: [Key; 9] = [
            Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5,
            Key::Key6, Key::Key7, Key::Key8, Key::Key9,
        ];
        for (i, &key) in DIGIT_KEYS.iter().enumerate() {
            if self.window.is_key_down(key) {
                return Some(SimPose::Digit(i as u8 + 1));
            }
        }
        if self.window.is_key_down(Key::P) {
            return Some(SimPose::Repeat);
        }
        if self.window.is_key_down(Key::F) {
            return Some(SimPose::Fist);
        }
        if self.window.is_key_down(Key::Key0) {
            return Some(SimPose::Splay);
        }
        None
    }

    // ── Render one frame ──────────────────────────────────────────────────

    pub fn render(&mut self, hands: &[HandView], sounding_hz: Option<f32>, status: &str) {
        self.buf.fill(BG_COLOR);

        // ── Voice readout ─────────────────────────────────────────────────
        match sounding_hz {
            Some(hz) => {
                let line = format!("SOUNDING {:.2} HZ", hz);
                self.draw_label(&line, 10, 10, ACCENT_COLOR);
            }
            None => self.draw_label("SILENT", 10, 10, DIM_COLOR),
        }

        // ── Hands ─────────────────────────────────────────────────────────
        for (i, hand) in hands.iter().enumerate() {
            self.draw_hand(hand);

            let line = format!("HAND {}: {}", hand.slot, hand.gesture.name().to_uppercase());
            let color = if hand.gesture == Gesture::Rest { DIM_COLOR } else { TEXT_COLOR };
            self.draw_label(&line, WIN_W - 160, 10 + i * 12, color);
        }
        if hands.is_empty() {
            self.draw_label("NO HANDS IN VIEW", WIN_W - 160, 10, DIM_COLOR);
        }

        // ── Status bar ────────────────────────────────────────────────────
        self.fill_rect(0, STATUS_Y - 6, WIN_W, 20, TEXT_BG);
        self.draw_label(status, 10, STATUS_Y, TEXT_COLOR);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "1-9=POSE  P=REPEAT  F=FIST  0=SPLAY  SHIFT=SECOND HAND  Q=QUIT",
            10,
            LEGEND_Y,
            DIM_COLOR,
        );

        self.window.update_with_buffer(&self.buf, WIN_W, WIN_H).ok();
    }

    // ── Hand skeleton ─────────────────────────────────────────────────────

    fn draw_hand(&mut self, hand: &HandView) {
        let project = |i: usize| {
            let p = hand.observation[i];
            (
                (p.x.clamp(0.0, 1.0) * (WIN_W - 1) as f32) as isize,
                (p.y.clamp(0.0, 1.0) * (SKELETON_H - 1) as f32) as isize,
            )
        };

        for &(a, b) in &BONES {
            let (x0, y0) = project(a);
            let (x1, y1) = project(b);
            self.draw_line(x0, y0, x1, y1, BONE_COLOR);
        }

        for i in 0..hand.observation.points().len() {
            let (x, y) = project(i);
            self.draw_dot(x, y, 2, JOINT_COLOR);
        }

        let open = [
            hand.openness.thumb,
            hand.openness.index,
            hand.openness.middle,
            hand.openness.ring,
            hand.openness.pinky,
        ];
        for (tip, is_open) in TIPS.iter().zip(open) {
            let (x, y) = project(*tip);
            let color = if is_open { OPEN_TIP } else { CLOSED_TIP };
            self.draw_dot(x, y, 4, color);
        }

        // Slot tag floats by the wrist.
        let (wx, wy) = project(index::WRIST);
        self.draw_label(
            &format!("{}", hand.slot),
            (wx.max(0) as usize + 8).min(WIN_W - 8),
            (wy.max(0) as usize + 8).min(SKELETON_H - 8),
            ACCENT_COLOR,
        );
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            for col in x..(x + w).min(WIN_W) {
                self.buf[row * WIN_W + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && (x as usize) < WIN_W && y >= 0 && (y as usize) < WIN_H {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    fn draw_dot(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn draw_line(&mut self, x0: isize, y0: isize, x1: isize, y1: isize, color: u32) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for s in 0..=steps {
            let x = x0 + (x1 - x0) * s / steps;
            let y = y0 + (y1 - y0) * s / steps;
            self.set_pixel(x, y, color);
        }
    }

    /// Minimal 3×5 bitmap font, uppercase only.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel((cx + col) as isize, (y + row) as isize, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > WIN_W {
                break;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
