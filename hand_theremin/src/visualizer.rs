//! Software-rendered feedback window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌───────────────────┬───────────────────┐
//! │                   │                   │
//! │   LEFT HAND       │   RIGHT HAND      │
//! │   red ∝ height    │   blue ∝ height   │
//! │                   │                   │
//! │▀▀▀ sounding ▀▀▀▀▀▀│▀▀▀ sounding ▀▀▀▀▀▀│
//! └───────────────────┴───────────────────┘
//! ```
//!
//! The window also doubles as the input device for the simulated sensor.

use std::sync::mpsc::Sender;
use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use theremin_core::constants::INDICATOR_MAP;
use theremin_core::{Hand, HandIndicator, HandPair, Renderer};

use crate::error::AppError;
use crate::sensor::SimInput;

const BG_COLOR:       u32   = 0xFF000000;
const DIVIDER_COLOR:  u32   = 0xFF303030;
const SOUNDING_COLOR: u32   = 0xFFFFFFFF;
const SOUNDING_BAR_H: usize = 12;
const DIVIDER_W:      usize = 2;

// ════════════════════════════════════════════════════════════════════════════
// Painting
// ════════════════════════════════════════════════════════════════════════════

/// Colour of one hand's half: red for left, blue for right, brighter when
/// the hand is higher.
pub fn hand_color(hand: Hand, y: f32) -> u32 {
    let level = (INDICATOR_MAP.apply(y).clamp(0.0, 1.0) * 255.0).round() as u32;
    match hand {
        Hand::Left  => 0xFF000000 | (level << 16),
        Hand::Right => 0xFF000000 | level,
    }
}

/// Framebuffer of `w × h` ARGB pixels.
pub struct Canvas {
    pub buf: Vec<u32>,
    pub w:   usize,
    pub h:   usize,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Canvas { buf: vec![BG_COLOR; w * h], w, h }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buf[y * self.w + x]
    }

    pub fn paint(&mut self, hands: Option<&HandPair<HandIndicator>>) {
        self.buf.fill(BG_COLOR);
        let Some(hands) = hands else { return; };

        let half = self.w / 2;
        for (hand, x0) in [(Hand::Left, 0), (Hand::Right, half)] {
            let ind = hands[hand];
            self.fill_rect(x0, 0, half, self.h, hand_color(hand, ind.y));
            if ind.sounding {
                let bar_y = self.h.saturating_sub(SOUNDING_BAR_H);
                self.fill_rect(x0, bar_y, half, SOUNDING_BAR_H, SOUNDING_COLOR);
            }
        }
        self.fill_rect(half.saturating_sub(DIVIDER_W / 2), 0, DIVIDER_W, self.h, DIVIDER_COLOR);
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.h) {
            let start = row * self.w;
            self.buf[start + x.min(self.w)..start + (x + w).min(self.w)].fill(color);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
    hands:  Option<HandPair<HandIndicator>>,
    sim_tx: Sender<SimInput>,

    // Last values sent, so the sim sensor only hears about changes.
    cursor: Option<(f32, f32)>,
    grips:  HandPair<bool>,
}

impl Visualizer {
    pub fn new(w: usize, h: usize, frame_rate: u32, sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Theremin",
            w, h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        let period = Duration::from_secs(1) / frame_rate.max(1);
        #[allow(deprecated)]
        window.limit_update_rate(Some(period));

        Ok(Visualizer {
            window,
            canvas: Canvas::new(w, h),
            hands:  None,
            sim_tx,
            cursor: None,
            grips:  HandPair::default(),
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse and translate to [`SimInput`] events.
    ///
    /// | Input | Effect |
    /// |---|---|
    /// | Mouse move | Move the hand on that half of the window |
    /// | Left button / `F` held | Close left hand |
    /// | Right button / `J` held | Close right hand |
    /// | `B` | Step in / out of view |
    /// | `Q` / `Escape` | Quit |
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }
        if self.window.is_key_pressed(Key::B, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::ToggleBody);
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let pos = (mx / self.canvas.w as f32, my / self.canvas.h as f32);
            if self.cursor != Some(pos) {
                self.cursor = Some(pos);
                let _ = self.sim_tx.send(SimInput::Cursor { x: pos.0, y: pos.1 });
            }
        }

        let grips = HandPair::new(
            self.window.get_mouse_down(MouseButton::Left) || self.window.is_key_down(Key::F),
            self.window.get_mouse_down(MouseButton::Right) || self.window.is_key_down(Key::J),
        );
        for hand in Hand::BOTH {
            if grips[hand] != self.grips[hand] {
                let _ = self.sim_tx.send(SimInput::Grip { hand, closed: grips[hand] });
            }
        }
        self.grips = grips;

        true
    }

    /// Draw the latest hand indicators and pump the window's event loop.
    pub fn present(&mut self) -> Result<(), AppError> {
        self.canvas.paint(self.hands.as_ref());
        self.window.update_with_buffer(&self.canvas.buf, self.canvas.w, self.canvas.h)?;
        Ok(())
    }
}

impl Renderer for Visualizer {
    fn show_hands(&mut self, hands: HandPair<HandIndicator>) {
        self.hands = Some(hands);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(left: (f32, bool), right: (f32, bool)) -> HandPair<HandIndicator> {
        HandPair::new(
            HandIndicator { y: left.0, sounding: left.1 },
            HandIndicator { y: right.0, sounding: right.1 },
        )
    }

    #[test]
    fn hand_color_levels() {
        assert_eq!(hand_color(Hand::Left, 1.0), 0xFFFF0000);
        assert_eq!(hand_color(Hand::Left, -1.0), 0xFF000000);
        assert_eq!(hand_color(Hand::Right, 1.0), 0xFF0000FF);
        assert_eq!(hand_color(Hand::Right, 0.0), 0xFF000080);
        // Clamped for display.
        assert_eq!(hand_color(Hand::Right, 5.0), 0xFF0000FF);
    }

    #[test]
    fn blank_until_hands_seen() {
        let mut c = Canvas::new(40, 20);
        c.paint(None);
        assert!(c.buf.iter().all(|&p| p == BG_COLOR));
    }

    #[test]
    fn halves_take_hand_colors() {
        let mut c = Canvas::new(40, 20);
        c.paint(Some(&indicators((1.0, false), (1.0, false))));
        assert_eq!(c.pixel(5, 5), 0xFFFF0000);
        assert_eq!(c.pixel(35, 5), 0xFF0000FF);
        assert_eq!(c.pixel(20, 5), DIVIDER_COLOR);
    }

    #[test]
    fn sounding_bar_only_on_sounding_half() {
        let mut c = Canvas::new(40, 20);
        c.paint(Some(&indicators((0.0, true), (0.0, false))));
        assert_eq!(c.pixel(5, 19), SOUNDING_COLOR);
        assert_ne!(c.pixel(35, 19), SOUNDING_COLOR);
        assert_ne!(c.pixel(5, 0), SOUNDING_COLOR);
    }
}
