//! Output collaborators driven by the pipeline.

use crate::body::{Hand, HandPair};

/// Two independent voices, one per hand.
pub trait AudioGraph {
    /// Gain is nominally in [0, 1] but is passed through unclamped.
    fn set_gain(&mut self, hand: Hand, gain: f32);
    fn set_frequency(&mut self, hand: Hand, frequency_hz: f32);
}

/// Per-hand visual feedback.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandIndicator {
    /// Raw hand height in metres.
    pub y:        f32,
    pub sounding: bool,
}

pub trait Renderer {
    fn show_hands(&mut self, hands: HandPair<HandIndicator>);
}

/// Audio graph that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioGraph for NullAudio {
    fn set_gain(&mut self, _hand: Hand, _gain: f32) {}
    fn set_frequency(&mut self, _hand: Hand, _frequency_hz: f32) {}
}
