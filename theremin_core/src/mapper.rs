//! Hand position → voice parameters.

use crate::body::Vec3;
use crate::constants::{FREQUENCY_MAP, GAIN_MAP};

/// What a voice should do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VoiceControl {
    /// Sound at `frequency_hz` with `gain` (unclamped).
    Play { frequency_hz: f32, gain: f32 },
    /// Gain to zero; the voice keeps whatever frequency it had.
    Mute,
}

impl VoiceControl {
    pub fn gain(&self) -> f32 {
        match *self {
            VoiceControl::Play { gain, .. } => gain,
            VoiceControl::Mute => 0.0,
        }
    }

    pub fn frequency_hz(&self) -> Option<f32> {
        match *self {
            VoiceControl::Play { frequency_hz, .. } => Some(frequency_hz),
            VoiceControl::Mute => None,
        }
    }

    pub fn is_sounding(&self) -> bool {
        matches!(self, VoiceControl::Play { .. })
    }
}

/// Closed hand plays: depth sets gain, height sets pitch.  Open hand mutes.
pub fn map_hand(position: Vec3, stable_closed: bool) -> VoiceControl {
    if !stable_closed {
        return VoiceControl::Mute;
    }
    VoiceControl::Play {
        frequency_hz: FREQUENCY_MAP.apply(position.y),
        gain:         GAIN_MAP.apply(position.z),
    }
}
