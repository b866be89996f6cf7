//! Application bootstrap settings.
//!
//! Only the choice of collaborators lives here; the gesture pipeline's tuning
//! is fixed in `theremin_core::constants`.

use clap::ValueEnum;

/// Where body frames come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SensorKind {
    /// Keyboard and mouse in the feedback window.
    Sim,
    /// LeapMotion controller (requires the `leap` feature).
    Leap,
}

impl SensorKind {
    pub fn name(self) -> &'static str {
        match self {
            SensorKind::Sim  => "sim",
            SensorKind::Leap => "leap",
        }
    }
}

/// Where the two voices are played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AudioKind {
    /// Built-in pulse + sine synthesiser on the default output device.
    Synth,
    /// Two MIDI channels on an external synthesiser.
    Midi,
    /// No sound; useful without audio hardware.
    #[value(name = "none")]
    Silent,
}

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub sensor:     SensorKind,
    pub audio:      AudioKind,
    /// Substring of the MIDI port name to open.
    pub midi_port:  Option<String>,
    pub window_w:   usize,
    pub window_h:   usize,
    pub frame_rate: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sensor:     SensorKind::Sim,
            audio:      AudioKind::Synth,
            midi_port:  None,
            window_w:   800,
            window_h:   800,
            frame_rate: 30,
        }
    }
}
