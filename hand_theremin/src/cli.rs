//! Command-line argument parsing.

use clap::Parser;

use crate::config::{AppConfig, AudioKind, SensorKind};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "hand_theremin")]
#[command(about = "Two-hand theremin driven by body tracking", long_about = None)]
pub struct Args {
    /// Body-frame source
    #[arg(long, value_enum, default_value_t = SensorKind::Sim)]
    pub sensor: SensorKind,

    /// Audio output
    #[arg(long, value_enum, default_value_t = AudioKind::Synth)]
    pub audio: AudioKind,

    /// Open the MIDI port whose name contains this text (with --audio midi)
    #[arg(long, value_name = "NAME")]
    pub midi_port: Option<String>,
}

impl Args {
    pub fn into_config(self) -> AppConfig {
        AppConfig {
            sensor:    self.sensor,
            audio:     self.audio,
            midi_port: self.midi_port,
            ..AppConfig::default()
        }
    }
}
