//! # hand_theremin
//!
//! A two-voice theremin played with both hands in front of a body-tracking
//! sensor.  Gesture tracking lives in [`theremin_core`]; this crate supplies
//! the sensor sources, the audio graphs and the feedback window.
//!
//! ## Playing
//!
//! | Gesture | Hand | Effect |
//! |---|---|---|
//! | Close hand | Either | Start that hand's voice |
//! | Open hand | Either | Mute that hand's voice |
//! | Raise / lower | Either | Pitch up / down (0–700 Hz) |
//! | Reach toward sensor | Either | Louder |
//!
//! The left hand plays a pulse wave, the right hand a sine.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: mouse and keyboard drive a virtual player.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse over left / right half | Move that hand (centre line = near) |
//! | Left button or `F` | Close left hand |
//! | Right button or `J` | Close right hand |
//! | `B` | Player steps out of / into view |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod midi;
pub mod sensor;
pub mod synth;
pub mod visualizer;
