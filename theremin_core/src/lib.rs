//! # theremin_core
//!
//! Gesture tracking and signal conditioning for a two-voice, hand-played
//! theremin driven by a skeleton-tracking sensor.
//!
//! ## Hand → voice mapping
//!
//! | Input | Effect |
//! |---|---|
//! | Hand closed | Voice sounds |
//! | Hand open (6 consecutive readings) | Voice muted, pitch held |
//! | Hand height `y` −0.5 m … 0.5 m | 0 Hz … 700 Hz |
//! | Hand depth `z` 1.0 m … 0.5 m | gain 0.0 … 1.0 |
//!
//! Left hand drives the left voice, right hand the right voice.  Only one
//! body is followed at a time: the first tracked body the sensor reports,
//! until it leaves.
//!
//! ## Data flow
//!
//! ```text
//! SensorSource ──publish──▶ SensorHub ──▶ FrameSlot
//!                                            │ latest()
//!                                            ▼
//!   FramePipeline::tick: BodyTracker → extract_hands → HandDebouncer ×2
//!                        → map_hand ×2 → AudioGraph + Renderer
//! ```

pub mod body;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod extract;
pub mod hub;
pub mod mapper;
pub mod pipeline;
pub mod remap;
pub mod sinks;
pub mod slot;
pub mod tracker;

pub use body::{Body, BodyId, Hand, HandPair, HandState, JointType, RawBodyFrame, Vec3};
pub use debounce::HandDebouncer;
pub use error::{PipelineError, RemapError};
pub use extract::{extract_hands, HandSample};
pub use hub::{spawn_sensor_source, SensorHub, SensorSource, Subscription};
pub use mapper::{map_hand, VoiceControl};
pub use pipeline::{FramePipeline, FrameReport, HandOutput};
pub use remap::{remap, LinearMap};
pub use sinks::{AudioGraph, HandIndicator, NullAudio, Renderer};
pub use slot::FrameSlot;
pub use tracker::{BodyTracker, TrackingEvent};
