//! Top-level application wiring.
//!
//! `App` owns the gesture pipeline, the frame slot it reads from, and the
//! audio graph it drives.  The sensor source runs on its own thread and
//! publishes into the hub; the main loop ticks the pipeline once per window
//! frame.

use std::sync::mpsc;
use std::thread::JoinHandle;

use log::{info, warn};
use theremin_core::{
    spawn_sensor_source, AudioGraph, FramePipeline, FrameReport, FrameSlot, NullAudio, Renderer,
    SensorHub, Subscription,
};

use crate::config::{AppConfig, AudioKind, SensorKind};
use crate::error::AppError;
use crate::midi::MidiAudio;
use crate::sensor::{SimInput, SimSensorSource};
use crate::synth::SynthAudio;
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App {
    pipeline:     FramePipeline,
    slot:         FrameSlot,
    hub:          SensorHub,
    subscription: Subscription,
    audio:        Box<dyn AudioGraph>,
    sensor:       Option<JoinHandle<()>>,
}

impl App {
    pub fn new(hub: SensorHub, audio: Box<dyn AudioGraph>) -> Self {
        let slot = FrameSlot::new();
        let subscription = hub.attach_slot(&slot);
        App { pipeline: FramePipeline::new(), slot, hub, subscription, audio, sensor: None }
    }

    /// Take ownership of the sensor thread so shutdown can wait for it.
    pub fn attach_sensor(&mut self, handle: JoinHandle<()>) {
        self.sensor = Some(handle);
    }

    /// `Err` once the sensor source has given up.
    pub fn check_sensor(&self) -> Result<(), AppError> {
        match self.hub.failure() {
            Some(reason) => Err(AppError::Sensor(reason)),
            None         => Ok(()),
        }
    }

    /// One frame: newest sensor snapshot in, voices and renderer out.
    pub fn tick<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<FrameReport, AppError> {
        Ok(self.pipeline.tick(&self.slot, self.audio.as_mut(), renderer)?)
    }

    /// Detach from the hub, stop the sensor source and wait for its thread.
    pub fn shutdown(&mut self) {
        self.hub.unsubscribe(self.subscription);
        self.hub.close();
        if let Some(handle) = self.sensor.take() {
            if handle.join().is_err() {
                warn!("sensor thread panicked");
            }
        }
    }
}

fn open_audio(cfg: &AppConfig) -> Result<Box<dyn AudioGraph>, AppError> {
    Ok(match cfg.audio {
        AudioKind::Synth  => Box::new(SynthAudio::new()?),
        AudioKind::Midi   => Box::new(MidiAudio::open(cfg.midi_port.as_deref())),
        AudioKind::Silent => Box::new(NullAudio),
    })
}

fn start_sensor(
    kind: SensorKind,
    hub: &SensorHub,
    sim_rx: mpsc::Receiver<SimInput>,
) -> Result<JoinHandle<()>, AppError> {
    let handle = match kind {
        SensorKind::Sim => spawn_sensor_source(SimSensorSource::new(sim_rx), hub.clone()),
        #[cfg(feature = "leap")]
        SensorKind::Leap => {
            drop(sim_rx);
            spawn_sensor_source(crate::sensor::LeapSensorSource, hub.clone())
        }
        #[cfg(not(feature = "leap"))]
        SensorKind::Leap => return Err(AppError::SensorUnavailable(kind.name())),
    };
    info!("sensor: {}", kind.name());
    Ok(handle)
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the window, the sensor source and the audio graph, then drives the
/// pipeline at the configured frame rate until the window closes.  A pipeline
/// error or a failed sensor ends the loop and is returned.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut vis = Visualizer::new(cfg.window_w, cfg.window_h, cfg.frame_rate, sim_tx)?;

    let hub = SensorHub::new();
    let mut app = App::new(hub.clone(), open_audio(&cfg)?);
    app.attach_sensor(start_sensor(cfg.sensor, &hub, sim_rx)?);

    let result = loop {
        if hub.is_closed() {
            break app.check_sensor();
        }
        if !vis.is_open() || !vis.poll_input() {
            break Ok(());
        }
        if let Err(e) = app.tick(&mut vis) {
            break Err(e);
        }
        if let Err(e) = vis.present() {
            break Err(e);
        }
    };

    app.shutdown();
    result
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
