use thiserror::Error;

use theremin_core::PipelineError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window: {0}")]
    Window(#[from] minifb::Error),

    #[error("no audio output device found")]
    NoAudioDevice,

    #[error("audio config: {0}")]
    AudioConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("unsupported audio sample format: {0:?}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("sensor '{0}' is not available in this build (rebuild with --features leap)")]
    SensorUnavailable(&'static str),

    #[error("sensor stopped: {0}")]
    Sensor(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
