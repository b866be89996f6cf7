//! Built-in two-voice synthesiser on `cpal`.
//!
//! Left hand plays a pulse wave, right hand a sine, so the two voices never
//! cancel each other out.  The pipeline writes gain and frequency into
//! lock-free [`VoiceParams`]; the audio callback reads them once per buffer.

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::{info, warn};
use theremin_core::{AudioGraph, Hand, HandPair};

use crate::error::AppError;

/// Scale applied to the voice mix before the output limiter.
const MASTER_LEVEL: f32 = 0.25;
/// Hard limit on output samples.
const OUTPUT_CLIP: f32 = 0.5;
/// Per-sample smoothing coefficient for gain changes (~5 ms at 48 kHz).
const GAIN_SMOOTHING: f32 = 0.004;

// ════════════════════════════════════════════════════════════════════════════
// VoiceParams — shared between the pipeline and the audio callback
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct VoiceParams {
    gain:      AtomicU32,
    frequency: AtomicU32,
}

impl VoiceParams {
    pub fn new() -> Self {
        VoiceParams {
            gain:      AtomicU32::new(0.0f32.to_bits()),
            frequency: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    pub fn set_gain(&self, gain: f32)    { self.gain.store(gain.to_bits(), Ordering::Relaxed); }
    pub fn set_frequency(&self, hz: f32) { self.frequency.store(hz.to_bits(), Ordering::Relaxed); }
    pub fn gain(&self) -> f32            { f32::from_bits(self.gain.load(Ordering::Relaxed)) }
    pub fn frequency(&self) -> f32       { f32::from_bits(self.frequency.load(Ordering::Relaxed)) }
}

impl Default for VoiceParams {
    fn default() -> Self { VoiceParams::new() }
}

// ════════════════════════════════════════════════════════════════════════════
// Oscillator
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Waveform {
    Sine,
    /// Square-ish wave; `duty` is the fraction of the period spent high.
    Pulse { duty: f32 },
}

impl Waveform {
    /// Waveform assigned to each hand's voice.
    pub fn for_hand(hand: Hand) -> Self {
        match hand {
            Hand::Left  => Waveform::Pulse { duty: 0.5 },
            Hand::Right => Waveform::Sine,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Oscillator {
    waveform: Waveform,
    /// Phase in cycles, 0.0–1.0.
    phase:    f32,
    /// Smoothed gain actually applied.
    level:    f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Oscillator { waveform, phase: 0.0, level: 0.0 }
    }

    /// Next sample at `frequency` Hz, scaled by a smoothed `gain`.
    pub fn next_sample(&mut self, frequency: f32, gain: f32, sample_rate: f32) -> f32 {
        self.level += (gain - self.level) * GAIN_SMOOTHING;
        let raw = match self.waveform {
            Waveform::Sine => (self.phase * TAU).sin(),
            Waveform::Pulse { duty } => if self.phase < duty { 1.0 } else { -1.0 },
        };
        // Negative or non-finite frequencies hold the phase.
        if frequency.is_finite() && frequency > 0.0 {
            self.phase = (self.phase + frequency / sample_rate).fract();
        }
        raw * self.level
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Mixer — everything the audio callback does, minus the device
// ════════════════════════════════════════════════════════════════════════════

pub struct Mixer {
    params:      HandPair<Arc<VoiceParams>>,
    oscillators: HandPair<Oscillator>,
    sample_rate: f32,
}

impl Mixer {
    pub fn new(params: HandPair<Arc<VoiceParams>>, sample_rate: f32) -> Self {
        Mixer {
            params,
            oscillators: HandPair::new(
                Oscillator::new(Waveform::for_hand(Hand::Left)),
                Oscillator::new(Waveform::for_hand(Hand::Right)),
            ),
            sample_rate,
        }
    }

    /// Fill an interleaved buffer; every channel carries the same mono mix.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let gains = HandPair::new(self.params.left.gain(), self.params.right.gain());
        let freqs = HandPair::new(self.params.left.frequency(), self.params.right.frequency());

        for frame in out.chunks_mut(channels) {
            let mut mix = 0.0;
            for hand in Hand::BOTH {
                mix += self.oscillators[hand].next_sample(freqs[hand], gains[hand], self.sample_rate);
            }
            let sample = (mix * MASTER_LEVEL).clamp(-OUTPUT_CLIP, OUTPUT_CLIP);
            frame.iter_mut().for_each(|s| *s = sample);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SynthAudio — the AudioGraph backed by an output stream
// ════════════════════════════════════════════════════════════════════════════

pub struct SynthAudio {
    params:  HandPair<Arc<VoiceParams>>,
    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl SynthAudio {
    /// Open the default output device and start both voices silent.
    pub fn new() -> Result<Self, AppError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AppError::NoAudioDevice)?;
        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        info!(
            "audio: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate().0,
            channels,
        );

        let params = HandPair::new(Arc::new(VoiceParams::new()), Arc::new(VoiceParams::new()));
        let mixer = Mixer::new(params.clone(), sample_rate);

        let format = config.sample_format();
        let stream_config: cpal::StreamConfig = config.into();
        let stream = match format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, mixer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, mixer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, mixer)?,
            other => return Err(AppError::UnsupportedSampleFormat(other)),
        };
        stream.play()?;

        Ok(SynthAudio { params, _stream: stream })
    }
}

/// Output stream in the device's native sample type; the mixer always works
/// in `f32`.
fn build_stream<T>(device: &cpal::Device, config: &cpal::StreamConfig, mut mixer: Mixer) -> Result<cpal::Stream, AppError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut scratch: Vec<f32> = Vec::new();
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            scratch.resize(data.len(), 0.0);
            mixer.render(&mut scratch, channels);
            write_converted(data, &scratch);
        },
        |err| warn!("audio stream error: {}", err),
        None,
    )?;
    Ok(stream)
}

/// Copy `samples` into `out`, converting to the device sample type.
pub fn write_converted<T: Sample + FromSample<f32>>(out: &mut [T], samples: &[f32]) {
    for (o, &s) in out.iter_mut().zip(samples) {
        *o = T::from_sample(s);
    }
}

impl AudioGraph for SynthAudio {
    fn set_gain(&mut self, hand: Hand, gain: f32) {
        self.params[hand].set_gain(gain);
    }

    fn set_frequency(&mut self, hand: Hand, frequency_hz: f32) {
        self.params[hand].set_frequency(frequency_hz);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> HandPair<Arc<VoiceParams>> {
        HandPair::new(Arc::new(VoiceParams::new()), Arc::new(VoiceParams::new()))
    }

    #[test]
    fn voice_params_roundtrip_bits() {
        let p = VoiceParams::new();
        p.set_gain(0.75);
        p.set_frequency(440.0);
        assert_eq!(p.gain(), 0.75);
        assert_eq!(p.frequency(), 440.0);
    }

    #[test]
    fn sine_is_bounded_by_level() {
        let mut osc = Oscillator::new(Waveform::Sine);
        for _ in 0..10_000 {
            let s = osc.next_sample(440.0, 1.0, 48_000.0);
            assert!(s.abs() <= 1.0);
        }
    }

    #[test]
    fn pulse_settles_to_plus_minus_gain() {
        let mut osc = Oscillator::new(Waveform::Pulse { duty: 0.5 });
        // Let the gain smoothing settle.
        for _ in 0..20_000 { osc.next_sample(100.0, 1.0, 48_000.0); }
        for _ in 0..1_000 {
            let s = osc.next_sample(100.0, 1.0, 48_000.0);
            assert!((s.abs() - 1.0).abs() < 1e-3, "sample {}", s);
        }
    }

    #[test]
    fn zero_gain_is_silent() {
        let mut mixer = Mixer::new(shared(), 48_000.0);
        let mut buf = vec![1.0f32; 512];
        mixer.render(&mut buf, 2);
        assert!(buf.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn voices_reach_every_channel_and_respect_clip() {
        let params = shared();
        for hand in Hand::BOTH {
            params[hand].set_gain(10.0);
            params[hand].set_frequency(220.0);
        }
        let mut mixer = Mixer::new(params, 48_000.0);
        let mut buf = vec![0.0f32; 48_000];
        mixer.render(&mut buf, 2);
        assert!(buf.iter().any(|&s| s != 0.0));
        assert!(buf.iter().all(|&s| s.abs() <= OUTPUT_CLIP));
        for pair in buf.chunks(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }

    #[test]
    fn integer_devices_get_converted_samples() {
        let mix = [0.0f32, 0.5, -0.5];

        let mut floats = [9.0f32; 3];
        write_converted(&mut floats, &mix);
        assert_eq!(floats, mix);

        let mut signed = [1i16; 3];
        write_converted(&mut signed, &mix);
        assert_eq!(signed[0], 0);
        assert!((signed[1] as i32 - 16_384).abs() <= 1);
        assert!((signed[2] as i32 + 16_384).abs() <= 1);

        // Unsigned silence sits at mid-scale.
        let mut unsigned = [0u16; 3];
        write_converted(&mut unsigned, &mix);
        assert_eq!(unsigned[0], 32_768);
        assert!(unsigned[1] > 32_768 && unsigned[2] < 32_768);
    }

    #[test]
    fn distinct_waveforms_per_hand() {
        assert_ne!(Waveform::for_hand(Hand::Left), Waveform::for_hand(Hand::Right));
    }
}
