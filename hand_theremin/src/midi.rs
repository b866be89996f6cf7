//! MIDI audio graph: each hand plays a continuous note on its own channel.
//!
//! Frequency becomes the nearest note plus pitch bend (±2 semitones, the GM
//! default), gain becomes channel volume (CC 7).  A note sounds while gain is
//! above zero and is re-struck when the pitch crosses into another semitone.

use log::{info, warn};
use theremin_core::{AudioGraph, Hand, HandPair};

/// GM program per hand: square lead for the pulse voice, flute for the sine.
const PROGRAMS: HandPair<u8> = HandPair { left: 80, right: 73 };
const CHANNELS: HandPair<u8> = HandPair { left: 0, right: 1 };
const NOTE_VELOCITY: u8 = 100;
const BEND_CENTRE: u16 = 8192;
const BEND_RANGE_SEMITONES: f32 = 2.0;
const CC_VOLUME: u8 = 7;

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / null (for testing)
// ════════════════════════════════════════════════════════════════════════════

pub trait MidiOut {
    fn send(&mut self, message: &[u8]);

    fn program_change(&mut self, channel: u8, program: u8) {
        self.send(&[0xC0 | (channel & 0x0F), program & 0x7F]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        self.send(&[0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        self.send(&[0x80 | (channel & 0x0F), note & 0x7F, 0]);
    }
    fn control_change(&mut self, channel: u8, control: u8, value: u8) {
        self.send(&[0xB0 | (channel & 0x0F), control & 0x7F, value & 0x7F]);
    }
    fn pitch_bend(&mut self, channel: u8, bend: u16) {
        let bend = bend.min(0x3FFF);
        self.send(&[0xE0 | (channel & 0x0F), (bend & 0x7F) as u8, (bend >> 7) as u8]);
    }
}

// ── midir backend ─────────────────────────────────────────────────────────

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn send(&mut self, message: &[u8]) {
        if let Err(e) = self.conn.send(message) {
            warn!("MIDI send failed: {}", e);
        }
    }
}

// ── null backend (used when no MIDI port is available) ────────────────────

struct NullOut;

impl MidiOut for NullOut {
    fn send(&mut self, _message: &[u8]) {}
}

// ════════════════════════════════════════════════════════════════════════════
// open_midi_output — enumerate ports and pick one
// ════════════════════════════════════════════════════════════════════════════

/// Open a MIDI output port.
///
/// `prefer` selects the first port whose name contains it (case-insensitive);
/// otherwise a softsynth is preferred, then the first port.  Falls back to a
/// null output with a warning if nothing can be opened.
pub fn open_midi_output(prefer: Option<&str>) -> Box<dyn MidiOut> {
    let midi_out = match midir::MidiOutput::new("hand_theremin") {
        Ok(m)  => m,
        Err(e) => {
            warn!("MIDI init error: {} — using null output", e);
            return Box::new(NullOut);
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        warn!("no MIDI output ports found — using null output");
        warn!("install a MIDI synthesiser such as `timidity -iA` or `fluidsynth`");
        return Box::new(NullOut);
    }

    let names: Vec<String> = ports.iter()
        .map(|p| midi_out.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
        .collect();
    let port_idx = pick_port(&names, prefer);
    info!("opening MIDI port: {}", names[port_idx]);

    match midi_out.connect(&ports[port_idx], "hand-theremin") {
        Ok(conn) => Box::new(MidirOut { conn }),
        Err(e) => {
            warn!("failed to connect: {} — using null output", e);
            Box::new(NullOut)
        }
    }
}

/// Index of the port to open; `names` must not be empty.
fn pick_port(names: &[String], prefer: Option<&str>) -> usize {
    let lower: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
    if let Some(want) = prefer.map(str::to_lowercase) {
        if let Some(i) = lower.iter().position(|n| n.contains(&want)) {
            return i;
        }
        warn!("no MIDI port matches '{}'", want);
    }
    // Prefer a softsynth if visible
    lower.iter()
        .position(|n| ["fluid", "timidity", "microsoft", "synth"].iter().any(|s| n.contains(s)))
        .unwrap_or(0)
}

// ════════════════════════════════════════════════════════════════════════════
// Frequency → note + bend
// ════════════════════════════════════════════════════════════════════════════

/// Nearest MIDI note and 14-bit pitch bend for `hz`, or `None` when the
/// frequency is not positive or falls outside the MIDI note range.
pub fn frequency_to_note(hz: f32) -> Option<(u8, u16)> {
    if !(hz.is_finite() && hz > 0.0) {
        return None;
    }
    let exact = 69.0 + 12.0 * (hz / 440.0).log2();
    let note = exact.round();
    if !(0.0..=127.0).contains(&note) {
        return None;
    }
    let offset = exact - note;
    let bend = BEND_CENTRE as f32 + offset / BEND_RANGE_SEMITONES * BEND_CENTRE as f32;
    Some((note as u8, bend.round().clamp(0.0, 16383.0) as u16))
}

// ════════════════════════════════════════════════════════════════════════════
// MidiAudio
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct VoiceState {
    gain:     f32,
    /// Target note and bend from the last frequency.
    target:   Option<(u8, u16)>,
    sounding: Option<u8>,
    bend:     Option<u16>,
    volume:   Option<u8>,
}

pub struct MidiAudio {
    out:    Box<dyn MidiOut>,
    voices: HandPair<VoiceState>,
}

impl MidiAudio {
    pub fn new(mut out: Box<dyn MidiOut>) -> Self {
        for hand in Hand::BOTH {
            out.program_change(CHANNELS[hand], PROGRAMS[hand]);
        }
        MidiAudio { out, voices: HandPair::default() }
    }

    pub fn open(prefer: Option<&str>) -> Self {
        MidiAudio::new(open_midi_output(prefer))
    }

    /// Bring the channel in line with the voice's gain and target.
    fn reconcile(&mut self, hand: Hand) {
        let ch = CHANNELS[hand];
        let v = &mut self.voices[hand];

        let volume = (v.gain.clamp(0.0, 1.0) * 127.0).round() as u8;
        if v.volume != Some(volume) {
            self.out.control_change(ch, CC_VOLUME, volume);
            v.volume = Some(volume);
        }

        if let Some((_, bend)) = v.target {
            if v.bend != Some(bend) {
                self.out.pitch_bend(ch, bend);
                v.bend = Some(bend);
            }
        }

        let wanted = if v.gain > 0.0 { v.target.map(|(note, _)| note) } else { None };
        if wanted != v.sounding {
            if let Some(old) = v.sounding {
                self.out.note_off(ch, old);
            }
            if let Some(new) = wanted {
                self.out.note_on(ch, new, NOTE_VELOCITY);
            }
            v.sounding = wanted;
        }
    }
}

impl AudioGraph for MidiAudio {
    fn set_gain(&mut self, hand: Hand, gain: f32) {
        self.voices[hand].gain = gain;
        self.reconcile(hand);
    }

    fn set_frequency(&mut self, hand: Hand, frequency_hz: f32) {
        self.voices[hand].target = frequency_to_note(frequency_hz);
        self.reconcile(hand);
    }
}

impl Drop for MidiAudio {
    fn drop(&mut self) {
        for hand in Hand::BOTH {
            if let Some(note) = self.voices[hand].sounding.take() {
                self.out.note_off(CHANNELS[hand], note);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Vec<u8>>>>);

    impl MidiOut for Recorder {
        fn send(&mut self, message: &[u8]) {
            self.0.lock().unwrap().push(message.to_vec());
        }
    }

    impl Recorder {
        fn take(&self) -> Vec<Vec<u8>> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    fn rig() -> (MidiAudio, Recorder) {
        let rec = Recorder::default();
        let audio = MidiAudio::new(Box::new(rec.clone()));
        rec.take();
        (audio, rec)
    }

    #[test]
    fn a440_is_note_69_centred() {
        assert_eq!(frequency_to_note(440.0), Some((69, 8192)));
        assert_eq!(frequency_to_note(880.0), Some((81, 8192)));
    }

    #[test]
    fn quarter_tone_bends_halfway_to_range() {
        let hz = 440.0 * 2f32.powf(0.25 / 12.0);
        let (note, bend) = frequency_to_note(hz).unwrap();
        assert_eq!(note, 69);
        assert!((bend as i32 - (8192 + 1024)).abs() <= 1);
    }

    #[test]
    fn no_note_for_silent_or_extreme_frequencies() {
        assert_eq!(frequency_to_note(0.0), None);
        assert_eq!(frequency_to_note(-20.0), None);
        assert_eq!(frequency_to_note(f32::NAN), None);
        assert_eq!(frequency_to_note(1.0), None);
        assert_eq!(frequency_to_note(50_000.0), None);
    }

    #[test]
    fn programs_sent_on_open() {
        let rec = Recorder::default();
        let _audio = MidiAudio::new(Box::new(rec.clone()));
        assert_eq!(rec.take(), vec![vec![0xC0, 80], vec![0xC1, 73]]);
    }

    #[test]
    fn play_then_mute_left_voice() {
        let (mut audio, rec) = rig();
        audio.set_gain(Hand::Left, 1.0);
        audio.set_frequency(Hand::Left, 440.0);
        assert_eq!(rec.take(), vec![
            vec![0xB0, 7, 127],
            vec![0xE0, 0x00, 0x40],
            vec![0x90, 69, NOTE_VELOCITY],
        ]);

        audio.set_gain(Hand::Left, 0.0);
        assert_eq!(rec.take(), vec![vec![0xB0, 7, 0], vec![0x80, 69, 0]]);
    }

    #[test]
    fn crossing_a_semitone_restrikes() {
        let (mut audio, rec) = rig();
        audio.set_gain(Hand::Right, 0.5);
        audio.set_frequency(Hand::Right, 440.0);
        rec.take();
        audio.set_frequency(Hand::Right, 880.0);
        let sent = rec.take();
        assert!(sent.contains(&vec![0x81, 69, 0]));
        assert!(sent.contains(&vec![0x91, 81, NOTE_VELOCITY]));
    }

    #[test]
    fn steady_input_sends_nothing() {
        let (mut audio, rec) = rig();
        audio.set_gain(Hand::Left, 0.8);
        audio.set_frequency(Hand::Left, 300.0);
        rec.take();
        audio.set_gain(Hand::Left, 0.8);
        audio.set_frequency(Hand::Left, 300.0);
        assert!(rec.take().is_empty());
    }

    #[test]
    fn drop_releases_sounding_notes() {
        let (mut audio, rec) = rig();
        audio.set_gain(Hand::Left, 1.0);
        audio.set_frequency(Hand::Left, 440.0);
        rec.take();
        drop(audio);
        assert_eq!(rec.take(), vec![vec![0x80, 69, 0]]);
    }

    #[test]
    fn preferred_port_wins() {
        let names = vec!["Midi Through".to_string(), "FLUID Synth".to_string(), "USB Keys".to_string()];
        assert_eq!(pick_port(&names, Some("usb")), 2);
        assert_eq!(pick_port(&names, None), 1);
        assert_eq!(pick_port(&names, Some("absent")), 1);
        assert_eq!(pick_port(&names[..1], None), 0);
    }
}
