//! Per-tick orchestration.
//!
//! `FramePipeline` owns all gesture state (held body, two debouncers) and is
//! the only piece of the core that calls the audio graph and renderer.  Each
//! tick:
//!
//! 1. Body tracker against the latest frame.  Losing the body resets both
//!    debouncers.
//! 2. Nobody tracked → return; nothing is published.
//! 3. Extract hands → debounce each → map each → publish.

use log::{debug, info};

use crate::body::{Hand, HandPair, RawBodyFrame};
use crate::debounce::HandDebouncer;
use crate::error::PipelineError;
use crate::extract::{extract_hands, HandSample};
use crate::mapper::{map_hand, VoiceControl};
use crate::sinks::{AudioGraph, HandIndicator, Renderer};
use crate::slot::FrameSlot;
use crate::tracker::{BodyTracker, TrackingEvent};

/// Per-hand outcome of a processed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandOutput {
    pub sample:        HandSample,
    pub stable_closed: bool,
    pub voice:         VoiceControl,
}

/// Result of one tick.  `hands` is `None` when nobody was tracked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub event: TrackingEvent,
    pub hands: Option<HandPair<HandOutput>>,
}

#[derive(Debug, Default)]
pub struct FramePipeline {
    tracker:    BodyTracker,
    debouncers: HandPair<HandDebouncer>,
}

impl FramePipeline {
    pub fn new() -> Self {
        FramePipeline::default()
    }

    pub fn tracker(&self) -> &BodyTracker { &self.tracker }

    pub fn debouncer(&self, hand: Hand) -> &HandDebouncer { &self.debouncers[hand] }

    /// Advance the gesture state by one frame without publishing anything.
    pub fn process(&mut self, frame: &RawBodyFrame) -> Result<FrameReport, PipelineError> {
        let event = self.tracker.update(frame);
        match event {
            TrackingEvent::Acquired(id) => info!("tracking {}", id),
            TrackingEvent::Lost(id) => {
                info!("lost {}; waiting for a body", id);
                self.debouncers.left.reset();
                self.debouncers.right.reset();
            }
            TrackingEvent::Idle | TrackingEvent::Continued(_) => {}
        }

        let body = match event.active().and_then(|id| frame.find_tracked(id)) {
            Some(body) => body,
            None => return Ok(FrameReport { event, hands: None }),
        };

        let samples = extract_hands(body)?;
        let debouncers = &mut self.debouncers;
        let hands = samples.map(|hand, sample| {
            let was_closed = debouncers[hand].is_closed();
            let stable_closed = debouncers[hand].update(sample.state);
            if stable_closed != was_closed {
                debug!("{} hand {}", hand.name(), if stable_closed { "closed" } else { "opened" });
            }
            HandOutput {
                sample,
                stable_closed,
                voice: map_hand(sample.position, stable_closed),
            }
        });
        Ok(FrameReport { event, hands: Some(hands) })
    }

    /// Process the latest frame in `slot` and publish the result.
    ///
    /// An empty slot counts as a frame with no bodies.
    pub fn tick<A, R>(&mut self, slot: &FrameSlot, audio: &mut A, renderer: &mut R) -> Result<FrameReport, PipelineError>
    where
        A: AudioGraph + ?Sized,
        R: Renderer + ?Sized,
    {
        let report = match slot.latest() {
            Some(frame) => self.process(&frame)?,
            None => self.process(&RawBodyFrame::empty())?,
        };
        if let Some(hands) = report.hands {
            publish(&hands, audio, renderer);
        }
        Ok(report)
    }
}

fn publish<A, R>(hands: &HandPair<HandOutput>, audio: &mut A, renderer: &mut R)
where
    A: AudioGraph + ?Sized,
    R: Renderer + ?Sized,
{
    for hand in Hand::BOTH {
        match hands[hand].voice {
            VoiceControl::Play { frequency_hz, gain } => {
                audio.set_gain(hand, gain);
                audio.set_frequency(hand, frequency_hz);
            }
            VoiceControl::Mute => audio.set_gain(hand, 0.0),
        }
    }
    renderer.show_hands(hands.map(|_, out| HandIndicator {
        y:        out.sample.position.y,
        sounding: out.voice.is_sounding(),
    }));
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, BodyId, HandState, JointType, Vec3};

    #[derive(Debug, PartialEq)]
    enum AudioCall { Gain(Hand, f32), Freq(Hand, f32) }

    #[derive(Default)]
    struct RecordingAudio { calls: Vec<AudioCall> }

    impl RecordingAudio {
        fn last_gain(&self, hand: Hand) -> Option<f32> {
            self.calls.iter().rev().find_map(|c| match *c {
                AudioCall::Gain(h, g) if h == hand => Some(g),
                _ => None,
            })
        }
    }

    impl AudioGraph for RecordingAudio {
        fn set_gain(&mut self, hand: Hand, gain: f32) { self.calls.push(AudioCall::Gain(hand, gain)); }
        fn set_frequency(&mut self, hand: Hand, hz: f32) { self.calls.push(AudioCall::Freq(hand, hz)); }
    }

    #[derive(Default)]
    struct RecordingRenderer { frames: Vec<HandPair<HandIndicator>> }

    impl Renderer for RecordingRenderer {
        fn show_hands(&mut self, hands: HandPair<HandIndicator>) { self.frames.push(hands); }
    }

    struct Rig {
        pipeline: FramePipeline,
        slot:     FrameSlot,
        audio:    RecordingAudio,
        renderer: RecordingRenderer,
    }

    impl Rig {
        fn new() -> Self {
            Rig {
                pipeline: FramePipeline::new(),
                slot:     FrameSlot::new(),
                audio:    RecordingAudio::default(),
                renderer: RecordingRenderer::default(),
            }
        }

        fn deliver(&mut self, frame: RawBodyFrame) -> FrameReport {
            self.slot.store(frame);
            self.pipeline.tick(&self.slot, &mut self.audio, &mut self.renderer).unwrap()
        }
    }

    fn body(id: u64, left: (Vec3, HandState), right: HandState) -> RawBodyFrame {
        RawBodyFrame::new(vec![Body::with_hands(id, left, (Vec3::new(0.0, 0.0, 1.0), right))])
    }

    #[test]
    fn end_to_end_debounced_mute() {
        let mut rig = Rig::new();
        let near = Vec3::new(0.0, 0.0, 0.5);

        // Frame 1: acquire body 7, left hand closed and near.
        let r = rig.deliver(body(7, (near, HandState::Closed), HandState::Open));
        assert_eq!(r.event, TrackingEvent::Acquired(BodyId(7)));
        assert_eq!(rig.audio.last_gain(Hand::Left), Some(1.0));
        assert!(rig.audio.calls.contains(&AudioCall::Freq(Hand::Left, 350.0)));

        // Frame 2: hand-state dropout is absorbed.
        rig.deliver(body(7, (near, HandState::NotTracked), HandState::Open));
        assert_eq!(rig.audio.last_gain(Hand::Left), Some(1.0));

        // Frames 3–6: still held.
        for _ in 3..=6 {
            rig.deliver(body(7, (near, HandState::NotTracked), HandState::Open));
            assert_eq!(rig.audio.last_gain(Hand::Left), Some(1.0));
        }

        // Frame 7: sixth consecutive not-closed reading mutes.
        let r = rig.deliver(body(7, (near, HandState::NotTracked), HandState::Open));
        assert_eq!(r.hands.unwrap().left.voice, VoiceControl::Mute);
        assert_eq!(rig.audio.last_gain(Hand::Left), Some(0.0));

        // Frame 8: body gone; nothing published.
        let calls_before = rig.audio.calls.len();
        let frames_before = rig.renderer.frames.len();
        let r = rig.deliver(RawBodyFrame::empty());
        assert_eq!(r.event, TrackingEvent::Lost(BodyId(7)));
        assert!(r.hands.is_none());
        assert_eq!(rig.audio.calls.len(), calls_before);
        assert_eq!(rig.renderer.frames.len(), frames_before);
        assert_eq!(rig.pipeline.tracker().tracked(), None);
    }

    #[test]
    fn open_hand_publishes_zero_gain_only() {
        let mut rig = Rig::new();
        rig.deliver(body(1, (Vec3::new(0.2, 0.3, 0.4), HandState::Open), HandState::Open));
        assert_eq!(rig.audio.calls, vec![
            AudioCall::Gain(Hand::Left, 0.0),
            AudioCall::Gain(Hand::Right, 0.0),
        ]);
    }

    #[test]
    fn renderer_gets_raw_heights() {
        let mut rig = Rig::new();
        rig.deliver(body(1, (Vec3::new(0.0, 0.25, 0.7), HandState::Closed), HandState::Open));
        let shown = rig.renderer.frames.last().unwrap();
        assert_eq!(shown.left, HandIndicator { y: 0.25, sounding: true });
        assert_eq!(shown.right, HandIndicator { y: 0.0, sounding: false });
    }

    #[test]
    fn nobody_present_is_silent() {
        let mut rig = Rig::new();
        let r = rig.pipeline.tick(&rig.slot, &mut rig.audio, &mut rig.renderer).unwrap();
        assert_eq!(r.event, TrackingEvent::Idle);
        rig.deliver(RawBodyFrame::new(vec![Body::tracked(2).untracked()]));
        assert!(rig.audio.calls.is_empty());
        assert!(rig.renderer.frames.is_empty());
    }

    #[test]
    fn stale_frame_is_reprocessed_each_tick() {
        let mut rig = Rig::new();
        rig.deliver(body(1, (Vec3::new(0.0, 0.0, 0.5), HandState::Closed), HandState::Open));
        rig.slot.store(body(1, (Vec3::new(0.0, 0.0, 0.5), HandState::Open), HandState::Open));
        for _ in 0..6 {
            rig.pipeline.tick(&rig.slot, &mut rig.audio, &mut rig.renderer).unwrap();
        }
        assert!(!rig.pipeline.debouncer(Hand::Left).is_closed());
    }

    #[test]
    fn debounce_state_does_not_survive_body_loss() {
        let mut rig = Rig::new();
        rig.deliver(body(1, (Vec3::new(0.0, 0.0, 0.5), HandState::Closed), HandState::Closed));
        rig.deliver(RawBodyFrame::empty());
        assert!(!rig.pipeline.debouncer(Hand::Left).is_closed());
        assert!(!rig.pipeline.debouncer(Hand::Right).is_closed());

        // A new body with open hands must not inherit the closed state.
        let r = rig.deliver(body(2, (Vec3::new(0.0, 0.0, 0.5), HandState::Open), HandState::Open));
        assert_eq!(r.event, TrackingEvent::Acquired(BodyId(2)));
        let hands = r.hands.unwrap();
        assert_eq!(hands.left.voice, VoiceControl::Mute);
        assert_eq!(hands.right.voice, VoiceControl::Mute);
    }

    #[test]
    fn only_first_tracked_body_drives_voices() {
        let mut rig = Rig::new();
        let a = Body::with_hands(10, (Vec3::new(0.0, 0.5, 0.5), HandState::Closed),
                                     (Vec3::default(), HandState::Open));
        let b = Body::with_hands(11, (Vec3::new(0.0, -0.5, 0.5), HandState::Closed),
                                     (Vec3::default(), HandState::Open));
        let r = rig.deliver(RawBodyFrame::new(vec![a, b]));
        assert_eq!(r.event, TrackingEvent::Acquired(BodyId(10)));
        assert_eq!(r.hands.unwrap().left.voice.frequency_hz(), Some(700.0));
    }

    #[test]
    fn missing_joint_propagates() {
        let mut rig = Rig::new();
        let mut b = Body::tracked(3);
        b.joints.insert(JointType::HandLeft, Vec3::default());
        rig.slot.store(RawBodyFrame::new(vec![b]));
        let err = rig.pipeline.tick(&rig.slot, &mut rig.audio, &mut rig.renderer).unwrap_err();
        assert_eq!(err, PipelineError::MissingJoint { body: BodyId(3), joint: JointType::HandRight });
        assert!(rig.audio.calls.is_empty());
    }
}
