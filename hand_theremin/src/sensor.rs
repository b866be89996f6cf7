//! Body-frame sources — LeapMotion hardware and keyboard/mouse simulation.
//!
//! Both implement [`SensorSource`] and publish [`RawBodyFrame`]s into a
//! [`SensorHub`]; the pipeline never learns which one is running.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::{debug, info};
use theremin_core::{Body, Hand, HandPair, HandState, RawBodyFrame, SensorHub, SensorSource, Vec3};

// ════════════════════════════════════════════════════════════════════════════
// SimSensorSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the feedback window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Cursor position, normalised to 0.0–1.0 across the window.
    Cursor { x: f32, y: f32 },
    /// A hand was clenched (`true`) or released.
    Grip { hand: Hand, closed: bool },
    /// Player steps into or out of view.
    ToggleBody,
    Quit,
}

/// Simulated player standing in front of the sensor.
///
/// The window is split down the middle: the cursor moves the left hand while
/// on the left half and the right hand while on the right half.  Height
/// follows the cursor's vertical position; depth follows its distance from
/// the centre line (centre = near, outer edge = far).
#[derive(Clone, Debug, PartialEq)]
pub struct SimBody {
    present: bool,
    id:      u64,
    hands:   HandPair<Vec3>,
    grips:   HandPair<bool>,
}

impl Default for SimBody {
    fn default() -> Self {
        SimBody {
            present: true,
            id:      1,
            hands:   HandPair::new(Vec3::new(-0.25, 0.0, 1.0), Vec3::new(0.25, 0.0, 1.0)),
            grips:   HandPair::default(),
        }
    }
}

impl SimBody {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Cursor { x, y } => {
                let hand = if x < 0.5 { Hand::Left } else { Hand::Right };
                self.hands[hand] = cursor_to_hand(x, y);
            }
            SimInput::Grip { hand, closed } => self.grips[hand] = closed,
            SimInput::ToggleBody => {
                self.present = !self.present;
                if self.present {
                    // Someone new walks in.
                    self.id += 1;
                }
                debug!("sim body {} (id {})", if self.present { "entered" } else { "left" }, self.id);
            }
            SimInput::Quit => {}
        }
    }

    pub fn frame(&self) -> RawBodyFrame {
        if !self.present {
            return RawBodyFrame::empty();
        }
        let state = |closed: bool| if closed { HandState::Closed } else { HandState::Open };
        RawBodyFrame::new(vec![Body::with_hands(
            self.id,
            (self.hands.left, state(self.grips.left)),
            (self.hands.right, state(self.grips.right)),
        )])
    }
}

/// Window coordinates (0–1, y down) → camera space (m).
fn cursor_to_hand(x: f32, y: f32) -> Vec3 {
    Vec3::new(x - 0.5, 0.5 - y, 0.5 + (x - 0.5).abs())
}

/// Gesture source driven by [`SimInput`] events from the window.
pub struct SimSensorSource {
    pub rx:     Receiver<SimInput>,
    /// Interval between published frames.
    pub period: Duration,
}

impl SimSensorSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        // Skeleton sensors typically deliver at 30 Hz.
        SimSensorSource { rx, period: Duration::from_millis(33) }
    }
}

impl SensorSource for SimSensorSource {
    fn run(self: Box<Self>, hub: SensorHub) {
        info!("simulated sensor started");
        let mut body = SimBody::default();
        let mut last_publish = Instant::now()
            .checked_sub(self.period)
            .unwrap_or_else(Instant::now);

        loop {
            match self.rx.recv_timeout(self.period) {
                Ok(SimInput::Quit) => {
                    hub.close();
                    return;
                }
                Ok(input) => body.apply(input),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
            if hub.is_closed() { return; }
            if last_publish.elapsed() >= self.period {
                last_publish = Instant::now();
                hub.publish(&body.frame());
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapSensorSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Body source backed by a LeapMotion controller.
///
/// The controller sees hands, not skeletons, so the source reports a single
/// synthetic body whenever at least one hand is visible.  A hand that drops
/// out keeps its last position and reports `NotTracked`.
///
/// # Mapping
///
/// * Palm height 100–500 mm above the device → y −0.5 … 0.5 m.
/// * Palm z −200 … 200 mm (toward the player positive) → depth 0.5 … 1.0 m.
/// * Grab strength above [`GRAB_CLOSED`] → `Closed`, otherwise `Open`.
#[cfg(feature = "leap")]
pub struct LeapSensorSource;

#[cfg(feature = "leap")]
const GRAB_CLOSED: f32 = 0.8;

/// Leap palm position (mm) → camera space (m).
#[cfg_attr(not(feature = "leap"), allow(dead_code))]
fn leap_palm_to_hand(x_mm: f32, y_mm: f32, z_mm: f32) -> Vec3 {
    Vec3::new(x_mm / 1000.0, (y_mm - 300.0) / 400.0, 0.75 + z_mm / 800.0)
}

#[cfg(feature = "leap")]
impl SensorSource for LeapSensorSource {
    fn run(self: Box<Self>, hub: SensorHub) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                hub.fail(format!("failed to create LeapC connection: {:?}", e));
                return;
            }
        };
        if let Err(e) = connection.open() {
            hub.fail(format!("failed to open LeapMotion device: {:?}", e));
            return;
        }
        info!("LeapMotion sensor started");

        let mut last = SimBody::default().hands;

        while !hub.is_closed() {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let mut states = HandPair::new(HandState::NotTracked, HandState::NotTracked);
                let mut seen = false;
                for h in frame.hands() {
                    let hand = match h.hand_type() {
                        HandType::Left  => Hand::Left,
                        HandType::Right => Hand::Right,
                    };
                    let p = h.palm().position();
                    last[hand] = leap_palm_to_hand(p.x, p.y, p.z);
                    states[hand] = if h.grab_strength() > GRAB_CLOSED {
                        HandState::Closed
                    } else {
                        HandState::Open
                    };
                    seen = true;
                }

                let frame = if seen {
                    RawBodyFrame::new(vec![Body::with_hands(
                        1,
                        (last.left, states.left),
                        (last.right, states.right),
                    )])
                } else {
                    RawBodyFrame::empty()
                };
                hub.publish(&frame);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
