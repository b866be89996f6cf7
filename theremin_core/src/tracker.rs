//! Single-body selection.
//!
//! The first tracked body in sensor order is acquired and then followed until
//! the sensor stops reporting it as tracked.  Other bodies are ignored while
//! one is held.

use crate::body::{BodyId, RawBodyFrame};

/// What happened to the held identity on one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingEvent {
    /// Nobody held, nobody to acquire.
    Idle,
    Acquired(BodyId),
    Continued(BodyId),
    /// The held body vanished or went untracked; nobody is held now.
    Lost(BodyId),
}

impl TrackingEvent {
    /// The body to process this frame, if any.
    pub fn active(self) -> Option<BodyId> {
        match self {
            TrackingEvent::Acquired(id) | TrackingEvent::Continued(id) => Some(id),
            TrackingEvent::Idle | TrackingEvent::Lost(_) => None,
        }
    }

    pub fn is_tracking(self) -> bool {
        self.active().is_some()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BodyTracker {
    tracked: Option<BodyId>,
}

impl BodyTracker {
    pub fn new() -> Self {
        BodyTracker::default()
    }

    pub fn tracked(&self) -> Option<BodyId> {
        self.tracked
    }

    pub fn update(&mut self, frame: &RawBodyFrame) -> TrackingEvent {
        match self.tracked {
            None => match frame.bodies.iter().find(|b| b.tracked) {
                Some(body) => {
                    self.tracked = Some(body.id);
                    TrackingEvent::Acquired(body.id)
                }
                None => TrackingEvent::Idle,
            },
            Some(id) => {
                if frame.find_tracked(id).is_some() {
                    TrackingEvent::Continued(id)
                } else {
                    self.tracked = None;
                    TrackingEvent::Lost(id)
                }
            }
        }
    }
}
