//! Skeleton data as delivered by a body-tracking sensor.
//!
//! A [`RawBodyFrame`] is a wholesale snapshot: every delivery replaces the
//! previous one, and nothing here keeps history.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

// ════════════════════════════════════════════════════════════════════════════
// Geometry
// ════════════════════════════════════════════════════════════════════════════

/// Camera-space position in metres.  `z` grows away from the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hands
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    pub fn joint(self) -> JointType {
        match self {
            Hand::Left  => JointType::HandLeft,
            Hand::Right => JointType::HandRight,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Hand::Left  => "left",
            Hand::Right => "right",
        }
    }
}

/// One value per hand, indexable by [`Hand`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HandPair<T> {
    pub left:  T,
    pub right: T,
}

impl<T> HandPair<T> {
    pub fn new(left: T, right: T) -> Self {
        HandPair { left, right }
    }

    pub fn map<U>(self, mut f: impl FnMut(Hand, T) -> U) -> HandPair<U> {
        HandPair {
            left:  f(Hand::Left, self.left),
            right: f(Hand::Right, self.right),
        }
    }
}

impl<T> Index<Hand> for HandPair<T> {
    type Output = T;
    fn index(&self, hand: Hand) -> &T {
        match hand {
            Hand::Left  => &self.left,
            Hand::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Hand> for HandPair<T> {
    fn index_mut(&mut self, hand: Hand) -> &mut T {
        match hand {
            Hand::Left  => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }
}

/// Discrete hand-pose classification reported by the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HandState {
    #[default]
    Unknown,
    NotTracked,
    Open,
    Closed,
    Lasso,
}

impl HandState {
    /// Only `Closed` counts as closed; every other reading is "not closed".
    pub fn is_closed(self) -> bool {
        self == HandState::Closed
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Joints
// ════════════════════════════════════════════════════════════════════════════

/// Skeletal landmarks of a full-body skeleton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JointType {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

// ════════════════════════════════════════════════════════════════════════════
// Bodies and frames
// ════════════════════════════════════════════════════════════════════════════

/// Sensor-assigned skeleton identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub id:          BodyId,
    pub tracked:     bool,
    pub joints:      HashMap<JointType, Vec3>,
    pub hand_states: HandPair<HandState>,
}

impl Body {
    /// A tracked body with no joints and both hands `Unknown`.
    pub fn tracked(id: u64) -> Self {
        Body {
            id:          BodyId(id),
            tracked:     true,
            joints:      HashMap::new(),
            hand_states: HandPair::default(),
        }
    }

    /// A tracked body exposing only the two hand joints.
    pub fn with_hands(id: u64, left: (Vec3, HandState), right: (Vec3, HandState)) -> Self {
        let mut body = Body::tracked(id);
        body.joints.insert(JointType::HandLeft, left.0);
        body.joints.insert(JointType::HandRight, right.0);
        body.hand_states = HandPair::new(left.1, right.1);
        body
    }

    pub fn untracked(mut self) -> Self {
        self.tracked = false;
        self
    }

    pub fn joint(&self, joint: JointType) -> Option<Vec3> {
        self.joints.get(&joint).copied()
    }
}

/// Every body the sensor reported in one delivery, in sensor order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawBodyFrame {
    pub bodies: Vec<Body>,
}

impl RawBodyFrame {
    pub fn new(bodies: Vec<Body>) -> Self {
        RawBodyFrame { bodies }
    }

    pub fn empty() -> Self {
        RawBodyFrame::default()
    }

    pub fn find_tracked(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.tracked && b.id == id)
    }
}
