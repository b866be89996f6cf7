//! Hand extraction from a tracked body.

use crate::body::{Body, Hand, HandPair, HandState, Vec3};
use crate::error::PipelineError;

/// One hand on one frame, before debouncing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSample {
    pub position: Vec3,
    pub state:    HandState,
}

impl HandSample {
    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}

/// Read both hands of `body`.
///
/// A tracked body always carries both hand joints; a missing one is reported
/// as [`PipelineError::MissingJoint`] rather than filled in.
pub fn extract_hands(body: &Body) -> Result<HandPair<HandSample>, PipelineError> {
    let sample = |hand: Hand| -> Result<HandSample, PipelineError> {
        let joint = hand.joint();
        let position = body
            .joint(joint)
            .ok_or(PipelineError::MissingJoint { body: body.id, joint })?;
        Ok(HandSample { position, state: body.hand_states[hand] })
    };
    Ok(HandPair::new(sample(Hand::Left)?, sample(Hand::Right)?))
}
