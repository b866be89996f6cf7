use thiserror::Error;

use crate::body::{BodyId, JointType};

/// Failure of a generic [`remap`](crate::remap::remap).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RemapError {
    #[error("input domain is degenerate: in_min == in_max == {0}")]
    DegenerateDomain(f32),
    #[error("remap bounds must be finite")]
    NonFinite,
}

/// Fatal per-frame failure.  A run loop that receives one should stop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The sensor reported a tracked body without a joint it promises.
    #[error("tracked {body} is missing joint {joint:?}")]
    MissingJoint { body: BodyId, joint: JointType },
}
