//! Last-write-wins handoff of the newest sensor frame.
//!
//! The sensor thread stores; the render loop peeks once per tick.  There is no
//! queue: frames the render loop never saw are simply overwritten.

use std::sync::{Arc, Mutex, PoisonError};

use crate::body::RawBodyFrame;

#[derive(Clone, Debug, Default)]
pub struct FrameSlot {
    latest: Arc<Mutex<Option<Arc<RawBodyFrame>>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        FrameSlot::default()
    }

    /// Replace whatever frame is held.
    pub fn store(&self, frame: RawBodyFrame) {
        let frame = Arc::new(frame);
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame);
    }

    /// The newest frame, without consuming it.  `None` until the first store.
    pub fn latest(&self) -> Option<Arc<RawBodyFrame>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
