//! Hand-state debouncing.
//!
//! The sensor's per-frame open/closed classification drops out now and then.
//! A closed hand is held closed through up to
//! [`DEBOUNCE_NOT_CLOSED_LIMIT`] consecutive not-closed readings; a single
//! closed reading closes it immediately.

use crate::body::HandState;
use crate::constants::DEBOUNCE_NOT_CLOSED_LIMIT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandDebouncer {
    stable_closed:     bool,
    frames_not_closed: u32,
}

impl HandDebouncer {
    pub fn new() -> Self {
        HandDebouncer::default()
    }

    /// Feed one raw reading; returns the stable closed state.
    pub fn update(&mut self, raw: HandState) -> bool {
        if raw.is_closed() {
            self.stable_closed     = true;
            self.frames_not_closed = 0;
        } else {
            self.frames_not_closed += 1;
            if self.frames_not_closed > DEBOUNCE_NOT_CLOSED_LIMIT {
                self.stable_closed     = false;
                self.frames_not_closed = 0;
            }
        }
        self.stable_closed
    }

    pub fn reset(&mut self) {
        *self = HandDebouncer::default();
    }

    pub fn is_closed(&self) -> bool { self.stable_closed }
    pub fn frames_not_closed(&self) -> u32 { self.frames_not_closed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HandState::*;

    fn feed(d: &mut HandDebouncer, states: &[HandState]) -> Vec<bool> {
        states.iter().map(|&s| d.update(s)).collect()
    }

    #[test]
    fn starts_open() {
        let d = HandDebouncer::new();
        assert!(!d.is_closed());
        assert_eq!(d.frames_not_closed(), 0);
    }

    #[test]
    fn single_closed_reading_closes() {
        let mut d = HandDebouncer::new();
        assert!(d.update(Closed));
        assert_eq!(d.frames_not_closed(), 0);
    }

    #[test]
    fn opens_on_sixth_consecutive_not_closed() {
        let mut d = HandDebouncer::new();
        d.update(Closed);
        let out = feed(&mut d, &[Open, NotTracked, Unknown, Lasso, Open, Open]);
        assert_eq!(out, vec![true, true, true, true, true, false]);
        assert_eq!(d.frames_not_closed(), 0);
    }

    #[test]
    fn interleaved_closed_never_opens() {
        let mut d = HandDebouncer::new();
        d.update(Closed);
        for _ in 0..20 {
            let out = feed(&mut d, &[Open, Open, Open, Open, Open, Closed]);
            assert!(out.iter().all(|&c| c));
        }
    }

    #[test]
    fn repeated_closed_is_stable() {
        let mut d = HandDebouncer::new();
        for _ in 0..100 {
            assert!(d.update(Closed));
            assert_eq!(d.frames_not_closed(), 0);
        }
    }

    #[test]
    fn open_hand_counter_wraps() {
        // Already open: the counter still cycles back to zero every sixth frame.
        let mut d = HandDebouncer::new();
        feed(&mut d, &[Open; 5]);
        assert_eq!(d.frames_not_closed(), 5);
        d.update(Open);
        assert_eq!(d.frames_not_closed(), 0);
        assert!(!d.is_closed());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut d = HandDebouncer::new();
        d.update(Closed);
        d.update(Open);
        d.reset();
        assert_eq!(d, HandDebouncer::new());
    }
}
