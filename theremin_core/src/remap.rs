//! Affine interval mapping.
//!
//! Values outside the input interval are extrapolated, never clamped.

use crate::error::RemapError;

/// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// The input interval may be reversed (`in_min > in_max`); it may not be empty.
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> Result<f32, RemapError> {
    LinearMap::new(in_min, in_max, out_min, out_max).map(|m| m.apply(value))
}

/// A remap whose domain has already been validated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearMap {
    in_min:  f32,
    in_max:  f32,
    out_min: f32,
    out_max: f32,
}

impl LinearMap {
    pub fn new(in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> Result<Self, RemapError> {
        if ![in_min, in_max, out_min, out_max].iter().all(|v| v.is_finite()) {
            return Err(RemapError::NonFinite);
        }
        if in_min == in_max {
            return Err(RemapError::DegenerateDomain(in_min));
        }
        Ok(LinearMap { in_min, in_max, out_min, out_max })
    }

    /// For crate constants only: the caller guarantees a finite, non-empty domain.
    pub(crate) const fn fixed(in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> Self {
        LinearMap { in_min, in_max, out_min, out_max }
    }

    pub fn apply(&self, value: f32) -> f32 {
        self.out_min
            + (value - self.in_min) / (self.in_max - self.in_min) * (self.out_max - self.out_min)
    }

    pub fn domain(&self) -> (f32, f32) {
        (self.in_min, self.in_max)
    }

    pub fn range(&self) -> (f32, f32) {
        (self.out_min, self.out_max)
    }
}
