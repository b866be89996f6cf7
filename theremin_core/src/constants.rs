//! Fixed tuning of the gesture pipeline.

use crate::remap::LinearMap;

/// Consecutive not-closed readings a closed hand tolerates before it opens.
/// The hand opens on reading number `DEBOUNCE_NOT_CLOSED_LIMIT + 1`.
pub const DEBOUNCE_NOT_CLOSED_LIMIT: u32 = 5;

/// Hand depth (m) → voice gain.  Nearer hand is louder.
pub const GAIN_MAP: LinearMap = LinearMap::fixed(1.0, 0.5, 0.0, 1.0);

/// Hand height (m) → voice frequency (Hz).
pub const FREQUENCY_MAP: LinearMap = LinearMap::fixed(-0.5, 0.5, 0.0, 700.0);

/// Hand height (m) → colour intensity of the on-screen indicator.
pub const INDICATOR_MAP: LinearMap = LinearMap::fixed(-1.0, 1.0, 0.0, 1.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_maps_pass_validation() {
        for m in [GAIN_MAP, FREQUENCY_MAP, INDICATOR_MAP] {
            let (a, b) = m.domain();
            let (c, d) = m.range();
            assert_eq!(LinearMap::new(a, b, c, d), Ok(m));
        }
    }
}
