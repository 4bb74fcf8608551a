//! Comparison utilities.

use tri_core::Real;

/// Return `true` if `x` lies in `[0, 1]` widened by `tolerance` on both
/// sides. NaN is never inside.
#[inline]
pub fn in_unit_interval(x: Real, tolerance: Real) -> bool {
    x >= -tolerance && x <= 1.0 + tolerance
}
