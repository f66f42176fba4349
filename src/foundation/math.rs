/// Linear interpolation, `t` is not clamped.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Re-map `v` from `[in_lo, in_hi]` onto `[out_lo, out_hi]` without clamping.
///
/// A degenerate input range maps everything onto `out_lo`.
pub fn map_range(v: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    let span = in_hi - in_lo;
    if span == 0.0 || !span.is_finite() {
        return out_lo;
    }
    out_lo + (v - in_lo) / span * (out_hi - out_lo)
}

/// `num / den`, or `fallback` when the quotient would not be finite.
pub fn ratio_or(num: f64, den: f64, fallback: f64) -> f64 {
    if den == 0.0 {
        return fallback;
    }
    let r = num / den;
    if r.is_finite() { r } else { fallback }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
