//! Velocity: log-scaled acceleration of event rate against a baseline
//! (spec §4.3).

/// `r_w` and `r_b` are already rates (events per day); `a_max` is the
/// acceleration above which velocity saturates at 1.0.
///
/// `r_b == 0.0` with `r_w > 0.0` is a vacuous-truth edge case (spec §8
/// S: "zero-baseline -> velocity=1.0"): there is no baseline to compare
/// against, so any activity at all is maximally accelerating.
pub fn velocity(r_w: f64, r_b: f64, a_max: f64) -> f64 {
    if r_b <= 0.0 {
        return if r_w > 0.0 { 1.0 } else { 0.0 };
    }
    let acceleration = r_w / r_b;
    (acceleration.ln_1p() / a_max.ln_1p()).clamp(0.0, 1.0)
}
