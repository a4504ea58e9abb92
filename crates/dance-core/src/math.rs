/// Linearly remaps `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// A degenerate input range yields `out_min`.
#[inline]
pub fn map_range(
    value: f32,
    in_min: f32,
    in_max: f32,
    out_min: f32,
    out_max: f32,
    clamp: bool,
) -> f32 {
    if (in_max - in_min).abs() < f32::EPSILON {
        return out_min;
    }
    let mapped = (value - in_min) / (in_max - in_min) * (out_max - out_min) + out_min;
    if clamp {
        if out_max < out_min {
            mapped.clamp(out_max, out_min)
        } else {
            mapped.clamp(out_min, out_max)
        }
    } else {
        mapped
    }
}

#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
