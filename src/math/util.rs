use super::{Point3d, Vector3d};
use std::f64::consts::{PI, TAU};

/// Squared planar length below which a ground-plane direction is considered degenerate.
const DEGENERATE_LENGTH2: f64 = 1e-24;

/// Clamps a value to the range `[0, 1]`.
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Computes the heading of a vector projected onto the ground (XZ) plane,
/// as `atan2(z, x)` in radians.
///
/// Returns `None` if the projection is zero or not finite,
/// in which case the heading is undefined.
pub fn ground_heading(vec: Vector3d) -> Option<f64> {
    let length2 = vec.x * vec.x + vec.z * vec.z;
    if !length2.is_finite() || length2 < DEGENERATE_LENGTH2 {
        return None;
    }
    Some(vec.z.atan2(vec.x))
}

/// The unit ground-plane vector with the given heading.
pub fn ground_direction(heading: f64) -> Vector3d {
    Vector3d::new(heading.cos(), 0.0, heading.sin())
}

/// The ground-plane bearing of `to` as seen from `from`, in radians.
///
/// Coincident points have a bearing of zero.
pub fn ground_bearing(from: Point3d, to: Point3d) -> f64 {
    let delta = to - from;
    delta.z.atan2(delta.x)
}

/// Wraps an angle in radians into `(-PI, PI]`.
pub fn wrap_angle(angle: f64) -> f64 {
    PI - (PI - angle).rem_euclid(TAU)
}
