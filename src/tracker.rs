//! Locating a vehicle relative to the road curve.
//!
//! The nearest point is found in two passes. A coarse global search narrows
//! in on an approximate parameter, which can land on the wrong local minimum
//! near inflection points, so it is followed by a brute-force scan of a fixed
//! window around that estimate. Both passes have fixed iteration counts.

use crate::debug::debug_point;
use crate::error::ConfigError;
use crate::math::{ground_heading, ParametricCurve3d, Point3d, PARAM_DOMAIN};
use crate::util::Interval;
use cgmath::prelude::*;
use serde::{Deserialize, Serialize};

/// The resolution of the nearest point search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Number of subdivisions sampled by each round of the coarse pass.
    pub coarse_samples: usize,
    /// Number of narrowing rounds in the coarse pass.
    pub coarse_iterations: usize,
    /// Parameter step of the local refinement scan.
    pub epsilon: f64,
    /// Number of parameters sampled by the local refinement scan,
    /// centred on the coarse estimate.
    pub refine_samples: usize,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            coarse_samples: 64,
            coarse_iterations: 16,
            epsilon: 1e-4,
            refine_samples: 500,
        }
    }
}

impl TrackerParams {
    /// Checks that the search resolution is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coarse_samples == 0 {
            return Err(ConfigError::Invalid {
                field: "tracker.coarse_samples",
                reason: "must be at least 1",
            });
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "tracker.epsilon",
                reason: "must be positive and finite",
            });
        }
        if self.refine_samples == 0 {
            return Err(ConfigError::Invalid {
                field: "tracker.refine_samples",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Where the vehicle is relative to the curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TrackingResult {
    /// The point on the curve nearest to the vehicle.
    pub nearest_point: Point3d,
    /// The curve parameter of `nearest_point`.
    pub t: f64,
    /// The heading of the curve's tangent at `nearest_point` in the ground plane, in radians.
    /// `None` if the tangent is degenerate.
    pub tangent_angle: Option<f64>,
    /// The distance from the vehicle to `nearest_point`.
    pub lateral_distance: f64,
}

/// Locates the point on `curve` nearest to `position`.
pub fn locate<C>(curve: &C, position: Point3d, params: &TrackerParams) -> TrackingResult
where
    C: ParametricCurve3d + ?Sized,
{
    let t0 = coarse_nearest(curve, position, params.coarse_samples, params.coarse_iterations);
    let t = refine_nearest(curve, position, t0, params.epsilon, params.refine_samples);

    let nearest_point = curve.sample(t);
    let tangent_angle = ground_heading(curve.sample_dt(t));
    let lateral_distance = nearest_point.distance(position);
    debug_point("nearest point", nearest_point);

    TrackingResult {
        nearest_point,
        t,
        tangent_angle,
        lateral_distance,
    }
}

/// Approximates the parameter of the point on `curve` nearest to `point`.
///
/// The whole domain is sampled at `samples` evenly spaced parameters. Each of the
/// `iterations` rounds then subdivides the bracket either side of the best sample so far.
pub fn coarse_nearest<C>(curve: &C, point: Point3d, samples: usize, iterations: usize) -> f64
where
    C: ParametricCurve3d + ?Sized,
{
    let samples = samples.max(1);
    let distance = |t: f64| curve.sample(t).distance(point);

    // The end of a closed curve is the same point as its start
    let mut step = PARAM_DOMAIN.length() / samples as f64;
    let count = if curve.is_closed() { samples } else { samples + 1 };
    let (mut best_t, mut best_dist) = (0..count)
        .map(|i| curve.wrap_param(PARAM_DOMAIN.lerp(i as f64 / samples as f64)))
        .map(|t| (t, distance(t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap_or((PARAM_DOMAIN.min, distance(PARAM_DOMAIN.min)));

    for _ in 0..iterations {
        let bracket = Interval::disc(best_t, step);
        for i in 0..=samples {
            let t = curve.wrap_param(bracket.lerp(i as f64 / samples as f64));
            let dist = distance(t);
            if dist < best_dist {
                best_t = t;
                best_dist = dist;
            }
        }
        step = bracket.length() / samples as f64;
    }

    best_t
}

/// Refines an estimate `t0` of the nearest parameter by scanning `samples` parameters
/// spaced `epsilon` apart and centred on `t0`, keeping the nearest.
///
/// The result is never further from `point` than `t0` is.
pub fn refine_nearest<C>(curve: &C, point: Point3d, t0: f64, epsilon: f64, samples: usize) -> f64
where
    C: ParametricCurve3d + ?Sized,
{
    let mut best_t = curve.wrap_param(t0);
    let mut best_dist = curve.sample(best_t).distance(point);
    let half = (samples / 2) as f64;

    for i in 0..samples {
        let t = curve.wrap_param(t0 + epsilon * (i as f64 - half));
        let dist = curve.sample(t).distance(point);
        if dist < best_dist {
            best_t = t;
            best_dist = dist;
        }
    }

    best_t
}
