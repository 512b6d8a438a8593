use super::curve::ParametricCurve3d;
use super::{Point3d, Vector3d};
use cgmath::prelude::*;

/// A cubic bezier curve
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezier3d {
    points: [Point3d; 4],
}

impl CubicBezier3d {
    pub const fn new(points: &[Point3d; 4]) -> Self {
        Self { points: *points }
    }

    /// The segment of a uniform Catmull-Rom spline between `p1` and `p2`,
    /// where `p0` and `p3` are the neighbouring control points.
    pub fn catmull_rom(p0: Point3d, p1: Point3d, p2: Point3d, p3: Point3d) -> Self {
        Self {
            points: [p1, p1 + (p2 - p0) / 6.0, p2 - (p3 - p1) / 6.0, p2],
        }
    }

    /// Approximates the arc length by summing `segments` chords.
    pub fn approx_length(&self, segments: usize) -> f64 {
        let segments = segments.max(1);
        (0..segments)
            .map(|i| {
                let t1 = i as f64 / segments as f64;
                let t2 = (i + 1) as f64 / segments as f64;
                self.sample(t1).distance(self.sample(t2))
            })
            .sum()
    }
}

impl ParametricCurve3d for CubicBezier3d {
    fn sample(&self, t: f64) -> Point3d {
        let t1 = 1.0 - t;
        Point3d::from_vec(
            t1 * t1 * t1 * self.points[0].to_vec()
                + 3.0 * t1 * t1 * t * self.points[1].to_vec()
                + 3.0 * t1 * t * t * self.points[2].to_vec()
                + t * t * t * self.points[3].to_vec(),
        )
    }

    fn sample_dt(&self, t: f64) -> Vector3d {
        let t1 = 1.0 - t;
        let [p0, p1, p2, p3] = self.points;
        3.0 * (t1 * t1 * (p1 - p0) + 2.0 * t1 * t * (p2 - p1) + t * t * (p3 - p2))
    }
}
