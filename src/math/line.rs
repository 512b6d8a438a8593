use super::curve::ParametricCurve3d;
use super::{Point3d, Vector3d};
use cgmath::prelude::*;

/// A straight line segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineSegment3d {
    start: Point3d,
    end: Point3d,
}

impl LineSegment3d {
    /// Creates a line segment running from `start` at `t = 0` to `end` at `t = 1`.
    pub const fn from_ends(start: Point3d, end: Point3d) -> Self {
        Self { start, end }
    }

    /// The length of the segment.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

impl ParametricCurve3d for LineSegment3d {
    fn sample(&self, t: f64) -> Point3d {
        self.start + (self.end - self.start) * t
    }

    fn sample_dt(&self, _t: f64) -> Vector3d {
        self.end - self.start
    }
}
