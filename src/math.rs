//! Mathematical structs and functions.

use cgmath::{Point3, Vector3};
pub use bezier::CubicBezier3d;
pub use curve::{ParametricCurve3d, PARAM_DOMAIN};
pub use line::LineSegment3d;
pub use spline::CatmullRomSpline3d;
pub use util::*;

mod bezier;
mod curve;
mod line;
mod spline;
mod util;

/// A 3D point
pub type Point3d = Point3<f64>;

/// A 3D vector
pub type Vector3d = Vector3<f64>;
