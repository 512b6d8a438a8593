use super::bezier::CubicBezier3d;
use super::curve::{ParametricCurve3d, PARAM_DOMAIN};
use super::{Point3d, Vector3d};
use crate::error::CurveError;
use itertools::Itertools;

/// The number of chords used to approximate the length of each segment.
const LENGTH_SUBDIVISIONS: usize = 16;

/// A road spline passing through a sequence of control points.
///
/// The spline is a chain of cubic bezier segments with Catmull-Rom tangents.
/// The parameter is distributed across segments in proportion to their
/// approximate length, so `t` is roughly the fraction of the path travelled.
#[derive(Clone, Debug)]
pub struct CatmullRomSpline3d {
    segments: Vec<CubicBezier3d>,
    /// The parameter value at the end of each segment.
    ends: Vec<f64>,
    closed: bool,
    length: f64,
}

impl CatmullRomSpline3d {
    /// Creates a spline through the given points.
    ///
    /// A closed spline joins the last point back to the first.
    /// A single point produces a degenerate spline with no defined tangent.
    pub fn new(points: &[Point3d], closed: bool) -> Result<Self, CurveError> {
        let n = points.len();
        if n == 0 {
            return Err(CurveError::NoPoints);
        }

        let segments = if n == 1 {
            vec![CubicBezier3d::new(&[points[0]; 4])]
        } else if closed {
            (0..n)
                .map(|i| {
                    CubicBezier3d::catmull_rom(
                        points[(i + n - 1) % n],
                        points[i],
                        points[(i + 1) % n],
                        points[(i + 2) % n],
                    )
                })
                .collect()
        } else {
            // Open ends reuse the end point as its own neighbour
            (0..n - 1)
                .map(|i| {
                    CubicBezier3d::catmull_rom(
                        points[i.saturating_sub(1)],
                        points[i],
                        points[i + 1],
                        points[usize::min(i + 2, n - 1)],
                    )
                })
                .collect()
        };

        let lengths = segments
            .iter()
            .map(|segment| segment.approx_length(LENGTH_SUBDIVISIONS))
            .collect_vec();
        let length: f64 = lengths.iter().sum();
        let ends = if length > 0.0 {
            lengths
                .iter()
                .scan(0.0, |acc, len| {
                    *acc += len;
                    Some(*acc / length)
                })
                .collect_vec()
        } else {
            // Zero-length splines are parameterised uniformly
            (1..=segments.len())
                .map(|i| i as f64 / segments.len() as f64)
                .collect_vec()
        };

        Ok(Self {
            segments,
            ends,
            closed: closed && n > 1,
            length,
        })
    }

    /// The approximate length of the spline.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The bezier segments which make up the spline.
    pub fn segments(&self) -> &[CubicBezier3d] {
        &self.segments
    }

    /// Maps a spline parameter to a segment index, the segment-local parameter,
    /// and the rate of change of the local parameter with respect to `t`.
    fn locate_segment(&self, t: f64) -> (usize, f64, f64) {
        let t = self.wrap_param(t);
        let idx = usize::min(
            self.ends.partition_point(|end| *end < t),
            self.segments.len() - 1,
        );
        let start = match idx {
            0 => PARAM_DOMAIN.min,
            _ => self.ends[idx - 1],
        };
        let width = self.ends[idx] - start;
        if width > 0.0 {
            (idx, ((t - start) / width).clamp(0.0, 1.0), 1.0 / width)
        } else {
            (idx, 0.0, 0.0)
        }
    }
}

impl ParametricCurve3d for CatmullRomSpline3d {
    fn sample(&self, t: f64) -> Point3d {
        let (idx, local_t, _) = self.locate_segment(t);
        self.segments[idx].sample(local_t)
    }

    fn sample_dt(&self, t: f64) -> Vector3d {
        let (idx, local_t, scale) = self.locate_segment(t);
        self.segments[idx].sample_dt(local_t) * scale
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
