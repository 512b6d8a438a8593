use super::{Point3d, Vector3d};
use crate::util::Interval;

/// The parameter domain shared by every curve.
pub const PARAM_DOMAIN: Interval<f64> = Interval::new(0.0, 1.0);

/// A parametric curve in 3D space, parameterised over [PARAM_DOMAIN].
///
/// Closed curves are periodic: `t = 1` is the same point as `t = 0`, and the
/// domain is treated as the half-open range `[0, 1)`.
pub trait ParametricCurve3d {
    /// Samples the parametric curve.
    fn sample(&self, t: f64) -> Point3d;

    /// Samples the derivative of the parametric curve.
    ///
    /// The default implementation approximates the derivative by sampling
    /// two very nearby points along the curve.
    fn sample_dt(&self, t: f64) -> Vector3d {
        let delta = PARAM_DOMAIN.length() * 0.0001;
        let (t1, t2) = if self.is_closed() || t + delta <= PARAM_DOMAIN.max {
            (t, t + delta)
        } else {
            (t - delta, t)
        };
        let p1 = self.sample(self.wrap_param(t1));
        let p2 = self.sample(self.wrap_param(t2));
        (p2 - p1) / delta
    }

    /// Whether the curve forms a closed loop.
    fn is_closed(&self) -> bool {
        false
    }

    /// Maps any real parameter into the curve's domain,
    /// wrapping closed curves and clamping open ones.
    fn wrap_param(&self, t: f64) -> f64 {
        if self.is_closed() {
            let t = t.rem_euclid(PARAM_DOMAIN.length());
            // `rem_euclid` rounds tiny negative values up to the period
            if t >= PARAM_DOMAIN.max {
                PARAM_DOMAIN.min
            } else {
                t
            }
        } else {
            PARAM_DOMAIN.clamp(t)
        }
    }
}

impl<T: ParametricCurve3d + ?Sized> ParametricCurve3d for &T {
    fn sample(&self, t: f64) -> Point3d {
        (**self).sample(t)
    }

    fn sample_dt(&self, t: f64) -> Vector3d {
        (**self).sample_dt(t)
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn wrap_param(&self, t: f64) -> f64 {
        (**self).wrap_param(t)
    }
}

impl<T: ParametricCurve3d + ?Sized> ParametricCurve3d for Box<T> {
    fn sample(&self, t: f64) -> Point3d {
        (**self).sample(t)
    }

    fn sample_dt(&self, t: f64) -> Vector3d {
        (**self).sample_dt(t)
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn wrap_param(&self, t: f64) -> f64 {
        (**self).wrap_param(t)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::TAU;

    struct Circle {
        radius: f64,
    }

    impl ParametricCurve3d for Circle {
        fn sample(&self, t: f64) -> Point3d {
            let a = TAU * t;
            Point3d::new(self.radius * a.cos(), 0.0, self.radius * a.sin())
        }

        fn is_closed(&self) -> bool {
            true
        }
    }

    struct Ramp;

    impl ParametricCurve3d for Ramp {
        fn sample(&self, t: f64) -> Point3d {
            Point3d::new(4.0 * t, t, 0.0)
        }
    }

    #[test]
    fn closed_curves_wrap() {
        let circle = Circle { radius: 1.0 };
        assert_approx_eq!(circle.wrap_param(1.25), 0.25);
        assert_approx_eq!(circle.wrap_param(-0.25), 0.75);
        assert_eq!(circle.wrap_param(-1e-18), 0.0);
        assert_eq!(circle.wrap_param(1.0), 0.0);
    }

    #[test]
    fn open_curves_clamp() {
        assert_eq!(Ramp.wrap_param(1.25), 1.0);
        assert_eq!(Ramp.wrap_param(-0.25), 0.0);
        assert_eq!(Ramp.wrap_param(0.5), 0.5);
    }

    #[test]
    fn default_derivative() {
        let dt = Ramp.sample_dt(0.5);
        assert_approx_eq!(dt.x, 4.0, 1e-6);
        assert_approx_eq!(dt.y, 1.0, 1e-6);

        // Falls back to a backward difference at the end of an open curve
        let dt = Ramp.sample_dt(1.0);
        assert_approx_eq!(dt.x, 4.0, 1e-6);

        // Wraps across the seam of a closed curve
        let dt = Circle { radius: 1.0 }.sample_dt(1.0 - 1e-9);
        assert_approx_eq!(dt.x, 0.0, 1e-2);
        assert_approx_eq!(dt.z, TAU, 1e-2);
    }
}
