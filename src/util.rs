//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

use cgmath::num_traits::Float;
use serde::{Deserialize, Serialize};

/// An interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: std::cmp::PartialOrd> Interval<T> {
    /// Returns true if this interval contains the value.
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

impl<T: std::ops::Sub<T, Output = T> + Copy> Interval<T> {
    /// Gets the magnitude of the interval.
    pub fn length(&self) -> T {
        self.max - self.min
    }
}

impl<T: Float> Interval<T> {
    /// Creates an interval with the given centre and radius.
    pub fn disc(centre: T, radius: T) -> Self {
        Self {
            min: centre - radius,
            max: centre + radius,
        }
    }

    /// Clamps a value so that it lies within the interval.
    pub fn clamp(&self, value: T) -> T {
        value.max(self.min).min(self.max)
    }

    /// Linearly interpolates from `min` to `max`. `t` is not clamped.
    pub fn lerp(&self, t: T) -> T {
        self.min + t * (self.max - self.min)
    }

    /// The inverse of [Interval::lerp]. Returns zero for an empty interval.
    pub fn inv_lerp(&self, value: T) -> T {
        let length = self.max - self.min;
        if length == T::zero() {
            T::zero()
        } else {
            (value - self.min) / length
        }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

#[cfg(test)]
mod test {
    use super::Interval;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn lerp_and_inverse() {
        let range: Interval<f64> = Interval::new(0.0, 20.0);
        assert_approx_eq!(range.lerp(0.25), 5.0);
        assert_approx_eq!(range.inv_lerp(5.0), 0.25);
        assert_approx_eq!(range.inv_lerp(-5.0), -0.25);
        assert_eq!(Interval::new(3.0, 3.0).inv_lerp(10.0), 0.0);
    }

    #[test]
    fn disc_and_clamp() {
        let disc = Interval::disc(0.5, 0.25);
        assert_eq!(disc, Interval::new(0.25, 0.75));
        assert_eq!(disc.clamp(1.0), 0.75);
        assert_eq!(disc.clamp(0.0), 0.25);
        assert!(disc.contains(0.5));
        assert!(!disc.contains(0.8));
    }
}
