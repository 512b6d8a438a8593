use crate::math::{ground_direction, Point3d, Vector3d};
use cgmath::prelude::*;
use serde::{Deserialize, Serialize};

/// The vehicle's pose, supplied by the host's physics engine each tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// The world space position of the vehicle.
    pub position: Point3d,
    /// The vehicle's heading in the ground plane, in radians, measured as `atan2(z, x)`.
    pub yaw: f64,
    /// The world space velocity in m/s.
    pub velocity: Vector3d,
}

impl Pose {
    /// Creates a new pose.
    pub fn new(position: Point3d, yaw: f64, velocity: Vector3d) -> Self {
        Self {
            position,
            yaw,
            velocity,
        }
    }

    /// Creates a pose from the vehicle's forward vector, ignoring its vertical component.
    pub fn from_forward(position: Point3d, forward: Vector3d, velocity: Vector3d) -> Self {
        Self::new(position, forward.z.atan2(forward.x), velocity)
    }

    /// A unit vector in the ground plane aligned with the vehicle's heading.
    pub fn forward(&self) -> Vector3d {
        ground_direction(self.yaw)
    }

    /// The component of the velocity along the vehicle's heading.
    /// Negative when travelling backwards.
    pub fn forward_speed(&self) -> f64 {
        self.forward().dot(self.velocity)
    }

    /// Whether every component of the pose is finite.
    pub fn is_finite(&self) -> bool {
        let Self {
            position: p,
            yaw,
            velocity: v,
        } = *self;
        [p.x, p.y, p.z, yaw, v.x, v.y, v.z]
            .iter()
            .all(|c| c.is_finite())
    }
}
