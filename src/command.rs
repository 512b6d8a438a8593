//! Turning human input or tracking results into normalised drive commands.

use crate::config::VehicleConfig;
use crate::error::ControlError;
use crate::math::{ground_bearing, wrap_angle, Point3d};
use crate::pose::Pose;
use crate::tracker::TrackingResult;
use log::warn;
use serde::{Deserialize, Serialize};

/// Who is driving the vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveMode {
    #[default]
    Human,
    Autonomous,
}

impl DriveMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            DriveMode::Human => DriveMode::Autonomous,
            DriveMode::Autonomous => DriveMode::Human,
        }
    }
}

/// The point the autonomous steering law measures the bearing of the nearest point from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BearingReference {
    /// The world origin.
    #[default]
    WorldOrigin,
    /// The vehicle's own position.
    Vehicle,
}

/// Raw steering and throttle axes from a human driver, each in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanInput {
    pub steering: f64,
    pub throttle: f64,
}

/// A normalised drive command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    /// Steering demand in `[-1, 1]`, scaled by the current steering range.
    pub steering: f64,
    /// Throttle demand in `[-1, 1]`. Negative values reverse or brake.
    pub throttle: f64,
}

/// Computes the drive command for one tick.
///
/// Human input is passed through unchanged. In autonomous mode the steering
/// comes from [steering_toward] and the throttle is the configured constant.
pub fn compute_command(
    mode: DriveMode,
    human: Option<HumanInput>,
    tracking: Option<&TrackingResult>,
    pose: &Pose,
    config: &VehicleConfig,
) -> Result<DriveCommand, ControlError> {
    match mode {
        DriveMode::Human => {
            let input = human.ok_or(ControlError::MissingHumanInput)?;
            Ok(DriveCommand {
                steering: input.steering,
                throttle: input.throttle,
            })
        }
        DriveMode::Autonomous => {
            let tracking = tracking.ok_or(ControlError::MissingTracking)?;
            Ok(DriveCommand {
                steering: steering_toward(tracking, pose, config.bearing_reference),
                throttle: config.cruise_throttle,
            })
        }
    }
}

/// The autonomous steering law.
///
/// Blends the bearing of the nearest point with the curve's tangent heading and
/// compares the average with the vehicle's yaw: `sin(yaw - (bearing + tangent) / 2)`.
/// The bearing is taken relative to the tangent before averaging, so the
/// average never flips across the `±PI` seam of the two headings.
/// Falls back to zero steering when the tangent heading is undefined.
pub fn steering_toward(tracking: &TrackingResult, pose: &Pose, reference: BearingReference) -> f64 {
    let tangent_angle = match tracking.tangent_angle {
        Some(angle) => angle,
        None => {
            warn!("Degenerate curve tangent at t = {}, holding steering straight", tracking.t);
            return 0.0;
        }
    };
    let from = match reference {
        BearingReference::WorldOrigin => Point3d::new(0.0, 0.0, 0.0),
        BearingReference::Vehicle => pose.position,
    };
    let angle_to_target = ground_bearing(from, tracking.nearest_point);
    let offset = wrap_angle(angle_to_target - tangent_angle);
    (pose.yaw - (tangent_angle + 0.5 * offset)).sin()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{ground_direction, LineSegment3d, Vector3d};
    use crate::tracker::{locate, TrackerParams};
    use cgmath::prelude::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn pose(x: f64, z: f64, yaw: f64, speed: f64) -> Pose {
        let mut pose = Pose::new(Point3d::new(x, 0.0, z), yaw, Vector3d::new(0.0, 0.0, 0.0));
        pose.velocity = pose.forward() * speed;
        pose
    }

    fn tracking(x: f64, z: f64, tangent_angle: Option<f64>) -> TrackingResult {
        TrackingResult {
            nearest_point: Point3d::new(x, 0.0, z),
            t: 0.5,
            tangent_angle,
            lateral_distance: 1.0,
        }
    }

    #[test]
    fn human_mode_is_identity() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Flat whites come with no foam...");
        let config = VehicleConfig::default();
        for _ in 0..100 {
            let input = HumanInput {
                steering: rng.gen_range(-1.0..=1.0),
                throttle: rng.gen_range(-1.0..=1.0),
            };
            let speed = rng.gen_range(-30.0..30.0);
            let command = compute_command(
                DriveMode::Human,
                Some(input),
                Some(&tracking(1.0, 1.0, Some(0.3))),
                &pose(0.0, 0.0, 0.0, speed),
                &config,
            )
            .unwrap();
            assert_eq!(command.steering, input.steering);
            assert_eq!(command.throttle, input.throttle);
        }
    }

    #[test]
    fn missing_inputs() {
        let config = VehicleConfig::default();
        let p = pose(0.0, 0.0, 0.0, 0.0);
        assert_eq!(
            compute_command(DriveMode::Human, None, None, &p, &config),
            Err(ControlError::MissingHumanInput)
        );
        assert_eq!(
            compute_command(DriveMode::Autonomous, Some(HumanInput::default()), None, &p, &config),
            Err(ControlError::MissingTracking)
        );
    }

    #[test]
    fn autonomous_uses_cruise_throttle() {
        let config = VehicleConfig {
            cruise_throttle: 0.25,
            ..Default::default()
        };
        let command = compute_command(
            DriveMode::Autonomous,
            Some(HumanInput { steering: 1.0, throttle: 1.0 }),
            Some(&tracking(10.0, 0.0, Some(0.0))),
            &pose(10.0, 1.0, 0.0, 5.0),
            &config,
        )
        .unwrap();
        assert_eq!(command.throttle, 0.25);
        assert_approx_eq!(command.steering, 0.0);
    }

    #[test]
    fn steering_law() {
        // Nearest point on the +z axis as seen from the origin, tangent along +x
        let result = tracking(0.0, 5.0, Some(0.0));
        let p = pose(1.0, 5.0, FRAC_PI_2, 0.0);
        let steering = steering_toward(&result, &p, BearingReference::WorldOrigin);
        assert_approx_eq!(steering, (FRAC_PI_2 - FRAC_PI_4).sin());

        // Same nearest point measured from the vehicle, which lies along -x
        let steering = steering_toward(&result, &p, BearingReference::Vehicle);
        assert_approx_eq!(steering, (FRAC_PI_2 - FRAC_PI_2).sin());
    }

    /// Whether nudging the yaw by the steering command turns the vehicle towards the road.
    fn turns_towards(steering: f64, p: &Pose, nearest: Point3d) -> bool {
        let to_road = nearest - p.position;
        // Positive steering turns towards decreasing yaw
        let turned = ground_direction(p.yaw - 0.1 * steering);
        turned.dot(to_road) > p.forward().dot(to_road)
    }

    #[test]
    fn steers_back_to_road_either_way() {
        let params = TrackerParams::default();
        for (start, end) in [(0.0, 100.0), (100.0, 0.0)] {
            let road =
                LineSegment3d::from_ends(Point3d::new(start, 0.0, 0.0), Point3d::new(end, 0.0, 0.0));
            let heading = if end > start { 0.0 } else { PI };
            for side in [-1.0, 1.0] {
                for skew in [-0.2, 0.0, 0.2] {
                    let p = pose(50.0, side, heading + skew, 5.0);
                    let result = locate(&road, p.position, &params);
                    let steering = steering_toward(&result, &p, BearingReference::Vehicle);
                    assert!(
                        turns_towards(steering, &p, result.nearest_point),
                        "road {} -> {}, side {}, skew {}: steering {}",
                        start,
                        end,
                        side,
                        skew,
                        steering
                    );
                }
            }
        }
    }

    #[test]
    fn steering_is_continuous_across_seam() {
        // Road heading -x, nearest point bearings either side of PI
        let p = pose(50.0, 0.0, PI, 0.0);
        let above = steering_toward(&tracking(49.0, -1e-6, Some(PI)), &p, BearingReference::Vehicle);
        let below = steering_toward(&tracking(49.0, 1e-6, Some(-PI)), &p, BearingReference::Vehicle);
        assert_approx_eq!(above, below, 1e-5);
        assert_approx_eq!(above, 0.0, 1e-5);
    }

    #[test]
    fn steering_is_bounded() {
        let mut rng = rand::rngs::StdRng::from_seed(*b"Flat whites come with no foam...");
        for _ in 0..200 {
            let result = tracking(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                Some(rng.gen_range(-3.2..3.2)),
            );
            let p = pose(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-10.0..10.0),
                0.0,
            );
            for reference in [BearingReference::WorldOrigin, BearingReference::Vehicle] {
                let steering = steering_toward(&result, &p, reference);
                assert!((-1.0..=1.0).contains(&steering));
            }
        }
    }

    #[test]
    fn degenerate_tangent_steers_straight() {
        let config = VehicleConfig::default();
        let command = compute_command(
            DriveMode::Autonomous,
            None,
            Some(&tracking(3.0, 4.0, None)),
            &pose(0.0, 0.0, 1.0, 0.0),
            &config,
        )
        .unwrap();
        assert_eq!(command.steering, 0.0);
        assert!(command.throttle.is_finite());
    }

    #[test]
    fn toggle() {
        assert_eq!(DriveMode::default(), DriveMode::Human);
        assert_eq!(DriveMode::Human.toggled(), DriveMode::Autonomous);
        assert_eq!(DriveMode::Autonomous.toggled(), DriveMode::Human);
    }
}
