//! Turning drive commands into per-wheel actuator commands.

use crate::command::DriveCommand;
use crate::config::VehicleConfig;
use crate::math::clamp01;
use crate::util::Interval;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Forward speeds below this are treated as stationary, in m/s.
const STOPPED_SPEED: f64 = 0.01; // m/s

/// Per-wheel commands for a typical vehicle fit without allocating.
pub type WheelCommands = SmallVec<[WheelCommand; 4]>;

/// The torque and steering authority available at the current speed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Attenuation {
    /// How close the vehicle is to its top speed, from zero to one.
    pub speed_factor: f64,
    /// The motor torque available at full throttle, in N m.
    pub motor_torque: f64,
    /// The steering envelope at full lock, in degrees.
    pub steer_range: f64,
}

/// What a wheel is able to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelCapabilities {
    pub steerable: bool,
    pub motorized: bool,
}

/// A command for a single wheel.
///
/// `None` leaves the wheel's current value in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct WheelCommand {
    /// The steer angle in degrees.
    pub steer_angle: Option<f64>,
    /// The motor torque in N m.
    pub motor_torque: Option<f64>,
    /// The brake torque in N m.
    pub brake_torque: f64,
}

/// A wheel owned by the host's physics engine.
pub trait WheelActuator {
    /// What the wheel is able to do.
    fn capabilities(&self) -> WheelCapabilities;

    /// Applies a command to the wheel.
    fn apply(&mut self, command: &WheelCommand);
}

/// Computes the torque and steering available at `forward_speed`.
///
/// Motor torque falls linearly to zero at the configured top speed, and the
/// steering range narrows linearly to its top speed value.
pub fn attenuate(forward_speed: f64, config: &VehicleConfig) -> Attenuation {
    let speed_factor = clamp01(Interval::new(0.0, config.max_speed).inv_lerp(forward_speed));
    Attenuation {
        speed_factor,
        motor_torque: Interval::new(config.motor_torque, 0.0).lerp(speed_factor),
        steer_range: Interval::new(config.steering_range, config.steering_range_at_max_speed)
            .lerp(speed_factor),
    }
}

/// Whether a throttle demand drives the vehicle rather than braking it.
///
/// This is the case when the demand agrees with the direction of travel,
/// when there is no demand, or when the vehicle is stationary.
pub fn is_accelerating(throttle: f64, forward_speed: f64) -> bool {
    throttle == 0.0
        || forward_speed.abs() < STOPPED_SPEED
        || throttle.signum() == forward_speed.signum()
}

/// Computes the command for each wheel.
///
/// # Parameters
/// * `command` - The normalised drive command
/// * `forward_speed` - The vehicle's speed along its heading, in m/s
/// * `attenuation` - The authority available at `forward_speed`, from [attenuate]
/// * `wheels` - The capabilities of each wheel, in order
/// * `config` - The vehicle configuration
///
/// Steerable wheels are steered within the attenuated steering range. When
/// accelerating, motorized wheels are driven and no wheel brakes; otherwise
/// every wheel's motor is cut and every wheel brakes in proportion to the throttle.
pub fn wheel_commands(
    command: &DriveCommand,
    forward_speed: f64,
    attenuation: &Attenuation,
    wheels: &[WheelCapabilities],
    config: &VehicleConfig,
) -> WheelCommands {
    let accelerating = is_accelerating(command.throttle, forward_speed);

    wheels
        .iter()
        .map(|wheel| {
            let steer_angle = wheel
                .steerable
                .then(|| command.steering * attenuation.steer_range);
            if accelerating {
                WheelCommand {
                    steer_angle,
                    motor_torque: wheel
                        .motorized
                        .then(|| command.throttle * attenuation.motor_torque),
                    brake_torque: 0.0,
                }
            } else {
                WheelCommand {
                    steer_angle,
                    motor_torque: Some(0.0),
                    brake_torque: command.throttle.abs() * config.brake_torque,
                }
            }
        })
        .collect()
}

/// Applies commands to the host's wheels, pairing them in order.
pub fn apply_to_wheels<W: WheelActuator>(commands: &[WheelCommand], wheels: &mut [W]) {
    for (wheel, command) in wheels.iter_mut().zip(commands) {
        wheel.apply(command);
    }
}
