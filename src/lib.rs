//! A path-tracking vehicle controller.
//!
//! Each simulation tick, a [VehicleController] takes either human input or
//! steers towards the nearest point on a road curve, then converts the result
//! into steer, motor and brake commands for each of the vehicle's wheels.
//! The host engine supplies the curve, the vehicle's pose and its wheels.

pub use actuation::{
    apply_to_wheels, attenuate, is_accelerating, wheel_commands, Attenuation, WheelActuator,
    WheelCapabilities, WheelCommand, WheelCommands,
};
pub use cgmath;
pub use command::{compute_command, steering_toward, BearingReference, DriveCommand, DriveMode, HumanInput};
pub use config::{PidGains, VehicleConfig};
pub use controller::{TickOutput, VehicleController};
pub use error::{ConfigError, ControlError, CurveError, TelemetryError};
pub use pose::Pose;
pub use telemetry::{TelemetryRecord, TelemetryWriter};
pub use tracker::{coarse_nearest, locate, refine_nearest, TrackerParams, TrackingResult};
pub use util::Interval;

mod actuation;
mod command;
mod config;
mod controller;
mod debug;
mod error;
pub mod math;
mod pose;
mod telemetry;
mod tracker;
mod util;
