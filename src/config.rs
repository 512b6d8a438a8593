//! Vehicle and controller configuration.

use crate::command::BearingReference;
use crate::error::ConfigError;
use crate::tracker::TrackerParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Proportional, integral and derivative gains.
///
/// These are carried in the configuration but not consumed by the control law.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 1.0,
            kd: 1.0,
        }
    }
}

/// The configuration of a controlled vehicle.
///
/// Every field is optional when deserialising; missing fields take their default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// The motor torque available at rest, in N m.
    pub motor_torque: f64,
    /// The brake torque applied at full reverse input, in N m.
    pub brake_torque: f64,
    /// The forward speed at which no motor torque remains, in m/s.
    pub max_speed: f64,
    /// The steering envelope at rest, in degrees.
    pub steering_range: f64,
    /// The steering envelope at `max_speed`, in degrees.
    pub steering_range_at_max_speed: f64,
    /// The vertical adjustment of the centre of mass, in m.
    pub centre_of_gravity_offset: f64,
    /// The constant throttle used in autonomous mode.
    pub cruise_throttle: f64,
    /// The reference the autonomous steering law measures the bearing of the nearest point from.
    pub bearing_reference: BearingReference,
    pub pid: PidGains,
    pub tracker: TrackerParams,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            motor_torque: 2000.0,
            brake_torque: 2000.0,
            max_speed: 20.0,
            steering_range: 30.0,
            steering_range_at_max_speed: 10.0,
            centre_of_gravity_offset: -1.0,
            cruise_throttle: 0.1,
            bearing_reference: BearingReference::default(),
            pid: PidGains::default(),
            tracker: TrackerParams::default(),
        }
    }
}

impl VehicleConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        };

        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return invalid("max_speed", "must be positive and finite");
        }
        if !(self.motor_torque.is_finite() && self.motor_torque >= 0.0) {
            return invalid("motor_torque", "must be non-negative and finite");
        }
        if !(self.brake_torque.is_finite() && self.brake_torque >= 0.0) {
            return invalid("brake_torque", "must be non-negative and finite");
        }
        if !self.steering_range.is_finite() {
            return invalid("steering_range", "must be finite");
        }
        if !self.steering_range_at_max_speed.is_finite() {
            return invalid("steering_range_at_max_speed", "must be finite");
        }
        if !self.centre_of_gravity_offset.is_finite() {
            return invalid("centre_of_gravity_offset", "must be finite");
        }
        if !(-1.0..=1.0).contains(&self.cruise_throttle) {
            return invalid("cruise_throttle", "must lie within [-1, 1]");
        }
        self.tracker.validate()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = VehicleConfig::default();
        assert_eq!(config.motor_torque, 2000.0);
        assert_eq!(config.brake_torque, 2000.0);
        assert_eq!(config.max_speed, 20.0);
        assert_eq!(config.steering_range, 30.0);
        assert_eq!(config.steering_range_at_max_speed, 10.0);
        assert_eq!(config.centre_of_gravity_offset, -1.0);
        assert_eq!(config.cruise_throttle, 0.1);
        assert_eq!(config.bearing_reference, BearingReference::WorldOrigin);
        assert_eq!(config.pid, PidGains { kp: 1.0, ki: 1.0, kd: 1.0 });
        assert_eq!(config.tracker.coarse_samples, 64);
        assert_eq!(config.tracker.coarse_iterations, 16);
        assert_eq!(config.tracker.epsilon, 1e-4);
        assert_eq!(config.tracker.refine_samples, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json() {
        let config = VehicleConfig::from_json_str(
            r#"{
                "max_speed": 35.0,
                "bearing_reference": "vehicle",
                "pid": { "kp": 0.5 },
                "tracker": { "refine_samples": 50 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_speed, 35.0);
        assert_eq!(config.motor_torque, 2000.0);
        assert_eq!(config.bearing_reference, BearingReference::Vehicle);
        assert_eq!(config.pid.kp, 0.5);
        assert_eq!(config.pid.kd, 1.0);
        assert_eq!(config.tracker.refine_samples, 50);
        assert_eq!(config.tracker.coarse_samples, 64);
    }

    #[test]
    fn rejects_invalid() {
        assert!(matches!(
            VehicleConfig::from_json_str(r#"{ "max_speed": 0.0 }"#),
            Err(ConfigError::Invalid { field: "max_speed", .. })
        ));
        assert!(matches!(
            VehicleConfig::from_json_str(r#"{ "brake_torque": -1.0 }"#),
            Err(ConfigError::Invalid { field: "brake_torque", .. })
        ));
        assert!(matches!(
            VehicleConfig::from_json_str(r#"{ "cruise_throttle": 1.5 }"#),
            Err(ConfigError::Invalid { field: "cruise_throttle", .. })
        ));
        assert!(matches!(
            VehicleConfig::from_json_str(r#"{ "tracker": { "coarse_samples": 0 } }"#),
            Err(ConfigError::Invalid { field: "tracker.coarse_samples", .. })
        ));
        assert!(matches!(
            VehicleConfig::from_json_str(r#"{ "max_speed": "fast" }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            VehicleConfig::load("/nonexistent/vehicle.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
