//! Error types.

use thiserror::Error;

/// An error that occurs while loading or validating a [crate::VehicleConfig].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot load the configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse the configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// An error that occurs while constructing a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("A curve needs at least one control point")]
    NoPoints,
}

/// An error that prevents a drive command from being produced.
///
/// The controller refuses to actuate rather than emit a stale command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Autonomous mode requires a curve to be assigned")]
    MissingCurve,

    #[error("Autonomous mode requires a tracking result")]
    MissingTracking,

    #[error("Human mode requires human input")]
    MissingHumanInput,

    #[error("The vehicle pose is not finite")]
    InvalidPose,
}

/// An error that occurs while writing telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Cannot write the telemetry file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot serialise a telemetry record: {0}")]
    Csv(#[from] csv::Error),

    #[error("The telemetry writer has already been closed")]
    Closed,
}
