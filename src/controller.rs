use crate::actuation::{
    apply_to_wheels, attenuate, wheel_commands, Attenuation, WheelActuator, WheelCapabilities,
    WheelCommands,
};
use crate::command::{compute_command, DriveCommand, DriveMode, HumanInput};
use crate::config::VehicleConfig;
#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::debug::debug_line;
use crate::error::{ConfigError, ControlError};
use crate::math::{ParametricCurve3d, Vector3d};
use crate::pose::Pose;
use crate::telemetry::TelemetryRecord;
use crate::tracker::{locate, TrackingResult};
use log::{debug, info};
use smallvec::SmallVec;

/// Drives a vehicle from human input or along a road curve.
///
/// The controller holds no per-tick state. The host supplies the pose and the
/// wheels on every call to [VehicleController::tick].
pub struct VehicleController {
    /// The vehicle configuration.
    config: VehicleConfig,
    /// Who is currently driving.
    mode: DriveMode,
    /// The road curve followed in autonomous mode.
    curve: Option<Box<dyn ParametricCurve3d>>,
}

/// The outcome of a single tick.
#[derive(Clone, Debug)]
pub struct TickOutput {
    /// The mode the tick was computed in.
    pub mode: DriveMode,
    /// The normalised drive command.
    pub command: DriveCommand,
    /// Where the vehicle is relative to the curve, in autonomous mode.
    pub tracking: Option<TrackingResult>,
    /// The torque and steering available at the current speed.
    pub attenuation: Attenuation,
    /// The commands applied to each wheel, in order.
    pub wheels: WheelCommands,
    /// Debugging information gathered during the tick, as a JSON array.
    #[cfg(feature = "debug")]
    pub debug: serde_json::Value,
}

impl TickOutput {
    /// The telemetry record for this tick.
    pub fn telemetry(&self, time: f64) -> TelemetryRecord {
        TelemetryRecord {
            time,
            steering: self.command.steering,
            throttle: self.command.throttle,
            lateral_distance: self.tracking.map_or(0.0, |t| t.lateral_distance),
            crash: None,
        }
    }
}

impl VehicleController {
    /// Creates a new controller in human mode with no curve assigned.
    pub fn new(config: VehicleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "Vehicle controller initialised (max speed {} m/s, tracker {}x{} coarse, {} x {} refine)",
            config.max_speed,
            config.tracker.coarse_samples,
            config.tracker.coarse_iterations,
            config.tracker.refine_samples,
            config.tracker.epsilon,
        );
        Ok(Self {
            config,
            mode: DriveMode::default(),
            curve: None,
        })
    }

    /// Assigns the curve to follow in autonomous mode.
    pub fn with_curve(mut self, curve: impl ParametricCurve3d + 'static) -> Self {
        self.set_curve(curve);
        self
    }

    /// Assigns the curve to follow in autonomous mode.
    pub fn set_curve(&mut self, curve: impl ParametricCurve3d + 'static) {
        self.curve = Some(Box::new(curve));
    }

    /// Removes the assigned curve.
    pub fn clear_curve(&mut self) {
        self.curve = None;
    }

    /// Whether a curve is assigned.
    pub fn has_curve(&self) -> bool {
        self.curve.is_some()
    }

    /// Who is currently driving.
    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Sets who is driving, from the next tick.
    pub fn set_mode(&mut self, mode: DriveMode) {
        if mode != self.mode {
            info!("Drive mode changed from {:?} to {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Switches between human and autonomous driving, from the next tick.
    pub fn toggle_mode(&mut self) -> DriveMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// The displacement the host should apply to the vehicle's centre of mass at setup.
    pub fn centre_of_mass_offset(&self) -> Vector3d {
        Vector3d::unit_y() * self.config.centre_of_gravity_offset
    }

    /// Runs the controller for one tick and applies the result to `wheels`.
    ///
    /// # Parameters
    /// * `pose` - The vehicle's current pose
    /// * `human` - The human driver's input, required in human mode
    /// * `wheels` - The vehicle's wheels
    ///
    /// No wheel is touched if a command cannot be produced.
    pub fn tick<W: WheelActuator>(
        &self,
        pose: &Pose,
        human: Option<HumanInput>,
        wheels: &mut [W],
    ) -> Result<TickOutput, ControlError> {
        if !pose.is_finite() {
            return Err(ControlError::InvalidPose);
        }

        let tracking = match self.mode {
            DriveMode::Human => None,
            DriveMode::Autonomous => {
                let curve = self.curve.as_deref().ok_or(ControlError::MissingCurve)?;
                let result = locate(curve, pose.position, &self.config.tracker);
                debug!(
                    "Tracking t = {:.5}, lateral distance = {:.3}, tangent angle = {:?}",
                    result.t, result.lateral_distance, result.tangent_angle
                );
                debug_line("tracking", pose.position, result.nearest_point);
                Some(result)
            }
        };

        let command = compute_command(self.mode, human, tracking.as_ref(), pose, &self.config)?;

        let forward_speed = pose.forward_speed();
        let caps = wheels
            .iter()
            .map(|wheel| wheel.capabilities())
            .collect::<SmallVec<[WheelCapabilities; 4]>>();
        let attenuation = attenuate(forward_speed, &self.config);
        let commands = wheel_commands(&command, forward_speed, &attenuation, &caps, &self.config);
        apply_to_wheels(&commands, wheels);

        Ok(TickOutput {
            mode: self.mode,
            command,
            tracking,
            attenuation,
            wheels: commands,
            #[cfg(feature = "debug")]
            debug: take_debug_frame(),
        })
    }
}
