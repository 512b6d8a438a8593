use curve_drive::math::{CatmullRomSpline3d, Point3d, Vector3d};
use curve_drive::{
    BearingReference, HumanInput, Pose, TelemetryWriter, VehicleConfig, VehicleController,
    WheelActuator, WheelCapabilities, WheelCommand,
};
use log::{info, LevelFilter};
use std::error::Error;

/// Simulation time step in s.
const DT: f64 = 0.02;

/// Number of ticks to simulate.
const NUM_TICKS: usize = 3000;

/// Speed below which the driver releases the brake, in m/s.
const STOPPED_SPEED: f64 = 0.05;

/// A wheel of the demo car.
#[derive(Default)]
struct Wheel {
    caps: WheelCapabilities,
    steer_angle: f64,
    motor_torque: f64,
    brake_torque: f64,
}

impl WheelActuator for Wheel {
    fn capabilities(&self) -> WheelCapabilities {
        self.caps
    }

    fn apply(&mut self, command: &WheelCommand) {
        if let Some(angle) = command.steer_angle {
            self.steer_angle = angle;
        }
        if let Some(torque) = command.motor_torque {
            self.motor_torque = torque;
        }
        self.brake_torque = command.brake_torque;
    }
}

/// A kinematic bicycle model standing in for the host's physics engine.
struct Car {
    position: Point3d,
    yaw: f64,
    speed: f64,
    wheels: [Wheel; 4],
}

impl Car {
    const MASS: f64 = 1200.0; // kg
    const WHEEL_RADIUS: f64 = 0.35; // m
    const WHEEL_BASE: f64 = 2.6; // m

    fn new(position: Point3d, yaw: f64) -> Self {
        let front = WheelCapabilities {
            steerable: true,
            motorized: false,
        };
        let rear = WheelCapabilities {
            steerable: false,
            motorized: true,
        };
        Self {
            position,
            yaw,
            speed: 0.0,
            wheels: [front, front, rear, rear].map(|caps| Wheel {
                caps,
                ..Default::default()
            }),
        }
    }

    fn pose(&self) -> Pose {
        let mut pose = Pose::new(self.position, self.yaw, Vector3d::new(0.0, 0.0, 0.0));
        pose.velocity = pose.forward() * self.speed;
        pose
    }

    fn step(&mut self, dt: f64) {
        let drive: f64 = self.wheels.iter().map(|w| w.motor_torque).sum();
        let brake: f64 = self.wheels.iter().map(|w| w.brake_torque).sum();
        let steer = self
            .wheels
            .iter()
            .filter(|w| w.caps.steerable)
            .map(|w| w.steer_angle.to_radians())
            .sum::<f64>()
            / 2.0;

        // Brakes can stop the car but never reverse it
        let mut speed = self.speed + dt * drive / (Self::MASS * Self::WHEEL_RADIUS);
        let brake_dv = dt * brake / (Self::MASS * Self::WHEEL_RADIUS);
        speed = if speed > 0.0 {
            f64::max(speed - brake_dv, 0.0)
        } else {
            f64::min(speed + brake_dv, 0.0)
        };

        // Positive steer angles turn towards decreasing yaw
        self.yaw -= speed * steer.tan() / Self::WHEEL_BASE * dt;
        self.position += self.pose().forward() * (0.5 * (self.speed + speed) * dt);
        self.speed = speed;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{:5}] {}", record.level(), message))
        })
        .level(LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()?;

    // An oval road loop
    let points = (0..12)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / 12.0;
            Point3d::new(60.0 * a.cos(), 0.0, 35.0 * a.sin())
        })
        .collect::<Vec<_>>();
    let road = CatmullRomSpline3d::new(&points, true)?;
    info!("Road length: {:.1} m", road.length());

    let config = VehicleConfig {
        bearing_reference: BearingReference::Vehicle,
        cruise_throttle: 0.3,
        ..Default::default()
    };
    let mut controller = VehicleController::new(config)?.with_curve(road);
    controller.toggle_mode();

    let mut car = Car::new(Point3d::new(58.0, 0.0, 0.0), std::f64::consts::FRAC_PI_2);
    let mut telemetry = TelemetryWriter::create("experiment_data.csv")?;

    let mut max_distance: f64 = 0.0;
    for tick in 0..NUM_TICKS {
        // Hand control back to the driver for the final stretch, who brakes to a stop
        if tick == NUM_TICKS * 9 / 10 {
            controller.toggle_mode();
        }
        let human = HumanInput {
            steering: 0.0,
            throttle: if car.speed > STOPPED_SPEED { -1.0 } else { 0.0 },
        };

        let output = controller.tick(&car.pose(), Some(human), &mut car.wheels)?;
        let record = output.telemetry(tick as f64 * DT);
        max_distance = max_distance.max(record.lateral_distance);
        telemetry.record(&record)?;

        car.step(DT);
    }
    telemetry.finish()?;

    info!(
        "Simulated {:.1} s, final speed {:.2} m/s, worst lateral distance {:.2} m",
        NUM_TICKS as f64 * DT,
        car.speed,
        max_distance,
    );
    Ok(())
}
