use super::{
    ChannelDurations, DurationSource, DynamicsPhase, HandlingConfig, HandlingModel,
    HandlingTelemetry, Kinematics, MotionDelta, Throttle,
};

const LATERAL_FRICTION_SCALE: f32 = 300.0;
const POWERED_GRIP_DIVISOR: f32 = 8.0;
const STEERING_SPEED_SCALE: f32 = 4.0;
const MIN_STEERING_SPEED: f32 = 0.02;

/// Handling without a handbrake. Steering turns the heading directly and
/// gets lighter as the car speeds up.
#[derive(Debug, Clone)]
pub struct GripHandling {
    config: HandlingConfig,
    kinematics: Kinematics,
}

impl GripHandling {
    pub fn new(config: HandlingConfig) -> Self {
        Self {
            config,
            kinematics: Kinematics::default(),
        }
    }
}

impl HandlingModel for GripHandling {
    fn update(&mut self, input: &mut dyn DurationSource, dt_ms: f32) -> MotionDelta {
        let durations = ChannelDurations::consume_from(input);
        if dt_ms <= 0.0 {
            return MotionDelta::ZERO;
        }

        let throttle = Throttle::from_durations(&durations, &self.config);
        let damped = self.kinematics.idle_damped(throttle, dt_ms, &self.config);
        self.kinematics.apply_thrust(damped);

        let grip_divisor = if damped.accel + damped.decel > 0.0 {
            POWERED_GRIP_DIVISOR
        } else {
            1.0
        };
        self.kinematics.apply_lateral_friction(
            dt_ms * self.config.decel_rate / grip_divisor / LATERAL_FRICTION_SCALE,
        );

        let steering_speed =
            (self.kinematics.velocity.length() / STEERING_SPEED_SCALE).max(MIN_STEERING_SPEED);
        let rotation =
            durations.steering_ms() * self.config.rot_accel_rate / steering_speed / 1000.0;
        self.kinematics.heading += rotation;

        MotionDelta {
            position: self.kinematics.velocity,
            rotation,
        }
    }

    fn telemetry(&self) -> HandlingTelemetry {
        self.kinematics.telemetry(0.0, DynamicsPhase::Tractive)
    }
}
