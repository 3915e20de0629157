use tracing::debug;

use super::{
    ChannelDurations, DurationSource, DynamicsPhase, HandlingConfig, HandlingModel,
    HandlingTelemetry, Kinematics, MotionDelta, Throttle,
};

const ROTATION_CAP_SCALE: f32 = 5.0;

/// Handbrake-capable handling: grips while tractive, slides on momentum
/// while the handbrake is held.
#[derive(Debug, Clone)]
pub struct DriftHandling {
    config: HandlingConfig,
    kinematics: Kinematics,
    rotation_rate: f32,
    phase: DynamicsPhase,
}

impl DriftHandling {
    pub fn new(config: HandlingConfig) -> Self {
        Self {
            config,
            kinematics: Kinematics::default(),
            rotation_rate: 0.0,
            phase: DynamicsPhase::Tractive,
        }
    }

    pub fn phase(&self) -> DynamicsPhase {
        self.phase
    }

    pub fn rotation_rate(&self) -> f32 {
        self.rotation_rate
    }

    /// Upper bound on `|rotation_rate|` for the current velocity.
    pub fn rotation_cap(&self, throttling_forward: bool) -> f32 {
        let boost = if throttling_forward {
            self.config.throttle_steer_boost
        } else {
            1.0
        };
        self.config.max_rotation_rate
            * self.kinematics.velocity.length()
            * boost
            * ROTATION_CAP_SCALE
    }

    fn transition(&mut self, handbrake_ms: u64) {
        let next = if handbrake_ms > 0 {
            DynamicsPhase::Sliding
        } else {
            DynamicsPhase::Tractive
        };
        if self.phase == DynamicsPhase::Tractive && next == DynamicsPhase::Sliding {
            self.rotation_rate *= self.config.drift_kick;
            debug!(rotation_rate = self.rotation_rate, "handbrake_engaged");
        } else if self.phase == DynamicsPhase::Sliding && next == DynamicsPhase::Tractive {
            debug!("handbrake_released");
        }
        self.phase = next;
    }

    fn apply_traction(&mut self, throttle: Throttle, dt_ms: f32) {
        let damped = self.kinematics.idle_damped(throttle, dt_ms, &self.config);
        self.kinematics.apply_thrust(damped);

        let grip_divisor = if throttle.is_idle() {
            self.config.lateral_grip_divisor_coasting
        } else {
            self.config.lateral_grip_divisor_powered
        };
        self.kinematics
            .apply_lateral_friction(dt_ms * self.config.decel_rate / grip_divisor);
    }

    fn apply_slide_decay(&mut self, dt_ms: f32) {
        let velocity = self.kinematics.velocity;
        let speed = velocity.length();
        if speed <= f32::EPSILON {
            return;
        }
        let decay = (dt_ms * self.config.decel_rate / self.config.slide_decay_divisor).min(speed);
        self.kinematics.velocity -= velocity * (decay / speed);
    }

    fn apply_rotation(&mut self, durations: &ChannelDurations, throttle: Throttle, dt_ms: f32) {
        self.rotation_rate += durations.steering_ms() * self.config.rot_accel_rate / 1000.0;

        let cap = self.rotation_cap(throttle.is_forward());
        self.rotation_rate = self.rotation_rate.clamp(-cap, cap);

        let friction = self
            .rotation_rate
            .abs()
            .min(dt_ms * self.config.rot_decel_rate / 1000.0);
        self.rotation_rate -= friction * self.rotation_rate.signum();

        self.kinematics.heading += self.rotation_rate;
    }
}

impl HandlingModel for DriftHandling {
    fn update(&mut self, input: &mut dyn DurationSource, dt_ms: f32) -> MotionDelta {
        let durations = ChannelDurations::consume_from(input);
        if dt_ms <= 0.0 {
            return MotionDelta::ZERO;
        }

        self.transition(durations.handbrake_ms);

        let throttle = Throttle::from_durations(&durations, &self.config);
        match self.phase {
            DynamicsPhase::Tractive => self.apply_traction(throttle, dt_ms),
            DynamicsPhase::Sliding => self.apply_slide_decay(dt_ms),
        }
        self.apply_rotation(&durations, throttle, dt_ms);

        MotionDelta {
            position: self.kinematics.velocity,
            rotation: self.rotation_rate,
        }
    }

    fn telemetry(&self) -> HandlingTelemetry {
        self.kinematics.telemetry(self.rotation_rate, self.phase)
    }
}
