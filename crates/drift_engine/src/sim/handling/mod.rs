mod config;
mod drift;
mod grip;

use serde::{Deserialize, Serialize};

use super::input::{Channel, DurationSource};
use super::math::Vec2;

pub use config::{HandlingConfig, HandlingConfigError};
pub use drift::DriftHandling;
pub use grip::GripHandling;

/// Per-tick output of a handling model: world-space displacement and yaw change.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionDelta {
    pub position: Vec2,
    pub rotation: f32,
}

impl MotionDelta {
    pub const ZERO: MotionDelta = MotionDelta {
        position: Vec2::ZERO,
        rotation: 0.0,
    };

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DynamicsPhase {
    #[default]
    Tractive,
    Sliding,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandlingTelemetry {
    pub velocity: Vec2,
    pub forward_speed: f32,
    pub rotation_rate: f32,
    pub phase: DynamicsPhase,
}

pub trait HandlingModel {
    /// Advances the model by `dt_ms`, pulling held durations from `input`.
    fn update(&mut self, input: &mut dyn DurationSource, dt_ms: f32) -> MotionDelta;

    fn telemetry(&self) -> HandlingTelemetry;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingModelKind {
    #[default]
    Drift,
    Grip,
}

pub fn build_handling_model(
    kind: HandlingModelKind,
    config: HandlingConfig,
) -> Box<dyn HandlingModel> {
    match kind {
        HandlingModelKind::Drift => Box::new(DriftHandling::new(config)),
        HandlingModelKind::Grip => Box::new(GripHandling::new(config)),
    }
}

/// Milliseconds each channel was held since the previous tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelDurations {
    pub forward_ms: u64,
    pub backward_ms: u64,
    pub left_ms: u64,
    pub right_ms: u64,
    pub handbrake_ms: u64,
}

impl ChannelDurations {
    pub fn consume_from(source: &mut dyn DurationSource) -> Self {
        Self {
            forward_ms: source.consume_pressed_duration(Channel::Forward),
            backward_ms: source.consume_pressed_duration(Channel::Backward),
            left_ms: source.consume_pressed_duration(Channel::Left),
            right_ms: source.consume_pressed_duration(Channel::Right),
            handbrake_ms: source.consume_pressed_duration(Channel::Handbrake),
        }
    }

    fn steering_ms(&self) -> f32 {
        self.left_ms as f32 - self.right_ms as f32
    }
}

/// Throttle and brake impulses derived from held durations.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Throttle {
    accel: f32,
    decel: f32,
}

impl Throttle {
    fn from_durations(durations: &ChannelDurations, config: &HandlingConfig) -> Self {
        Self {
            accel: durations.forward_ms as f32 * config.accel_rate / 1000.0,
            decel: durations.backward_ms as f32 * config.decel_rate / 1000.0,
        }
    }

    fn is_idle(&self) -> bool {
        self.accel == 0.0 && self.decel == 0.0
    }

    fn is_forward(&self) -> bool {
        self.accel > 0.0 && self.accel > self.decel
    }
}

/// Velocity and heading shared by both handling models.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Kinematics {
    velocity: Vec2,
    heading: f32,
}

impl Kinematics {
    fn forward_speed(&self) -> f32 {
        self.velocity.project_onto(Vec2::forward_axis(self.heading))
    }

    fn lateral_speed(&self) -> f32 {
        self.velocity.project_onto(Vec2::right_axis(self.heading))
    }

    /// Without throttle input, brakes a rolling car toward rest without
    /// letting it cross zero.
    fn idle_damped(&self, throttle: Throttle, dt_ms: f32, config: &HandlingConfig) -> Throttle {
        if !throttle.is_idle() {
            return throttle;
        }
        let forward_speed = self.forward_speed();
        if forward_speed > 0.0 {
            Throttle {
                accel: 0.0,
                decel: (dt_ms * config.decel_rate / config.idle_damping_divisor)
                    .min(forward_speed),
            }
        } else {
            Throttle {
                accel: (dt_ms * config.accel_rate / config.idle_damping_divisor)
                    .min(-forward_speed),
                decel: 0.0,
            }
        }
    }

    /// Net throttle along the heading. Braking past rest keeps pushing, so a
    /// stopped car reverses instead of creeping forward.
    fn apply_thrust(&mut self, throttle: Throttle) {
        self.velocity += Vec2::forward_axis(self.heading) * (throttle.accel - throttle.decel);
    }

    /// Removes up to `max_correction` of sideways velocity.
    fn apply_lateral_friction(&mut self, max_correction: f32) {
        let lateral_speed = self.lateral_speed();
        let correction = lateral_speed.abs().min(max_correction);
        self.velocity -= Vec2::right_axis(self.heading) * (correction * lateral_speed.signum());
    }

    fn telemetry(&self, rotation_rate: f32, phase: DynamicsPhase) -> HandlingTelemetry {
        HandlingTelemetry {
            velocity: self.velocity,
            forward_speed: self.forward_speed(),
            rotation_rate,
            phase,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;

    use super::*;

    /// Feeds pre-recorded per-tick durations to a handling model.
    ///
    /// A tick's durations are served until every channel has been polled
    /// once, in any order; the next poll then starts the following tick.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedInput {
        ticks: VecDeque<ChannelDurations>,
        current: ChannelDurations,
        polled: [bool; Channel::ALL.len()],
    }

    impl ScriptedInput {
        pub(crate) fn next_tick(&mut self, durations: ChannelDurations) {
            self.ticks.push_back(durations);
        }

        /// Swaps in the next scripted tick.
        fn begin_tick(&mut self) {
            self.current = self.ticks.pop_front().unwrap_or_default();
            self.polled = Default::default();
        }
    }

    pub(crate) fn held(forward_ms: u64, left_ms: u64, handbrake_ms: u64) -> ChannelDurations {
        ChannelDurations {
            forward_ms,
            left_ms,
            handbrake_ms,
            ..ChannelDurations::default()
        }
    }

    pub(crate) fn reversing(backward_ms: u64) -> ChannelDurations {
        ChannelDurations {
            backward_ms,
            ..ChannelDurations::default()
        }
    }

    impl DurationSource for ScriptedInput {
        fn consume_pressed_duration(&mut self, channel: Channel) -> u64 {
            let slot = Channel::ALL
                .iter()
                .position(|candidate| *candidate == channel)
                .unwrap_or_default();
            if self.polled.iter().all(|seen| !seen) || self.polled[slot] {
                self.begin_tick();
            }
            self.polled[slot] = true;
            if self.polled.iter().all(|seen| *seen) {
                self.polled = Default::default();
            }
            match channel {
                Channel::Forward => self.current.forward_ms,
                Channel::Backward => self.current.backward_ms,
                Channel::Left => self.current.left_ms,
                Channel::Right => self.current.right_ms,
                Channel::Handbrake => self.current.handbrake_ms,
            }
        }
    }

    pub(crate) fn run_ticks(
        model: &mut dyn HandlingModel,
        input: &mut ScriptedInput,
        durations: ChannelDurations,
        dt_ms: f32,
        count: usize,
    ) -> MotionDelta {
        let mut last = MotionDelta::ZERO;
        for _ in 0..count {
            input.next_tick(durations);
            last = model.update(input, dt_ms);
        }
        last
    }
}
