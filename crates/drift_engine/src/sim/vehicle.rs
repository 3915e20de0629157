use tracing::warn;

use super::handling::{HandlingModel, HandlingTelemetry, MotionDelta};
use super::input::DurationSource;
use super::math::{Mat4, Vec2};

/// Absolute placement of the vehicle in the world.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VehicleState {
    pub position: Vec2,
    pub heading: f32,
}

impl VehicleState {
    /// Integrates `delta`. Non-finite deltas are rejected and leave the state unchanged.
    pub fn apply(&mut self, delta: MotionDelta) -> bool {
        if !delta.is_finite() {
            return false;
        }
        self.position += delta.position;
        self.heading += delta.rotation;
        true
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position.x, self.position.y, 0.0)
            * Mat4::from_rotation_z(self.heading)
    }
}

pub struct Vehicle {
    state: VehicleState,
    handling: Box<dyn HandlingModel>,
}

impl Vehicle {
    pub fn new(spawn: VehicleState, handling: Box<dyn HandlingModel>) -> Self {
        Self {
            state: spawn,
            handling,
        }
    }

    pub fn update(&mut self, input: &mut dyn DurationSource, dt_ms: f32) -> MotionDelta {
        let delta = self.handling.update(input, dt_ms);
        if !self.state.apply(delta) {
            warn!(
                dx = delta.position.x,
                dy = delta.position.y,
                rotation = delta.rotation,
                "non_finite_motion_delta_skipped"
            );
        }
        delta
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    pub fn transform(&self) -> Mat4 {
        self.state.transform()
    }

    pub fn telemetry(&self) -> HandlingTelemetry {
        self.handling.telemetry()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::super::handling::{DriftHandling, HandlingConfig};
    use super::super::input::Channel;
    use super::*;

    struct FixedModel(MotionDelta);

    impl HandlingModel for FixedModel {
        fn update(&mut self, _input: &mut dyn DurationSource, _dt_ms: f32) -> MotionDelta {
            self.0
        }

        fn telemetry(&self) -> HandlingTelemetry {
            HandlingTelemetry::default()
        }
    }

    struct NoInput;

    impl DurationSource for NoInput {
        fn consume_pressed_duration(&mut self, _channel: Channel) -> u64 {
            0
        }
    }

    #[test]
    fn deltas_accumulate_into_position_and_heading() {
        let delta = MotionDelta {
            position: Vec2::new(0.5, -0.25),
            rotation: 0.1,
        };
        let mut vehicle = Vehicle::new(VehicleState::default(), Box::new(FixedModel(delta)));
        for _ in 0..4 {
            vehicle.update(&mut NoInput, 16.0);
        }

        let state = vehicle.state();
        assert!((state.position.x - 2.0).abs() < 1e-6);
        assert!((state.position.y + 1.0).abs() < 1e-6);
        assert!((state.heading - 0.4).abs() < 1e-6);
    }

    #[test]
    fn non_finite_delta_is_skipped() {
        let delta = MotionDelta {
            position: Vec2::new(f32::NAN, 0.0),
            rotation: 0.0,
        };
        let spawn = VehicleState {
            position: Vec2::new(1.0, 2.0),
            heading: 0.5,
        };
        let mut vehicle = Vehicle::new(spawn, Box::new(FixedModel(delta)));
        vehicle.update(&mut NoInput, 16.0);

        assert_eq!(vehicle.state(), spawn);
    }

    #[test]
    fn transform_translates_then_rotates() {
        let state = VehicleState {
            position: Vec2::new(3.0, 4.0),
            heading: FRAC_PI_2,
        };
        let nose = state.transform().transform_point(Vec2::new(0.0, 1.0));

        assert!((nose.x - 2.0).abs() < 1e-6);
        assert!((nose.y - 4.0).abs() < 1e-6);
    }

    #[test]
    fn idle_vehicle_stays_put() {
        let mut vehicle = Vehicle::new(
            VehicleState::default(),
            Box::new(DriftHandling::new(HandlingConfig::default())),
        );
        for _ in 0..10 {
            vehicle.update(&mut NoInput, 16.0);
        }

        assert_eq!(vehicle.state(), VehicleState::default());
        assert_eq!(vehicle.transform(), Mat4::IDENTITY);
    }
}
