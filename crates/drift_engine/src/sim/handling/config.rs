use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning constants for the handling models.
///
/// Rates are expressed per millisecond of held input; the resulting
/// velocity is already in world units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlingConfig {
    pub accel_rate: f32,
    pub decel_rate: f32,
    pub idle_damping_divisor: f32,
    /// Lateral grip while no throttle or brake is held. Smaller grips harder.
    pub lateral_grip_divisor_coasting: f32,
    pub lateral_grip_divisor_powered: f32,
    pub slide_decay_divisor: f32,
    pub rot_accel_rate: f32,
    pub rot_decel_rate: f32,
    pub max_rotation_rate: f32,
    pub throttle_steer_boost: f32,
    /// Rotation-rate multiplier applied once when the handbrake engages.
    pub drift_kick: f32,
}

impl Default for HandlingConfig {
    fn default() -> Self {
        let accel_rate = 1.0 / 20.0;
        Self {
            accel_rate,
            decel_rate: accel_rate * 2.0,
            idle_damping_divisor: 10_000.0,
            lateral_grip_divisor_coasting: 30.0,
            lateral_grip_divisor_powered: 240.0,
            slide_decay_divisor: 5_000.0,
            rot_accel_rate: 1.0 / 20.0,
            rot_decel_rate: 0.02,
            max_rotation_rate: 0.1,
            throttle_steer_boost: 1.5,
            drift_kick: 1.5,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum HandlingConfigError {
    #[error("handling constant {field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("handling constant {field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

impl HandlingConfig {
    pub fn validate(&self) -> Result<(), HandlingConfigError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(HandlingConfigError::NonFinite { field, value });
            }
            if value <= 0.0 {
                return Err(HandlingConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }

    fn fields(&self) -> [(&'static str, f32); 11] {
        [
            ("accel_rate", self.accel_rate),
            ("decel_rate", self.decel_rate),
            ("idle_damping_divisor", self.idle_damping_divisor),
            (
                "lateral_grip_divisor_coasting",
                self.lateral_grip_divisor_coasting,
            ),
            (
                "lateral_grip_divisor_powered",
                self.lateral_grip_divisor_powered,
            ),
            ("slide_decay_divisor", self.slide_decay_divisor),
            ("rot_accel_rate", self.rot_accel_rate),
            ("rot_decel_rate", self.rot_decel_rate),
            ("max_rotation_rate", self.max_rotation_rate),
            ("throttle_steer_boost", self.throttle_steer_boost),
            ("drift_kick", self.drift_kick),
        ]
    }
}
