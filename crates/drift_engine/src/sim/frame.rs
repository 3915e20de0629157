use tracing::info;

use super::camera::Camera;
use super::clock::Clock;
use super::diagnostics::DiagnosticsSink;
use super::handling::DynamicsPhase;
use super::input::{Channel, InputDurationTracker};
use super::math::Mat4;
use super::metrics::MetricsAccumulator;
use super::vehicle::Vehicle;

pub const MODEL_SLOT_FLOATS: usize = 16;
pub const MAX_MODEL_SLOTS: usize = 1024;
const PLAYER_SLOT: usize = 0;

#[derive(Debug, Clone, Copy)]
pub struct FrameSettings {
    pub max_frame_delta_ms: u64,
    pub metrics_interval_ms: u64,
    pub camera_follow: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: 250,
            metrics_interval_ms: 1000,
            camera_follow: false,
        }
    }
}

/// What the rendering collaborator consumes each frame.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub view: Mat4,
    /// `MAX_MODEL_SLOTS` column-major 4x4 matrices, back to back.
    pub model_transforms: Vec<f32>,
    pub slots_in_use: usize,
}

impl RenderPayload {
    fn new() -> Self {
        Self {
            view: Mat4::IDENTITY,
            model_transforms: vec![0.0; MODEL_SLOT_FLOATS * MAX_MODEL_SLOTS],
            slots_in_use: 0,
        }
    }

    fn write_slot(&mut self, slot: usize, model: &Mat4) {
        let start = slot * MODEL_SLOT_FLOATS;
        let Some(target) = self
            .model_transforms
            .get_mut(start..start + MODEL_SLOT_FLOATS)
        else {
            return;
        };
        target.copy_from_slice(model.as_slice());
        self.slots_in_use = self.slots_in_use.max(slot + 1);
    }

    pub fn model(&self, slot: usize) -> Option<Mat4> {
        if slot >= self.slots_in_use {
            return None;
        }
        let start = slot * MODEL_SLOT_FLOATS;
        Mat4::from_slice(self.model_transforms.get(start..start + MODEL_SLOT_FLOATS)?)
    }
}

/// Owns the per-frame sequence: time step, input, vehicle, camera, payload.
pub struct FrameOrchestrator<C> {
    clock: C,
    tracker: InputDurationTracker<C>,
    vehicle: Vehicle,
    camera: Camera,
    payload: RenderPayload,
    last_frame_end_ms: u64,
    max_frame_delta_ms: u64,
    metrics: MetricsAccumulator,
    diagnostics: Box<dyn DiagnosticsSink>,
    last_phase: DynamicsPhase,
}

impl<C: Clock + Clone> FrameOrchestrator<C> {
    pub fn new(
        clock: C,
        vehicle: Vehicle,
        settings: FrameSettings,
        diagnostics: Box<dyn DiagnosticsSink>,
    ) -> Self {
        let now_ms = clock.now_ms();
        let last_phase = vehicle.telemetry().phase;
        Self {
            tracker: InputDurationTracker::new(clock.clone()),
            clock,
            vehicle,
            camera: Camera::new(settings.camera_follow),
            payload: RenderPayload::new(),
            last_frame_end_ms: now_ms,
            max_frame_delta_ms: settings.max_frame_delta_ms.max(1),
            metrics: MetricsAccumulator::new(settings.metrics_interval_ms, now_ms),
            diagnostics,
            last_phase,
        }
    }

    pub fn press(&mut self, channel: Channel) {
        self.tracker.press(channel);
    }

    pub fn release(&mut self, channel: Channel) {
        self.tracker.release(channel);
    }

    /// Runs one frame and returns the payload to draw.
    pub fn tick(&mut self) -> &RenderPayload {
        let now_ms = self.clock.now_ms();
        let frame_dt_ms =
            clamp_frame_delta(now_ms.saturating_sub(self.last_frame_end_ms), self.max_frame_delta_ms);

        self.vehicle.update(&mut self.tracker, frame_dt_ms as f32);

        let model = self.vehicle.transform();
        self.payload.write_slot(PLAYER_SLOT, &model);
        self.camera.update(self.vehicle.state().position);
        self.payload.view = self.camera.view();

        self.report_vehicle();
        self.metrics.record_frame(frame_dt_ms);
        if let Some(snapshot) = self.metrics.maybe_snapshot(now_ms) {
            self.diagnostics
                .report("fps", format!("{:.1}", snapshot.fps));
            info!(
                fps = snapshot.fps,
                frame_time_ms = snapshot.frame_time_ms,
                "loop_metrics"
            );
        }

        self.last_frame_end_ms = self.clock.now_ms();
        &self.payload
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn payload(&self) -> &RenderPayload {
        &self.payload
    }

    pub fn is_down(&self, channel: Channel) -> bool {
        self.tracker.is_down(channel)
    }

    fn report_vehicle(&mut self) {
        let telemetry = self.vehicle.telemetry();
        let state = self.vehicle.state();
        if telemetry.phase != self.last_phase {
            info!(phase = ?telemetry.phase, "dynamics_phase_changed");
            self.last_phase = telemetry.phase;
        }
        let handbrake = match telemetry.phase {
            DynamicsPhase::Tractive => "off",
            DynamicsPhase::Sliding => "on",
        };
        self.diagnostics
            .report("speed", format!("{:.3}", telemetry.velocity.length()));
        self.diagnostics
            .report("heading", format!("{:.0}", state.heading.to_degrees()));
        self.diagnostics.report("handbrake", handbrake.to_string());
    }
}

fn clamp_frame_delta(frame_dt_ms: u64, max_frame_delta_ms: u64) -> u64 {
    frame_dt_ms.min(max_frame_delta_ms)
}

#[cfg(test)]
mod tests {
    use super::super::clock::ManualClock;
    use super::super::diagnostics::{DiagnosticsHandle, NullDiagnostics};
    use super::super::handling::{build_handling_model, HandlingConfig, HandlingModelKind};
    use super::super::math::Vec2;
    use super::super::vehicle::VehicleState;
    use super::*;

    fn orchestrator(
        settings: FrameSettings,
        diagnostics: Box<dyn DiagnosticsSink>,
    ) -> (ManualClock, FrameOrchestrator<ManualClock>) {
        let clock = ManualClock::starting_at(10_000);
        let vehicle = Vehicle::new(
            VehicleState::default(),
            build_handling_model(HandlingModelKind::Drift, HandlingConfig::default()),
        );
        let frames = FrameOrchestrator::new(clock.clone(), vehicle, settings, diagnostics);
        (clock, frames)
    }

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        assert_eq!(clamp_frame_delta(600, 250), 250);
        assert_eq!(clamp_frame_delta(16, 250), 16);
    }

    #[test]
    fn first_tick_without_elapsed_time_is_still() {
        let (_clock, mut frames) = orchestrator(FrameSettings::default(), Box::new(NullDiagnostics));
        let payload = frames.tick();

        assert_eq!(payload.slots_in_use, 1);
        assert_eq!(payload.model(0), Some(Mat4::IDENTITY));
        assert_eq!(payload.view, Mat4::IDENTITY);
    }

    #[test]
    fn held_forward_moves_vehicle_along_heading() {
        let (clock, mut frames) = orchestrator(FrameSettings::default(), Box::new(NullDiagnostics));
        frames.press(Channel::Forward);
        for _ in 0..30 {
            clock.advance(16);
            frames.tick();
        }
        frames.release(Channel::Forward);

        let position = frames.vehicle().state().position;
        assert!(position.y > 0.0);
        assert!(position.x.abs() < 1e-6);
        assert!(!frames.is_down(Channel::Forward));

        let model = frames.payload().model(0).expect("player slot");
        let origin = model.transform_point(Vec2::ZERO);
        assert!((origin.y - position.y).abs() < 1e-6);
    }

    #[test]
    fn stalled_frame_is_clamped() {
        let settings = FrameSettings {
            max_frame_delta_ms: 50,
            ..FrameSettings::default()
        };
        let (clock, mut clamped) = orchestrator(settings, Box::new(NullDiagnostics));
        let (unclamped_clock, mut unclamped) = orchestrator(
            FrameSettings {
                max_frame_delta_ms: 10_000,
                ..FrameSettings::default()
            },
            Box::new(NullDiagnostics),
        );

        // Rolling car, then a long idle stall: idle damping scales with dt.
        for (frames, clock) in [(&mut clamped, &clock), (&mut unclamped, &unclamped_clock)] {
            frames.press(Channel::Forward);
            clock.advance(16);
            frames.tick();
            frames.release(Channel::Forward);
            clock.advance(2000);
            frames.tick();
        }

        let clamped_speed = clamped.vehicle().telemetry().forward_speed;
        let unclamped_speed = unclamped.vehicle().telemetry().forward_speed;
        assert!(clamped_speed > unclamped_speed);
    }

    #[test]
    fn following_camera_tracks_vehicle() {
        let settings = FrameSettings {
            camera_follow: true,
            ..FrameSettings::default()
        };
        let (clock, mut frames) = orchestrator(settings, Box::new(NullDiagnostics));
        frames.press(Channel::Forward);
        clock.advance(100);
        frames.tick();

        let position = frames.vehicle().state().position;
        assert!(position.y > 0.0);
        assert_eq!(frames.camera().position(), position);
        let view = frames.payload().view;
        assert!(view.transform_point(position).length() < 1e-6);
    }

    #[test]
    fn diagnostics_receive_vehicle_and_fps_values() {
        let handle = DiagnosticsHandle::default();
        let (clock, mut frames) = orchestrator(FrameSettings::default(), Box::new(handle.clone()));
        frames.press(Channel::Handbrake);
        for _ in 0..70 {
            clock.advance(16);
            frames.tick();
        }

        assert_eq!(handle.get("handbrake").as_deref(), Some("on"));
        assert_eq!(handle.get("speed").as_deref(), Some("0.000"));
        assert!(handle.get("fps").is_some());
        assert!(handle.get("heading").is_some());
    }

    #[test]
    fn missing_diagnostics_sink_does_not_change_motion() {
        let (clock_a, mut silent) = orchestrator(FrameSettings::default(), Box::new(NullDiagnostics));
        let (clock_b, mut observed) =
            orchestrator(FrameSettings::default(), Box::new(DiagnosticsHandle::default()));
        for (frames, clock) in [(&mut silent, &clock_a), (&mut observed, &clock_b)] {
            frames.press(Channel::Forward);
            frames.press(Channel::Left);
            for _ in 0..40 {
                clock.advance(16);
                frames.tick();
            }
        }

        assert_eq!(silent.vehicle().state(), observed.vehicle().state());
    }

    #[test]
    fn payload_rejects_unused_slots() {
        let (_clock, mut frames) = orchestrator(FrameSettings::default(), Box::new(NullDiagnostics));
        frames.tick();

        assert!(frames.payload().model(1).is_none());
        assert_eq!(
            frames.payload().model_transforms.len(),
            MODEL_SLOT_FLOATS * MAX_MODEL_SLOTS
        );
    }
}
