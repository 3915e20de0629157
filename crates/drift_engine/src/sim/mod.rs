mod camera;
mod clock;
mod diagnostics;
mod frame;
mod handling;
mod input;
mod math;
mod metrics;
mod vehicle;

pub use camera::Camera;
pub use clock::{Clock, ManualClock, SystemClock};
pub use diagnostics::{DiagnosticsHandle, DiagnosticsSink, NullDiagnostics};
pub use frame::{FrameOrchestrator, FrameSettings, RenderPayload, MAX_MODEL_SLOTS, MODEL_SLOT_FLOATS};
pub use handling::{
    build_handling_model, ChannelDurations, DriftHandling, DynamicsPhase, GripHandling,
    HandlingConfig, HandlingConfigError, HandlingModel, HandlingModelKind, HandlingTelemetry,
    MotionDelta,
};
pub use input::{Channel, DurationSource, InputDurationTracker};
pub use math::{Mat4, Vec2};
pub use metrics::LoopMetricsSnapshot;
pub use vehicle::{Vehicle, VehicleState};
