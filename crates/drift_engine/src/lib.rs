pub mod app;
pub mod sim;

pub use app::{
    channel_for_key, clip_to_screen, run_app, run_app_with_diagnostics, AppError, LoopConfig,
    Renderer, Viewport, QUIT_KEY,
};
pub use sim::{
    build_handling_model, Camera, Channel, ChannelDurations, Clock, DiagnosticsHandle,
    DiagnosticsSink, DriftHandling, DurationSource, DynamicsPhase, FrameOrchestrator,
    FrameSettings, GripHandling, HandlingConfig, HandlingConfigError, HandlingModel,
    HandlingModelKind, HandlingTelemetry, InputDurationTracker, LoopMetricsSnapshot, ManualClock,
    Mat4, MotionDelta, NullDiagnostics, RenderPayload, SystemClock, Vec2, Vehicle, VehicleState,
    MAX_MODEL_SLOTS, MODEL_SLOT_FLOATS,
};
