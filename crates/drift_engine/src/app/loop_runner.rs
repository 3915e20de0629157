use std::sync::Arc;

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::WindowBuilder;

use crate::sim::{
    build_handling_model, Channel, DiagnosticsHandle, FrameOrchestrator, FrameSettings,
    HandlingConfig, HandlingConfigError, HandlingModelKind, SystemClock, Vehicle, VehicleState,
};

use super::bindings::{channel_for_key, QUIT_KEY};
use super::Renderer;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub max_frame_delta_ms: u64,
    pub metrics_log_interval_ms: u64,
    pub camera_follow: bool,
    pub handling_kind: HandlingModelKind,
    pub handling: HandlingConfig,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Drift".to_string(),
            window_width: 800,
            window_height: 800,
            max_frame_delta_ms: 250,
            metrics_log_interval_ms: 1000,
            camera_follow: false,
            handling_kind: HandlingModelKind::default(),
            handling: HandlingConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid handling configuration: {0}")]
    InvalidHandling(#[from] HandlingConfigError),
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

pub fn run_app(config: LoopConfig) -> Result<(), AppError> {
    run_app_with_diagnostics(config, DiagnosticsHandle::default())
}

pub fn run_app_with_diagnostics(
    config: LoopConfig,
    diagnostics: DiagnosticsHandle,
) -> Result<(), AppError> {
    config.handling.validate()?;
    info!(
        handling_kind = ?config.handling_kind,
        window_width = config.window_width,
        window_height = config.window_height,
        "startup"
    );

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let settings = FrameSettings {
        max_frame_delta_ms: normalize_non_zero_ms(config.max_frame_delta_ms, 250),
        metrics_interval_ms: normalize_non_zero_ms(config.metrics_log_interval_ms, 1000),
        camera_follow: config.camera_follow,
    };
    info!(
        max_frame_delta_ms = settings.max_frame_delta_ms,
        metrics_log_interval_ms = settings.metrics_interval_ms,
        camera_follow = settings.camera_follow,
        "loop_config"
    );

    let vehicle = Vehicle::new(
        VehicleState::default(),
        build_handling_model(config.handling_kind, config.handling),
    );
    let mut frames = FrameOrchestrator::new(
        SystemClock::new(),
        vehicle,
        settings,
        Box::new(diagnostics.clone()),
    );
    let mut last_applied_summary = String::new();

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    match route_key(event.physical_key, event.state, event.repeat) {
                        KeyRoute::Quit => {
                            info!(reason = "escape_key", "shutdown_requested");
                            window_target.exit();
                        }
                        KeyRoute::Press(channel) => frames.press(channel),
                        KeyRoute::Release(channel) => frames.release(channel),
                        KeyRoute::Ignore => {}
                    }
                }
                WindowEvent::RedrawRequested => {
                    let payload = frames.tick();
                    if let Err(error) = renderer.render(payload) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }

                    let summary = diagnostics.summary_line();
                    if summary != last_applied_summary {
                        window.set_title(&window_title(&config.window_title, &summary));
                        last_applied_summary = summary;
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyRoute {
    Quit,
    Press(Channel),
    Release(Channel),
    Ignore,
}

fn route_key(key: PhysicalKey, state: ElementState, repeat: bool) -> KeyRoute {
    if key == PhysicalKey::Code(QUIT_KEY) {
        return match state {
            ElementState::Pressed => KeyRoute::Quit,
            ElementState::Released => KeyRoute::Ignore,
        };
    }
    let Some(channel) = channel_for_key(key) else {
        return KeyRoute::Ignore;
    };
    match state {
        // The tracker treats repeats as no-ops; skip them before they get there.
        ElementState::Pressed if repeat => KeyRoute::Ignore,
        ElementState::Pressed => KeyRoute::Press(channel),
        ElementState::Released => KeyRoute::Release(channel),
    }
}

fn window_title(base: &str, summary: &str) -> String {
    if summary.is_empty() {
        base.to_string()
    } else {
        format!("{base} | {summary}")
    }
}

fn normalize_non_zero_ms(value_ms: u64, fallback_ms: u64) -> u64 {
    if value_ms == 0 {
        fallback_ms
    } else {
        value_ms
    }
}
