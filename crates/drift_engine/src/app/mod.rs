mod bindings;
mod loop_runner;
mod rendering;

pub use bindings::{channel_for_key, QUIT_KEY};
pub use loop_runner::{run_app, run_app_with_diagnostics, AppError, LoopConfig};
pub use rendering::{clip_to_screen, Renderer, Viewport};
