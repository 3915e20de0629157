mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{clip_to_screen, Viewport};

/// Half extent of the orthographic view volume in world units.
pub const VIEW_HALF_EXTENT_WORLD: f32 = 10.0;
