use crate::sim::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Maps clip-space x/y in [-1, 1] to pixel coordinates, +Y up.
pub fn clip_to_screen(clip: Vec2, viewport: Viewport) -> Vec2 {
    Vec2 {
        x: (clip.x + 1.0) * 0.5 * viewport.width as f32,
        y: (1.0 - clip.y) * 0.5 * viewport.height as f32,
    }
}

/// True when `point` lies inside the convex quad given in winding order.
pub(crate) fn quad_contains(corners: &[Vec2; 4], point: Vec2) -> bool {
    let mut sign = 0.0f32;
    for index in 0..4 {
        let a = corners[index];
        let b = corners[(index + 1) % 4];
        let edge = b - a;
        let to_point = point - a;
        let cross = edge.x * to_point.y - edge.y * to_point.x;
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}
