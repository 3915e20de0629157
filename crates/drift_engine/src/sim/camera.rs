use super::math::{Mat4, Vec2};

/// Top-down camera looking along -Z with +Y up.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec2,
    follow_target: bool,
    view: Mat4,
}

impl Camera {
    pub fn new(follow_target: bool) -> Self {
        Self {
            position: Vec2::ZERO,
            follow_target,
            view: Mat4::IDENTITY,
        }
    }

    pub fn update(&mut self, target: Vec2) {
        if self.follow_target {
            self.position = target;
        }
        self.view = Mat4::from_translation(-self.position.x, -self.position.y, 0.0);
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }
}
