use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector the vehicle faces at `heading`. Heading 0 points along +Y.
    pub fn forward_axis(heading: f32) -> Self {
        let (sin, cos) = heading.sin_cos();
        Self { x: -sin, y: cos }
    }

    /// Unit vector to the right of `forward_axis(heading)`.
    pub fn right_axis(heading: f32) -> Self {
        let (sin, cos) = heading.sin_cos();
        Self { x: cos, y: sin }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scalar projection onto `axis`. A zero-length axis projects to zero.
    pub fn project_onto(self, axis: Vec2) -> f32 {
        let axis_length = axis.length();
        if axis_length <= f32::EPSILON {
            return 0.0;
        }
        self.dot(axis) / axis_length
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Column-major 4x4 matrix, laid out the way the GPU-side model buffer expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [f32; 16]);

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.0[12] = x;
        out.0[13] = y;
        out.0[14] = z;
        out
    }

    pub fn from_rotation_z(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        let mut out = Self::IDENTITY;
        out.0[0] = cos;
        out.0[1] = sin;
        out.0[4] = -sin;
        out.0[5] = cos;
        out
    }

    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let lr = 1.0 / (left - right);
        let bt = 1.0 / (bottom - top);
        let nf = 1.0 / (near - far);
        let mut out = Self::IDENTITY;
        out.0[0] = -2.0 * lr;
        out.0[5] = -2.0 * bt;
        out.0[10] = 2.0 * nf;
        out.0[12] = (left + right) * lr;
        out.0[13] = (top + bottom) * bt;
        out.0[14] = (far + near) * nf;
        out
    }

    /// Transforms a point on the z = 0 plane and returns its x/y.
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        let m = &self.0;
        let w = m[3] * point.x + m[7] * point.y + m[15];
        let w = if w.abs() <= f32::EPSILON { 1.0 } else { w };
        Vec2 {
            x: (m[0] * point.x + m[4] * point.y + m[12]) / w,
            y: (m[1] * point.x + m[5] * point.y + m[13]) / w,
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn from_slice(values: &[f32]) -> Option<Self> {
        let array: [f32; 16] = values.try_into().ok()?;
        Some(Self(array))
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [0.0f32; 16];
        for column in 0..4 {
            for row in 0..4 {
                out[column * 4 + row] = (0..4)
                    .map(|k| self.0[k * 4 + row] * rhs.0[column * 4 + k])
                    .sum();
            }
        }
        Mat4(out)
    }
}
