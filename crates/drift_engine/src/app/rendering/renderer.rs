use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::sim::{Mat4, RenderPayload, Vec2};

use super::transform::quad_contains;
use super::{clip_to_screen, Viewport, VIEW_HALF_EXTENT_WORLD};

const CLEAR_COLOR: [u8; 4] = [64, 56, 56, 255];
const BODY_COLOR: [u8; 4] = [214, 64, 52, 255];
const NOSE_COLOR: [u8; 4] = [250, 236, 196, 255];
const BODY_HALF_EXTENTS: Vec2 = Vec2::new(0.5, 1.0);
const NOSE_CENTER: Vec2 = Vec2::new(0.0, 0.75);
const NOSE_HALF_EXTENTS: Vec2 = Vec2::new(0.3, 0.15);

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    projection: Mat4,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            projection: Mat4::orthographic(
                -VIEW_HALF_EXTENT_WORLD,
                VIEW_HALF_EXTENT_WORLD,
                -VIEW_HALF_EXTENT_WORLD,
                VIEW_HALF_EXTENT_WORLD,
                -1.0,
                1.0,
            ),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width.max(1), height.max(1), surface)
    }

    pub fn render(&mut self, payload: &RenderPayload) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }

        let viewport = self.viewport;
        let view_projection = self.projection * payload.view;
        let frame = self.pixels.frame_mut();
        for chunk in frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&CLEAR_COLOR);
        }
        for slot in 0..payload.slots_in_use {
            let Some(model) = payload.model(slot) else {
                continue;
            };
            let mvp = view_projection * model;
            let body = screen_quad(&mvp, Vec2::ZERO, BODY_HALF_EXTENTS, viewport);
            fill_quad(frame, viewport, &body, BODY_COLOR);
            let nose = screen_quad(&mvp, NOSE_CENTER, NOSE_HALF_EXTENTS, viewport);
            fill_quad(frame, viewport, &nose, NOSE_COLOR);
        }

        self.pixels.render()
    }
}

fn screen_quad(mvp: &Mat4, center: Vec2, half_extents: Vec2, viewport: Viewport) -> [Vec2; 4] {
    [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].map(|(sx, sy)| {
        let local = Vec2::new(center.x + sx * half_extents.x, center.y + sy * half_extents.y);
        clip_to_screen(mvp.transform_point(local), viewport)
    })
}

fn fill_quad(frame: &mut [u8], viewport: Viewport, corners: &[Vec2; 4], color: [u8; 4]) {
    let (min, max) = corners.iter().fold(
        (
            Vec2::new(f32::INFINITY, f32::INFINITY),
            Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        ),
        |(min, max), corner| {
            (
                Vec2::new(min.x.min(corner.x), min.y.min(corner.y)),
                Vec2::new(max.x.max(corner.x), max.y.max(corner.y)),
            )
        },
    );
    if !min.is_finite() || !max.is_finite() {
        return;
    }

    let start_x = (min.x.floor() as i64).max(0);
    let start_y = (min.y.floor() as i64).max(0);
    let end_x = (max.x.ceil() as i64).min(viewport.width as i64);
    let end_y = (max.y.ceil() as i64).min(viewport.height as i64);
    for py in start_y..end_y {
        for px in start_x..end_x {
            let sample = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
            if quad_contains(corners, sample) {
                write_pixel_rgba(
                    frame,
                    viewport.width as usize,
                    px as usize,
                    py as usize,
                    color,
                );
            }
        }
    }
}

fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    frame[byte_offset..end].copy_from_slice(&color);
}
