//! Software RGBA surface
//!
//! CPU rasterizer for headless runs and tests. Also serves as its own image
//! type, so a decoded sprite sheet can be blitted from one buffer to another.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{Color, Surface};
use crate::Rect;

/// One 8-bit RGBA pixel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Color> for Rgba {
    fn from(c: Color) -> Self {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: to_u8(c.r),
            g: to_u8(c.g),
            b: to_u8(c.b),
            a: to_u8(c.a),
        }
    }
}

/// Row-major pixel grid
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, px: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = px;
        }
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Binary PPM (P6) encoding, alpha dropped
    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.reserve(self.pixels.len() * 3);
        for chunk in self.as_bytes().chunks_exact(4) {
            out.extend_from_slice(&chunk[..3]);
        }
        out
    }

    /// Source-over blend of `src` (straight alpha) scaled by `alpha`
    fn blend(&mut self, x: usize, y: usize, src: Color, alpha: f32) {
        let a = (src.a * alpha).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = y * self.width + x;
        let dst = self.pixels[idx];
        let mix = |s: f32, d: u8| {
            let d = d as f32 / 255.0;
            ((s * a + d * (1.0 - a)) * 255.0).round() as u8
        };
        let out_a = a + dst.a as f32 / 255.0 * (1.0 - a);
        self.pixels[idx] = Rgba {
            r: mix(src.r, dst.r),
            g: mix(src.g, dst.g),
            b: mix(src.b, dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0).round() as u8,
        };
    }

    /// Pixel span covered by `rect`, clipped to the buffer
    fn clip(&self, rect: Rect) -> Option<(usize, usize, usize, usize)> {
        let x0 = rect.left().max(0.0).round();
        let y0 = rect.top().max(0.0).round();
        let x1 = rect.right().min(self.width as f32).round();
        let y1 = rect.bottom().min(self.height as f32).round();
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

impl Surface for PixelBuffer {
    type Image = PixelBuffer;

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn fill_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let span = rect.h.max(1.0);
        for y in y0..y1 {
            let t = (y as f32 + 0.5 - rect.top()) / span;
            let color = top.lerp(bottom, t);
            for x in x0..x1 {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, color: Color) {
        let bounds = Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0);
        let Some((x0, y0, x1, y1)) = self.clip(bounds) else {
            // Sub-pixel dot: plot the center
            let (cx, cy) = (center.x.floor(), center.y.floor());
            if cx >= 0.0 && cy >= 0.0 && (cx as usize) < self.width && (cy as usize) < self.height {
                self.blend(cx as usize, cy as usize, color, 1.0);
            }
            return;
        };
        let r2 = radius * radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if p.distance_squared(center) <= r2 {
                    self.blend(x, y, color, 1.0);
                }
            }
        }
    }

    fn image_size(&self, image: &PixelBuffer) -> Option<(f32, f32)> {
        (image.width > 0 && image.height > 0).then(|| (image.width as f32, image.height as f32))
    }

    fn blit(&mut self, image: &PixelBuffer, src: Rect, dst: Rect, alpha: f32) {
        let Some((x0, y0, x1, y1)) = self.clip(dst) else {
            return;
        };
        if dst.w <= 0.0 || dst.h <= 0.0 {
            return;
        }
        // Nearest-neighbour sampling
        for y in y0..y1 {
            let v = (y as f32 + 0.5 - dst.top()) / dst.h;
            let sy = (src.top() + v * src.h).floor() as usize;
            for x in x0..x1 {
                let u = (x as f32 + 0.5 - dst.left()) / dst.w;
                let sx = (src.left() + u * src.w).floor() as usize;
                if let Some(px) = image.pixel(sx, sy) {
                    let color = Color {
                        r: px.r as f32 / 255.0,
                        g: px.g as f32 / 255.0,
                        b: px.b as f32 / 255.0,
                        a: px.a as f32 / 255.0,
                    };
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }
}
