//! Canvas 2D surface (WASM only)

use glam::Vec2;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::{Color, Surface};
use crate::Rect;

/// [`Surface`] over a browser `CanvasRenderingContext2d`
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn fill_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        let gradient = self.ctx.create_linear_gradient(
            0.0,
            rect.top() as f64,
            0.0,
            rect.bottom() as f64,
        );
        let stops = gradient
            .add_color_stop(0.0, &top.to_css())
            .and_then(|_| gradient.add_color_stop(1.0, &bottom.to_css()));
        if let Err(e) = stops {
            log::warn!("Gradient stop rejected: {:?}", e);
            self.fill_rect(rect, top);
            return;
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        if let Err(e) = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        ) {
            log::warn!("Arc rejected: {:?}", e);
            return;
        }
        self.ctx.fill();
    }

    fn image_size(&self, image: &HtmlImageElement) -> Option<(f32, f32)> {
        (image.complete() && image.natural_width() > 0)
            .then(|| (image.natural_width() as f32, image.natural_height() as f32))
    }

    fn blit(&mut self, image: &HtmlImageElement, src: Rect, dst: Rect, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        let result = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                src.x as f64,
                src.y as f64,
                src.w as f64,
                src.h as f64,
                dst.x as f64,
                dst.y as f64,
                dst.w as f64,
                dst.h as f64,
            );
        self.ctx.set_global_alpha(1.0);
        if let Err(e) = result {
            log::warn!("Sprite draw failed: {:?}", e);
        }
    }
}
