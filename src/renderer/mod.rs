//! Rendering module
//!
//! Draws a settled frame onto any 2D raster backend that implements
//! [`Surface`]. Layers go strictly back to front:
//! sky → stars → far skyline → near skyline → ground → obstacles → runner.

pub mod raster;
pub mod shapes;
pub mod sprite;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use raster::PixelBuffer;
pub use sprite::SpriteSheet;

use glam::Vec2;

use crate::consts::*;
use crate::sim::{GameState, SceneryLayer};
use crate::{Rect, wrap};

/// Straight (non-premultiplied) RGBA color, components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque color from 8-bit sRGB components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Linear blend toward `other`
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// CSS `rgba()` string for canvas backends
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            self.a
        )
    }
}

/// Night palette
pub mod palette {
    use super::Color;

    pub const SKY_TOP: Color = Color::rgb(8, 10, 32);
    pub const SKY_HORIZON: Color = Color::rgb(58, 34, 92);
    pub const STAR: Color = Color::rgb(255, 250, 230);
    pub const FAR_BUILDING: Color = Color::rgb(44, 40, 86);
    pub const NEAR_BUILDING: Color = Color::rgb(24, 22, 50);
    pub const WINDOW: Color = Color::rgb(255, 214, 120);
    pub const GROUND: Color = Color::rgb(20, 16, 34);
    pub const HORIZON_LINE: Color = Color::rgb(255, 92, 184);
    pub const GRID_LINE: Color = Color::rgb(120, 60, 170);

    /// Layer opacities
    pub const FAR_ALPHA: f32 = 0.55;
    pub const NEAR_ALPHA: f32 = 0.9;
}

/// Minimal 2D drawing capability
pub trait Surface {
    /// Backend image handle for sprite blits
    type Image;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Vertical gradient from `top` to `bottom`
    fn fill_gradient(&mut self, rect: Rect, top: Color, bottom: Color);

    /// Filled full circle
    fn fill_arc(&mut self, center: Vec2, radius: f32, color: Color);

    /// Pixel size of a ready image, `None` while it is still loading
    fn image_size(&self, image: &Self::Image) -> Option<(f32, f32)>;

    /// Copy `src` of `image` into `dst` at the given opacity
    fn blit(&mut self, image: &Self::Image, src: Rect, dst: Rect, alpha: f32);
}

/// Draws game state each frame
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub sheet: SpriteSheet,
}

impl Renderer {
    /// Draw one full frame
    pub fn render<S: Surface>(
        &self,
        surface: &mut S,
        state: &GameState,
        sprite: Option<&S::Image>,
    ) {
        let view = state.viewport;
        let t = state.elapsed_time;

        // Sky
        surface.fill_gradient(
            Rect::new(0.0, 0.0, view.width, view.gnd_y),
            palette::SKY_TOP,
            palette::SKY_HORIZON,
        );

        // Stars
        for star in &state.scenery.stars {
            surface.fill_arc(star.pos, star.radius, palette::STAR.with_alpha(star.alpha_at(t)));
        }

        // Skyline, far then near
        draw_layer(
            surface,
            &state.scenery.far,
            state.scroll.far,
            view.width,
            view.gnd_y,
            palette::FAR_BUILDING.with_alpha(palette::FAR_ALPHA),
            palette::WINDOW.with_alpha(palette::FAR_ALPHA * 0.6),
        );
        draw_layer(
            surface,
            &state.scenery.near,
            state.scroll.near,
            view.width,
            view.gnd_y,
            palette::NEAR_BUILDING.with_alpha(palette::NEAR_ALPHA),
            palette::WINDOW.with_alpha(palette::NEAR_ALPHA * 0.8),
        );

        draw_ground(surface, state.scroll.ground, view.width, view.height, view.gnd_y);

        for obstacle in &state.obstacles {
            shapes::draw_obstacle(surface, obstacle, view.gnd_y);
        }

        if let Some(image) = sprite {
            self.sheet.draw_character(surface, image, state);
        }
    }
}

/// Tile a skyline layer so the wrap point never shows
fn draw_layer<S: Surface>(
    surface: &mut S,
    layer: &SceneryLayer,
    scroll: f32,
    width: f32,
    gnd_y: f32,
    body: Color,
    window: Color,
) {
    if !layer.is_enabled() {
        return;
    }

    let offset = -wrap(scroll, layer.total_width);
    let repetitions = tile_repetitions(width, layer.total_width);

    for rep in 0..repetitions {
        let base = offset + rep as f32 * layer.total_width;
        for building in &layer.buildings {
            let x = base + building.x;
            if x + building.width < -DRAW_CULL_MARGIN || x > width + DRAW_CULL_MARGIN {
                continue;
            }
            shapes::draw_building(surface, building, x, gnd_y, body, window);
        }
    }
}

/// Copies of a layer needed to cover the viewport from any scroll offset
pub fn tile_repetitions(width: f32, total_width: f32) -> usize {
    if total_width <= 0.0 {
        return 0;
    }
    ((width / total_width).ceil() as usize + 1).max(3)
}

fn draw_ground<S: Surface>(surface: &mut S, scroll: f32, width: f32, height: f32, gnd_y: f32) {
    let depth = (height - gnd_y).max(0.0);
    surface.fill_rect(Rect::new(0.0, gnd_y, width, depth), palette::GROUND);

    // Scrolling grid
    let shift = wrap(scroll, GRID_SPACING);
    let mut x = -shift;
    while x < width {
        surface.fill_rect(
            Rect::new(x, gnd_y, 1.0, depth),
            palette::GRID_LINE.with_alpha(0.45),
        );
        x += GRID_SPACING;
    }
    let mut y = gnd_y + GRID_SPACING * 0.5;
    while y < height {
        surface.fill_rect(
            Rect::new(0.0, y, width, 1.0),
            palette::GRID_LINE.with_alpha(0.3),
        );
        y += GRID_SPACING * 0.5;
    }

    // Horizon
    surface.fill_rect(Rect::new(0.0, gnd_y - 1.0, width, 2.0), palette::HORIZON_LINE);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::sim::{GamePhase, Obstacle, ObstacleKind, Viewport};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Primitive log for draw-order assertions
    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Rect(Rect),
        Gradient,
        Arc,
        Blit { src: Rect, dst: Rect, alpha: f32 },
    }

    #[derive(Default)]
    pub struct Recorder {
        pub ops: Vec<Op>,
    }

    /// Fake image: `Some(size)` once loaded
    pub struct FakeImage(pub Option<(f32, f32)>);

    impl Surface for Recorder {
        type Image = FakeImage;

        fn fill_rect(&mut self, rect: Rect, _color: Color) {
            self.ops.push(Op::Rect(rect));
        }

        fn fill_gradient(&mut self, _rect: Rect, _top: Color, _bottom: Color) {
            self.ops.push(Op::Gradient);
        }

        fn fill_arc(&mut self, _center: Vec2, _radius: f32, _color: Color) {
            self.ops.push(Op::Arc);
        }

        fn image_size(&self, image: &FakeImage) -> Option<(f32, f32)> {
            image.0
        }

        fn blit(&mut self, _image: &FakeImage, src: Rect, dst: Rect, alpha: f32) {
            self.ops.push(Op::Blit { src, dst, alpha });
        }
    }

    fn state() -> GameState {
        let mut rng = Pcg32::seed_from_u64(31);
        GameState::new(Viewport::new(800.0, 450.0), 0, &PhysicsConfig::default(), &mut rng)
    }

    #[test]
    fn test_sky_first_sprite_last() {
        let state = state();
        let mut rec = Recorder::default();
        let image = FakeImage(Some((512.0, 256.0)));
        Renderer::default().render(&mut rec, &state, Some(&image));

        assert_eq!(rec.ops.first(), Some(&Op::Gradient));
        assert!(matches!(rec.ops.last(), Some(Op::Blit { .. })));
        // Stars right after the sky
        let stars = state.scenery.stars.len();
        assert!(rec.ops[1..=stars].iter().all(|op| *op == Op::Arc));
    }

    #[test]
    fn test_unloaded_sprite_is_skipped() {
        let state = state();
        let mut rec = Recorder::default();
        Renderer::default().render(&mut rec, &state, Some(&FakeImage(None)));
        assert!(!rec.ops.iter().any(|op| matches!(op, Op::Blit { .. })));

        let mut rec = Recorder::default();
        Renderer::default().render::<Recorder>(&mut rec, &state, None);
        assert!(!rec.ops.iter().any(|op| matches!(op, Op::Blit { .. })));
    }

    #[test]
    fn test_obstacles_drawn_before_runner() {
        let mut state = state();
        state.phase = GamePhase::Playing;
        state.obstacles.push(Obstacle {
            x: 400.0,
            width: 40.0,
            height: 40.0,
            kind: ObstacleKind::Crate,
        });
        let gnd = state.viewport.gnd_y;
        let mut rec = Recorder::default();
        let image = FakeImage(Some((512.0, 256.0)));
        Renderer::default().render(&mut rec, &state, Some(&image));

        let crate_idx = rec
            .ops
            .iter()
            .position(|op| *op == Op::Rect(Rect::new(400.0, gnd - 40.0, 40.0, 40.0)))
            .expect("crate body drawn");
        let blit_idx = rec.ops.len() - 1;
        assert!(crate_idx < blit_idx);
    }

    #[test]
    fn test_tile_repetitions() {
        assert_eq!(tile_repetitions(800.0, 0.0), 0);
        assert_eq!(tile_repetitions(800.0, 2000.0), 3);
        assert_eq!(tile_repetitions(800.0, 300.0), 4);
    }

    #[test]
    fn test_far_buildings_culled() {
        let mut state = state();
        // A very wide layer: most buildings sit far off screen
        let mut rng = Pcg32::seed_from_u64(2);
        state.scenery.far =
            crate::sim::generate_scenery(400, (60.0, 60.0), (100.0, 100.0), &mut rng);
        state.scenery.near = SceneryLayer::default();
        state.scenery.stars.clear();

        let mut rec = Recorder::default();
        Renderer::default().render::<Recorder>(&mut rec, &state, None);
        let bodies = rec
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Rect(r) if r.w == 60.0 && r.h == 100.0))
            .count();
        // Viewport plus cull margins fits only a handful of 60px buildings
        assert!(bodies > 0 && bodies < 30, "drew {} buildings", bodies);
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::rgb(255, 0, 10).with_alpha(0.5).to_css(), "rgba(255,0,10,0.500)");
    }
}
