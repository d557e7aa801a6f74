//! Procedural generation of obstacles, skyline layers and the star field
//!
//! Pure functions of an injected RNG, so a seeded `Pcg32` reproduces a layout.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::ObstacleKind;

/// Lit-window grid metrics
pub const WINDOW_W: f32 = 5.0;
pub const WINDOW_H: f32 = 7.0;
pub const WINDOW_STEP_X: f32 = 11.0;
pub const WINDOW_STEP_Y: f32 = 15.0;
pub const WINDOW_PAD: f32 = 7.0;
/// Chance any single window is lit
pub const WINDOW_LIT_CHANCE: f64 = 0.35;

/// Share of stars drawn large and bright
pub const BRIGHT_STAR_CHANCE: f64 = 0.08;
/// Stars stay in the upper part of the sky
pub const STAR_SKY_FRACTION: f32 = 0.7;

/// Uniform draw from `[lo, hi]`, tolerant of reversed or equal bounds
pub fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if lo == hi {
        return lo;
    }
    rng.random_range(lo..=hi)
}

/// Pick an obstacle silhouette uniformly from the catalog
pub fn generate_obstacle_shape<R: Rng>(rng: &mut R) -> (ObstacleKind, f32, f32) {
    let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
    let (w, h) = kind.size();
    (kind, w, h)
}

/// A single skyline building
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    /// Offset from the start of the layer
    pub x: f32,
    pub width: f32,
    /// Height above the ground line
    pub height: f32,
    /// Lit windows as (column, floor), floor 0 at the roof
    pub lit_windows: Vec<(u16, u16)>,
}

impl Building {
    /// Columns and floors of the window grid
    pub fn window_grid(&self) -> (u16, u16) {
        let cols = ((self.width - 2.0 * WINDOW_PAD + (WINDOW_STEP_X - WINDOW_W)) / WINDOW_STEP_X)
            .floor()
            .max(0.0) as u16;
        let floors = ((self.height - 2.0 * WINDOW_PAD + (WINDOW_STEP_Y - WINDOW_H))
            / WINDOW_STEP_Y)
            .floor()
            .max(0.0) as u16;
        (cols, floors)
    }
}

/// A strip of buildings that tiles seamlessly every `total_width` pixels
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneryLayer {
    pub buildings: Vec<Building>,
    /// Tiling period; zero means the layer is disabled
    pub total_width: f32,
}

impl SceneryLayer {
    pub fn is_enabled(&self) -> bool {
        !self.buildings.is_empty() && self.total_width > 0.0
    }
}

/// Lay out `count` non-overlapping buildings left to right
pub fn generate_scenery<R: Rng>(
    count: usize,
    width_range: (f32, f32),
    height_range: (f32, f32),
    rng: &mut R,
) -> SceneryLayer {
    let mut buildings = Vec::with_capacity(count);
    let mut cursor = 0.0;

    for _ in 0..count {
        let width = uniform(rng, width_range.0, width_range.1).max(1.0).round();
        let height = uniform(rng, height_range.0, height_range.1).max(1.0).round();
        let mut building = Building {
            x: cursor,
            width,
            height,
            lit_windows: Vec::new(),
        };

        let (cols, floors) = building.window_grid();
        for floor in 0..floors {
            for col in 0..cols {
                if rng.random_bool(WINDOW_LIT_CHANCE) {
                    building.lit_windows.push((col, floor));
                }
            }
        }

        let gap = rng.random_range(2.0..=18.0f32).round();
        cursor += width + gap;
        buildings.push(building);
    }

    SceneryLayer {
        buildings,
        total_width: cursor,
    }
}

/// A twinkling star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    pub bright: bool,
    pub base_alpha: f32,
    /// Radians per millisecond
    pub twinkle_rate: f32,
    pub phase: f32,
}

impl Star {
    /// Opacity at run time `t` (ms)
    #[inline]
    pub fn alpha_at(&self, t: f32) -> f32 {
        let flicker = 0.65 + 0.35 * (t * self.twinkle_rate + self.phase).sin();
        (self.base_alpha * flicker).clamp(0.0, 1.0)
    }
}

/// Scatter `count` stars over the sky above the ground line
pub fn generate_star_field<R: Rng>(sky: Vec2, count: usize, rng: &mut R) -> Vec<Star> {
    let max_y = (sky.y * STAR_SKY_FRACTION).max(1.0);
    (0..count)
        .map(|_| {
            let bright = rng.random_bool(BRIGHT_STAR_CHANCE);
            Star {
                pos: Vec2::new(uniform(rng, 0.0, sky.x), uniform(rng, 0.0, max_y)),
                radius: if bright { 1.8 } else { 0.9 },
                bright,
                base_alpha: if bright {
                    uniform(rng, 0.8, 1.0)
                } else {
                    uniform(rng, 0.35, 0.8)
                },
                twinkle_rate: uniform(rng, 0.0008, 0.004),
                phase: uniform(rng, 0.0, std::f32::consts::TAU),
            }
        })
        .collect()
}
