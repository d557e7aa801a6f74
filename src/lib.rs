//! Skyline Runner - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Simulation (physics, obstacles, collisions, phase machine)
//! - `renderer`: Back-to-front drawing onto any 2D raster surface
//! - `engine`: Frame driver that owns the game state
//! - `config`: Live-tunable physics parameters
//! - `highscores`: High score persistence

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod engine;
pub mod highscores;
pub mod renderer;
pub mod sim;

pub use config::{PhysicsConfig, SharedConfig, Tunable};
pub use engine::{GameEngine, HudSnapshot};
pub use highscores::{HighScoreStore, MemoryStore};

/// Game configuration constants
pub mod consts {
    /// Reference frame length (60 Hz) in milliseconds
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest `dt` a single frame may integrate (tab-resume stalls)
    pub const MAX_FRAME_MS: f32 = 50.0;

    /// Score gained per unit of speed per millisecond
    pub const SCORE_RATE: f32 = 0.01;
    /// Floor for any speed used as a divisor
    pub const MIN_SPEED: f32 = 0.5;

    /// Ground line as a fraction of viewport height
    pub const GROUND_RATIO: f32 = 0.8;
    /// Smallest viewport the simulation lays out for
    pub const MIN_VIEWPORT: f32 = 64.0;
    /// Largest viewport extent; scenery size scales with width
    pub const MAX_VIEWPORT: f32 = 16384.0;

    /// Character sprite placement (drawn size, fixed x)
    pub const CHAR_X: f32 = 90.0;
    pub const CHAR_SIZE: f32 = 72.0;
    /// Hit-box insets from the sprite bounds (transparent padding)
    pub const CHAR_INSET_LEFT: f32 = 20.0;
    pub const CHAR_INSET_RIGHT: f32 = 18.0;
    pub const CHAR_INSET_TOP: f32 = 14.0;
    pub const CHAR_INSET_BOTTOM: f32 = 6.0;

    /// Idle bounce while grounded (cosmetic only)
    pub const BOUNCE_AMPLITUDE: f32 = 2.5;
    pub const BOUNCE_RATE: f32 = 0.012;

    /// Sprite sheet grid (columns × rows of equal frames)
    pub const SPRITE_COLUMNS: usize = 4;
    pub const SPRITE_ROWS: usize = 2;
    /// Run cycle occupies frames 0..RUN_FRAMES
    pub const RUN_FRAMES: usize = 6;
    pub const JUMP_FRAME: usize = 6;
    pub const DEATH_FRAME: usize = 7;
    /// Run-cycle frame duration
    pub const RUN_FRAME_MS: f32 = 90.0;

    /// Obstacles spawn this far past the right edge
    pub const SPAWN_MARGIN: f32 = 20.0;
    /// Obstacles are culled once their right edge passes -CULL_MARGIN
    pub const CULL_MARGIN: f32 = 60.0;
    /// Forgiving collision margin on every obstacle side
    pub const OBSTACLE_HIT_MARGIN: f32 = 6.0;
    /// Delay before the first obstacle of a run
    pub const FIRST_SPAWN_MS: f32 = 1200.0;

    /// Parallax coefficients relative to ground scroll
    pub const GROUND_PARALLAX: f32 = 1.0;
    pub const NEAR_PARALLAX: f32 = 0.38;
    pub const FAR_PARALLAX: f32 = 0.12;

    /// Spacing of the scrolling ground grid
    pub const GRID_SPACING: f32 = 48.0;
    /// Buildings further than this outside the viewport are not drawn
    pub const DRAW_CULL_MARGIN: f32 = 200.0;
}

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Shrink each side by its own amount
    pub fn inset(&self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: self.x + left,
            y: self.y + top,
            w: (self.w - left - right).max(0.0),
            h: (self.h - top - bottom).max(0.0),
        }
    }
}

/// Positive remainder, used to wrap unbounded scroll accumulators
#[inline]
pub fn wrap(value: f32, period: f32) -> f32 {
    if period <= 0.0 {
        return 0.0;
    }
    value.rem_euclid(period)
}
