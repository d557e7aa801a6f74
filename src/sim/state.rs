//! Game state and core simulation types
//!
//! One `GameState` lives for exactly one run. Retrying builds a fresh one and
//! carries only the high score across.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::generate::{SceneryLayer, Star, generate_scenery, generate_star_field};
use crate::config::PhysicsConfig;
use crate::consts::*;
use crate::Rect;

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first action
    Intro,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for retry
    GameOver,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Left edge of the sprite (fixed)
    pub x: f32,
    /// Top edge of the sprite
    pub y: f32,
    /// Vertical velocity (px/frame, negative = up)
    pub vertical_velocity: f32,
    pub grounded: bool,
    /// Index into the run cycle
    pub animation_frame_index: usize,
    /// Milliseconds accumulated toward the next run frame
    pub animation_frame_timer: f32,
    /// Cosmetic idle bounce, never part of the hit-box
    pub bounce_offset: f32,
}

impl Character {
    /// Standing on the floor
    pub fn new(floor_y: f32) -> Self {
        Self {
            x: CHAR_X,
            y: floor_y,
            vertical_velocity: 0.0,
            grounded: true,
            animation_frame_index: 0,
            animation_frame_timer: 0.0,
            bounce_offset: 0.0,
        }
    }

    /// Full sprite bounds
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, CHAR_SIZE, CHAR_SIZE)
    }

    /// Collision box, inset from the sprite's transparent padding
    pub fn hit_box(&self) -> Rect {
        self.bounds().inset(
            CHAR_INSET_LEFT,
            CHAR_INSET_TOP,
            CHAR_INSET_RIGHT,
            CHAR_INSET_BOTTOM,
        )
    }
}

/// Obstacle silhouettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Hydrant,
    Crate,
    Barrier,
    Cone,
    Bin,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 5] = [
        ObstacleKind::Hydrant,
        ObstacleKind::Crate,
        ObstacleKind::Barrier,
        ObstacleKind::Cone,
        ObstacleKind::Bin,
    ];

    /// Fixed pixel size (width, height)
    pub fn size(&self) -> (f32, f32) {
        match self {
            ObstacleKind::Hydrant => (28.0, 42.0),
            ObstacleKind::Crate => (40.0, 40.0),
            ObstacleKind::Barrier => (58.0, 30.0),
            ObstacleKind::Cone => (26.0, 36.0),
            ObstacleKind::Bin => (34.0, 50.0),
        }
    }
}

/// An obstacle standing on the ground line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Visual bounds given the ground line
    pub fn bounds(&self, gnd_y: f32) -> Rect {
        Rect::new(self.x, gnd_y - self.height, self.width, self.height)
    }
}

/// Unbounded parallax accumulators (only used modulo a tiling period)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScrollOffsets {
    pub ground: f32,
    pub near: f32,
    pub far: f32,
}

/// Backdrop generated per viewport
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenery {
    pub far: SceneryLayer,
    pub near: SceneryLayer,
    pub stars: Vec<Star>,
}

impl Scenery {
    /// Lay out both building layers and the star field for a viewport
    pub fn generate<R: Rng>(viewport: Viewport, rng: &mut R) -> Self {
        let far_count = (viewport.width / 70.0).ceil() as usize + 4;
        let near_count = (viewport.width / 110.0).ceil() as usize + 3;
        let star_count = star_count_for(viewport.width);
        Self {
            far: generate_scenery(far_count, (50.0, 120.0), (110.0, 250.0), rng),
            near: generate_scenery(near_count, (70.0, 150.0), (60.0, 170.0), rng),
            stars: generate_star_field(
                Vec2::new(viewport.width, viewport.gnd_y),
                star_count,
                rng,
            ),
        }
    }
}

/// Star density scales with viewport width
pub fn star_count_for(width: f32) -> usize {
    (width / 9.0).round().max(0.0) as usize
}

/// Viewport dimensions and the ground line derived from them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Ground line (y)
    pub gnd_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let width = sane_extent(width);
        let height = sane_extent(height);
        Self {
            width,
            height,
            gnd_y: (height * GROUND_RATIO).round(),
        }
    }

    /// Sprite top when standing on the ground
    pub fn floor_y(&self) -> f32 {
        self.gnd_y - CHAR_SIZE
    }
}

fn sane_extent(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(MIN_VIEWPORT, MAX_VIEWPORT)
    } else {
        MIN_VIEWPORT
    }
}

/// Complete run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Accumulated score (fractional)
    pub score: f32,
    /// Best floor(score) ever, carried across runs
    pub hi_score: u64,
    /// Current scroll speed (px/frame)
    pub speed: f32,
    /// Run-local clock for cosmetic animation (ms)
    pub elapsed_time: f32,
    pub character: Character,
    /// Live obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Milliseconds until the next spawn
    pub next_spawn_countdown: f32,
    pub scroll: ScrollOffsets,
    pub scenery: Scenery,
    pub viewport: Viewport,
}

impl GameState {
    /// Build a fresh run for the given viewport
    pub fn new<R: Rng>(
        viewport: Viewport,
        hi_score: u64,
        config: &PhysicsConfig,
        rng: &mut R,
    ) -> Self {
        let config = config.sanitized();
        Self {
            phase: GamePhase::Intro,
            score: 0.0,
            hi_score,
            speed: config.init_speed,
            elapsed_time: 0.0,
            character: Character::new(viewport.floor_y()),
            obstacles: Vec::new(),
            next_spawn_countdown: FIRST_SPAWN_MS,
            scroll: ScrollOffsets::default(),
            scenery: Scenery::generate(viewport, rng),
            viewport,
        }
    }

    /// Sprite top when standing on the ground
    pub fn floor_y(&self) -> f32 {
        self.viewport.floor_y()
    }

    /// Whole points scored so far
    pub fn whole_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Re-layout for a new viewport; score and phase are untouched
    pub fn resize<R: Rng>(&mut self, viewport: Viewport, rng: &mut R) {
        self.viewport = viewport;
        self.scenery = Scenery::generate(viewport, rng);

        let floor_y = viewport.floor_y();
        let ch = &mut self.character;
        if ch.grounded || ch.y >= floor_y {
            ch.y = floor_y;
            ch.vertical_velocity = 0.0;
            ch.grounded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_state_starts_grounded_in_intro() {
        let mut rng = Pcg32::seed_from_u64(7);
        let viewport = Viewport::new(800.0, 450.0);
        let state = GameState::new(viewport, 42, &PhysicsConfig::default(), &mut rng);

        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.hi_score, 42);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.speed, PhysicsConfig::default().init_speed);
        assert!(state.character.grounded);
        assert_eq!(state.character.y, state.floor_y());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.scenery.stars.len(), star_count_for(800.0));
    }

    #[test]
    fn test_viewport_degenerate_dimensions() {
        let v = Viewport::new(0.0, f32::NAN);
        assert_eq!(v.width, MIN_VIEWPORT);
        assert_eq!(v.height, MIN_VIEWPORT);
        assert!(v.gnd_y > 0.0);
    }

    #[test]
    fn test_viewport_huge_dimensions_are_capped() {
        let v = Viewport::new(f32::MAX, 1.0e9);
        assert_eq!(v.width, MAX_VIEWPORT);
        assert_eq!(v.height, MAX_VIEWPORT);

        let mut rng = Pcg32::seed_from_u64(3);
        let scenery = Scenery::generate(v, &mut rng);
        assert_eq!(scenery.stars.len(), star_count_for(MAX_VIEWPORT));
        assert!(scenery.far.buildings.len() < 300);
    }

    #[test]
    fn test_hit_box_inside_bounds() {
        let ch = Character::new(300.0);
        let b = ch.bounds();
        let h = ch.hit_box();
        assert!(h.left() > b.left() && h.right() < b.right());
        assert!(h.top() > b.top() && h.bottom() < b.bottom());
    }

    #[test]
    fn test_resize_snaps_grounded_character() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state =
            GameState::new(Viewport::new(800.0, 450.0), 0, &PhysicsConfig::default(), &mut rng);
        state.score = 12.5;
        state.resize(Viewport::new(1024.0, 768.0), &mut rng);
        assert_eq!(state.character.y, state.floor_y());
        assert_eq!(state.score, 12.5);
        assert_eq!(state.phase, GamePhase::Intro);
    }

    #[test]
    fn test_resize_keeps_airborne_character_above_floor() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state =
            GameState::new(Viewport::new(800.0, 900.0), 0, &PhysicsConfig::default(), &mut rng);
        state.phase = GamePhase::Playing;
        state.character.y = state.floor_y() - 40.0;
        state.character.vertical_velocity = -6.0;
        state.character.grounded = false;

        // Still above the new floor: mid-air state is kept
        state.resize(Viewport::new(800.0, 880.0), &mut rng);
        assert!(!state.character.grounded);
        assert!(state.character.y < state.floor_y());
        assert_eq!(state.character.vertical_velocity, -6.0);

        // New floor above the character: snapped and grounded
        state.resize(Viewport::new(800.0, 300.0), &mut rng);
        assert!(state.character.grounded);
        assert_eq!(state.character.y, state.floor_y());
        assert_eq!(state.character.vertical_velocity, 0.0);
    }
}
