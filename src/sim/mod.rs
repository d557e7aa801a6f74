//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (passed in, never global)
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod generate;
pub mod obstacles;
pub mod phase;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{first_collision, hits_obstacle};
pub use generate::{
    Building, SceneryLayer, Star, generate_obstacle_shape, generate_scenery, generate_star_field,
};
pub use phase::{ActionOutcome, enter_game_over, on_action};
pub use state::{
    Character, GamePhase, GameState, Obstacle, ObstacleKind, Scenery, ScrollOffsets, Viewport,
};
pub use tick::{TickEvents, tick};
