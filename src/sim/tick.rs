//! One simulation step
//!
//! Order per frame: physics → obstacles → collision → phase. Only cosmetic
//! state (clock, bounce, sprite timer) moves outside `Playing`.

use rand::Rng;

use super::collision::first_collision;
use super::obstacles::{cull_obstacles, scroll_obstacles, update_spawner};
use super::phase::enter_game_over;
use super::physics::{
    advance_score, advance_scroll, animate_character, clamp_dt, integrate_character,
};
use super::state::{GamePhase, GameState};
use crate::config::PhysicsConfig;
use crate::consts::RUN_FRAMES;

/// Notable things that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickEvents {
    /// Collision ended the run this step
    pub game_over: bool,
    /// Set when the run that just ended beat the high score
    pub new_high_score: Option<u64>,
}

/// Advance the game state by `dt` milliseconds (clamped)
pub fn tick<R: Rng>(
    state: &mut GameState,
    config: &PhysicsConfig,
    dt: f32,
    rng: &mut R,
) -> TickEvents {
    let dt = clamp_dt(dt);
    let config = config.sanitized();
    let mut events = TickEvents::default();

    state.elapsed_time += dt;

    if state.phase == GamePhase::Playing {
        // Physics & motion
        let floor_y = state.floor_y();
        integrate_character(&mut state.character, config.gravity, floor_y);
        advance_score(state, &config, dt);
        advance_scroll(&mut state.scroll, state.speed);

        // Obstacle pipeline
        update_spawner(state, &config, dt, rng);
        scroll_obstacles(&mut state.obstacles, state.speed);
        cull_obstacles(&mut state.obstacles);

        // Collision → phase
        if let Some(index) =
            first_collision(&state.character, &state.obstacles, state.viewport.gnd_y)
        {
            log::info!(
                "Hit {:?} at score {}",
                state.obstacles[index].kind,
                state.whole_score()
            );
            events.new_high_score = enter_game_over(state);
            events.game_over = true;
        }
    }

    animate_character(
        &mut state.character,
        state.phase,
        state.elapsed_time,
        dt,
        RUN_FRAMES,
    );

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Obstacle, ObstacleKind, Viewport};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(seed: u64) -> (GameState, PhysicsConfig, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let cfg = PhysicsConfig::default();
        let state = GameState::new(Viewport::new(800.0, 450.0), 0, &cfg, &mut rng);
        (state, cfg, rng)
    }

    #[test]
    fn test_intro_is_frozen() {
        let (mut state, cfg, mut rng) = setup(1);
        for _ in 0..120 {
            tick(&mut state, &cfg, FRAME_MS, &mut rng);
        }
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.scroll.ground, 0.0);
        assert!(state.obstacles.is_empty());
        assert!(state.elapsed_time > 0.0);
    }

    #[test]
    fn test_zero_dt_keeps_score() {
        let (mut state, cfg, mut rng) = setup(1);
        state.phase = GamePhase::Playing;
        tick(&mut state, &cfg, 0.0, &mut rng);
        assert_eq!(state.score, 0.0);
        assert!(state.character.grounded);
    }

    #[test]
    fn test_playing_scrolls_and_spawns() {
        let (mut state, cfg, mut rng) = setup(2);
        state.phase = GamePhase::Playing;
        let mut spawned = false;
        for _ in 0..200 {
            tick(&mut state, &cfg, FRAME_MS, &mut rng);
            if state.phase != GamePhase::Playing {
                break;
            }
            spawned |= !state.obstacles.is_empty();
        }
        assert!(spawned);
        assert!(state.scroll.ground > state.scroll.near);
        assert!(state.scroll.near > state.scroll.far);
    }

    #[test]
    fn test_collision_ends_run() {
        let (mut state, cfg, mut rng) = setup(3);
        state.phase = GamePhase::Playing;
        state.score = 250.4;
        state.obstacles.push(Obstacle {
            x: CHAR_X + 30.0,
            width: 40.0,
            height: 40.0,
            kind: ObstacleKind::Crate,
        });

        let events = tick(&mut state, &cfg, FRAME_MS, &mut rng);
        assert!(events.game_over);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(events.new_high_score, Some(state.hi_score));
        assert!(state.hi_score >= 250);
    }

    #[test]
    fn test_game_over_freezes_world() {
        let (mut state, cfg, mut rng) = setup(4);
        state.phase = GamePhase::GameOver;
        state.obstacles.push(Obstacle {
            x: 500.0,
            width: 40.0,
            height: 40.0,
            kind: ObstacleKind::Bin,
        });
        let score = state.score;
        let clock = state.elapsed_time;
        tick(&mut state, &cfg, FRAME_MS, &mut rng);
        assert_eq!(state.obstacles[0].x, 500.0);
        assert_eq!(state.score, score);
        assert!(state.elapsed_time > clock);
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let (mut state, cfg, mut rng) = setup(5);
        state.phase = GamePhase::Playing;
        tick(&mut state, &cfg, 120_000.0, &mut rng);
        assert_eq!(state.elapsed_time, MAX_FRAME_MS);
        assert!(state.obstacles.len() <= 1);
    }

    #[test]
    fn test_determinism() {
        let (mut a, cfg, mut rng_a) = setup(99);
        let (mut b, _, mut rng_b) = setup(99);
        a.phase = GamePhase::Playing;
        b.phase = GamePhase::Playing;
        for _ in 0..300 {
            tick(&mut a, &cfg, FRAME_MS, &mut rng_a);
            tick(&mut b, &cfg, FRAME_MS, &mut rng_b);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.phase, b.phase);
    }
}
