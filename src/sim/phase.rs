//! Intro → Playing → GameOver → Playing … phase machine
//!
//! Driven by the single action trigger and the collision signal. GameOver is
//! not terminal: retry swaps in a brand new `GameState`.

use rand::Rng;

use super::physics::try_jump;
use super::state::{GamePhase, GameState};
use crate::config::PhysicsConfig;

/// What an action press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Intro → Playing
    Started,
    /// Jump applied
    Jumped,
    /// Airborne jump request, dropped
    Ignored,
    /// GameOver → Playing with a fresh run
    Restarted,
}

/// Route one action press through the phase machine
pub fn on_action<R: Rng>(
    state: &mut GameState,
    config: &PhysicsConfig,
    rng: &mut R,
) -> ActionOutcome {
    match state.phase {
        GamePhase::Intro => {
            state.phase = GamePhase::Playing;
            ActionOutcome::Started
        }
        GamePhase::Playing => {
            let config = config.sanitized();
            if try_jump(&mut state.character, config.jump_force) {
                ActionOutcome::Jumped
            } else {
                ActionOutcome::Ignored
            }
        }
        GamePhase::GameOver => {
            *state = new_run(state, config, rng);
            ActionOutcome::Restarted
        }
    }
}

/// Discard the run, keeping only the high score and viewport
fn new_run<R: Rng>(previous: &GameState, config: &PhysicsConfig, rng: &mut R) -> GameState {
    let mut state = GameState::new(previous.viewport, previous.hi_score, config, rng);
    state.phase = GamePhase::Playing;
    state
}

/// Playing → GameOver. Returns the new high score if this run set one.
pub fn enter_game_over(state: &mut GameState) -> Option<u64> {
    if state.phase != GamePhase::Playing {
        return None;
    }
    state.phase = GamePhase::GameOver;

    let final_score = state.whole_score();
    if final_score > state.hi_score {
        state.hi_score = final_score;
        Some(final_score)
    } else {
        None
    }
}
