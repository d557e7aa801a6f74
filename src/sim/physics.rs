//! Character motion, score/speed curve and world scroll
//!
//! Vertical motion and scrolling are integrated per frame; score and
//! animation timers consume `dt` in milliseconds.

use super::state::{Character, GamePhase, GameState, ScrollOffsets};
use crate::config::PhysicsConfig;
use crate::consts::*;

/// Clamp a raw frame delta into `[0, MAX_FRAME_MS]`
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_MS) } else { 0.0 }
}

/// Apply gravity, move, and resolve against the floor
pub fn integrate_character(ch: &mut Character, gravity: f32, floor_y: f32) {
    ch.vertical_velocity += gravity;
    ch.y += ch.vertical_velocity;

    if ch.y >= floor_y {
        ch.y = floor_y;
        ch.vertical_velocity = 0.0;
        ch.grounded = true;
    } else {
        ch.grounded = false;
    }
}

/// Start a jump if standing on the floor. Airborne requests are dropped.
pub fn try_jump(ch: &mut Character, jump_force: f32) -> bool {
    if !ch.grounded {
        return false;
    }
    ch.vertical_velocity = jump_force;
    ch.grounded = false;
    true
}

/// Accrue score, then derive speed from it
pub fn advance_score(state: &mut GameState, config: &PhysicsConfig, dt: f32) {
    state.score += state.speed * dt * SCORE_RATE;
    state.speed = config.speed_for_score(state.score);
}

/// Advance parallax accumulators for one frame at `speed`
pub fn advance_scroll(scroll: &mut ScrollOffsets, speed: f32) {
    scroll.ground += speed * GROUND_PARALLAX;
    scroll.near += speed * NEAR_PARALLAX;
    scroll.far += speed * FAR_PARALLAX;
}

/// Tick sprite animation and the idle bounce.
///
/// The run cycle only advances while grounded outside GameOver; the death
/// pose is held.
pub fn animate_character(
    ch: &mut Character,
    phase: GamePhase,
    elapsed: f32,
    dt: f32,
    run_frames: usize,
) {
    ch.bounce_offset = if ch.grounded && phase != GamePhase::GameOver {
        (elapsed * BOUNCE_RATE).sin() * BOUNCE_AMPLITUDE
    } else {
        0.0
    };

    if phase == GamePhase::GameOver || !ch.grounded || run_frames == 0 {
        return;
    }

    ch.animation_frame_timer += dt;
    while ch.animation_frame_timer >= RUN_FRAME_MS {
        ch.animation_frame_timer -= RUN_FRAME_MS;
        ch.animation_frame_index = (ch.animation_frame_index + 1) % run_frames;
    }
}
