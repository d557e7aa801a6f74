//! Attract-mode player: jumps when the next obstacle gets close

use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Frames of lead before an obstacle reaches the character
const LEAD_FRAMES: f32 = 9.0;

/// Whether a jump now would clear the nearest obstacle ahead
pub fn should_jump(state: &GameState) -> bool {
    if state.phase != GamePhase::Playing || !state.character.grounded {
        return false;
    }

    let char_box = state.character.hit_box();
    let lead = state.speed * LEAD_FRAMES + OBSTACLE_HIT_MARGIN;

    state
        .obstacles
        .iter()
        .filter(|o| o.x + o.width > char_box.left())
        .map(|o| o.x - char_box.right())
        .any(|gap| gap <= lead)
}
