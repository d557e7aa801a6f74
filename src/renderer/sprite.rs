//! Frame-grid sprite sheet and runner pose selection
//!
//! The sheet is one image split into `columns × rows` equal frames, indexed
//! `row * columns + column`. Poses are fixed indices into that grid.

use super::Surface;
use crate::Rect;
use crate::consts::*;
use crate::sim::{GamePhase, GameState};

/// Runner sprite sheet layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSheet {
    pub columns: usize,
    pub rows: usize,
    /// Run cycle is frames `0..run_frames`
    pub run_frames: usize,
    pub jump_frame: usize,
    pub death_frame: usize,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self {
            columns: SPRITE_COLUMNS,
            rows: SPRITE_ROWS,
            run_frames: RUN_FRAMES,
            jump_frame: JUMP_FRAME,
            death_frame: DEATH_FRAME,
        }
    }
}

impl SpriteSheet {
    pub fn frame_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Pose for the current phase and ground contact
    pub fn frame_index(&self, state: &GameState) -> usize {
        let ch = &state.character;
        let index = match state.phase {
            GamePhase::GameOver => self.death_frame,
            _ if !ch.grounded => self.jump_frame,
            _ => ch.animation_frame_index % self.run_frames.max(1),
        };
        index.min(self.frame_count().saturating_sub(1))
    }

    /// Source rect of `index` within an image of the given size
    pub fn frame_rect(&self, index: usize, image_w: f32, image_h: f32) -> Rect {
        let columns = self.columns.max(1);
        let rows = self.rows.max(1);
        let fw = image_w / columns as f32;
        let fh = image_h / rows as f32;
        let col = index % columns;
        let row = (index / columns).min(rows - 1);
        Rect::new(col as f32 * fw, row as f32 * fh, fw, fh)
    }

    /// Opacity of the runner; pulses while the death pose is held
    pub fn alpha(&self, state: &GameState) -> f32 {
        match state.phase {
            GamePhase::GameOver => 0.6 + 0.4 * (state.elapsed_time * 0.01).sin().abs(),
            _ => 1.0,
        }
    }

    /// Blit the current pose. Does nothing until the image has loaded.
    pub fn draw_character<S: Surface>(&self, surface: &mut S, image: &S::Image, state: &GameState) {
        let Some((image_w, image_h)) = surface.image_size(image) else {
            return;
        };
        if image_w <= 0.0 || image_h <= 0.0 {
            return;
        }

        let src = self.frame_rect(self.frame_index(state), image_w, image_h);
        let ch = &state.character;
        let dst = Rect::new(ch.x, ch.y + ch.bounce_offset, CHAR_SIZE, CHAR_SIZE);
        surface.blit(image, src, dst, self.alpha(state));
    }
}
