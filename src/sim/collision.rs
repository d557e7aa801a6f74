//! Character vs obstacle hit-box overlap
//!
//! Both boxes are smaller than what is drawn: the character box drops the
//! sprite's transparent padding and every obstacle side gives up
//! `OBSTACLE_HIT_MARGIN` pixels, so near misses read as misses.

use super::state::{Character, Obstacle};
use crate::Rect;
use crate::consts::OBSTACLE_HIT_MARGIN;

/// Overlap test between the character hit-box and one obstacle
pub fn hits_obstacle(char_box: &Rect, obstacle: &Obstacle, gnd_y: f32) -> bool {
    let obs = obstacle.bounds(gnd_y);
    let m = OBSTACLE_HIT_MARGIN;

    char_box.right() > obs.left() + m
        && char_box.left() < obs.right() - m
        && char_box.bottom() > obs.top() + m
        && char_box.top() < gnd_y
}

/// Index of the first obstacle (storage order) the character touches
pub fn first_collision(character: &Character, obstacles: &[Obstacle], gnd_y: f32) -> Option<usize> {
    let char_box = character.hit_box();
    obstacles
        .iter()
        .position(|o| hits_obstacle(&char_box, o, gnd_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::ObstacleKind;

    const GND: f32 = 400.0;

    fn grounded() -> Character {
        Character::new(GND - CHAR_SIZE)
    }

    fn crate_at(x: f32) -> Obstacle {
        Obstacle {
            x,
            width: 40.0,
            height: 40.0,
            kind: ObstacleKind::Crate,
        }
    }

    #[test]
    fn test_direct_hit() {
        let ch = grounded();
        assert_eq!(first_collision(&ch, &[crate_at(CHAR_X + 20.0)], GND), Some(0));
    }

    #[test]
    fn test_miss_far_right() {
        let ch = grounded();
        assert_eq!(first_collision(&ch, &[crate_at(400.0)], GND), None);
    }

    #[test]
    fn test_forgiving_margin_on_leading_edge() {
        let ch = grounded();
        let right = ch.hit_box().right();
        // Visual overlap of a few pixels, still inside the margin
        let o = crate_at(right - OBSTACLE_HIT_MARGIN + 1.0);
        assert!(!hits_obstacle(&ch.hit_box(), &o, GND));
        let o = crate_at(right - OBSTACLE_HIT_MARGIN - 1.0);
        assert!(hits_obstacle(&ch.hit_box(), &o, GND));
    }

    #[test]
    fn test_clear_when_jumping_over() {
        let mut ch = grounded();
        ch.y = GND - CHAR_SIZE - 120.0;
        assert_eq!(first_collision(&ch, &[crate_at(CHAR_X + 20.0)], GND), None);
    }

    #[test]
    fn test_first_in_storage_order() {
        let ch = grounded();
        let obstacles = [crate_at(600.0), crate_at(CHAR_X + 30.0), crate_at(CHAR_X + 10.0)];
        assert_eq!(first_collision(&ch, &obstacles, GND), Some(1));
    }
}
