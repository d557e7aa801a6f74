//! Primitive compositions for obstacles and buildings

use glam::Vec2;

use super::{Color, Surface};
use crate::Rect;
use crate::sim::generate::{WINDOW_H, WINDOW_PAD, WINDOW_STEP_X, WINDOW_STEP_Y, WINDOW_W};
use crate::sim::{Building, Obstacle, ObstacleKind};

const HYDRANT_RED: Color = Color::rgb(214, 52, 64);
const CRATE_WOOD: Color = Color::rgb(168, 112, 58);
const CRATE_DARK: Color = Color::rgb(112, 70, 34);
const BARRIER_WHITE: Color = Color::rgb(236, 236, 240);
const BARRIER_ORANGE: Color = Color::rgb(255, 128, 32);
const CONE_ORANGE: Color = Color::rgb(255, 110, 20);
const BIN_GREEN: Color = Color::rgb(46, 124, 88);
const BIN_LID: Color = Color::rgb(30, 86, 60);
const METAL: Color = Color::rgb(90, 96, 110);

/// Draw one obstacle standing on the ground line, inside `Obstacle::bounds`
pub fn draw_obstacle<S: Surface>(surface: &mut S, obstacle: &Obstacle, gnd_y: f32) {
    let body = obstacle.bounds(gnd_y);
    let Rect { x, y, w, h } = body;

    match obstacle.kind {
        ObstacleKind::Hydrant => {
            surface.fill_rect(Rect::new(x + w * 0.2, y + h * 0.2, w * 0.6, h * 0.8), HYDRANT_RED);
            surface.fill_arc(Vec2::new(x + w * 0.5, y + h * 0.2), w * 0.3, HYDRANT_RED);
            surface.fill_rect(Rect::new(x, y + h * 0.4, w, h * 0.15), HYDRANT_RED);
            surface.fill_rect(Rect::new(x + w * 0.1, y + h * 0.9, w * 0.8, h * 0.1), METAL);
        }
        ObstacleKind::Crate => {
            surface.fill_rect(body, CRATE_WOOD);
            let inset = w.min(h) * 0.15;
            surface.fill_rect(
                Rect::new(x + inset, y + inset, w - 2.0 * inset, h - 2.0 * inset),
                CRATE_DARK,
            );
            surface.fill_rect(Rect::new(x, y + h * 0.45, w, h * 0.1), CRATE_WOOD);
            surface.fill_rect(Rect::new(x + w * 0.45, y, w * 0.1, h), CRATE_WOOD);
        }
        ObstacleKind::Barrier => {
            // Legs
            surface.fill_rect(Rect::new(x + w * 0.1, y + h * 0.4, w * 0.08, h * 0.6), METAL);
            surface.fill_rect(Rect::new(x + w * 0.82, y + h * 0.4, w * 0.08, h * 0.6), METAL);
            // Striped plank
            let stripes = 6;
            let stripe_w = w / stripes as f32;
            for i in 0..stripes {
                let color = if i % 2 == 0 { BARRIER_ORANGE } else { BARRIER_WHITE };
                surface.fill_rect(
                    Rect::new(x + i as f32 * stripe_w, y, stripe_w, h * 0.45),
                    color,
                );
            }
        }
        ObstacleKind::Cone => {
            // Stepped taper
            let steps = 5;
            let step_h = h * 0.85 / steps as f32;
            for i in 0..steps {
                let frac = (i + 1) as f32 / steps as f32;
                let sw = w * (0.25 + 0.6 * frac);
                let color = if i == 2 { BARRIER_WHITE } else { CONE_ORANGE };
                surface.fill_rect(
                    Rect::new(x + (w - sw) * 0.5, y + i as f32 * step_h, sw, step_h + 0.5),
                    color,
                );
            }
            surface.fill_rect(Rect::new(x, y + h * 0.85, w, h * 0.15), CONE_ORANGE);
        }
        ObstacleKind::Bin => {
            surface.fill_rect(Rect::new(x + w * 0.08, y + h * 0.15, w * 0.84, h * 0.85), BIN_GREEN);
            surface.fill_rect(Rect::new(x, y + h * 0.05, w, h * 0.12), BIN_LID);
            surface.fill_rect(Rect::new(x + w * 0.4, y, w * 0.2, h * 0.06), BIN_LID);
        }
    }
}

/// Draw a building with its lit windows at screen x
pub fn draw_building<S: Surface>(
    surface: &mut S,
    building: &Building,
    x: f32,
    gnd_y: f32,
    body: Color,
    window: Color,
) {
    let top = gnd_y - building.height;
    surface.fill_rect(Rect::new(x, top, building.width, building.height), body);

    for &(col, floor) in &building.lit_windows {
        surface.fill_rect(
            Rect::new(
                x + WINDOW_PAD + col as f32 * WINDOW_STEP_X,
                top + WINDOW_PAD + floor as f32 * WINDOW_STEP_Y,
                WINDOW_W,
                WINDOW_H,
            ),
            window,
        );
    }
}
