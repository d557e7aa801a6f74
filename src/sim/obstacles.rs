//! Obstacle spawning, scrolling and culling

use rand::Rng;

use super::generate::{generate_obstacle_shape, uniform};
use super::state::{GameState, Obstacle};
use crate::config::PhysicsConfig;
use crate::consts::*;

/// Time until the next spawn so that the on-screen gap is `[min_gap, max_gap]`
/// pixels at the current speed
pub fn spawn_interval<R: Rng>(config: &PhysicsConfig, speed: f32, rng: &mut R) -> f32 {
    let gap_px = uniform(rng, config.min_gap.max(1.0), config.max_gap.max(1.0));
    let speed = if speed.is_finite() { speed.max(MIN_SPEED) } else { MIN_SPEED };
    gap_px / speed * FRAME_MS
}

/// Run the countdown and spawn at most one obstacle this frame
pub fn update_spawner<R: Rng>(state: &mut GameState, config: &PhysicsConfig, dt: f32, rng: &mut R) {
    state.next_spawn_countdown -= dt;
    if state.next_spawn_countdown > 0.0 {
        return;
    }

    let (kind, width, height) = generate_obstacle_shape(rng);
    state.obstacles.push(Obstacle {
        x: state.viewport.width + SPAWN_MARGIN,
        width,
        height,
        kind,
    });
    state.next_spawn_countdown = spawn_interval(config, state.speed, rng);
    log::debug!(
        "Spawned {:?}, next in {:.0}ms ({} live)",
        kind,
        state.next_spawn_countdown,
        state.obstacles.len()
    );
}

/// Translate every obstacle left by `speed`
pub fn scroll_obstacles(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles {
        obstacle.x -= speed;
    }
}

/// Drop obstacles whose right edge has passed the cull line
pub fn cull_obstacles(obstacles: &mut Vec<Obstacle>) {
    obstacles.retain(|o| o.x + o.width > -CULL_MARGIN);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ObstacleKind, Viewport};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state(rng: &mut Pcg32) -> GameState {
        GameState::new(Viewport::new(800.0, 450.0), 0, &PhysicsConfig::default(), rng)
    }

    #[test]
    fn test_spawn_interval_fixed_gap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let cfg = PhysicsConfig {
            min_gap: 500.0,
            max_gap: 500.0,
            ..Default::default()
        };
        let t = spawn_interval(&cfg, 5.0, &mut rng);
        assert!((t - 100.0 * FRAME_MS).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_interval_degenerate_inputs() {
        let mut rng = Pcg32::seed_from_u64(1);
        let cfg = PhysicsConfig {
            min_gap: 900.0,
            max_gap: 100.0,
            ..Default::default()
        };
        for speed in [0.0, -3.0, f32::NAN] {
            let t = spawn_interval(&cfg, speed, &mut rng);
            assert!(t.is_finite() && t > 0.0);
        }
    }

    #[test]
    fn test_spawner_spawns_once_per_frame() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut s = state(&mut rng);
        s.next_spawn_countdown = -1.0e6;
        update_spawner(&mut s, &PhysicsConfig::default(), 16.0, &mut rng);
        assert_eq!(s.obstacles.len(), 1);
        assert!(s.next_spawn_countdown > 0.0);
        assert_eq!(s.obstacles[0].x, 800.0 + SPAWN_MARGIN);
    }

    #[test]
    fn test_spawner_waits_for_countdown() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut s = state(&mut rng);
        s.next_spawn_countdown = 100.0;
        update_spawner(&mut s, &PhysicsConfig::default(), 16.0, &mut rng);
        assert!(s.obstacles.is_empty());
        assert_eq!(s.next_spawn_countdown, 84.0);
    }

    #[test]
    fn test_scroll_and_cull() {
        let mut obstacles: Vec<Obstacle> = [-50.0, -95.0, 300.0]
            .into_iter()
            .map(|x| Obstacle {
                x,
                width: 40.0,
                height: 40.0,
                kind: ObstacleKind::Crate,
            })
            .collect();
        scroll_obstacles(&mut obstacles, 10.0);
        assert_eq!(obstacles[2].x, 290.0);
        cull_obstacles(&mut obstacles);
        // -60 + 40 = -20 survives, -105 + 40 = -65 is culled
        assert_eq!(obstacles.len(), 2);
        assert!(obstacles.iter().all(|o| o.x + o.width > -CULL_MARGIN));
    }
}
