//! End-to-end play sessions through the public engine API

use skyline_runner::consts::*;
use skyline_runner::highscores::MemoryStore;
use skyline_runner::renderer::PixelBuffer;
use skyline_runner::sim::{ActionOutcome, GamePhase};
use skyline_runner::{GameEngine, PhysicsConfig, SharedConfig, Tunable};

fn engine_with(store: MemoryStore) -> (GameEngine<MemoryStore>, SharedConfig) {
    let config = PhysicsConfig::default().shared();
    let engine = GameEngine::new(800.0, 450.0, config.clone(), store, 2024);
    (engine, config)
}

/// Run without jumping until the first obstacle ends the run
fn run_into_first_obstacle(e: &mut GameEngine<MemoryStore>) {
    for _ in 0..2000 {
        if e.step(FRAME_MS).game_over {
            return;
        }
    }
    panic!("no collision within 2000 frames");
}

#[test]
fn start_jump_and_land() {
    let (mut e, config) = engine_with(MemoryStore::new());
    assert_eq!(e.state().phase, GamePhase::Intro);

    assert_eq!(e.on_action_pressed(), ActionOutcome::Started);
    assert_eq!(e.state().phase, GamePhase::Playing);
    e.step(0.0);
    assert_eq!(e.state().score, 0.0);

    let floor_y = e.state().floor_y();
    assert_eq!(e.state().character.y, floor_y);
    assert_eq!(e.on_action_pressed(), ActionOutcome::Jumped);
    let jump_force = config.get().jump_force;
    assert!(jump_force < 0.0);
    assert_eq!(e.state().character.vertical_velocity, jump_force);
    assert!(!e.state().character.grounded);

    assert_eq!(config.get().gravity, 0.62);
    let mut frames = 0;
    while !e.state().character.grounded {
        e.step(FRAME_MS);
        frames += 1;
        assert!(frames < 200, "never landed");
        assert_ne!(e.state().phase, GamePhase::GameOver);
    }
    assert_eq!(e.state().character.y, floor_y);
    assert_eq!(e.state().character.vertical_velocity, 0.0);
}

#[test]
fn airborne_action_is_ignored() {
    let (mut e, _) = engine_with(MemoryStore::new());
    e.on_action_pressed();
    e.on_action_pressed();
    e.step(FRAME_MS);
    let velocity = e.state().character.vertical_velocity;
    assert_eq!(e.on_action_pressed(), ActionOutcome::Ignored);
    assert_eq!(e.state().character.vertical_velocity, velocity);
}

#[test]
fn collision_persists_new_high_score() {
    let (mut e, _) = engine_with(MemoryStore::with_score(3));
    e.on_action_pressed();
    run_into_first_obstacle(&mut e);

    let state = e.state();
    assert_eq!(state.phase, GamePhase::GameOver);
    let expected = 3u64.max(state.score.floor() as u64);
    assert_eq!(state.hi_score, expected);
    assert_eq!(e.store().stored(), Some(expected));
    assert_eq!(e.store().writes, 1);
}

#[test]
fn collision_below_record_keeps_store_untouched() {
    let (mut e, _) = engine_with(MemoryStore::with_score(1_000_000));
    e.on_action_pressed();
    run_into_first_obstacle(&mut e);

    assert_eq!(e.state().phase, GamePhase::GameOver);
    assert_eq!(e.state().hi_score, 1_000_000);
    assert_eq!(e.store().writes, 0);
}

#[test]
fn game_over_freezes_gameplay() {
    let (mut e, _) = engine_with(MemoryStore::new());
    e.on_action_pressed();
    run_into_first_obstacle(&mut e);

    let frozen = e.state().clone();
    for _ in 0..30 {
        e.step(FRAME_MS);
    }
    let state = e.state();
    assert_eq!(state.score, frozen.score);
    assert_eq!(state.scroll.ground, frozen.scroll.ground);
    assert_eq!(state.obstacles.len(), frozen.obstacles.len());
    assert_eq!(state.character.animation_frame_index, frozen.character.animation_frame_index);
    assert!(state.elapsed_time > frozen.elapsed_time);
}

#[test]
fn retry_starts_fresh_run() {
    let (mut e, config) = engine_with(MemoryStore::new());
    e.on_action_pressed();
    run_into_first_obstacle(&mut e);
    let hi = e.state().hi_score;

    assert_eq!(e.on_action_pressed(), ActionOutcome::Restarted);
    let state = e.state();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0.0);
    assert_eq!(state.speed, config.get().init_speed);
    assert_eq!(state.hi_score, hi);
    assert!(state.obstacles.is_empty());
    assert!(state.character.grounded);
}

#[test]
fn degenerate_live_config_does_not_stall() {
    let (mut e, config) = engine_with(MemoryStore::new());
    e.on_action_pressed();

    // Written straight into the shared handle, bypassing clamps
    let mut raw = config.get();
    raw.init_speed = 0.0;
    raw.max_speed = -3.0;
    raw.min_gap = 900.0;
    raw.max_gap = 10.0;
    raw.gravity = f32::NAN;
    config.set(raw);

    for _ in 0..600 {
        e.step(FRAME_MS);
        let state = e.state();
        assert!(state.speed.is_finite() && state.speed > 0.0);
        assert!(state.next_spawn_countdown.is_finite());
        assert!(state.obstacles.len() < 20);
        assert!(state.character.y <= state.floor_y());
    }
}

#[test]
fn slider_writes_are_clamped() {
    let (mut e, config) = engine_with(MemoryStore::new());
    e.set_tunable(Tunable::MaxSpeed, 1_000.0);
    e.set_tunable(Tunable::MinGap, -50.0);
    let (_, max_hi) = Tunable::MaxSpeed.range();
    let (gap_lo, _) = Tunable::MinGap.range();
    assert_eq!(config.get().max_speed, max_hi);
    assert_eq!(config.get().min_gap, gap_lo);
}

#[test]
fn renders_every_phase_to_pixels() {
    let (mut e, _) = engine_with(MemoryStore::new());
    let mut frame = PixelBuffer::new(800, 450);
    let unloaded = PixelBuffer::new(0, 0);

    e.frame(0.0, &mut frame, Some(&unloaded));
    let sky = frame.pixel(400, 5).expect("in bounds");
    let ground = frame.pixel(400, 440).expect("in bounds");
    assert_eq!(sky.a, 255);
    assert_ne!(sky, ground);

    e.on_action_pressed();
    let mut t = 0.0;
    loop {
        t += FRAME_MS as f64;
        if e.frame(t, &mut frame, Some(&unloaded)).game_over {
            break;
        }
        assert!(t < 60_000.0, "no collision");
    }
    e.frame(t + FRAME_MS as f64, &mut frame, Some(&unloaded));
    assert_eq!(e.state().phase, GamePhase::GameOver);
}
