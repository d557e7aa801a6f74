//! Frame driver
//!
//! `GameEngine` owns the one live `GameState` and is the only thing that
//! mutates it. Platform glue pumps `frame` once per display refresh and routes
//! input through `on_action_pressed` / `on_resize`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{SharedConfig, Tunable};
use crate::consts::FRAME_MS;
use crate::highscores::HighScoreStore;
use crate::renderer::{Renderer, Surface};
use crate::sim::autopilot::should_jump;
use crate::sim::{ActionOutcome, GamePhase, GameState, TickEvents, Viewport, on_action, tick};

/// Read-only view for HUD text and overlays
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub hi_score: u64,
    pub speed: f32,
    /// Background music should be playing
    pub music: bool,
}

/// Owns the game state, RNG, and high score store for the whole session
pub struct GameEngine<H: HighScoreStore> {
    state: GameState,
    rng: Pcg32,
    config: SharedConfig,
    store: H,
    renderer: Renderer,
    last_timestamp: Option<f64>,
    autopilot: bool,
    music_enabled: bool,
    torn_down: bool,
}

impl<H: HighScoreStore> GameEngine<H> {
    /// Build the first run in `Intro`, seeded with the stored high score
    pub fn new(width: f32, height: f32, config: SharedConfig, store: H, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let hi_score = store.load();
        let state = GameState::new(Viewport::new(width, height), hi_score, &config.get(), &mut rng);
        log::info!(
            "Engine ready: {}x{} seed {} hi {}",
            state.viewport.width,
            state.viewport.height,
            seed,
            hi_score
        );

        Self {
            state,
            rng,
            config,
            store,
            renderer: Renderer::default(),
            last_timestamp: None,
            autopilot: false,
            music_enabled: false,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// The single logical input: start, jump, or retry depending on phase
    pub fn on_action_pressed(&mut self) -> ActionOutcome {
        let config = self.config.get();
        let outcome = on_action(&mut self.state, &config, &mut self.rng);
        match outcome {
            ActionOutcome::Started => log::info!("Run started"),
            ActionOutcome::Restarted => log::info!("Retry (hi score {})", self.state.hi_score),
            ActionOutcome::Jumped | ActionOutcome::Ignored => {}
        }
        outcome
    }

    /// Relayout for a new viewport size. Score and phase are untouched.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport == self.state.viewport {
            return;
        }
        log::debug!("Resize to {}x{}", viewport.width, viewport.height);
        self.state.resize(viewport, &mut self.rng);
    }

    /// Advance the simulation by `dt` milliseconds (clamped) without drawing
    pub fn step(&mut self, dt: f32) -> TickEvents {
        if self.autopilot && should_jump(&self.state) {
            self.on_action_pressed();
        }

        let config = self.config.get();
        let events = tick(&mut self.state, &config, dt, &mut self.rng);
        if let Some(score) = events.new_high_score {
            log::info!("New high score: {}", score);
            self.store.save(score);
        }
        events
    }

    /// Draw the current state
    pub fn render<S: Surface>(&self, surface: &mut S, sprite: Option<&S::Image>) {
        self.renderer.render(surface, &self.state, sprite);
    }

    /// One display refresh: derive `dt` from the timestamp, step, then draw.
    /// No-op after `teardown`.
    pub fn frame<S: Surface>(
        &mut self,
        timestamp_ms: f64,
        surface: &mut S,
        sprite: Option<&S::Image>,
    ) -> TickEvents {
        if self.torn_down {
            return TickEvents::default();
        }

        let dt = match self.last_timestamp {
            Some(last) => (timestamp_ms - last) as f32,
            None => FRAME_MS,
        };
        self.last_timestamp = Some(timestamp_ms);

        let events = self.step(dt);
        self.render(surface, sprite);
        events
    }

    /// Forget the frame clock so the next frame does not see the pause as `dt`
    pub fn suspend_clock(&mut self) {
        self.last_timestamp = None;
    }

    /// Stop driving frames. Further `frame` calls do nothing.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            log::info!("Engine torn down at score {}", self.state.whole_score());
        }
        self.torn_down = true;
        self.music_enabled = false;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            phase: self.state.phase,
            score: self.state.whole_score(),
            hi_score: self.state.hi_score,
            speed: self.state.speed,
            music: self.music_signal(),
        }
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.autopilot != enabled {
            log::info!("Autopilot {}", if enabled { "on" } else { "off" });
        }
        self.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    /// On/off signal for the external music scheduler
    pub fn music_signal(&self) -> bool {
        self.music_enabled && !self.torn_down && self.state.phase == GamePhase::Playing
    }

    /// Write one tunable through the shared handle (clamped to its range)
    pub fn set_tunable(&mut self, tunable: Tunable, value: f32) {
        let mut config = self.config.get();
        config.set(tunable, value);
        self.config.set(config);
    }
}
