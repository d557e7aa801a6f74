//! Live-tunable physics parameters
//!
//! Owned by the surrounding UI (sliders), persisted separately from the high
//! score in LocalStorage. The engine re-reads the shared handle every frame.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_SPEED;

/// Shared live handle: the UI writes, the engine reads once per frame
pub type SharedConfig = Rc<Cell<PhysicsConfig>>;

/// Named tunable parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tunable {
    Gravity,
    JumpForce,
    InitSpeed,
    MaxSpeed,
    SpeedRate,
    MinGap,
    MaxGap,
}

impl Tunable {
    pub const ALL: [Tunable; 7] = [
        Tunable::Gravity,
        Tunable::JumpForce,
        Tunable::InitSpeed,
        Tunable::MaxSpeed,
        Tunable::SpeedRate,
        Tunable::MinGap,
        Tunable::MaxGap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tunable::Gravity => "gravity",
            Tunable::JumpForce => "jump_force",
            Tunable::InitSpeed => "init_speed",
            Tunable::MaxSpeed => "max_speed",
            Tunable::SpeedRate => "speed_rate",
            Tunable::MinGap => "min_gap",
            Tunable::MaxGap => "max_gap",
        }
    }

    /// Look up a tunable by its slider name; case and `-`/`_` are ignored
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "gravity" => Some(Tunable::Gravity),
            "jump_force" | "jump" => Some(Tunable::JumpForce),
            "init_speed" => Some(Tunable::InitSpeed),
            "max_speed" => Some(Tunable::MaxSpeed),
            "speed_rate" => Some(Tunable::SpeedRate),
            "min_gap" => Some(Tunable::MinGap),
            "max_gap" => Some(Tunable::MaxGap),
            _ => None,
        }
    }

    /// Valid (inclusive) range for this parameter
    pub fn range(&self) -> (f32, f32) {
        match self {
            Tunable::Gravity => (0.1, 2.0),
            // Negative is upward
            Tunable::JumpForce => (-24.0, -4.0),
            Tunable::InitSpeed => (1.0, 12.0),
            Tunable::MaxSpeed => (2.0, 30.0),
            Tunable::SpeedRate => (0.0, 0.02),
            Tunable::MinGap => (120.0, 1200.0),
            Tunable::MaxGap => (120.0, 1600.0),
        }
    }

    pub fn default_value(&self) -> f32 {
        PhysicsConfig::default().get(*self)
    }
}

/// Physics parameters as the UI sees them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Added to vertical velocity every frame (px/frame²)
    pub gravity: f32,
    /// Vertical velocity set on jump (px/frame, negative = up)
    pub jump_force: f32,
    /// Speed at the start of every run (px/frame)
    pub init_speed: f32,
    /// Speed ceiling (px/frame)
    pub max_speed: f32,
    /// Speed gained per point of score
    pub speed_rate: f32,
    /// Smallest pixel gap between obstacle spawns
    pub min_gap: f32,
    /// Largest pixel gap between obstacle spawns
    pub max_gap: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.62,
            jump_force: -12.5,
            init_speed: 5.0,
            max_speed: 11.0,
            speed_rate: 0.0025,
            min_gap: 520.0,
            max_gap: 900.0,
        }
    }
}

impl PhysicsConfig {
    pub fn get(&self, tunable: Tunable) -> f32 {
        match tunable {
            Tunable::Gravity => self.gravity,
            Tunable::JumpForce => self.jump_force,
            Tunable::InitSpeed => self.init_speed,
            Tunable::MaxSpeed => self.max_speed,
            Tunable::SpeedRate => self.speed_rate,
            Tunable::MinGap => self.min_gap,
            Tunable::MaxGap => self.max_gap,
        }
    }

    /// Write a parameter, clamped into its valid range
    pub fn set(&mut self, tunable: Tunable, value: f32) {
        let value = clamp_param(tunable, value);
        match tunable {
            Tunable::Gravity => self.gravity = value,
            Tunable::JumpForce => self.jump_force = value,
            Tunable::InitSpeed => self.init_speed = value,
            Tunable::MaxSpeed => self.max_speed = value,
            Tunable::SpeedRate => self.speed_rate = value,
            Tunable::MinGap => self.min_gap = value,
            Tunable::MaxGap => self.max_gap = value,
        }
    }

    /// Per-frame snapshot with derived clamps applied.
    ///
    /// Re-clamps every field. The speed ceiling never sits below the starting
    /// speed and the gap range is ordered.
    pub fn sanitized(&self) -> PhysicsConfig {
        let mut cfg = *self;
        for tunable in Tunable::ALL {
            cfg.set(tunable, self.get(tunable));
        }
        cfg.init_speed = cfg.init_speed.max(MIN_SPEED);
        cfg.max_speed = cfg.max_speed.max(cfg.init_speed);
        let (lo, hi) = if cfg.min_gap <= cfg.max_gap {
            (cfg.min_gap, cfg.max_gap)
        } else {
            (cfg.max_gap, cfg.min_gap)
        };
        cfg.min_gap = lo.max(1.0);
        cfg.max_gap = hi.max(cfg.min_gap);
        cfg
    }

    /// Speed reached after accumulating `score`
    pub fn speed_for_score(&self, score: f32) -> f32 {
        (self.init_speed + score * self.speed_rate).min(self.max_speed)
    }

    /// Wrap into a live handle
    pub fn shared(self) -> SharedConfig {
        Rc::new(Cell::new(self))
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "skyline_runner_config";

    /// Load tunables from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(config) = serde_json::from_str::<PhysicsConfig>(&json) {
                    log::info!("Loaded physics config from LocalStorage");
                    return config.sanitized();
                }
            }
        }

        log::info!("Using default physics config");
        Self::default()
    }

    /// Save tunables to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::debug!("Physics config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

fn clamp_param(tunable: Tunable, value: f32) -> f32 {
    let (lo, hi) = tunable.range();
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        log::warn!("Ignoring non-finite {} = {}", tunable.as_str(), value);
        PhysicsConfig::default().get(tunable)
    }
}
