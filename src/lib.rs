//! Sacred Tap - a falling-number tap arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, hit-testing, lives/score)
//! - `audio`: Procedural cue synthesis and playback
//! - `config`: Game configuration with documented defaults
//! - `palette`: Cosmetic colors read by the presentation layer
//! - `hud`: HUD text read by the presentation layer

pub mod audio;
pub mod config;
pub mod hud;
pub mod palette;
pub mod sim;

pub use config::{AudioSettings, ConfigError, GameConfig};

/// Game tuning constants
pub mod consts {
    /// Values are drawn from `0..VALUE_RANGE`
    pub const VALUE_RANGE: u8 = 100;

    /// Sacred spawn chance: `min(CAP, BASE + level * PER_LEVEL)`
    pub const SACRED_CHANCE_BASE: f32 = 0.18;
    pub const SACRED_CHANCE_PER_LEVEL: f32 = 0.05;
    pub const SACRED_CHANCE_CAP: f32 = 0.32;

    /// Disc size derives from a randomized label font size
    pub const FONT_SIZE_MIN: f32 = 28.0;
    pub const FONT_SIZE_SPREAD: f32 = 24.0;
    pub const RADIUS_PER_FONT_SIZE: f32 = 0.7;

    /// Fall speed multiplier gained per level above 1
    pub const SPEED_GROWTH_PER_LEVEL: f32 = 0.12;

    /// Wave length shrinks per level, never below this fraction of base
    pub const WAVE_SHRINK_PER_LEVEL: f32 = 0.05;
    pub const WAVE_FLOOR_FRACTION: f32 = 0.6;
    /// Spawn interval multiplier applied on each level-up
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.9;

    /// Status message lifetimes (seconds)
    pub const LIFE_LOSS_STATUS_SECS: f32 = 1.2;
    pub const LEVEL_UP_STATUS_SECS: f32 = 1.6;

    /// Longest single step `advance` will simulate (seconds)
    pub const MAX_STEP_SECS: f32 = 60.0;

    /// Screen flash after a sacred hit (seconds)
    pub const FLASH_SECS: f64 = 0.12;
}
