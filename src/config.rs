//! Game configuration
//!
//! Every recognized option has a default matching the reference tuning.
//! Hosts may override any subset through a JSON object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::VALUE_RANGE;

/// Errors raised while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Simulation options supplied to `start`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play-field width in field units
    pub field_width: f32,
    /// Play-field height in field units
    pub field_height: f32,

    // === Motion ===
    /// Slowest fall speed at level 1 (units/s)
    pub min_speed: f32,
    /// Fastest fall speed at level 1 (units/s)
    pub max_speed: f32,

    // === Spawning ===
    /// Spawn interval at the start of a run (ms)
    pub base_spawn_interval_ms: f32,
    /// Spawn interval never shrinks below this (ms)
    pub min_spawn_interval_ms: f32,
    /// Length of the first wave (seconds)
    pub wave_seconds: f32,

    // === Rules ===
    pub max_lives: u8,
    /// The one value the player must tap
    pub sacred_value: u8,
    /// Points awarded per sacred tap
    pub sacred_score: u64,

    /// Seconds for the sacred color to fade from start to end palette
    pub sacred_fade_seconds: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 960.0,
            field_height: 640.0,

            min_speed: 95.0,
            max_speed: 165.0,

            base_spawn_interval_ms: 1000.0,
            min_spawn_interval_ms: 320.0,
            wave_seconds: 32.0,

            max_lives: 3,
            sacred_value: 67,
            sacred_score: 67,

            sacred_fade_seconds: 60.0,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON object; missing keys take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values `start` relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }
        // Both are false when either side is NaN
        fn positive(x: f32) -> bool {
            x > 0.0
        }
        fn at_least(x: f32, min: f32) -> bool {
            x >= min
        }

        if !positive(self.field_width) {
            return invalid("field_width", "must be positive");
        }
        if !positive(self.field_height) {
            return invalid("field_height", "must be positive");
        }
        if !positive(self.min_speed) {
            return invalid("min_speed", "must be positive");
        }
        if !at_least(self.max_speed, self.min_speed) {
            return invalid("max_speed", "must be at least min_speed");
        }
        if !positive(self.min_spawn_interval_ms) {
            return invalid("min_spawn_interval_ms", "must be positive");
        }
        if !at_least(self.base_spawn_interval_ms, self.min_spawn_interval_ms) {
            return invalid("base_spawn_interval_ms", "must be at least min_spawn_interval_ms");
        }
        if !positive(self.wave_seconds) {
            return invalid("wave_seconds", "must be positive");
        }
        if !positive(self.sacred_fade_seconds) {
            return invalid("sacred_fade_seconds", "must be positive");
        }
        if self.max_lives == 0 {
            return invalid("max_lives", "must be at least 1");
        }
        if self.sacred_value >= VALUE_RANGE {
            return invalid("sacred_value", "must be in 0..=99");
        }
        Ok(())
    }
}

/// Audio preferences for the cue player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master gain applied to synthesized cues (0.0 - 1.0)
    pub master_volume: f32,
    /// Multiplier applied to clip volumes (0.0 - 1.0)
    pub clip_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.24,
            clip_volume: 1.0,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Clamp volumes into 0.0 - 1.0
    pub fn clamped(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.clip_volume = self.clip_volume.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sacred_value, 67);
        assert_eq!(config.max_lives, 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "sacred_value": 7, "max_lives": 5 }"#).unwrap();
        assert_eq!(config.sacred_value, 7);
        assert_eq!(config.max_lives, 5);
        assert_eq!(config.wave_seconds, 32.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GameConfig::from_json(r#"{ "field_width": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "field_width", .. }));

        let err = GameConfig::from_json(r#"{ "sacred_value": 100 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "sacred_value", .. }));

        let err = GameConfig::from_json(r#"{ "min_speed": 200, "max_speed": 100 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_speed", .. }));
    }

    #[test]
    fn test_rejects_nan() {
        let config = GameConfig {
            wave_seconds: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "wave_seconds", .. })
        ));

        let config = GameConfig {
            max_speed: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "max_speed", .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_audio_settings_clamped() {
        let settings = AudioSettings {
            master_volume: 3.0,
            clip_volume: -1.0,
            muted: false,
        }
        .clamped();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.clip_volume, 0.0);
    }
}
