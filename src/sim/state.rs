//! Game state and core simulation types
//!
//! A `GameState` is owned by its caller; nothing here is process-wide.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::FLASH_SECS;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run started yet
    Idle,
    /// Active gameplay
    Running,
    /// Lives ran out
    Ended,
}

/// A falling numbered disc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub id: u32,
    pub value: u8,
    pub sacred: bool,
    /// Center; y grows downward, x is fixed at spawn
    pub pos: Vec2,
    pub radius: f32,
    /// Fall speed (units/s)
    pub speed: f32,
}

impl Disc {
    /// Text drawn on the disc
    pub fn label(&self) -> String {
        self.value.to_string()
    }

    /// Vertical nudge for the label baseline
    pub fn label_offset(&self) -> f32 {
        if self.label().len() >= 3 { 3.0 } else { 2.0 }
    }

    /// True once the whole disc is below the field
    pub fn below(&self, field_height: f32) -> bool {
        self.pos.y - self.radius > field_height
    }
}

/// Ephemeral on-screen message
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    /// Seconds left on screen
    pub timer: f32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    /// Live discs in spawn order (last = most recent)
    pub discs: Vec<Disc>,
    pub score: u64,
    pub level: u32,
    pub lives: u8,
    /// Accumulated ms toward the next spawn
    pub spawn_timer_ms: f32,
    /// Current ms between spawns
    pub spawn_interval_ms: f32,
    /// Seconds left in the current wave
    pub wave_timer: f32,
    /// Cosmetic sacred color blend, 0..=1
    pub fade_progress: f32,
    pub status: Option<StatusMessage>,
    /// Simulation clock (seconds since start)
    pub elapsed: f64,
    /// Clock value of the last sacred hit
    pub flash_at: Option<f64>,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create an idle state with the given seed
    pub fn new(seed: u64) -> Self {
        let config = GameConfig::default();
        Self {
            phase: GamePhase::Idle,
            discs: Vec::new(),
            score: 0,
            level: 1,
            lives: config.max_lives,
            spawn_timer_ms: 0.0,
            spawn_interval_ms: config.base_spawn_interval_ms,
            wave_timer: config.wave_seconds,
            fade_progress: 0.0,
            status: None,
            elapsed: 0.0,
            flash_at: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            config,
        }
    }

    /// Reset every run field from `config`; the RNG stream carries on
    pub(crate) fn reset(&mut self, config: GameConfig) {
        self.phase = GamePhase::Idle;
        self.discs.clear();
        self.score = 0;
        self.level = 1;
        self.lives = config.max_lives;
        self.spawn_timer_ms = 0.0;
        self.spawn_interval_ms = config.base_spawn_interval_ms;
        self.wave_timer = config.wave_seconds;
        self.fade_progress = 0.0;
        self.status = None;
        self.elapsed = 0.0;
        self.flash_at = None;
        self.next_id = 1;
        self.config = config;
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Show a status message for `secs`
    pub fn set_status(&mut self, text: impl Into<String>, secs: f32) {
        self.status = Some(StatusMessage {
            text: text.into(),
            timer: secs,
        });
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            discs: &self.discs,
            score: self.score,
            level: self.level,
            lives: self.lives,
            max_lives: self.config.max_lives,
            wave_remaining: self.wave_timer.max(0.0),
            status: self
                .status
                .as_ref()
                .filter(|s| s.timer > 0.0 && !s.text.is_empty())
                .map(|s| s.text.as_str()),
            fade_progress: self.fade_progress,
            flash_at: self.flash_at,
            elapsed: self.elapsed,
            field: Vec2::new(self.config.field_width, self.config.field_height),
        }
    }
}

/// Per-frame view of the state
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub discs: &'a [Disc],
    pub score: u64,
    pub level: u32,
    pub lives: u8,
    pub max_lives: u8,
    /// Seconds left in the wave, never negative
    pub wave_remaining: f32,
    /// Visible status text, if any
    pub status: Option<&'a str>,
    pub fade_progress: f32,
    pub flash_at: Option<f64>,
    pub elapsed: f64,
    /// Field width and height
    pub field: Vec2,
}

impl Snapshot<'_> {
    /// Whether the sacred-hit flash should be drawn this frame
    pub fn flash_active(&self) -> bool {
        self.flash_at
            .is_some_and(|at| self.elapsed - at < FLASH_SECS)
    }
}
