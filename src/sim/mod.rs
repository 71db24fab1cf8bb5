//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod event;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{disc_contains, topmost_hit};
pub use event::{CueSink, GameEvent, LifeLossReason};
pub use spawn::{sacred_chance, spawn_disc};
pub use state::{Disc, GamePhase, GameState, Snapshot, StatusMessage};
pub use tick::{TapOutcome, advance, level_up, lose_life, resize, resolve_tap, start, wave_length};
