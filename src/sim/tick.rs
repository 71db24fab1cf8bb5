//! Frame-delta simulation step
//!
//! `advance` is the single per-frame update; `resolve_tap` handles input.
//! Both take the state explicitly and report events through a `CueSink`.

use glam::Vec2;

use super::collision::topmost_hit;
use super::event::{CueSink, GameEvent, LifeLossReason};
use super::spawn::spawn_disc;
use super::state::{GamePhase, GameState};
use crate::config::GameConfig;
use crate::consts::*;

/// What a tap landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Sacred,
    Decoy,
}

/// Begin a fresh run (valid from any phase)
pub fn start(state: &mut GameState, config: GameConfig) {
    debug_assert!(config.validate().is_ok(), "invalid config: {config:?}");
    state.reset(config);
    state.phase = GamePhase::Running;
    log::info!(
        "Run started: sacred={} lives={} field={}x{}",
        state.config.sacred_value,
        state.lives,
        state.config.field_width,
        state.config.field_height
    );
}

/// Advance the running game by `dt` seconds
pub fn advance(state: &mut GameState, dt: f32, cues: &mut impl CueSink) {
    if !state.is_running() {
        return;
    }
    // Bounded so the spawn accumulator stays finite and always drains
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_STEP_SECS) } else { 0.0 };
    state.elapsed += dt as f64;

    // Spawn cadence; a long frame catches up with several spawns
    state.spawn_timer_ms += dt * 1000.0;
    while state.spawn_timer_ms >= state.spawn_interval_ms {
        spawn_disc(state);
        state.spawn_timer_ms -= state.spawn_interval_ms;
    }

    // Fall
    for disc in &mut state.discs {
        disc.pos.y += disc.speed * dt;
    }

    // Bottom exit
    let field_height = state.config.field_height;
    let mut slipped = 0usize;
    state.discs.retain(|disc| {
        if disc.below(field_height) {
            if disc.sacred {
                slipped += 1;
            }
            false
        } else {
            true
        }
    });
    for _ in 0..slipped {
        lose_life(state, LifeLossReason::SlippedThrough, true, cues);
    }
    if !state.is_running() {
        return;
    }

    // Wave timer
    state.wave_timer -= dt;
    if state.wave_timer <= 0.0 {
        level_up(state, cues);
    }

    // Cosmetic fade
    state.fade_progress = (state.fade_progress + dt / state.config.sacred_fade_seconds).min(1.0);

    // Status message lifetime
    if let Some(status) = &mut state.status {
        status.timer -= dt;
        if status.timer <= 0.0 {
            state.status = None;
        }
    }
}

/// Resolve a tap at a field coordinate; at most one disc is consumed
pub fn resolve_tap(
    state: &mut GameState,
    point: Vec2,
    cues: &mut impl CueSink,
) -> Option<TapOutcome> {
    if !state.is_running() {
        return None;
    }
    let index = topmost_hit(&state.discs, point)?;
    let disc = state.discs.remove(index);
    log::debug!("tap hit #{} value={} at ({:.1}, {:.1})", disc.id, disc.value, point.x, point.y);

    if disc.sacred {
        state.score += state.config.sacred_score;
        state.flash_at = Some(state.elapsed);
        cues.cue(GameEvent::SacredHit { score: state.score });
        Some(TapOutcome::Sacred)
    } else {
        lose_life(state, LifeLossReason::WrongTap, false, cues);
        Some(TapOutcome::Decoy)
    }
}

/// Take one life; ends the run at zero
pub fn lose_life(
    state: &mut GameState,
    reason: LifeLossReason,
    sacred_drop: bool,
    cues: &mut impl CueSink,
) {
    if !state.is_running() {
        return;
    }
    state.lives = state.lives.saturating_sub(1);
    let message = reason.message(state.config.sacred_value);
    state.set_status(message, LIFE_LOSS_STATUS_SECS);

    cues.cue(GameEvent::Miss { reason });
    if sacred_drop {
        cues.cue(GameEvent::KidDrop);
    }

    if state.lives == 0 {
        state.phase = GamePhase::Ended;
        log::info!("Game over ({reason:?}): score {} at level {}", state.score, state.level);
        cues.cue(GameEvent::GameOver {
            score: state.score,
            reason,
        });
    }
}

/// Length of the wave that starts at `level`
pub fn wave_length(config: &GameConfig, level: u32) -> f32 {
    let fraction = (1.0 - level as f32 * WAVE_SHRINK_PER_LEVEL).max(WAVE_FLOOR_FRACTION);
    config.wave_seconds * fraction
}

/// Move to the next level and tighten the spawn cadence
pub fn level_up(state: &mut GameState, cues: &mut impl CueSink) {
    state.level += 1;
    state.wave_timer = wave_length(&state.config, state.level);
    state.spawn_interval_ms = (state.spawn_interval_ms * SPAWN_INTERVAL_DECAY)
        .max(state.config.min_spawn_interval_ms);
    state.set_status(format!("Level {}", state.level), LEVEL_UP_STATUS_SECS);
    log::info!(
        "Level {}: wave {:.1}s, spawn every {:.0}ms",
        state.level,
        state.wave_timer,
        state.spawn_interval_ms
    );
    cues.cue(GameEvent::LevelUp { level: state.level });
}

/// Apply a new field size from the presentation layer
pub fn resize(state: &mut GameState, width: f32, height: f32) {
    if width > 0.0 && height > 0.0 {
        state.config.field_width = width;
        state.config.field_height = height;
    }
}
