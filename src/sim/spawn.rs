//! Spawn policy
//!
//! The sacred chance is re-rolled per spawn from the current level, so the
//! difficulty curve applies mid-wave as soon as the level changes.

use glam::Vec2;
use rand::Rng;

use super::state::{Disc, GameState};
use crate::consts::*;

/// Probability that the next spawn is sacred at `level`
pub fn sacred_chance(level: u32) -> f32 {
    (SACRED_CHANCE_BASE + level as f32 * SACRED_CHANCE_PER_LEVEL).min(SACRED_CHANCE_CAP)
}

/// Speed multiplier at `level`
pub fn speed_scale(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * SPEED_GROWTH_PER_LEVEL
}

/// Draw a decoy value, never equal to `sacred`
pub fn decoy_value<R: Rng>(rng: &mut R, sacred: u8) -> u8 {
    loop {
        let value = rng.random_range(0..VALUE_RANGE);
        if value != sacred {
            return value;
        }
    }
}

/// Spawn one disc just above the top edge
pub fn spawn_disc(state: &mut GameState) {
    let level = state.level;
    let sacred_value = state.config.sacred_value;
    let width = state.config.field_width;
    let (min_speed, max_speed) = (state.config.min_speed, state.config.max_speed);

    let rng = state.rng();
    let sacred = rng.random::<f32>() < sacred_chance(level);
    let value = if sacred {
        sacred_value
    } else {
        decoy_value(rng, sacred_value)
    };

    let font_size = FONT_SIZE_MIN + rng.random::<f32>() * FONT_SIZE_SPREAD;
    let radius = font_size * RADIUS_PER_FONT_SIZE;
    // Narrow fields pin the disc to the left margin rather than going negative
    let x = radius + rng.random::<f32>() * (width - radius * 2.0).max(0.0);
    let speed =
        (min_speed + rng.random::<f32>() * (max_speed - min_speed)) * speed_scale(level);

    let id = state.next_entity_id();
    log::debug!("spawn #{id}: value={value} sacred={sacred} x={x:.1} speed={speed:.1}");
    state.discs.push(Disc {
        id,
        value,
        sacred,
        pos: Vec2::new(x, -radius),
        radius,
        speed,
    });
}
