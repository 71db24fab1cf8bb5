//! HUD and overlay text

use crate::sim::Snapshot;

/// Fields narrower than this show the wave timer in whole seconds
pub const NARROW_FIELD_WIDTH: f32 = 420.0;
/// Fields narrower than this use the small HUD font
pub const SMALL_FONT_WIDTH: f32 = 480.0;
/// Fields shorter than this get a taller HUD bar
pub const SHORT_FIELD_HEIGHT: f32 = 360.0;

pub const SPLASH_TEXT: &str = "Click start to unleash the 67.";
pub const GAME_OVER_TITLE: &str = "Meme Lost";
pub const RETRY_LABEL: &str = "Try Again";

pub fn score_label(score: u64) -> String {
    format!("Score: {score}")
}

/// `Level: N | Wave: X.Xs`, whole seconds on narrow fields
pub fn level_label(level: u32, wave_remaining: f32, narrow: bool) -> String {
    let wave = wave_remaining.max(0.0);
    if narrow {
        format!("Level: {level} | Wave: {wave:.0}s")
    } else {
        format!("Level: {level} | Wave: {wave:.1}s")
    }
}

/// One `#` per remaining life, one `-` per lost life
pub fn lives_gauge(lives: u8, max_lives: u8) -> String {
    let lost = max_lives.saturating_sub(lives);
    format!("Lives: {}{}", "#".repeat(lives as usize), "-".repeat(lost as usize))
}

pub fn game_over_message(reason: &str, score: u64) -> String {
    format!("{reason} Final score: {score}")
}

/// HUD bar height and font size for a field
pub fn hud_metrics(field_width: f32, field_height: f32) -> (f32, f32) {
    let height = if field_height < SHORT_FIELD_HEIGHT { 70.0 } else { 60.0 };
    let font = if field_width < SMALL_FONT_WIDTH { 16.0 } else { 18.0 };
    (height, font)
}

/// The three HUD strings, left to right
pub fn hud_line(snapshot: &Snapshot<'_>) -> [String; 3] {
    [
        score_label(snapshot.score),
        level_label(
            snapshot.level,
            snapshot.wave_remaining,
            snapshot.field.x < NARROW_FIELD_WIDTH,
        ),
        lives_gauge(snapshot.lives, snapshot.max_lives),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{GameState, resize, start};

    #[test]
    fn test_level_label_precision() {
        assert_eq!(level_label(3, 12.34, false), "Level: 3 | Wave: 12.3s");
        assert_eq!(level_label(3, 12.34, true), "Level: 3 | Wave: 12s");
        assert_eq!(level_label(1, -2.0, false), "Level: 1 | Wave: 0.0s");
    }

    #[test]
    fn test_lives_gauge() {
        assert_eq!(lives_gauge(3, 3), "Lives: ###");
        assert_eq!(lives_gauge(1, 3), "Lives: #--");
        assert_eq!(lives_gauge(0, 3), "Lives: ---");
    }

    #[test]
    fn test_game_over_message() {
        assert_eq!(
            game_over_message("That imposter drained the vibe.", 134),
            "That imposter drained the vibe. Final score: 134"
        );
    }

    #[test]
    fn test_hud_line_tracks_field_width() {
        let mut state = GameState::new(1);
        start(&mut state, GameConfig::default());
        let [score, level, lives] = hud_line(&state.snapshot());
        assert_eq!(score, "Score: 0");
        assert_eq!(level, "Level: 1 | Wave: 32.0s");
        assert_eq!(lives, "Lives: ###");

        resize(&mut state, 400.0, 300.0);
        let [_, level, _] = hud_line(&state.snapshot());
        assert_eq!(level, "Level: 1 | Wave: 32s");
        assert_eq!(hud_metrics(400.0, 300.0), (70.0, 16.0));
    }
}
