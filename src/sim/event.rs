//! Events emitted by the simulation.
//!
//! The cue player consumes these for sound; the engine never waits on them.

use serde::{Deserialize, Serialize};

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeLossReason {
    /// A sacred disc left the bottom of the field
    SlippedThrough,
    /// A decoy disc was tapped
    WrongTap,
}

impl LifeLossReason {
    /// Status text shown to the player
    pub fn message(&self, sacred_value: u8) -> String {
        match self {
            LifeLossReason::SlippedThrough => format!("You let a {sacred_value} slip through!"),
            LifeLossReason::WrongTap => "That imposter drained the vibe.".to_string(),
        }
    }
}

/// Semantic gameplay events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A sacred disc was tapped
    SacredHit { score: u64 },
    /// A life was lost
    Miss { reason: LifeLossReason },
    /// The wave timer expired and the level advanced
    LevelUp { level: u32 },
    /// Lives reached zero
    GameOver { score: u64, reason: LifeLossReason },
    /// A sacred disc slipped through
    KidDrop,
}

/// Receiver of simulation events
pub trait CueSink {
    fn cue(&mut self, event: GameEvent);
}

/// Discards every event
impl CueSink for () {
    fn cue(&mut self, _event: GameEvent) {}
}

/// Records events in emission order
impl CueSink for Vec<GameEvent> {
    fn cue(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<S: CueSink + ?Sized> CueSink for &mut S {
    fn cue(&mut self, event: GameEvent) {
        (**self).cue(event);
    }
}
