//! Procedural audio
//!
//! - `synth`: voices, envelopes, and noise described as schedules
//! - `render`: offline PCM rendering of those schedules
//! - `backend`: the output trait plus an in-memory backend
//! - `cues`: maps game events to sounds
//! - `web`: Web Audio backend (wasm32 only)

pub mod backend;
pub mod cues;
pub mod render;
pub mod synth;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use backend::{AudioError, AudioOutput, Clip, OfflineOutput};
pub use cues::{CuePlan, CuePlayer, KID_DROP_CLIP, WAVE_CLIPS, all_clips, plan_cue};
pub use render::Mixdown;
pub use synth::{GAIN_FLOOR, ToneSegment, Voice, Waveform};
#[cfg(target_arch = "wasm32")]
pub use web::WebAudioOutput;
