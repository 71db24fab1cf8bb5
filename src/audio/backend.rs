//! Audio output backends
//!
//! A backend schedules synthesized voices and plays short clips. Either
//! capability may be missing; callers check before scheduling.

use thiserror::Error;

use super::render::Mixdown;
use super::synth::{NoiseBurst, Voice};

/// Failures reported by a backend (callers log and continue)
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio backend unavailable")]
    Unavailable,
    #[error("audio node error: {0}")]
    Node(String),
    #[error("unknown clip `{0}`")]
    UnknownClip(&'static str),
    #[error("clip playback rejected: {0}")]
    Rejected(String),
}

/// A short pre-loaded sound file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub path: &'static str,
    /// Base playback volume (0.0 - 1.0)
    pub volume: f32,
}

/// Something that can make noise
pub trait AudioOutput {
    /// Backend clock (seconds); voices are scheduled against it
    fn now(&self) -> f64;

    fn sample_rate(&self) -> u32;

    /// Whether voices and noise can be scheduled
    fn can_synthesize(&self) -> bool;

    /// Whether clips can be played
    fn can_play_clips(&self) -> bool;

    /// Wake a suspended device (browsers require a user gesture)
    fn resume(&mut self) {}

    /// Gain applied to every synthesized voice
    fn set_master_gain(&mut self, gain: f32);

    fn play_voice(&mut self, voice: &Voice) -> Result<(), AudioError>;

    fn play_noise(&mut self, noise: &NoiseBurst) -> Result<(), AudioError>;

    /// Start an independent instance of `clip`
    fn play_clip(&mut self, clip: &Clip, volume: f32, playback_rate: f32) -> Result<(), AudioError>;
}

/// Renders everything into an in-memory mix; clips are recorded with their volume
#[derive(Debug, Clone)]
pub struct OfflineOutput {
    mix: Mixdown,
    clock: f64,
    master: f32,
    clips: Vec<(&'static str, f32)>,
}

impl OfflineOutput {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            mix: Mixdown::new(sample_rate),
            clock: 0.0,
            master: 1.0,
            clips: Vec::new(),
        }
    }

    /// Move the clock forward by `dt` seconds
    pub fn advance_clock(&mut self, dt: f64) {
        self.clock += dt.max(0.0);
    }

    pub fn mix(&self) -> &Mixdown {
        &self.mix
    }

    /// Clips started so far as `(path, volume)`, in order
    pub fn clips_played(&self) -> &[(&'static str, f32)] {
        &self.clips
    }
}

impl AudioOutput for OfflineOutput {
    fn now(&self) -> f64 {
        self.clock
    }

    fn sample_rate(&self) -> u32 {
        self.mix.sample_rate()
    }

    fn can_synthesize(&self) -> bool {
        true
    }

    fn can_play_clips(&self) -> bool {
        true
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.master = gain;
    }

    fn play_voice(&mut self, voice: &Voice) -> Result<(), AudioError> {
        self.mix.add_voice(voice, self.master);
        Ok(())
    }

    fn play_noise(&mut self, noise: &NoiseBurst) -> Result<(), AudioError> {
        self.mix.add_noise(noise, self.master);
        Ok(())
    }

    fn play_clip(&mut self, clip: &Clip, volume: f32, _playback_rate: f32) -> Result<(), AudioError> {
        self.clips.push((clip.path, volume));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth::{Waveform, tone};

    #[test]
    fn test_offline_clock_never_rewinds() {
        let mut out = OfflineOutput::new(8_000);
        out.advance_clock(0.5);
        out.advance_clock(-1.0);
        assert_eq!(out.now(), 0.5);
    }

    #[test]
    fn test_offline_records_clips_in_order() {
        let mut out = OfflineOutput::new(8_000);
        let a = Clip { path: "a.mp3", volume: 0.7 };
        let b = Clip { path: "b.mp3", volume: 0.8 };
        out.play_clip(&a, 0.7, 1.0).unwrap();
        out.play_clip(&b, 0.4, 1.0).unwrap();
        out.play_clip(&a, 0.7, 1.0).unwrap();
        assert_eq!(out.clips_played(), [("a.mp3", 0.7), ("b.mp3", 0.4), ("a.mp3", 0.7)]);
    }

    #[test]
    fn test_offline_applies_master_gain() {
        let voice = tone(Waveform::Square, 300.0, 0.0, 0.1, 0.5);
        let mut full = OfflineOutput::new(8_000);
        full.play_voice(&voice).unwrap();
        let mut quiet = OfflineOutput::new(8_000);
        quiet.set_master_gain(0.5);
        quiet.play_voice(&voice).unwrap();
        assert!((quiet.mix().peak() - full.mix().peak() * 0.5).abs() < 1e-4);
    }
}
