//! Cue player: turns game events into sound
//!
//! Each event becomes a `CuePlan` scheduled at the backend's current time.
//! Every play creates fresh voices, so rapid repeats overlap instead of
//! cutting each other off. Without a backend every call is a no-op.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::backend::{AudioOutput, Clip};
use super::synth::{NoiseBurst, ToneSegment, Voice, Waveform, burst, noise_ping, tone};
use crate::config::AudioSettings;
use crate::sim::{CueSink, GameEvent};

/// Flavor clips for level-ups
pub const WAVE_CLIPS: [Clip; 3] = [
    Clip { path: "kid-67.mp3", volume: 0.7 },
    Clip { path: "doot-doot-6-7.mp3", volume: 0.7 },
    Clip { path: "67-normal.mp3", volume: 0.7 },
];

/// Played when a sacred disc slips through
pub const KID_DROP_CLIP: Clip = Clip { path: "kid-67.mp3", volume: 0.8 };

/// Every clip a backend should pre-load
pub fn all_clips() -> impl Iterator<Item = Clip> {
    WAVE_CLIPS.into_iter().chain(std::iter::once(KID_DROP_CLIP))
}

/// What a single cue schedules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CuePlan {
    pub voices: Vec<Voice>,
    pub noise: Vec<NoiseBurst>,
    pub clip: Option<Clip>,
}

/// Build the sound for `event` starting at `now`.
///
/// `sample_rate` is `None` when synthesis is unavailable; the plan then
/// carries only its clip.
pub fn plan_cue<R: Rng>(event: GameEvent, now: f64, sample_rate: Option<u32>, rng: &mut R) -> CuePlan {
    let mut plan = CuePlan::default();

    match event {
        GameEvent::SacredHit { .. } => {
            if let Some(rate) = sample_rate {
                plan.voices = burst(&[
                    ToneSegment { freq: 440.0, start: now, duration: 0.08, gain: 0.4 },
                    ToneSegment { freq: 600.0, start: now + 0.08, duration: 0.1, gain: 0.5 },
                    ToneSegment { freq: 670.0, start: now + 0.18, duration: 0.12, gain: 0.5 },
                ]);
                plan.noise.push(noise_ping(rng, rate, now + 0.05, 0.18, 1200.0, 0.28));
            }
        }
        GameEvent::Miss { .. } => {
            if let Some(rate) = sample_rate {
                plan.voices
                    .push(tone(Waveform::Sawtooth, 480.0, now, 0.4, 0.28).sweep_to(220.0, now + 0.28));
                plan.noise.push(noise_ping(rng, rate, now, 0.22, 400.0, 0.2));
            }
        }
        GameEvent::LevelUp { .. } => {
            if sample_rate.is_some() {
                // Rising arpeggio: C5, E5, G5
                for (i, freq) in [523.0, 659.0, 784.0].into_iter().enumerate() {
                    plan.voices.extend(burst(&[ToneSegment {
                        freq,
                        start: now + i as f64 * 0.12,
                        duration: 0.1,
                        gain: 0.35,
                    }]));
                }
            }
            plan.clip = Some(WAVE_CLIPS[rng.random_range(0..WAVE_CLIPS.len())]);
        }
        GameEvent::GameOver { .. } => {
            if sample_rate.is_some() {
                plan.voices
                    .push(tone(Waveform::Triangle, 220.0, now, 0.6, 0.5).sweep_to(90.0, now + 0.5));
            }
        }
        GameEvent::KidDrop => {
            plan.clip = Some(KID_DROP_CLIP);
        }
    }

    plan
}

/// Plays cues on an optional backend
pub struct CuePlayer<O: AudioOutput> {
    output: Option<O>,
    settings: AudioSettings,
    rng: Pcg32,
}

impl<O: AudioOutput> CuePlayer<O> {
    pub fn new(output: Option<O>, settings: AudioSettings, seed: u64) -> Self {
        let settings = settings.clamped();
        let mut output = output;
        match output.as_mut() {
            Some(out) => out.set_master_gain(settings.master_volume),
            None => log::warn!("No audio backend - cues disabled"),
        }
        Self {
            output,
            settings,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// A player with no backend
    pub fn silent() -> Self {
        Self::new(None, AudioSettings::default(), 0)
    }

    pub fn is_available(&self) -> bool {
        self.output.is_some()
    }

    pub fn output(&self) -> Option<&O> {
        self.output.as_ref()
    }

    pub fn output_mut(&mut self) -> Option<&mut O> {
        self.output.as_mut()
    }

    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    /// Resume the backend (call from a user gesture)
    pub fn resume(&mut self) {
        if let Some(out) = self.output.as_mut() {
            out.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.settings.master_volume = vol.clamp(0.0, 1.0);
        if let Some(out) = self.output.as_mut() {
            out.set_master_gain(self.settings.master_volume);
        }
    }

    /// Set clip volume (0.0 - 1.0)
    pub fn set_clip_volume(&mut self, vol: f32) {
        self.settings.clip_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    /// Play the sound for `event`; failures are logged and dropped
    pub fn play(&mut self, event: GameEvent) {
        if self.settings.muted {
            return;
        }
        let Some(out) = self.output.as_mut() else {
            return;
        };

        let rate = out.can_synthesize().then(|| out.sample_rate());
        let plan = plan_cue(event, out.now(), rate, &mut self.rng);

        for voice in &plan.voices {
            if let Err(e) = out.play_voice(voice) {
                log::debug!("Voice for {event:?} skipped: {e}");
            }
        }
        for noise in &plan.noise {
            if let Err(e) = out.play_noise(noise) {
                log::debug!("Noise for {event:?} skipped: {e}");
            }
        }
        if let Some(clip) = plan.clip {
            if !out.can_play_clips() {
                return;
            }
            let volume = clip.volume * self.settings.clip_volume;
            if let Err(e) = out.play_clip(&clip, volume, 1.0) {
                log::debug!("Clip {} skipped: {e}", clip.path);
            }
        }
    }
}

impl<O: AudioOutput> CueSink for CuePlayer<O> {
    fn cue(&mut self, event: GameEvent) {
        self.play(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::{AudioError, OfflineOutput};
    use crate::sim::LifeLossReason;

    const SR: u32 = 22_050;

    fn player() -> CuePlayer<OfflineOutput> {
        let settings = AudioSettings {
            master_volume: 1.0,
            ..Default::default()
        };
        CuePlayer::new(Some(OfflineOutput::new(SR)), settings, 5)
    }

    fn mix_peak(player: &CuePlayer<OfflineOutput>) -> f32 {
        player.output().map(|o| o.mix().peak()).unwrap_or(0.0)
    }

    /// Clip-only backend: synthesis is unavailable
    #[derive(Default)]
    struct ClipsOnly {
        clips: Vec<&'static str>,
        voices: usize,
    }

    impl AudioOutput for ClipsOnly {
        fn now(&self) -> f64 {
            0.0
        }
        fn sample_rate(&self) -> u32 {
            0
        }
        fn can_synthesize(&self) -> bool {
            false
        }
        fn can_play_clips(&self) -> bool {
            true
        }
        fn set_master_gain(&mut self, _gain: f32) {}
        fn play_voice(&mut self, _voice: &Voice) -> Result<(), AudioError> {
            self.voices += 1;
            Err(AudioError::Unavailable)
        }
        fn play_noise(&mut self, _noise: &NoiseBurst) -> Result<(), AudioError> {
            self.voices += 1;
            Err(AudioError::Unavailable)
        }
        fn play_clip(&mut self, clip: &Clip, _volume: f32, _rate: f32) -> Result<(), AudioError> {
            self.clips.push(clip.path);
            Err(AudioError::Rejected("autoplay".into()))
        }
    }

    #[test]
    fn test_sacred_hit_plan() {
        let mut rng = Pcg32::seed_from_u64(1);
        let plan = plan_cue(GameEvent::SacredHit { score: 67 }, 2.0, Some(SR), &mut rng);
        let freqs: Vec<f32> = plan.voices.iter().map(|v| v.freq.from).collect();
        assert_eq!(freqs, vec![440.0, 600.0, 670.0]);
        assert!(plan.voices.iter().all(|v| v.waveform == Waveform::Square));
        assert!((plan.voices[2].start - 2.18).abs() < 1e-9);
        assert_eq!(plan.noise.len(), 1);
        assert_eq!(plan.noise[0].cutoff, 1200.0);
        assert!((plan.noise[0].start - 2.05).abs() < 1e-9);
        assert!(plan.clip.is_none());
    }

    #[test]
    fn test_miss_and_game_over_sweep_down() {
        let mut rng = Pcg32::seed_from_u64(1);
        let miss = plan_cue(
            GameEvent::Miss { reason: LifeLossReason::WrongTap },
            0.0,
            Some(SR),
            &mut rng,
        );
        assert_eq!(miss.voices[0].waveform, Waveform::Sawtooth);
        assert_eq!(miss.voices[0].freq.sweep, Some((220.0, 0.28)));
        assert_eq!(miss.noise[0].cutoff, 400.0);

        let over = plan_cue(
            GameEvent::GameOver { score: 0, reason: LifeLossReason::WrongTap },
            1.0,
            Some(SR),
            &mut rng,
        );
        assert_eq!(over.voices.len(), 1);
        assert_eq!(over.voices[0].waveform, Waveform::Triangle);
        assert_eq!(over.voices[0].freq.freq_at(1.6), 90.0);
        assert!(over.noise.is_empty());
    }

    #[test]
    fn test_level_up_picks_wave_clip() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..20 {
            let plan = plan_cue(GameEvent::LevelUp { level: 2 }, 0.0, Some(SR), &mut rng);
            assert_eq!(plan.voices.len(), 3);
            let clip = plan.clip.unwrap();
            assert!(WAVE_CLIPS.contains(&clip));
        }
    }

    #[test]
    fn test_no_synth_plan_keeps_clip() {
        let mut rng = Pcg32::seed_from_u64(3);
        let plan = plan_cue(GameEvent::LevelUp { level: 2 }, 0.0, None, &mut rng);
        assert!(plan.voices.is_empty());
        assert!(plan.clip.is_some());
        let plan = plan_cue(GameEvent::SacredHit { score: 1 }, 0.0, None, &mut rng);
        assert_eq!(plan, CuePlan::default());
    }

    #[test]
    fn test_player_renders_and_records_clips() {
        let mut player = player();
        player.cue(GameEvent::SacredHit { score: 67 });
        assert!(mix_peak(&player) > 0.0);

        player.cue(GameEvent::KidDrop);
        player.cue(GameEvent::LevelUp { level: 2 });
        let clips = player.output().unwrap().clips_played();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0], (KID_DROP_CLIP.path, 0.8));
        assert_eq!(clips[1].1, 0.7);
    }

    #[test]
    fn test_clip_volume_scales_clips() {
        let mut player = player();
        player.set_clip_volume(0.5);
        assert_eq!(player.settings().clip_volume, 0.5);
        player.cue(GameEvent::KidDrop);
        let (path, volume) = player.output().unwrap().clips_played()[0];
        assert_eq!(path, "kid-67.mp3");
        assert!((volume - 0.4).abs() < 1e-6);

        // Out-of-range volumes clamp
        player.set_clip_volume(4.0);
        assert_eq!(player.settings().clip_volume, 1.0);
    }

    #[test]
    fn test_set_master_volume_changes_peak() {
        let mut full = player();
        full.cue(GameEvent::GameOver { score: 0, reason: LifeLossReason::WrongTap });
        let mut half = player();
        half.set_master_volume(0.5);
        assert_eq!(half.settings().master_volume, 0.5);
        half.cue(GameEvent::GameOver { score: 0, reason: LifeLossReason::WrongTap });
        assert!(mix_peak(&half) > 0.0);
        assert!((mix_peak(&half) - 0.5 * mix_peak(&full)).abs() < 1e-4);
    }

    #[test]
    fn test_overlapping_cues_stack() {
        let mut single = player();
        single.cue(GameEvent::GameOver { score: 0, reason: LifeLossReason::WrongTap });
        let mut double = player();
        double.cue(GameEvent::GameOver { score: 0, reason: LifeLossReason::WrongTap });
        double.cue(GameEvent::GameOver { score: 0, reason: LifeLossReason::WrongTap });
        assert!((mix_peak(&double) - 2.0 * mix_peak(&single)).abs() < 1e-4);
    }

    #[test]
    fn test_master_volume_applied() {
        let mut quiet = CuePlayer::new(Some(OfflineOutput::new(SR)), AudioSettings::default(), 5);
        quiet.cue(GameEvent::GameOver { score: 0, reason: LifeLossReason::WrongTap });
        let mut loud = player();
        loud.cue(GameEvent::GameOver { score: 0, reason: LifeLossReason::WrongTap });
        assert!((mix_peak(&quiet) - 0.24 * mix_peak(&loud)).abs() < 1e-4);
    }

    #[test]
    fn test_muted_is_silent() {
        let mut player = player();
        player.set_muted(true);
        player.cue(GameEvent::SacredHit { score: 67 });
        player.cue(GameEvent::KidDrop);
        assert_eq!(mix_peak(&player), 0.0);
        assert!(player.output().unwrap().clips_played().is_empty());
    }

    #[test]
    fn test_missing_backend_is_noop() {
        let mut player: CuePlayer<OfflineOutput> = CuePlayer::silent();
        assert!(!player.is_available());
        player.resume();
        for event in [
            GameEvent::SacredHit { score: 1 },
            GameEvent::Miss { reason: LifeLossReason::SlippedThrough },
            GameEvent::KidDrop,
            GameEvent::LevelUp { level: 2 },
            GameEvent::GameOver { score: 1, reason: LifeLossReason::SlippedThrough },
        ] {
            player.cue(event);
        }
    }

    #[test]
    fn test_clip_only_backend_swallows_errors() {
        let mut player = CuePlayer::new(Some(ClipsOnly::default()), AudioSettings::default(), 1);
        player.cue(GameEvent::SacredHit { score: 1 });
        player.cue(GameEvent::LevelUp { level: 2 });
        let out = player.output().unwrap();
        assert_eq!(out.voices, 0);
        assert_eq!(out.clips.len(), 1);
    }
}
