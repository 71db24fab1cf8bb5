//! Tone synthesizer
//!
//! Describes procedural sounds as scheduled voices: an oscillator with a
//! frequency curve and a gain envelope, or a shaped noise buffer run through
//! a high-pass filter. Backends turn these into sound; nothing here touches
//! an audio device.

use rand::Rng;

/// Lowest gain an exponential ramp may target (ramps to zero are undefined)
pub const GAIN_FLOOR: f32 = 0.001;
/// Linear ramp-up time of a gated tone (seconds)
pub const ATTACK_SECS: f64 = 0.02;
/// Extra run time after a burst segment ends (seconds)
pub const BURST_TAIL_SECS: f64 = 0.05;
/// Extra run time after a sustained tone ends (seconds)
pub const TONE_TAIL_SECS: f64 = 0.1;
/// Extra run time after a noise ping ends (seconds)
pub const NOISE_TAIL_SECS: f64 = 0.05;

/// Clamp a gain to the exponential-ramp floor
#[inline]
pub fn floor_gain(gain: f32) -> f32 {
    if gain.is_finite() {
        gain.max(GAIN_FLOOR)
    } else {
        GAIN_FLOOR
    }
}

/// Oscillator timbre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Sample at `phase` in cycles (only the fractional part matters)
    pub fn sample(&self, phase: f64) -> f32 {
        let p = phase.fract() as f32;
        match self {
            Waveform::Sine => (p * std::f32::consts::TAU).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
        }
    }
}

/// One step of a burst: frequency, start time, length, peak gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneSegment {
    pub freq: f32,
    pub start: f64,
    pub duration: f64,
    pub gain: f32,
}

/// Gain over time: optional linear attack, then exponential decay to the floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainEnvelope {
    pub start: f64,
    /// Length of the linear ramp from silence to peak (0 = start at peak)
    pub attack: f64,
    pub peak: f32,
    /// Time the decay reaches `GAIN_FLOOR`
    pub end: f64,
}

impl GainEnvelope {
    /// Ramp up over `ATTACK_SECS`, decay to the floor by `start + duration`
    pub fn gated(start: f64, duration: f64, peak: f32) -> Self {
        Self {
            start,
            attack: ATTACK_SECS.min(duration),
            peak: floor_gain(peak),
            end: start + duration,
        }
    }

    /// Start at `peak` and decay to the floor by `start + duration`
    pub fn decaying(start: f64, duration: f64, peak: f32) -> Self {
        Self {
            start,
            attack: 0.0,
            peak: floor_gain(peak),
            end: start + duration,
        }
    }

    /// Time the attack ramp reaches the peak
    pub fn peak_time(&self) -> f64 {
        self.start + self.attack
    }

    pub fn gain_at(&self, t: f64) -> f32 {
        if t < self.start {
            return 0.0;
        }
        let peak_time = self.peak_time();
        if t < peak_time {
            return self.peak * ((t - self.start) / self.attack) as f32;
        }
        if t >= self.end || self.end <= peak_time {
            return GAIN_FLOOR;
        }
        let progress = ((t - peak_time) / (self.end - peak_time)) as f32;
        self.peak * (GAIN_FLOOR / self.peak).powf(progress)
    }
}

/// Oscillator frequency: fixed, or an exponential sweep to a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyCurve {
    pub start: f64,
    pub from: f32,
    /// Target frequency and the time it is reached
    pub sweep: Option<(f32, f64)>,
}

impl FrequencyCurve {
    pub fn freq_at(&self, t: f64) -> f32 {
        match self.sweep {
            Some((to, at)) if t >= at => to,
            Some((to, at)) if t > self.start && at > self.start => {
                let progress = ((t - self.start) / (at - self.start)) as f32;
                self.from * (to / self.from).powf(progress)
            }
            _ => self.from,
        }
    }
}

/// A scheduled oscillator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub freq: FrequencyCurve,
    pub envelope: GainEnvelope,
    pub start: f64,
    pub stop: f64,
}

impl Voice {
    /// Sweep exponentially to `freq`, arriving at time `at`
    pub fn sweep_to(mut self, freq: f32, at: f64) -> Self {
        // Exponential ramps need a strictly positive target
        self.freq.sweep = Some((freq.max(f32::MIN_POSITIVE), at));
        self
    }
}

/// A scheduled high-passed noise buffer
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBurst {
    pub start: f64,
    pub stop: f64,
    /// High-pass cutoff (Hz)
    pub cutoff: f32,
    pub envelope: GainEnvelope,
    pub sample_rate: u32,
    /// Pre-shaped white noise
    pub samples: Vec<f32>,
}

/// Gated square-wave voices, one per segment
pub fn burst(segments: &[ToneSegment]) -> Vec<Voice> {
    segments
        .iter()
        .map(|seg| Voice {
            waveform: Waveform::Square,
            freq: FrequencyCurve {
                start: seg.start,
                from: seg.freq,
                sweep: None,
            },
            envelope: GainEnvelope::gated(seg.start, seg.duration, seg.gain),
            start: seg.start,
            stop: seg.start + seg.duration + BURST_TAIL_SECS,
        })
        .collect()
}

/// A single gated tone; chain `sweep_to` for a pitch slide
pub fn tone(waveform: Waveform, freq: f32, start: f64, duration: f64, gain: f32) -> Voice {
    Voice {
        waveform,
        freq: FrequencyCurve {
            start,
            from: freq,
            sweep: None,
        },
        envelope: GainEnvelope::gated(start, duration, gain),
        start,
        stop: start + duration + TONE_TAIL_SECS,
    }
}

/// White noise of `len` samples shaped by `(1 - i/n)^2`
pub fn noise_buffer<R: Rng>(rng: &mut R, len: usize) -> Vec<f32> {
    let n = len as f32;
    (0..len)
        .map(|i| {
            let shape = (1.0 - i as f32 / n).powi(2);
            (rng.random::<f32>() * 2.0 - 1.0) * shape
        })
        .collect()
}

/// Short filtered noise for impact texture
pub fn noise_ping<R: Rng>(
    rng: &mut R,
    sample_rate: u32,
    start: f64,
    duration: f64,
    cutoff: f32,
    gain: f32,
) -> NoiseBurst {
    let len = (sample_rate as f64 * duration) as usize;
    NoiseBurst {
        start,
        stop: start + duration + NOISE_TAIL_SECS,
        cutoff,
        envelope: GainEnvelope::decaying(start, duration, gain),
        sample_rate,
        samples: noise_buffer(rng, len),
    }
}
