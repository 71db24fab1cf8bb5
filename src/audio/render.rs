//! Offline rendering of synthesizer voices into mono PCM
//!
//! Mirrors what a browser audio graph does with the same schedule, so cues
//! can be rendered and inspected without an audio device.

use super::synth::{NoiseBurst, Voice};

/// Default biquad Q for the noise ping, in dB as browsers interpret it
pub const FILTER_Q_DB: f32 = 1.0;

/// Second-order high-pass filter (RBJ cookbook)
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn highpass(cutoff: f32, q_db: f32, sample_rate: f32) -> Self {
        // Keep the cutoff strictly inside (0, nyquist)
        let nyquist = sample_rate / 2.0;
        let cutoff = cutoff.clamp(1.0, nyquist * 0.999);
        let w0 = std::f32::consts::TAU * cutoff / sample_rate;
        let (sin, cos) = w0.sin_cos();
        let q = 10f32.powf(q_db / 20.0);
        let alpha = sin / (2.0 * q);

        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 + cos) / 2.0 / a0,
            b1: -(1.0 + cos) / a0,
            b2: (1.0 + cos) / 2.0 / a0,
            a1: -2.0 * cos / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Mono mix buffer; sample 0 is time 0.0
#[derive(Debug, Clone)]
pub struct Mixdown {
    sample_rate: u32,
    buffer: Vec<f32>,
}

impl Mixdown {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            buffer: Vec::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.buffer
    }

    /// Length of the rendered audio (seconds)
    pub fn duration(&self) -> f64 {
        self.buffer.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value
    pub fn peak(&self) -> f32 {
        self.buffer.iter().fold(0.0, |m, s| m.max(s.abs()))
    }

    /// Peak within a time window
    pub fn peak_between(&self, from: f64, to: f64) -> f32 {
        let (a, b) = (self.index(from), self.index(to).min(self.buffer.len()));
        self.buffer
            .get(a..b)
            .map(|w| w.iter().fold(0.0, |m: f32, s| m.max(s.abs())))
            .unwrap_or(0.0)
    }

    fn index(&self, t: f64) -> usize {
        (t.max(0.0) * self.sample_rate as f64).round() as usize
    }

    fn ensure(&mut self, len: usize) {
        if self.buffer.len() < len {
            self.buffer.resize(len, 0.0);
        }
    }

    /// Mix an oscillator voice from its start to its stop time
    pub fn add_voice(&mut self, voice: &Voice, master: f32) {
        let (from, to) = (self.index(voice.start), self.index(voice.stop));
        self.ensure(to);
        let dt = 1.0 / self.sample_rate as f64;
        let mut phase = 0.0f64;
        for i in from..to {
            let t = i as f64 * dt;
            let gain = voice.envelope.gain_at(t);
            self.buffer[i] += voice.waveform.sample(phase) * gain * master;
            phase += voice.freq.freq_at(t) as f64 * dt;
        }
    }

    /// Mix a noise burst through its high-pass filter and envelope
    pub fn add_noise(&mut self, noise: &NoiseBurst, master: f32) {
        let (from, to) = (self.index(noise.start), self.index(noise.stop));
        self.ensure(to);
        let mut filter = Biquad::highpass(noise.cutoff, FILTER_Q_DB, self.sample_rate as f32);
        let ratio = noise.sample_rate as f64 / self.sample_rate as f64;
        let dt = 1.0 / self.sample_rate as f64;
        for i in from..to {
            let src = ((i - from) as f64 * ratio) as usize;
            let Some(&x) = noise.samples.get(src) else {
                break;
            };
            let t = i as f64 * dt;
            self.buffer[i] += filter.process(x) * noise.envelope.gain_at(t) * master;
        }
    }
}
