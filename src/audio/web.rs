//! Audio backend using the Web Audio API
//!
//! Voices become oscillator → gain → master chains, noise becomes a buffer
//! source → high-pass → gain chain. Clips are `<audio>` elements cloned per
//! play so overlapping instances never cut each other off.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AudioContext, AudioContextState, BiquadFilterType, GainNode, HtmlAudioElement,
    OscillatorType,
};

use super::backend::{AudioError, AudioOutput, Clip};
use super::synth::{GAIN_FLOOR, NoiseBurst, Voice, Waveform};

fn js_err(e: JsValue) -> AudioError {
    AudioError::Node(format!("{e:?}"))
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

/// Web Audio output
pub struct WebAudioOutput {
    ctx: Option<AudioContext>,
    master: Option<GainNode>,
    clips: Vec<(&'static str, HtmlAudioElement)>,
}

impl WebAudioOutput {
    /// Create the context and pre-load `clips`; missing pieces degrade silently
    pub fn new(master_gain: f32, clips: impl IntoIterator<Item = Clip>) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - synthesized cues disabled");
        }
        let master = ctx.as_ref().and_then(|ctx| {
            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value_at_time(master_gain, ctx.current_time()).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(gain)
        });

        let mut loaded = Vec::new();
        for clip in clips {
            if loaded.iter().any(|(path, _)| *path == clip.path) {
                continue;
            }
            match Self::load_clip(&clip) {
                Ok(el) => loaded.push((clip.path, el)),
                Err(e) => log::warn!("Clip {} unavailable: {e}", clip.path),
            }
        }

        Self {
            ctx,
            master,
            clips: loaded,
        }
    }

    fn load_clip(clip: &Clip) -> Result<HtmlAudioElement, AudioError> {
        let el = HtmlAudioElement::new_with_src(clip.path).map_err(js_err)?;
        el.set_preload("auto");
        el.set_cross_origin(Some("anonymous"));
        el.set_volume(clip.volume as f64);
        el.load();
        Ok(el)
    }

    fn graph(&self) -> Result<(&AudioContext, &GainNode), AudioError> {
        match (&self.ctx, &self.master) {
            (Some(ctx), Some(master)) => Ok((ctx, master)),
            _ => Err(AudioError::Unavailable),
        }
    }
}

impl AudioOutput for WebAudioOutput {
    fn now(&self) -> f64 {
        self.ctx.as_ref().map(|ctx| ctx.current_time()).unwrap_or(0.0)
    }

    fn sample_rate(&self) -> u32 {
        self.ctx.as_ref().map(|ctx| ctx.sample_rate() as u32).unwrap_or(0)
    }

    fn can_synthesize(&self) -> bool {
        self.ctx.is_some() && self.master.is_some()
    }

    fn can_play_clips(&self) -> bool {
        !self.clips.is_empty()
    }

    /// Resume audio context (required after user gesture)
    fn resume(&mut self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    fn set_master_gain(&mut self, gain: f32) {
        if let Some(master) = &self.master {
            master.gain().set_value(gain);
        }
    }

    fn play_voice(&mut self, voice: &Voice) -> Result<(), AudioError> {
        let (ctx, master) = self.graph()?;
        let osc = ctx.create_oscillator().map_err(js_err)?;
        let gain = ctx.create_gain().map_err(js_err)?;
        osc.set_type(oscillator_type(voice.waveform));

        osc.frequency()
            .set_value_at_time(voice.freq.from, voice.start)
            .map_err(js_err)?;
        if let Some((to, at)) = voice.freq.sweep {
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, at)
                .map_err(js_err)?;
        }

        let env = &voice.envelope;
        if env.attack > 0.0 {
            gain.gain().set_value_at_time(0.0, env.start).map_err(js_err)?;
            gain.gain()
                .linear_ramp_to_value_at_time(env.peak, env.peak_time())
                .map_err(js_err)?;
        } else {
            gain.gain().set_value_at_time(env.peak, env.start).map_err(js_err)?;
        }
        gain.gain()
            .exponential_ramp_to_value_at_time(GAIN_FLOOR, env.end)
            .map_err(js_err)?;

        osc.connect_with_audio_node(&gain).map_err(js_err)?;
        gain.connect_with_audio_node(master).map_err(js_err)?;
        osc.start_with_when(voice.start).map_err(js_err)?;
        osc.stop_with_when(voice.stop).map_err(js_err)?;
        Ok(())
    }

    fn play_noise(&mut self, noise: &NoiseBurst) -> Result<(), AudioError> {
        if noise.samples.is_empty() {
            return Ok(());
        }
        let (ctx, master) = self.graph()?;

        let buffer = ctx
            .create_buffer(1, noise.samples.len() as u32, noise.sample_rate as f32)
            .map_err(js_err)?;
        buffer.copy_to_channel(&noise.samples, 0).map_err(js_err)?;
        let source = ctx.create_buffer_source().map_err(js_err)?;
        source.set_buffer(Some(&buffer));

        let filter = ctx.create_biquad_filter().map_err(js_err)?;
        filter.set_type(BiquadFilterType::Highpass);
        filter
            .frequency()
            .set_value_at_time(noise.cutoff, noise.start)
            .map_err(js_err)?;

        let gain = ctx.create_gain().map_err(js_err)?;
        gain.gain()
            .set_value_at_time(noise.envelope.peak, noise.start)
            .map_err(js_err)?;
        gain.gain()
            .exponential_ramp_to_value_at_time(GAIN_FLOOR, noise.envelope.end)
            .map_err(js_err)?;

        source.connect_with_audio_node(&filter).map_err(js_err)?;
        filter.connect_with_audio_node(&gain).map_err(js_err)?;
        gain.connect_with_audio_node(master).map_err(js_err)?;
        source.start_with_when(noise.start).map_err(js_err)?;
        source.stop_with_when(noise.stop).map_err(js_err)?;
        Ok(())
    }

    fn play_clip(&mut self, clip: &Clip, volume: f32, playback_rate: f32) -> Result<(), AudioError> {
        let base = self
            .clips
            .iter()
            .find(|(path, _)| *path == clip.path)
            .map(|(_, el)| el)
            .ok_or(AudioError::UnknownClip(clip.path))?;

        let instance: HtmlAudioElement = base
            .clone_node_with_deep(true)
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| AudioError::Node("cloned clip is not an audio element".into()))?;
        instance.set_volume(volume.clamp(0.0, 1.0) as f64);
        instance.set_playback_rate(playback_rate as f64);

        let promise = instance
            .play()
            .map_err(|e| AudioError::Rejected(format!("{e:?}")))?;
        // Autoplay rejections surface asynchronously; swallow them
        let path = clip.path;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::debug!("Clip {path} rejected: {e:?}");
            }
        });
        Ok(())
    }
}
