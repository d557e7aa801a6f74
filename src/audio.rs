//! Background music using Web Audio API
//!
//! A looping synth bass line, scheduled a little ahead of the audio clock so
//! frame hitches never starve it. Driven only by the engine's music signal.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Beats per minute
const TEMPO: f64 = 132.0;
/// Notes per beat (eighth notes)
const STEPS_PER_BEAT: f64 = 2.0;
/// How far ahead of `currentTime` notes are committed (seconds)
const LOOKAHEAD: f64 = 0.2;

/// Semitone offsets from the root; `None` is a rest
const BASS_LINE: [Option<i32>; 16] = [
    Some(0),
    None,
    Some(0),
    Some(12),
    Some(0),
    None,
    Some(10),
    Some(12),
    Some(-2),
    None,
    Some(-2),
    Some(10),
    Some(3),
    None,
    Some(5),
    Some(7),
];

/// A2
const ROOT_HZ: f32 = 110.0;

/// Schedules the bass line while the music signal is on
pub struct MusicScheduler {
    ctx: Option<AudioContext>,
    volume: f32,
    step: usize,
    next_note_time: Option<f64>,
}

impl Default for MusicScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl MusicScheduler {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - music disabled");
        }
        Self {
            ctx,
            volume: 0.18,
            step: 0,
            next_note_time: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Call once per frame with the engine's music signal
    pub fn update(&mut self, playing: bool) {
        let Some(ctx) = &self.ctx else { return };

        if !playing {
            // Already-committed notes ring out within LOOKAHEAD
            if self.next_note_time.take().is_some() {
                self.step = 0;
                log::debug!("Music stopped");
            }
            return;
        }

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let now = ctx.current_time();
        let step_len = 60.0 / TEMPO / STEPS_PER_BEAT;
        // Start fresh after a stop or a long stall
        let mut t = match self.next_note_time {
            Some(t) if t >= now => t,
            _ => now + 0.05,
        };

        while t < now + LOOKAHEAD {
            if let Some(semitones) = BASS_LINE[self.step] {
                self.play_note(ctx, semitone_hz(semitones), t, step_len * 0.85);
            }
            self.step = (self.step + 1) % BASS_LINE.len();
            t += step_len;
        }
        self.next_note_time = Some(t);
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_note(&self, ctx: &AudioContext, freq: f32, at: f64, length: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sawtooth) else {
            return;
        };

        gain.gain().set_value_at_time(0.0, at).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(self.volume, at + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, at + length)
            .ok();

        osc.start_with_when(at).ok();
        osc.stop_with_when(at + length + 0.02).ok();
    }
}

fn semitone_hz(semitones: i32) -> f32 {
    ROOT_HZ * 2f32.powf(semitones as f32 / 12.0)
}
