//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is a short list of oscillator tones; the table is plain data
//! so it can be tested natively, and `AudioManager` plays it on wasm.

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Hz
    pub freq: f32,
    /// Seconds until the envelope has decayed
    pub duration: f32,
    /// Peak gain before master/sfx scaling
    pub volume: f32,
    /// Seconds after the trigger
    pub delay: f32,
}

impl Tone {
    const fn new(waveform: Waveform, freq: f32, duration: f32, volume: f32) -> Self {
        Self {
            waveform,
            freq,
            duration,
            volume,
            delay: 0.0,
        }
    }

    const fn after(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player shot
    Blip,
    /// Enemy destroyed
    Boom,
    /// Player struck
    Hit,
    /// Pickup collected
    Pickup,
    /// Countdown beat (3, 2, 1)
    Countdown(u8),
    /// "Go!"
    Launch,
    /// Wave number went up
    WaveUp,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    /// Effect for a sim event; most events are silent
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ShotFired => Some(SoundEffect::Blip),
            GameEvent::EnemyDestroyed { .. } => Some(SoundEffect::Boom),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            GameEvent::PickupCollected(_) => Some(SoundEffect::Pickup),
            GameEvent::CountdownTick(n) => Some(SoundEffect::Countdown(*n)),
            GameEvent::Launch => Some(SoundEffect::Launch),
            GameEvent::WaveAdvanced(_) => Some(SoundEffect::WaveUp),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
            _ => None,
        }
    }

    pub fn tones(&self) -> Vec<Tone> {
        use Waveform::*;
        match self {
            SoundEffect::Blip => vec![Tone::new(Square, 620.0, 0.08, 0.15)],
            SoundEffect::Boom => vec![Tone::new(Sawtooth, 120.0, 0.28, 0.25)],
            SoundEffect::Hit => vec![
                Tone::new(Sawtooth, 120.0, 0.28, 0.25),
                Tone::new(Triangle, 180.0, 0.1, 0.18),
            ],
            SoundEffect::Pickup => vec![Tone::new(Square, 940.0, 0.14, 0.18)],
            SoundEffect::Countdown(n) => {
                // 3 -> 480 Hz, 2 -> 420 Hz, 1 -> 360 Hz
                let freq = 300.0 + 60.0 * f32::from((*n).min(3));
                vec![Tone::new(Triangle, freq, 0.12, 0.2)]
            }
            SoundEffect::Launch => vec![
                Tone::new(Triangle, 520.0, 0.12, 0.2),
                Tone::new(Triangle, 780.0, 0.2, 0.2).after(0.08),
            ],
            SoundEffect::WaveUp => [660.0, 880.0]
                .iter()
                .enumerate()
                .map(|(i, f)| Tone::new(Triangle, *f, 0.15, 0.15).after(i as f32 * 0.1))
                .collect(),
            SoundEffect::GameOver => [400.0, 350.0, 300.0, 200.0]
                .iter()
                .enumerate()
                .map(|(i, f)| Tone::new(Sine, *f, 0.3, 0.3).after(i as f32 * 0.2))
                .collect(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Waveform};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up volume/mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                self.play_tone(ctx, &tone);
            }
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

        /// Quick linear attack, exponential decay
        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + f64::from(tone.delay);
            let end = t + f64::from(tone.duration);

            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(tone.volume * self.volume, t + 0.02)
                .ok();
            gain.gain().exponential_ramp_to_value_at_time(0.001, end).ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(end + 0.05).ok();
        }
    }
}
