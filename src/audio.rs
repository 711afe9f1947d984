//! Procedural sound effects
//!
//! Every effect is a short sequence of oscillator tones; no audio files.
//! The tone tables are plain data so they can be checked off the browser,
//! `AudioManager` plays them through Web Audio on wasm32.

use crate::session::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Tyres let go
    DriftStart,
    /// Drift settled with a credit reward
    DriftReward,
    /// Garage purchase, promo code, admin grant
    Purchase,
    /// Achievement unlocked
    Achievement,
    /// Daily task done
    TaskComplete,
    /// Rejected action (not enough credits, bad code)
    Denied,
}

/// Oscillator shape, mirrors `web_sys::OscillatorType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator note with an exponential decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    /// Start and end frequency (Hz); equal for a flat note
    pub freq: (f32, f32),
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Offset from the effect start (s)
    pub delay: f64,
    /// Decay length (s)
    pub length: f64,
}

const fn tone(wave: Wave, from: f32, to: f32, gain: f32, delay: f64, length: f64) -> Tone {
    Tone {
        wave,
        freq: (from, to),
        gain,
        delay,
        length,
    }
}

/// Rising arpeggio starting every `step` seconds
fn arpeggio(wave: Wave, notes: &[f32], gain: f32, step: f64, length: f64) -> Vec<Tone> {
    notes
        .iter()
        .enumerate()
        .map(|(i, &f)| tone(wave, f, f, gain, i as f64 * step, length))
        .collect()
}

impl SoundEffect {
    /// Sound for a session event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::DriftStarted => Some(SoundEffect::DriftStart),
            GameEvent::DriftSettled { reward, .. } if *reward > 0 => Some(SoundEffect::DriftReward),
            GameEvent::DriftSettled { .. } => None,
            GameEvent::AchievementUnlocked(_) => Some(SoundEffect::Achievement),
            GameEvent::TaskCompleted { .. } => Some(SoundEffect::TaskComplete),
            GameEvent::Purchase => Some(SoundEffect::Purchase),
        }
    }

    pub fn tones(&self) -> Vec<Tone> {
        match self {
            // Screech: detuned saws sliding down
            SoundEffect::DriftStart => vec![
                tone(Wave::Sawtooth, 1800.0, 900.0, 0.15, 0.0, 0.35),
                tone(Wave::Sawtooth, 1850.0, 950.0, 0.1, 0.0, 0.35),
            ],
            SoundEffect::DriftReward => {
                let mut tones = arpeggio(Wave::Triangle, &[660.0, 880.0, 1320.0], 0.3, 0.07, 0.2);
                tones.push(tone(Wave::Sine, 2640.0, 2640.0, 0.1, 0.21, 0.3));
                tones
            }
            SoundEffect::Purchase => vec![
                tone(Wave::Square, 988.0, 988.0, 0.15, 0.0, 0.08),
                tone(Wave::Square, 1319.0, 1319.0, 0.15, 0.08, 0.25),
            ],
            SoundEffect::Achievement => {
                arpeggio(Wave::Triangle, &[523.0, 659.0, 784.0, 1047.0], 0.25, 0.1, 0.35)
            }
            SoundEffect::TaskComplete => arpeggio(Wave::Sine, &[784.0, 1175.0], 0.3, 0.09, 0.25),
            SoundEffect::Denied => vec![tone(Wave::Square, 180.0, 120.0, 0.2, 0.0, 0.2)],
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, OscillatorType};

    use super::{SoundEffect, Tone, Wave};

    impl From<Wave> for OscillatorType {
        fn from(wave: Wave) -> Self {
            match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            }
        }
    }

    /// Plays effects through one shared `AudioContext`
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_volume: f32,
    }

    impl AudioManager {
        pub fn new(sfx_volume: f32) -> Self {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_volume: sfx_volume.clamp(0.0, 1.0),
            }
        }

        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.sfx_volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                self.play_tone(ctx, &tone);
            }
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(tone.wave.into());
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let t = ctx.current_time() + tone.delay;
            let (from, to) = tone.freq;
            gain.gain()
                .set_value_at_time(tone.gain * self.sfx_volume, t)
                .ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + tone.length)
                .ok()?;
            osc.frequency().set_value_at_time(from, t).ok()?;
            if to != from {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, t + tone.length)
                    .ok()?;
            }

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(t + tone.length + 0.05).ok()?;
            Some(())
        }
    }
}
