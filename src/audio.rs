//! Sound effects
//!
//! The session only names effects; an [`AudioSink`] decides how (or whether)
//! to play them. On the web, effects are synthesized with the Web Audio API,
//! no external files needed.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Impulse applied
    Flap,
    /// Obstacle passed
    Score,
    /// Normal pickup collected
    Coin,
    /// Rare pickup collected
    Diamond,
    /// Pickup collected with the multiplier active
    Combo,
    /// Actor crashed
    Hit,
    /// Run ended
    GameOver,
    /// New best total
    HighScore,
}

impl SoundEffect {
    /// Effect for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Flapped => Some(SoundEffect::Flap),
            GameEvent::Scored { .. } => Some(SoundEffect::Score),
            GameEvent::PickupsCollected {
                rare, multiplier, ..
            } => Some(if *multiplier > 1 {
                SoundEffect::Combo
            } else if *rare > 0 {
                SoundEffect::Diamond
            } else {
                SoundEffect::Coin
            }),
            GameEvent::Collided(_) => Some(SoundEffect::Hit),
            GameEvent::GameOver(_) => Some(SoundEffect::GameOver),
            GameEvent::HighScore { .. } => Some(SoundEffect::HighScore),
            GameEvent::Started | GameEvent::AchievementUnlocked { .. } => None,
        }
    }
}

/// Plays sound effects. Must never fail into the caller.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Master volume, 0.0 - 1.0
    fn set_volume(&mut self, _volume: f32) {}

    fn set_muted(&mut self, _muted: bool) {}
}

/// Silent sink (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Web Audio synthesizer
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: 0.8,
                muted: false,
            }
        }

        fn create_osc(
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

        /// Single tone with a frequency sweep and exponential decay
        fn sweep(
            ctx: &AudioContext,
            vol: f32,
            from: f32,
            to: f32,
            secs: f64,
            osc_type: OscillatorType,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, from, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + secs).ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, t + secs).ok();
            osc.start().ok();
            osc.stop_with_when(t + secs + 0.05).ok();
        }

        /// Short note sequence
        fn arpeggio(
            ctx: &AudioContext,
            vol: f32,
            freqs: &[f32],
            step: f64,
            osc_type: OscillatorType,
        ) {
            for (i, freq) in freqs.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol, t).ok();
                    gain.gain().exponential_ramp_to_value_at_time(0.01, t + step * 1.8).ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + step * 2.0).ok();
                }
            }
        }
    }

    impl AudioSink for WebAudio {
        fn set_volume(&mut self, volume: f32) {
            // NaN from a broken slider counts as silence
            self.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn play(&mut self, effect: SoundEffect) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            use OscillatorType as Osc;
            let vol = self.volume;
            match effect {
                SoundEffect::Flap => Self::sweep(ctx, vol * 0.3, 300.0, 600.0, 0.1, Osc::Triangle),
                SoundEffect::Score => {
                    Self::arpeggio(ctx, vol * 0.25, &[700.0, 900.0], 0.06, Osc::Sine)
                }
                SoundEffect::Coin => {
                    Self::arpeggio(ctx, vol * 0.25, &[900.0, 1200.0], 0.05, Osc::Square)
                }
                SoundEffect::Diamond => {
                    let notes = [800.0, 1000.0, 1300.0, 1600.0];
                    Self::arpeggio(ctx, vol * 0.25, &notes, 0.05, Osc::Sine)
                }
                SoundEffect::Combo => {
                    Self::arpeggio(ctx, vol * 0.25, &[600.0, 800.0, 1000.0], 0.08, Osc::Triangle)
                }
                SoundEffect::Hit => Self::sweep(ctx, vol * 0.6, 150.0, 60.0, 0.15, Osc::Sawtooth),
                SoundEffect::GameOver => {
                    let notes = [400.0, 350.0, 300.0, 200.0];
                    Self::arpeggio(ctx, vol * 0.3, &notes, 0.2, Osc::Sine)
                }
                SoundEffect::HighScore => {
                    let notes = [500.0, 600.0, 700.0, 800.0, 1000.0];
                    Self::arpeggio(ctx, vol * 0.25, &notes, 0.08, Osc::Triangle)
                }
            }
        }
    }
}
