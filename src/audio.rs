//! Audio cue playback
//!
//! The simulation only raises [`Cue`]s. A [`CuePlayer`] turns them into sound;
//! a player failure is logged and dropped, it never reaches the game loop.

use thiserror::Error;

use crate::sim::Cue;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio backend unavailable")]
    Unavailable,
    #[error("audio backend error: {0}")]
    Backend(String),
}

/// Fire-and-forget sound output
pub trait CuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError>;
}

/// Play every cue, swallowing failures
pub fn play_cues<P: CuePlayer + ?Sized>(player: &mut P, cues: impl IntoIterator<Item = Cue>) {
    for cue in cues {
        if let Err(e) = player.play(cue) {
            log::warn!("Cue {:?} dropped: {}", cue, e);
        }
    }
}

/// Headless player that just logs
#[derive(Debug, Clone)]
pub struct LogCuePlayer {
    volume: f32,
}

impl LogCuePlayer {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

impl Default for LogCuePlayer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CuePlayer for LogCuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        if self.volume > 0.0 {
            log::debug!("cue {:?} @ {:.2}", cue, self.volume);
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioCuePlayer;

/// Procedurally generated cues - no external files needed!
#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioError, CuePlayer};
    use crate::settings::Settings;
    use crate::sim::Cue;

    /// One oscillator voice
    struct Tone {
        wave: OscillatorType,
        start_hz: f32,
        end_hz: f32,
        /// Offset from the cue start (seconds)
        delay: f64,
        duration: f64,
        gain: f32,
    }

    const fn tone(
        wave: OscillatorType,
        start_hz: f32,
        end_hz: f32,
        delay: f64,
        duration: f64,
        gain: f32,
    ) -> Tone {
        Tone {
            wave,
            start_hz,
            end_hz,
            delay,
            duration,
            gain,
        }
    }

    fn voices(cue: Cue) -> Vec<Tone> {
        use OscillatorType::{Sawtooth, Sine, Square, Triangle};
        match cue {
            Cue::Bounce => vec![tone(Sine, 400.0, 400.0, 0.0, 0.08, 0.3)],
            Cue::BrickHit => vec![tone(Triangle, 300.0, 300.0, 0.0, 0.05, 0.25)],
            Cue::BrickBreak => vec![
                tone(Sawtooth, 800.0, 120.0, 0.0, 0.15, 0.3),
                tone(Sine, 60.0, 40.0, 0.0, 0.12, 0.4),
            ],
            Cue::ItemPickup => vec![
                tone(Sine, 600.0, 600.0, 0.0, 0.08, 0.3),
                tone(Sine, 900.0, 900.0, 0.08, 0.12, 0.3),
            ],
            Cue::LaserFire => vec![tone(Square, 1400.0, 300.0, 0.0, 0.1, 0.15)],
            Cue::BallDrop => vec![tone(Sawtooth, 300.0, 50.0, 0.0, 0.5, 0.4)],
            Cue::StageClear => [523.0, 659.0, 784.0]
                .iter()
                .enumerate()
                .map(|(i, &hz)| tone(Triangle, hz, hz, i as f64 * 0.1, 0.2, 0.3))
                .collect(),
            Cue::RoundClear => [523.0, 659.0, 784.0, 1047.0]
                .iter()
                .enumerate()
                .map(|(i, &hz)| tone(Triangle, hz, hz, i as f64 * 0.12, 0.35, 0.35))
                .collect(),
            Cue::GameOver => [392.0, 330.0, 262.0]
                .iter()
                .enumerate()
                .map(|(i, &hz)| tone(Sine, hz, hz * 0.95, i as f64 * 0.25, 0.4, 0.4))
                .collect(),
            Cue::IntroOpening => [262.0, 392.0, 523.0]
                .iter()
                .enumerate()
                .map(|(i, &hz)| tone(Sine, hz, hz, i as f64 * 0.15, 0.3, 0.25))
                .collect(),
        }
    }

    /// Cue player backed by the Web Audio API
    pub struct WebAudioCuePlayer {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudioCuePlayer {
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

        pub fn set_volume(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        fn create_osc(
            ctx: &AudioContext,
            wave: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let osc = ctx.create_oscillator().map_err(backend)?;
            let gain = ctx.create_gain().map_err(backend)?;
            osc.set_type(wave);
            osc.connect_with_audio_node(&gain).map_err(backend)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(backend)?;
            Ok((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, t0: f64, tone: &Tone) -> Result<(), AudioError> {
            let (osc, gain) = Self::create_osc(ctx, tone.wave)?;
            let t = t0 + tone.delay;
            let end = t + tone.duration;

            gain.gain()
                .set_value_at_time(self.volume * tone.gain, t)
                .map_err(backend)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, end)
                .map_err(backend)?;
            osc.frequency()
                .set_value_at_time(tone.start_hz, t)
                .map_err(backend)?;
            if tone.end_hz != tone.start_hz {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(tone.end_hz, end)
                    .map_err(backend)?;
            }

            osc.start_with_when(t).map_err(backend)?;
            osc.stop_with_when(end + 0.02).map_err(backend)?;
            Ok(())
        }
    }

    impl CuePlayer for WebAudioCuePlayer {
        fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
            if self.volume <= 0.0 {
                return Ok(());
            }
            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let t0 = ctx.current_time();
            for voice in voices(cue) {
                self.play_tone(ctx, t0, &voice)?;
            }
            Ok(())
        }
    }

    fn backend(e: impl std::fmt::Debug) -> AudioError {
        AudioError::Backend(format!("{e:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fails every other cue
    struct FlakyPlayer {
        calls: usize,
        played: Vec<Cue>,
    }

    impl CuePlayer for FlakyPlayer {
        fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(AudioError::Backend("decode failed".into()));
            }
            self.played.push(cue);
            Ok(())
        }
    }

    #[test]
    fn test_failures_are_swallowed() {
        let mut player = FlakyPlayer {
            calls: 0,
            played: Vec::new(),
        };
        play_cues(
            &mut player,
            [Cue::Bounce, Cue::BrickHit, Cue::BrickBreak, Cue::ItemPickup],
        );
        assert_eq!(player.calls, 4);
        assert_eq!(player.played, vec![Cue::Bounce, Cue::BrickBreak]);
    }

    #[test]
    fn test_log_player_never_fails() {
        let mut player = LogCuePlayer::new(0.0);
        assert!(player.play(Cue::GameOver).is_ok());
        assert!(LogCuePlayer::default().play(Cue::LaserFire).is_ok());
    }
}
