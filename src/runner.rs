//! Fixed-step driver
//!
//! Turns real elapsed time into simulation ticks and fans the results out to
//! the audio, overlay and renderer collaborators.

use crate::audio::{CuePlayer, play_cues};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::platform::{InputState, Overlay, Renderer};
use crate::settings::Settings;
use crate::sim::{self, Cue, EffectKind, GamePhase, GameState, OverlayView};
use crate::tuning::{Tuning, TuningError};

/// Longest frame we will try to catch up on (seconds)
const MAX_FRAME_TIME: f32 = 0.1;

/// Autopilot holds still when the target is this close to the paddle centre
const AUTOPILOT_DEADBAND: f32 = 4.0;

/// Autopilot laser cadence (ticks)
const AUTOPILOT_FIRE_EVERY: u64 = 15;

/// Game instance holding state and collaborators
pub struct Runner<A, O, R> {
    pub state: GameState,
    pub input: InputState,
    pub settings: Settings,
    pub audio: A,
    pub overlay: O,
    pub renderer: R,
    /// Steer and serve automatically
    pub autopilot: bool,
    accumulator: f32,
    /// Panel last pushed to the overlay; outer `None` until the first push
    last_overlay: Option<Option<OverlayView>>,
}

impl<A: CuePlayer, O: Overlay, R: Renderer> Runner<A, O, R> {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        audio: A,
        overlay: O,
        renderer: R,
    ) -> Result<Self, TuningError> {
        let mut state = GameState::new(seed, tuning)?;
        state.particle_cap = settings.max_particles();
        state.emit(Cue::IntroOpening);
        log::info!("New game (seed {}, quality {})", seed, settings.quality);

        Ok(Self {
            state,
            input: InputState::new(),
            settings,
            audio,
            overlay,
            renderer,
            autopilot: false,
            accumulator: 0.0,
            last_overlay: None,
        })
    }

    /// Advance by one display frame. Returns the number of ticks simulated.
    pub fn frame(&mut self, elapsed_secs: f32) -> u32 {
        let dt = if elapsed_secs.is_finite() {
            elapsed_secs.clamp(0.0, MAX_FRAME_TIME)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if self.autopilot {
                self.drive_autopilot();
            }
            let input = self.input.take_tick_input();
            let before = self.state.phase;
            sim::tick(&mut self.state, &input);
            if self.state.phase != before {
                log::info!("Phase {:?} -> {:?}", before, self.state.phase);
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        play_cues(&mut self.audio, self.state.drain_cues());
        self.sync_overlay();
        self.renderer.draw(&self.state);
        substeps
    }

    /// Overlay restart button. Ignored unless the game has ended.
    pub fn restart(&mut self) -> bool {
        if !sim::restart(&mut self.state) {
            return false;
        }
        self.accumulator = 0.0;
        self.input.reset();
        true
    }

    /// Apply new settings to the running game
    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.particle_cap = settings.max_particles();
        self.state.particles.truncate(self.state.particle_cap);
        self.settings = settings;
    }

    fn sync_overlay(&mut self) {
        let view = self.state.overlay();
        if self.last_overlay.as_ref() != Some(&view) {
            self.overlay.show(view.as_ref());
            self.last_overlay = Some(view);
        }
    }

    /// Serve whenever possible, chase the lowest falling ball, fire lasers
    fn drive_autopilot(&mut self) {
        let state = &self.state;
        match state.phase {
            GamePhase::Intro | GamePhase::Serve => {
                self.input.press_serve();
                self.input.set_direction(false, false);
            }
            GamePhase::Playing => {
                let target = state
                    .balls
                    .iter()
                    .filter(|b| b.vel.y > 0.0)
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                    .or_else(|| state.balls.iter().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)))
                    .map(|b| b.pos.x);
                let center = state.paddle.center_x();
                let (left, right) = match target {
                    Some(x) if x < center - AUTOPILOT_DEADBAND => (true, false),
                    Some(x) if x > center + AUTOPILOT_DEADBAND => (false, true),
                    _ => (false, false),
                };
                let fire = state.effects.is_active(EffectKind::Laser)
                    && state.time_ticks % AUTOPILOT_FIRE_EVERY == 0;
                self.input.set_direction(left, right);
                if fire {
                    self.input.press_serve();
                }
            }
            GamePhase::StageTransition | GamePhase::GameOver | GamePhase::Win => {
                self.input.set_direction(false, false);
            }
        }
    }
}
