//! Platform abstraction layer
//!
//! The outer surfaces the driver talks to:
//! - Input events
//! - Overlay (intro / game over / win screens)
//! - Frame rendering

pub mod input;

pub use input::{InputState, Key};

use crate::sim::{GameState, OverlayView, status_text};

/// Full-screen message panel
pub trait Overlay {
    /// Show a panel, or hide it with `None`
    fn show(&mut self, view: Option<&OverlayView>);
}

/// Draws one frame of the game
pub trait Renderer {
    fn draw(&mut self, state: &GameState);
}

/// Overlay that writes panel changes to the log
#[derive(Debug, Default)]
pub struct LogOverlay {
    /// Last panel shown
    pub current: Option<OverlayView>,
}

impl Overlay for LogOverlay {
    fn show(&mut self, view: Option<&OverlayView>) {
        match view {
            Some(v) => {
                let restart = if v.show_restart { " [restart]" } else { "" };
                log::info!("== {} == {}{}", v.title, v.message, restart);
            }
            None => log::debug!("overlay hidden"),
        }
        self.current = view.cloned();
    }
}

/// Text HUD: score, lives, stage, bricks left and active effects
#[derive(Debug, Default)]
pub struct HudRenderer {
    pub line: String,
    pub frames: u64,
}

impl HudRenderer {
    pub fn format_hud(state: &GameState) -> String {
        let mut line = format!(
            "Score: {}  Lives: {}  Stage: {}  Bricks: {}",
            state.score,
            state.lives,
            state.stage,
            state.bricks.alive_count()
        );
        let effects = status_text(state);
        if !effects.is_empty() {
            line.push_str("  ");
            line.push_str(&effects);
        }
        line
    }
}

impl Renderer for HudRenderer {
    fn draw(&mut self, state: &GameState) {
        let line = Self::format_hud(state);
        if line != self.line {
            log::trace!("{}", line);
            self.line = line;
        }
        self.frames += 1;
    }
}
