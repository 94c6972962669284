//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (grid scan order, insertion order for pools)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod effects;
pub mod stage;
pub mod state;
pub mod tick;

pub use collision::{Rect, brick_rect, circle_in_rect, rects_overlap};
pub use effects::{ActiveEffect, EffectKind, Effects, clear_all_effects, paddle_color, status_text};
pub use stage::{HitSource, recompute_ball_speed, restart};
pub use state::{
    Ball, Brick, BrickGrid, BrickStatus, Cue, GamePhase, GameState, Item, Laser, OverlayView,
    Paddle, Particle, advance_particle, brick_color,
};
pub use tick::{TickInput, tick};
