//! Timed power-up / power-down effects
//!
//! Each effect kind has at most one active entry. Entries carry an expiry tick
//! that the simulation checks once per tick; there are no scheduled callbacks.

use serde::{Deserialize, Serialize};

use super::stage::recompute_ball_speed;
use super::state::{Cue, GameState};
use crate::consts::*;
use crate::tuning::{ItemKind, ItemType};
use crate::{secs_for_ticks, ticks_for_ms};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    PaddleGrow,
    PaddleShrink,
    PaddleSlow,
    Laser,
    SpeedUp,
}

impl EffectKind {
    /// HUD order
    pub const ALL: [EffectKind; 5] = [
        EffectKind::PaddleGrow,
        EffectKind::Laser,
        EffectKind::SpeedUp,
        EffectKind::PaddleShrink,
        EffectKind::PaddleSlow,
    ];

    pub fn for_item(kind: ItemKind) -> Self {
        match kind {
            ItemKind::PaddleGrow => EffectKind::PaddleGrow,
            ItemKind::LaserShot => EffectKind::Laser,
            ItemKind::SpeedUp => EffectKind::SpeedUp,
            ItemKind::PaddleShrink => EffectKind::PaddleShrink,
            ItemKind::PaddleSlow => EffectKind::PaddleSlow,
        }
    }

    /// The other kind competing for the same resource, if any
    pub fn exclusive_with(self) -> Option<EffectKind> {
        match self {
            EffectKind::PaddleGrow => Some(EffectKind::PaddleShrink),
            EffectKind::PaddleShrink => Some(EffectKind::PaddleGrow),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EffectKind::PaddleGrow => "W UP",
            EffectKind::Laser => "LASER",
            EffectKind::SpeedUp => "S UP",
            EffectKind::PaddleShrink => "SHRINK",
            EffectKind::PaddleSlow => "SLOW",
        }
    }
}

/// An active effect timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    /// Tick at which the effect reverts; `None` never expires
    pub expires_at: Option<u64>,
    pub magnitude: f32,
}

impl ActiveEffect {
    pub fn is_infinite(&self) -> bool {
        self.expires_at.is_none()
    }

    pub fn remaining_ticks(&self, now: u64) -> Option<u64> {
        self.expires_at.map(|t| t.saturating_sub(now))
    }
}

/// Active effect timers, one slot per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    active: Vec<ActiveEffect>,
}

impl Effects {
    pub fn get(&self, kind: EffectKind) -> Option<&ActiveEffect> {
        self.active.iter().find(|e| e.kind == kind)
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn magnitude(&self, kind: EffectKind) -> Option<f32> {
        self.get(kind).map(|e| e.magnitude)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.active.iter()
    }

    /// Insert, replacing any entry of the same kind
    pub fn insert(&mut self, effect: ActiveEffect) {
        self.remove(effect.kind);
        self.active.push(effect);
    }

    pub fn remove(&mut self, kind: EffectKind) -> Option<ActiveEffect> {
        let idx = self.active.iter().position(|e| e.kind == kind)?;
        Some(self.active.remove(idx))
    }

    /// Remove and return every entry due at or before `now`
    pub fn take_expired(&mut self, now: u64) -> Vec<ActiveEffect> {
        let (expired, live): (Vec<_>, Vec<_>) = self
            .active
            .drain(..)
            .partition(|e| e.expires_at.is_some_and(|t| t <= now));
        self.active = live;
        expired
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Activate the effect carried by a picked-up item
pub fn activate(state: &mut GameState, item: &ItemType) {
    let kind = EffectKind::for_item(item.kind);

    // Superseded timer of the same kind reverts first so nothing stacks
    if let Some(prev) = state.effects.remove(kind) {
        revert(state, &prev);
    }
    if let Some(rival) = kind.exclusive_with() {
        if let Some(prev) = state.effects.remove(rival) {
            revert(state, &prev);
        }
    }

    apply(state, kind, item.magnitude);
    state.effects.insert(ActiveEffect {
        kind,
        expires_at: Some(state.time_ticks + ticks_for_ms(item.duration_ms)),
        magnitude: item.magnitude,
    });
    log::info!(
        "Effect {:?} active for {}ms (magnitude {})",
        kind,
        item.duration_ms,
        item.magnitude
    );

    if kind == EffectKind::SpeedUp {
        recompute_ball_speed(state);
    }
}

fn apply(state: &mut GameState, kind: EffectKind, magnitude: f32) {
    match kind {
        EffectKind::PaddleGrow => state.paddle.set_width_centered(PADDLE_WIDTH + magnitude),
        EffectKind::PaddleShrink => state
            .paddle
            .set_width_centered((PADDLE_WIDTH - magnitude).max(PADDLE_MIN_WIDTH)),
        // Read from the timer each tick
        EffectKind::PaddleSlow | EffectKind::Laser | EffectKind::SpeedUp => {}
    }
}

fn revert(state: &mut GameState, effect: &ActiveEffect) {
    match effect.kind {
        EffectKind::PaddleGrow | EffectKind::PaddleShrink => {
            state.paddle.set_width_centered(PADDLE_WIDTH);
        }
        EffectKind::SpeedUp => recompute_ball_speed(state),
        EffectKind::PaddleSlow | EffectKind::Laser => {}
    }
}

/// Revert every effect whose expiry tick has been reached
pub fn expire_effects(state: &mut GameState) {
    for effect in state.effects.take_expired(state.time_ticks) {
        log::info!("Effect {:?} expired", effect.kind);
        revert(state, &effect);
    }
}

/// Cancel every timer and return to baseline.
///
/// Called on life loss and full restart. Lasers in flight are discarded and
/// the ball pool is cut back to one entry.
pub fn clear_all_effects(state: &mut GameState) {
    state.effects.clear();
    state.paddle.width = PADDLE_WIDTH;
    recompute_ball_speed(state);
    state.lasers.clear();
    state.balls.truncate(1);
}

/// Debug affordance: toggle a laser mode that never expires.
///
/// Toggling off only happens from the infinite state and skips the revert
/// path entirely; a finite laser timer is replaced by the infinite one.
pub fn toggle_infinite_laser(state: &mut GameState) {
    let infinite = state
        .effects
        .get(EffectKind::Laser)
        .is_some_and(|e| e.is_infinite());
    if infinite {
        state.effects.remove(EffectKind::Laser);
        log::info!("Infinite laser mode off");
    } else {
        state.effects.insert(ActiveEffect {
            kind: EffectKind::Laser,
            expires_at: None,
            magnitude: 0.0,
        });
        state.emit(Cue::LaserFire);
        log::info!("Infinite laser mode on");
    }
}

/// Paddle speed after the slow debuff
pub fn paddle_speed(state: &GameState) -> f32 {
    PADDLE_SPEED * state.effects.magnitude(EffectKind::PaddleSlow).unwrap_or(1.0)
}

/// HUD text listing active effects and their remaining seconds
pub fn status_text(state: &GameState) -> String {
    EffectKind::ALL
        .iter()
        .filter_map(|&kind| state.effects.get(kind))
        .map(|e| match e.remaining_ticks(state.time_ticks) {
            Some(ticks) => format!("{}: {}s", e.kind.label(), secs_for_ticks(ticks)),
            None => format!("{}: \u{221e}", e.kind.label()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Paddle colour reflecting the most significant active effect
pub fn paddle_color(state: &GameState) -> u32 {
    let effects = &state.effects;
    if effects.is_active(EffectKind::PaddleSlow) {
        0xFFFF00
    } else if effects.is_active(EffectKind::PaddleShrink) {
        0xFF8C00
    } else if effects.is_active(EffectKind::Laser) {
        0xFF6347
    } else if effects.is_active(EffectKind::PaddleGrow) {
        0x4CAF50
    } else {
        0x0095DD
    }
}
