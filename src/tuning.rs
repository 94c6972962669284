//! Data-driven game balance
//!
//! Everything a designer would want to tweak without touching the simulation:
//! stage count, lives, drop odds and the power-up/power-down item table.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::BRICK_MAX_HEALTH;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Item kinds that can drop from a broken brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    PaddleGrow,
    LaserShot,
    SpeedUp,
    PaddleShrink,
    PaddleSlow,
}

/// Descriptor shared by every item of one kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemType {
    pub kind: ItemKind,
    /// 0xRRGGBB
    pub color: u32,
    pub duration_ms: u32,
    /// Width delta for grow/shrink, speed factor for speed-up/slow, unused for lasers
    pub magnitude: f32,
    pub symbol: char,
}

impl ItemType {
    pub const PADDLE_GROW: ItemType = ItemType {
        kind: ItemKind::PaddleGrow,
        color: 0x008000,
        duration_ms: 5000,
        magnitude: 40.0,
        symbol: 'W',
    };
    pub const LASER_SHOT: ItemType = ItemType {
        kind: ItemKind::LaserShot,
        color: 0xFF0000,
        duration_ms: 7000,
        magnitude: 0.0,
        symbol: 'L',
    };
    pub const SPEED_UP: ItemType = ItemType {
        kind: ItemKind::SpeedUp,
        color: 0x0000FF,
        duration_ms: 4000,
        magnitude: 1.5,
        symbol: 'M',
    };
    pub const PADDLE_SHRINK: ItemType = ItemType {
        kind: ItemKind::PaddleShrink,
        color: 0xFFA500,
        duration_ms: 4000,
        magnitude: 30.0,
        symbol: 'S',
    };
    pub const PADDLE_SLOW: ItemType = ItemType {
        kind: ItemKind::PaddleSlow,
        color: 0xFFFF00,
        duration_ms: 5000,
        magnitude: 0.5,
        symbol: 'P',
    };

    /// The stock item table, in drop-roll order
    pub fn defaults() -> Vec<ItemType> {
        vec![
            Self::PADDLE_GROW,
            Self::LASER_SHOT,
            Self::SPEED_UP,
            Self::PADDLE_SHRINK,
            Self::PADDLE_SLOW,
        ]
    }
}

/// Gameplay balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Number of stages in a full run
    pub max_stage: u32,
    /// Lives at the start of a run
    pub starting_lives: u32,
    /// Probability that a broken brick drops an item
    pub item_drop_chance: f64,
    /// Fixed brick health for every stage (testing aid); `None` scales with stage
    pub custom_brick_health: Option<u32>,
    /// Pause between clearing a stage and rebuilding the next one
    pub stage_advance_delay_ms: u32,
    /// Item table used by the drop roll
    pub items: Vec<ItemType>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_stage: 3,
            starting_lives: 3,
            item_drop_chance: 0.15,
            custom_brick_health: None,
            stage_advance_delay_ms: 100,
            items: ItemType::defaults(),
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.max_stage == 0 {
            return Err(invalid("max_stage", "must be at least 1"));
        }
        if self.starting_lives == 0 {
            return Err(invalid("starting_lives", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.item_drop_chance) {
            return Err(invalid(
                "item_drop_chance",
                format!("{} is outside [0, 1]", self.item_drop_chance),
            ));
        }
        if let Some(health) = self.custom_brick_health {
            if !(1..=BRICK_MAX_HEALTH).contains(&health) {
                return Err(invalid(
                    "custom_brick_health",
                    format!("{health} is outside [1, {BRICK_MAX_HEALTH}]"),
                ));
            }
        }
        if self.items.is_empty() {
            return Err(invalid("items", "item table is empty"));
        }
        for item in &self.items {
            if !item.magnitude.is_finite() || item.magnitude < 0.0 {
                return Err(invalid(
                    "items",
                    format!("{:?} has magnitude {}", item.kind, item.magnitude),
                ));
            }
            // Multipliers: zero would freeze the ball or the paddle
            let multiplier = matches!(item.kind, ItemKind::SpeedUp | ItemKind::PaddleSlow);
            if multiplier && item.magnitude <= 0.0 {
                return Err(invalid(
                    "items",
                    format!("{:?} multiplier must be above zero", item.kind),
                ));
            }
        }
        Ok(())
    }

    /// Brick health ceiling for a stage
    pub fn max_brick_health(&self, stage: u32) -> u32 {
        match self.custom_brick_health {
            Some(health) => health,
            None => (2 + stage).min(BRICK_MAX_HEALTH),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}
