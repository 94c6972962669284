//! Brick Breaker - a multi-stage breakout arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, effects, game state)
//! - `platform`: Collaborator interfaces (input, overlay, renderer) and native adapters
//! - `audio`: Cue players
//! - `runner`: Fixed-timestep driver tying the core to its collaborators
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences (particles, volume)

pub mod audio;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use runner::Runner;
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz); all speeds are pixels per tick
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second
    pub const TICKS_PER_SEC: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play-field dimensions
    pub const FIELD_WIDTH: f32 = 555.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Launch height of a freshly created ball above the field bottom
    pub const BALL_SPAWN_OFFSET: f32 = 30.0;
    pub const BALL_BASE_SPEED: f32 = 3.0;
    /// Added per stage above the first
    pub const BALL_STAGE_BOOST: f32 = 0.8;
    /// Added for every `BRICKS_PER_ACCEL` bricks broken in the stage
    pub const BALL_ACCEL_STEP: f32 = 0.1;
    pub const BRICKS_PER_ACCEL: u32 = 5;
    pub const BALL_MAX_SPEED: f32 = 8.0;
    /// Horizontal deflection per pixel of offset from the paddle centre
    pub const PADDLE_DEFLECT: f32 = 0.2;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 75.0;
    pub const PADDLE_MIN_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    pub const PADDLE_SPEED: f32 = 7.0;

    /// Brick grid layout
    pub const BRICK_COLUMNS: usize = 10;
    pub const BRICK_ROWS: usize = 6;
    pub const BRICK_WIDTH: f32 = 50.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 5.0;
    pub const BRICK_OFFSET_TOP: f32 = 30.0;
    pub const BRICK_OFFSET_LEFT: f32 = 5.0;
    /// Upper bound for the stage-scaled brick health roll
    pub const BRICK_MAX_HEALTH: u32 = 5;

    /// Falling items
    pub const ITEM_SIZE: f32 = 15.0;
    pub const ITEM_SPEED: f32 = 2.0;

    /// Lasers
    pub const LASER_WIDTH: f32 = 3.0;
    pub const LASER_HEIGHT: f32 = 10.0;
    pub const LASER_SPEED: f32 = 5.0;
    /// Inset of each laser emitter from the paddle edge
    pub const LASER_INSET: f32 = 5.0;

    /// Explosion particles per broken brick
    pub const EXPLOSION_PARTICLES: usize = 10;

    /// Score awards
    pub const SCORE_BALL_HIT: u64 = 5;
    pub const SCORE_LASER_HIT: u64 = 2;
    pub const SCORE_PER_HEALTH: u64 = 10;
}

/// Convert a millisecond duration into whole simulation ticks (rounded up)
#[inline]
pub fn ticks_for_ms(ms: u32) -> u64 {
    (u64::from(ms) * u64::from(consts::TICKS_PER_SEC)).div_ceil(1000)
}

/// Convert a tick count back into whole seconds (rounded up) for HUD display
#[inline]
pub fn secs_for_ticks(ticks: u64) -> u64 {
    ticks.div_ceil(u64::from(consts::TICKS_PER_SEC))
}
