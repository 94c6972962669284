//! Game state and core simulation types
//!
//! Everything the simulation step mutates lives in one owned [`GameState`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, brick_rect};
use super::effects::Effects;
use super::stage;
use crate::consts::*;
use crate::tuning::{ItemType, Tuning, TuningError};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start press, overlay shown
    Intro,
    /// In play, ball resting on the paddle waiting for launch
    Serve,
    /// In play, ball free
    Playing,
    /// Stage cleared, next grid is built once the delay runs out
    StageTransition,
    /// Out of lives; terminal until restart
    GameOver,
    /// Final stage cleared; terminal until restart
    Win,
}

impl GamePhase {
    /// Serve and Playing are the two sub-states of active play
    pub fn in_play(self) -> bool {
        matches!(self, GamePhase::Serve | GamePhase::Playing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Win)
    }
}

/// Audio cues raised by the simulation, drained by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Ball bounced off a wall or the paddle
    Bounce,
    /// Ball damaged a brick
    BrickHit,
    /// Ball destroyed a brick
    BrickBreak,
    ItemPickup,
    LaserFire,
    /// Ball fell past the paddle
    BallDrop,
    /// A stage was cleared and the next one is coming
    StageClear,
    GameOver,
    /// The last stage was cleared
    RoundClear,
    IntroOpening,
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Fresh ball above the paddle, launching upward with a random horizontal sign
    pub fn new(speed: f32, rng: &mut Pcg32) -> Self {
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Self {
            pos: Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - BALL_SPAWN_OFFSET - BALL_RADIUS),
            vel: Vec2::new(speed * sign, -speed),
            radius: BALL_RADIUS,
        }
    }

    /// Rest the ball on top of the paddle centre
    pub fn pin_to(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), FIELD_HEIGHT - PADDLE_HEIGHT - self.radius);
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (FIELD_WIDTH - PADDLE_WIDTH) / 2.0,
            width: PADDLE_WIDTH,
        }
    }
}

impl Paddle {
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, FIELD_HEIGHT - PADDLE_HEIGHT, self.width, PADDLE_HEIGHT)
    }

    /// Keep the paddle inside the field
    pub fn clamp_to_field(&mut self) {
        self.x = self.x.clamp(0.0, (FIELD_WIDTH - self.width).max(0.0));
    }

    /// Change width keeping the midpoint, then clamp to the field
    pub fn set_width_centered(&mut self, width: f32) {
        self.x += (self.width - width) / 2.0;
        self.width = width;
        self.clamp_to_field();
    }

    /// Put the paddle back in the middle of the field
    pub fn recenter(&mut self) {
        self.x = (FIELD_WIDTH - self.width) / 2.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickStatus {
    Alive,
    Broken,
}

/// One cell of the brick grid. Screen position comes from the grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brick {
    pub col: usize,
    pub row: usize,
    pub status: BrickStatus,
    pub health: u32,
    /// Health at spawn; picks colour and break score
    pub max_health: u32,
}

impl Brick {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.status == BrickStatus::Alive
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        brick_rect(self.col, self.row)
    }
}

/// Column-major brick grid (column outer, row inner)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickGrid {
    pub bricks: Vec<Brick>,
}

impl BrickGrid {
    pub fn total(&self) -> usize {
        self.bricks.len()
    }

    pub fn alive_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_alive()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }
}

/// Colour lookup by (max) health
pub fn brick_color(health: u32) -> u32 {
    match health {
        0 | 1 => 0xFF5733,
        2 => 0xFFC300,
        3 => 0xC70039,
        4 => 0x800000,
        _ => 0x4B0000,
    }
}

/// A falling power-up / power-down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Top-left corner
    pub pos: Vec2,
    pub item_type: ItemType,
}

impl Item {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, ITEM_SIZE, ITEM_SIZE)
    }
}

/// A laser bolt travelling up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    /// Top-left corner
    pub pos: Vec2,
}

impl Laser {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, LASER_WIDTH, LASER_HEIGHT)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub size: f32,
    /// 1.0 at spawn, removed at <= 0
    pub alpha: f32,
    pub decay: f32,
}

/// Move a particle one tick and fade it; `None` once it has faded out
pub fn advance_particle(p: Particle) -> Option<Particle> {
    let next = Particle {
        pos: p.pos + p.vel,
        alpha: p.alpha - p.decay,
        ..p
    };
    (next.alpha > 0.0).then_some(next)
}

/// What the overlay should show for the current phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayView {
    pub phase: GamePhase,
    pub title: String,
    pub message: String,
    pub score: u64,
    pub show_restart: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Current stage (1-based)
    pub stage: u32,
    pub score: u64,
    pub lives: u32,
    /// Bricks broken in the current stage
    pub bricks_broken: u32,
    /// Simulation tick counter (advances only while in play)
    pub time_ticks: u64,
    /// Ticks left before the next stage is built
    pub transition_ticks: u64,
    /// Per-axis ball speed from the last recompute
    pub base_speed: f32,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: BrickGrid,
    pub items: Vec<Item>,
    pub lasers: Vec<Laser>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub particle_cap: usize,
    pub effects: Effects,
    /// Cues raised since the last drain
    pub cues: Vec<Cue>,
}

impl GameState {
    /// Create a new game at the stage-1 intro. The tuning is validated first.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: tuning.starting_lives,
            tuning,
            phase: GamePhase::Intro,
            stage: 1,
            score: 0,
            bricks_broken: 0,
            time_ticks: 0,
            transition_ticks: 0,
            base_speed: BALL_BASE_SPEED,
            paddle: Paddle::default(),
            balls: Vec::new(),
            bricks: BrickGrid::default(),
            items: Vec::new(),
            lasers: Vec::new(),
            particles: Vec::new(),
            particle_cap: crate::Settings::default().max_particles(),
            effects: Effects::default(),
            cues: Vec::new(),
        };

        stage::initialize_bricks(&mut state);
        stage::reset_ball_and_paddle(&mut state);
        state.phase = GamePhase::Intro;
        Ok(state)
    }

    pub fn emit(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Take all cues raised since the last call
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// Whether the ball is waiting on the paddle
    pub fn ball_on_paddle(&self) -> bool {
        self.phase == GamePhase::Serve
    }

    /// Replace the ball pool with a single ball resting on the paddle
    pub fn spawn_ball_on_paddle(&mut self) {
        let mut ball = Ball::new(self.base_speed, &mut self.rng);
        ball.pin_to(&self.paddle);
        self.balls.clear();
        self.balls.push(ball);
    }

    pub fn spawn_item(&mut self, center: Vec2, item_type: ItemType) {
        self.items.push(Item {
            pos: center - Vec2::splat(ITEM_SIZE / 2.0),
            item_type,
        });
    }

    /// One bolt from each paddle edge
    pub fn spawn_laser_pair(&mut self) {
        let y = FIELD_HEIGHT - PADDLE_HEIGHT - LASER_HEIGHT;
        let left = self.paddle.x + LASER_INSET;
        let right = self.paddle.x + self.paddle.width - LASER_INSET - LASER_WIDTH;
        self.lasers.push(Laser { pos: Vec2::new(left, y) });
        self.lasers.push(Laser { pos: Vec2::new(right, y) });
    }

    /// Burst of particles, limited by the particle cap
    pub fn spawn_explosion(&mut self, center: Vec2, color: u32) {
        for _ in 0..EXPLOSION_PARTICLES {
            if self.particles.len() >= self.particle_cap {
                break;
            }
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 4.0,
                (self.rng.random::<f32>() - 0.5) * 4.0,
            );
            let size = self.rng.random::<f32>() * 3.0 + 1.0;
            let decay = self.rng.random::<f32>() * 0.05 + 0.02;
            self.particles.push(Particle {
                pos: center,
                vel,
                color,
                size,
                alpha: 1.0,
                decay,
            });
        }
    }

    /// Overlay for the current phase, `None` when the field should be unobstructed
    pub fn overlay(&self) -> Option<OverlayView> {
        let (title, message, show_restart) = match self.phase {
            GamePhase::Intro if self.stage > 1 => (
                format!("STAGE {}", self.stage),
                "Press Space to start the next stage!".to_string(),
                false,
            ),
            GamePhase::Intro => (
                "BRICK BREAKER".to_string(),
                "Press Space to start! (move with the arrow keys)".to_string(),
                false,
            ),
            GamePhase::GameOver => (
                "GAME OVER".to_string(),
                format!("Final score: {}. Play again?", self.score),
                true,
            ),
            GamePhase::Win => (
                "STAGE CLEAR!".to_string(),
                format!("Final score: {}. Congratulations!", self.score),
                true,
            ),
            GamePhase::Serve | GamePhase::Playing | GamePhase::StageTransition => return None,
        };
        Some(OverlayView {
            phase: self.phase,
            title,
            message,
            score: self.score,
            show_restart,
        })
    }
}
