//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by exactly one step. All
//! motion is in pixels per tick, so the result never depends on frame rate.

use super::collision::{circle_in_rect, rects_overlap};
use super::effects::{EffectKind, activate, expire_effects, paddle_speed, toggle_infinite_laser};
use super::stage::{
    HitSource, hit_brick, recompute_ball_speed, reset_ball_and_paddle, step_transition,
};
use super::state::{Ball, Cue, GamePhase, GameState, advance_particle};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held left
    pub left: bool,
    /// Held right
    pub right: bool,
    /// Start / launch / fire (edge-triggered)
    pub serve_or_fire: bool,
    /// Debug: toggle the never-expiring laser (edge-triggered)
    pub toggle_laser: bool,
}

/// Whether the rest of the tick should run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Halt,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.toggle_laser {
        toggle_infinite_laser(state);
    }

    match state.phase {
        GamePhase::Intro => {
            if !input.serve_or_fire {
                return;
            }
            // The start press also launches the ball
            log::info!("Stage {} started", state.stage);
            state.phase = GamePhase::Serve;
        }
        GamePhase::StageTransition => {
            step_transition(state);
            return;
        }
        GamePhase::GameOver | GamePhase::Win => return,
        GamePhase::Serve | GamePhase::Playing => {}
    }

    state.time_ticks += 1;
    expire_effects(state);

    if input.serve_or_fire {
        serve_or_fire(state);
    }

    if step_balls(state) == Flow::Halt {
        return;
    }
    step_items(state);
    if step_lasers(state) == Flow::Halt {
        return;
    }
    step_particles(state);

    // Keeps brick-count acceleration and speed-up continuously applied
    recompute_ball_speed(state);

    move_paddle(state, input);
}

fn serve_or_fire(state: &mut GameState) {
    match state.phase {
        GamePhase::Serve => {
            state.phase = GamePhase::Playing;
        }
        GamePhase::Playing if state.effects.is_active(EffectKind::Laser) => {
            state.spawn_laser_pair();
            state.emit(Cue::LaserFire);
        }
        _ => {}
    }
}

fn step_balls(state: &mut GameState) -> Flow {
    if state.phase == GamePhase::Serve {
        if state.balls.is_empty() {
            reset_ball_and_paddle(state);
        } else {
            let paddle = state.paddle;
            state.balls[0].pin_to(&paddle);
        }
        return Flow::Continue;
    }

    // Reverse order so removal keeps the remaining indices valid
    let mut i = state.balls.len();
    while i > 0 {
        i -= 1;
        let mut ball = state.balls[i];
        let next = ball.pos + ball.vel;

        if next.x > FIELD_WIDTH - ball.radius || next.x < ball.radius {
            ball.vel.x = -ball.vel.x;
            state.emit(Cue::Bounce);
        }

        if next.y < ball.radius {
            ball.vel.y = -ball.vel.y;
            state.emit(Cue::Bounce);
        } else if next.y > FIELD_HEIGHT - ball.radius {
            let paddle = state.paddle;
            if ball.pos.x > paddle.x && ball.pos.x < paddle.x + paddle.width {
                ball.vel.x = (ball.pos.x - paddle.center_x()) * PADDLE_DEFLECT;
                ball.vel.y = -ball.vel.y.abs();
                state.emit(Cue::Bounce);
            } else {
                state.emit(Cue::BallDrop);
                state.balls.remove(i);
                if state.balls.is_empty() {
                    lose_life(state);
                    return if state.phase.in_play() {
                        Flow::Continue
                    } else {
                        Flow::Halt
                    };
                }
                continue;
            }
        }

        ball.pos += ball.vel;
        collide_ball_with_bricks(state, &mut ball);
        state.balls[i] = ball;

        if state.phase != GamePhase::Playing {
            return Flow::Halt;
        }
    }
    Flow::Continue
}

/// Brute-force scan in grid order; every brick containing the ball centre is hit
fn collide_ball_with_bricks(state: &mut GameState, ball: &mut Ball) {
    for idx in 0..state.bricks.total() {
        let brick = state.bricks.bricks[idx];
        if !brick.is_alive() || !circle_in_rect(ball.pos, ball.radius, &brick.rect()) {
            continue;
        }
        ball.vel.y = -ball.vel.y;
        hit_brick(state, idx, HitSource::Ball);
        if !state.phase.in_play() {
            return;
        }
    }
}

fn lose_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.emit(Cue::GameOver);
        log::info!("Game over at stage {} with score {}", state.stage, state.score);
    } else {
        log::info!("Ball lost, {} lives left", state.lives);
        reset_ball_and_paddle(state);
    }
}

fn step_items(state: &mut GameState) {
    let mut i = state.items.len();
    while i > 0 {
        i -= 1;
        state.items[i].pos.y += ITEM_SPEED;
        let item = state.items[i];

        if rects_overlap(&item.rect(), &state.paddle.rect()) {
            state.items.remove(i);
            state.emit(Cue::ItemPickup);
            activate(state, &item.item_type);
        } else if item.pos.y > FIELD_HEIGHT {
            state.items.remove(i);
        }
    }
}

fn step_lasers(state: &mut GameState) -> Flow {
    let mut i = state.lasers.len();
    while i > 0 {
        i -= 1;
        state.lasers[i].pos.y -= LASER_SPEED;
        let laser = state.lasers[i];
        let rect = laser.rect();

        // First live brick in scan order wins
        let target = state
            .bricks
            .iter()
            .position(|b| b.is_alive() && rects_overlap(&rect, &b.rect()));

        if let Some(idx) = target {
            hit_brick(state, idx, HitSource::Laser);
            state.lasers.remove(i);
            if !state.phase.in_play() {
                return Flow::Halt;
            }
        } else if laser.pos.y < 0.0 {
            state.lasers.remove(i);
        }
    }
    Flow::Continue
}

fn step_particles(state: &mut GameState) {
    let particles = std::mem::take(&mut state.particles);
    state.particles = particles.into_iter().filter_map(advance_particle).collect();
}

fn move_paddle(state: &mut GameState, input: &TickInput) {
    let speed = paddle_speed(state);
    let paddle = &mut state.paddle;
    if input.right && paddle.x < FIELD_WIDTH - paddle.width {
        paddle.x += speed;
    } else if input.left && paddle.x > 0.0 {
        paddle.x -= speed;
    }
    paddle.clamp_to_field();
}
