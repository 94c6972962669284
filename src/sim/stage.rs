//! Stage progression: brick grid setup, speed scaling, brick damage and
//! the clear / advance / win flow.

use glam::Vec2;
use rand::Rng;

use super::effects::{EffectKind, clear_all_effects};
use super::state::{Brick, BrickStatus, Cue, GamePhase, GameState, brick_color};
use crate::consts::*;
use crate::ticks_for_ms;

/// What damaged a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    Ball,
    Laser,
}

/// Rebuild the full grid for the current stage
pub fn initialize_bricks(state: &mut GameState) {
    let max_health = state.tuning.max_brick_health(state.stage);
    let mut bricks = Vec::with_capacity(BRICK_COLUMNS * BRICK_ROWS);
    for col in 0..BRICK_COLUMNS {
        for row in 0..BRICK_ROWS {
            let health = state.rng.random_range(1..=max_health);
            bricks.push(Brick {
                col,
                row,
                status: BrickStatus::Alive,
                health,
                max_health: health,
            });
        }
    }
    state.bricks.bricks = bricks;
    log::debug!(
        "Stage {} grid built, health 1..={}",
        state.stage,
        max_health
    );
}

/// Per-axis ball speed for the current stage, progress and speed-up
pub fn target_ball_speed(state: &GameState) -> f32 {
    let stage_boost = state.stage.saturating_sub(1) as f32 * BALL_STAGE_BOOST;
    let accel = (state.bricks_broken / BRICKS_PER_ACCEL) as f32 * BALL_ACCEL_STEP;
    let mut speed = BALL_BASE_SPEED + stage_boost + accel;
    if let Some(factor) = state.effects.magnitude(EffectKind::SpeedUp) {
        speed *= factor;
    }
    speed.min(BALL_MAX_SPEED)
}

/// Rescale every ball to the target speed, keeping its direction signs.
///
/// A ball with a non-finite or near-zero velocity is re-served upward with a
/// random horizontal sign.
pub fn recompute_ball_speed(state: &mut GameState) {
    let speed = target_ball_speed(state);
    state.base_speed = speed;

    for ball in &mut state.balls {
        let v = ball.vel;
        let degenerate = !v.is_finite() || (v.x.abs() < 1.0 && v.y.abs() < 1.0);
        if degenerate {
            log::warn!("Recovered degenerate ball velocity {:?}", v);
            let sign = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            ball.vel = Vec2::new(speed * sign, -speed);
            continue;
        }

        let sign_x = if v.x == 0.0 {
            if state.rng.random_bool(0.5) { 1.0 } else { -1.0 }
        } else {
            v.x.signum()
        };
        let sign_y = if v.y == 0.0 { -1.0 } else { v.y.signum() };
        ball.vel = Vec2::new(sign_x * speed, sign_y * speed);
    }
}

/// Damage the brick at `index`. Returns true if the brick broke.
pub fn hit_brick(state: &mut GameState, index: usize, source: HitSource) -> bool {
    if !state.phase.in_play() {
        return false;
    }
    let Some(brick) = state.bricks.bricks.get_mut(index) else {
        return false;
    };
    if !brick.is_alive() {
        return false;
    }
    brick.health = brick.health.saturating_sub(1);
    let broken = brick.health == 0;

    if source == HitSource::Ball {
        state.emit(Cue::BrickHit);
    }
    if broken {
        break_brick(state, index);
        if source == HitSource::Ball {
            state.emit(Cue::BrickBreak);
        }
    } else {
        state.score += match source {
            HitSource::Ball => SCORE_BALL_HIT,
            HitSource::Laser => SCORE_LASER_HIT,
        };
    }
    broken
}

/// Destroy a brick: drop roll, explosion, score, and the stage-clear check.
///
/// Only breaks while in play, so a stage that is already transitioning can
/// never be cleared twice.
pub fn break_brick(state: &mut GameState, index: usize) {
    if !state.phase.in_play() {
        return;
    }
    let Some(brick) = state.bricks.bricks.get_mut(index) else {
        return;
    };
    brick.status = BrickStatus::Broken;
    brick.health = 0;
    let brick = *brick;
    let center = brick.rect().center();

    roll_item_drop(state, center);
    state.spawn_explosion(center, brick_color(brick.max_health));
    state.bricks_broken += 1;
    state.score += u64::from(brick.max_health) * SCORE_PER_HEALTH;

    if state.bricks_broken as usize == state.bricks.total() {
        on_stage_cleared(state);
    }
}

fn roll_item_drop(state: &mut GameState, center: Vec2) {
    if state.tuning.items.is_empty() || !state.rng.random_bool(state.tuning.item_drop_chance) {
        return;
    }
    let pick = state.rng.random_range(0..state.tuning.items.len());
    let item_type = state.tuning.items[pick];
    state.spawn_item(center, item_type);
}

/// Last brick of the stage broke: advance or win
pub fn on_stage_cleared(state: &mut GameState) {
    if state.stage < state.tuning.max_stage {
        state.emit(Cue::StageClear);
        state.stage += 1;
        state.transition_ticks = ticks_for_ms(state.tuning.stage_advance_delay_ms);
        state.phase = GamePhase::StageTransition;
        log::info!("Stage cleared, advancing to stage {}", state.stage);
    } else {
        state.emit(Cue::RoundClear);
        state.phase = GamePhase::Win;
        log::info!("Final stage cleared with score {}", state.score);
    }
}

/// Count down the stage-advance delay; builds the next stage when it runs out
pub fn step_transition(state: &mut GameState) {
    state.transition_ticks = state.transition_ticks.saturating_sub(1);
    if state.transition_ticks == 0 {
        advance_stage(state);
    }
}

/// Build the next stage and wait at its intro
pub fn advance_stage(state: &mut GameState) {
    state.bricks_broken = 0;
    initialize_bricks(state);
    reset_ball_and_paddle(state);
    recompute_ball_speed(state);
    state.phase = GamePhase::Intro;
}

/// Fresh ball on a centred paddle, with every effect cleared
pub fn reset_ball_and_paddle(state: &mut GameState) {
    clear_all_effects(state);
    state.paddle.recenter();
    state.spawn_ball_on_paddle();
    state.items.clear();
    state.particles.clear();
    state.phase = GamePhase::Serve;
}

/// Restart from stage 1. Only valid from GameOver or Win.
pub fn restart(state: &mut GameState) -> bool {
    if !state.phase.is_terminal() {
        log::debug!("Restart ignored in {:?}", state.phase);
        return false;
    }
    clear_all_effects(state);
    state.stage = 1;
    state.bricks_broken = 0;
    state.score = 0;
    state.lives = state.tuning.starting_lives;
    initialize_bricks(state);
    reset_ball_and_paddle(state);
    state.emit(Cue::IntroOpening);
    state.phase = GamePhase::Intro;
    log::info!("Game restarted");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn playing_state(tuning: Tuning) -> GameState {
        let mut state = GameState::new(5, tuning).unwrap();
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_stage_health_ranges() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        for stage in 1..=4 {
            state.stage = stage;
            initialize_bricks(&mut state);
            let cap = (2 + stage).min(5);
            assert!(state.bricks.iter().all(|b| (1..=cap).contains(&b.health)));
            assert!(state.bricks.iter().all(|b| b.health == b.max_health && b.is_alive()));
        }
    }

    #[test]
    fn test_speed_formula() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        assert!((target_ball_speed(&state) - 3.0).abs() < 1e-5);
        state.bricks_broken = 9;
        assert!((target_ball_speed(&state) - 3.1).abs() < 1e-5);
        state.stage = 3;
        state.bricks_broken = 60;
        assert!((target_ball_speed(&state) - 5.8).abs() < 1e-5);
    }

    #[test]
    fn test_speed_keeps_direction_signs() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        state.balls[0].vel = Vec2::new(-12.0, 2.5);
        recompute_ball_speed(&mut state);
        assert_eq!(state.balls[0].vel, Vec2::new(-3.0, 3.0));

        state.balls[0].vel = Vec2::new(0.0, 5.0);
        recompute_ball_speed(&mut state);
        assert_eq!(state.balls[0].vel.x.abs(), 3.0);
        assert_eq!(state.balls[0].vel.y, 3.0);
    }

    #[test]
    fn test_degenerate_velocity_is_reserved() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        for bad in [Vec2::new(f32::NAN, 2.0), Vec2::new(0.5, -0.5), Vec2::new(f32::INFINITY, 0.0)] {
            state.balls[0].vel = bad;
            recompute_ball_speed(&mut state);
            let v = state.balls[0].vel;
            assert_eq!(v.y, -3.0);
            assert_eq!(v.x.abs(), 3.0);
        }
    }

    #[test]
    fn test_ball_hit_then_break() {
        let mut state = playing_state(Tuning::default());
        let idx = 0;
        state.bricks.bricks[idx].health = 2;
        state.bricks.bricks[idx].max_health = 2;

        assert!(!hit_brick(&mut state, idx, HitSource::Ball));
        assert_eq!(state.score, SCORE_BALL_HIT);
        assert_eq!(state.bricks.bricks[idx].health, 1);

        assert!(hit_brick(&mut state, idx, HitSource::Ball));
        assert_eq!(state.score, SCORE_BALL_HIT + 20);
        assert_eq!(state.bricks_broken, 1);
        assert!(!state.bricks.bricks[idx].is_alive());
        assert_eq!(
            state.drain_cues(),
            vec![Cue::BrickHit, Cue::BrickHit, Cue::BrickBreak]
        );

        // A broken brick can't be hit again
        assert!(!hit_brick(&mut state, idx, HitSource::Ball));
        assert_eq!(state.bricks_broken, 1);
    }

    #[test]
    fn test_laser_hit_then_break() {
        let mut state = playing_state(Tuning {
            item_drop_chance: 1.0,
            ..Tuning::default()
        });
        let idx = 7;
        state.bricks.bricks[idx].health = 2;
        state.bricks.bricks[idx].max_health = 2;

        assert!(!hit_brick(&mut state, idx, HitSource::Laser));
        assert_eq!(state.bricks.bricks[idx].health, 1);
        assert_eq!(state.score, SCORE_LASER_HIT);
        assert!(state.bricks.bricks[idx].is_alive());

        assert!(hit_brick(&mut state, idx, HitSource::Laser));
        assert_eq!(state.score, SCORE_LASER_HIT + 20);
        assert!(!state.particles.is_empty());
        assert_eq!(state.items.len(), 1);
        // Lasers are silent
        assert!(state.drain_cues().is_empty());
    }

    #[test]
    fn test_no_drop_when_chance_is_zero() {
        let mut state = playing_state(Tuning {
            item_drop_chance: 0.0,
            custom_brick_health: Some(1),
            ..Tuning::default()
        });
        for idx in 0..30 {
            hit_brick(&mut state, idx, HitSource::Ball);
        }
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_last_brick_advances_stage() {
        let mut state = playing_state(Tuning {
            custom_brick_health: Some(1),
            ..Tuning::default()
        });
        for idx in 0..state.bricks.total() {
            hit_brick(&mut state, idx, HitSource::Ball);
        }
        assert_eq!(state.phase, GamePhase::StageTransition);
        assert_eq!(state.stage, 2);
        assert!(state.cues.contains(&Cue::StageClear));

        // Nothing can break while transitioning
        let before = state.bricks_broken;
        break_brick(&mut state, 0);
        assert_eq!(state.bricks_broken, before);

        for _ in 0..ticks_for_ms(state.tuning.stage_advance_delay_ms) {
            step_transition(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.bricks_broken, 0);
        assert_eq!(state.bricks.alive_count(), 60);
        assert_eq!(state.overlay().unwrap().title, "STAGE 2");
    }

    #[test]
    fn test_last_brick_of_last_stage_wins() {
        let mut state = playing_state(Tuning {
            custom_brick_health: Some(1),
            max_stage: 1,
            ..Tuning::default()
        });
        for idx in 0..state.bricks.total() {
            hit_brick(&mut state, idx, HitSource::Ball);
        }
        assert_eq!(state.phase, GamePhase::Win);
        assert!(state.cues.contains(&Cue::RoundClear));
        let overlay = state.overlay().unwrap();
        assert!(overlay.show_restart);
        assert_eq!(overlay.score, 600);
    }

    #[test]
    fn test_restart_only_from_terminal_phases() {
        let mut state = playing_state(Tuning::default());
        state.score = 90;
        assert!(!restart(&mut state));
        assert_eq!(state.score, 90);

        state.phase = GamePhase::GameOver;
        state.stage = 3;
        state.lives = 0;
        assert!(restart(&mut state));
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!((state.stage, state.score, state.lives, state.bricks_broken), (1, 0, 3, 0));
        assert_eq!(state.bricks.alive_count(), 60);
        assert!(state.effects.is_empty());
        assert_eq!(state.cues.last(), Some(&Cue::IntroOpening));
    }

    proptest! {
        #[test]
        fn prop_speed_in_range(stage in 1u32..=3, broken in 0u32..=60, boosted in any::<bool>()) {
            let mut state = GameState::new(3, Tuning::default()).unwrap();
            state.stage = stage;
            state.bricks_broken = broken;
            if boosted {
                crate::sim::effects::activate(&mut state, &crate::tuning::ItemType::SPEED_UP);
            }
            recompute_ball_speed(&mut state);
            let v = state.balls[0].vel;
            prop_assert!(v.x.abs() <= BALL_MAX_SPEED && v.y.abs() <= BALL_MAX_SPEED);
            prop_assert!(v.x.abs() >= BALL_BASE_SPEED && v.y.abs() >= BALL_BASE_SPEED);
            if !boosted {
                prop_assert!(state.base_speed <= 5.8 + 1e-4);
            }
        }

        #[test]
        fn prop_broken_plus_alive_is_total(seed in any::<u64>(), hits in proptest::collection::vec(0usize..60, 0..200)) {
            let mut state = GameState::new(seed, Tuning { max_stage: 1, ..Tuning::default() }).unwrap();
            state.phase = GamePhase::Playing;
            for idx in hits {
                let before = state.bricks.bricks[idx];
                hit_brick(&mut state, idx, HitSource::Laser);
                let after = state.bricks.bricks[idx];
                if before.is_alive() {
                    prop_assert_eq!(after.health, before.health - 1);
                    prop_assert_eq!(after.is_alive(), after.health > 0);
                } else {
                    prop_assert!(!after.is_alive());
                }
                prop_assert_eq!(state.bricks_broken as usize + state.bricks.alive_count(), state.bricks.total());
            }
        }
    }
}
