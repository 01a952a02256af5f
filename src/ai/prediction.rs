// Trajectory prediction for AI bots

use crate::game::physics::{resolve_obstacles, resolve_walls};
use crate::game::state::{Arena, Slot};

/// Predict where the ball will be, along the paddle's axis of movement, when it
/// reaches the paddle's face
///
/// Forward-simulates a copy of the ball with the same wall and obstacle
/// bounces the integrator applies (paddles are ignored). Returns None if the
/// ball is moving away from the paddle or leaves the field through another
/// open boundary. If `max_steps` runs out first, the ball's current lateral
/// coordinate is returned.
///
/// Works for vertical paddles (predicts Y) and horizontal paddles (predicts X).
pub fn predict_intercept(arena: &Arena, slot: Slot, max_steps: u32) -> Option<f32> {
    let paddle = arena.paddle(slot)?;
    let normal = slot.face_normal();
    let lateral = slot.lateral_axis();

    // Face coordinate measured along the normal, so "reached" is one comparison
    // for every slot
    let face = (normal.abs() * paddle.face()).dot(normal);
    let reached = |pos: glam::Vec2, radius: f32| pos.dot(normal) - radius <= face;

    let ball = &arena.ball;
    if ball.vel.dot(normal) >= 0.0 {
        return None;
    }
    if reached(ball.pos, ball.radius) {
        return Some(ball.pos.dot(lateral));
    }

    let mut sim = ball.clone();
    for _ in 0..max_steps {
        sim.pos += sim.vel;
        if resolve_obstacles(&mut sim, &arena.obstacles).is_none() {
            resolve_walls(&mut sim, &arena.field, &arena.walls);
        }

        if reached(sim.pos, sim.radius) {
            return Some(sim.pos.dot(lateral));
        }
        if arena.walls.crossed_by(&sim, &arena.field).is_some() {
            return None;
        }
    }

    Some(ball.pos.dot(lateral))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::game::map::Obstacle;
    use crate::game::state::{profile_and_dimensions, GameMode};
    use glam::Vec2;

    const STEPS: u32 = 500;

    fn arena_with_ball(mode: GameMode, pos: Vec2, vel: Vec2) -> Arena {
        let (profile, dims) = profile_and_dimensions(mode, &Config::default());
        let mut arena = profile.build_arena(&dims, Vec::new());
        arena.ball.pos = pos;
        arena.ball.vel = vel;
        arena
    }

    #[test]
    fn test_simple_intercept_no_bounce() {
        let arena = arena_with_ball(GameMode::OnePlayer, Vec2::new(400.0, 200.0), Vec2::new(6.0, 0.0));
        let predicted = predict_intercept(&arena, Slot::Right, STEPS).unwrap();
        assert!((predicted - 200.0).abs() < 1.0);
    }

    #[test]
    fn test_intercept_with_angle_no_bounce() {
        // Reaches the right face after 62 steps, 3 units down per step
        let arena = arena_with_ball(GameMode::OnePlayer, Vec2::new(400.0, 200.0), Vec2::new(6.0, 3.0));
        let predicted = predict_intercept(&arena, Slot::Right, STEPS).unwrap();
        assert!((predicted - 386.0).abs() < 1.0, "predicted {}", predicted);
    }

    #[test]
    fn test_single_wall_bounce_bottom() {
        let arena = arena_with_ball(GameMode::OnePlayer, Vec2::new(400.0, 200.0), Vec2::new(6.0, 6.0));
        let predicted = predict_intercept(&arena, Slot::Right, STEPS).unwrap();

        // Bounced off the bottom wall and came back up
        assert!(predicted > 205.0 && predicted < 230.0, "predicted {}", predicted);
    }

    #[test]
    fn test_multiple_bounces() {
        let arena = arena_with_ball(GameMode::OnePlayer, Vec2::new(400.0, 200.0), Vec2::new(3.0, 12.0));
        let predicted = predict_intercept(&arena, Slot::Right, STEPS).unwrap();
        assert!((0.0..=400.0).contains(&predicted));
    }

    #[test]
    fn test_ball_moving_away() {
        let arena = arena_with_ball(GameMode::OnePlayer, Vec2::new(400.0, 200.0), Vec2::new(-6.0, 0.0));
        assert!(predict_intercept(&arena, Slot::Right, STEPS).is_none());

        let arena = arena_with_ball(GameMode::OnePlayer, Vec2::new(400.0, 200.0), Vec2::new(6.0, 0.0));
        assert!(predict_intercept(&arena, Slot::Left, STEPS).is_none());
    }

    #[test]
    fn test_ball_stationary_on_depth_axis() {
        let arena = arena_with_ball(GameMode::OnePlayer, Vec2::new(400.0, 200.0), Vec2::new(0.0, 3.0));
        assert!(predict_intercept(&arena, Slot::Right, STEPS).is_none());
    }

    #[test]
    fn test_step_cap_falls_back_to_current_position() {
        let arena = arena_with_ball(GameMode::OnePlayer, Vec2::new(400.0, 123.0), Vec2::new(6.0, 1.0));
        assert_eq!(predict_intercept(&arena, Slot::Right, 10), Some(123.0));
    }

    #[test]
    fn test_obstacle_turns_ball_away() {
        let mut arena = arena_with_ball(GameMode::OnePlayer, Vec2::new(400.0, 200.0), Vec2::new(6.0, 0.0));
        arena.obstacles.push(Obstacle::Circle {
            center: Vec2::new(600.0, 200.0),
            radius: 30.0,
        });
        assert!(predict_intercept(&arena, Slot::Right, STEPS).is_none());
    }

    #[test]
    fn test_horizontal_paddle_predicts_x() {
        // Bottom face sits at 600 - 12 - 10 = 578; ball edge touches it after 45 steps
        let arena = arena_with_ball(GameMode::FourPlayers, Vec2::new(300.0, 300.0), Vec2::new(2.0, 6.0));
        let predicted = predict_intercept(&arena, Slot::Bottom, STEPS).unwrap();
        assert!((predicted - 390.0).abs() < 1e-3, "predicted {}", predicted);
    }
}
