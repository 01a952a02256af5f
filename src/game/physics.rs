use glam::Vec2;

use super::collision::{obstacle_contact, rect_contact, wall_contact, Contact};
use super::geometry::{clamp_speed, reflect};
use super::map::Obstacle;
use super::state::{Arena, Ball, Dimensions, Field, Paddle, Slot, Walls};

/// Push-out distance as a multiple of the penetration depth, so the ball
/// does not re-collide with the same solid on the next tick
pub const PUSH_OUT_FACTOR: f32 = 1.1;

/// A paddle contact counts as a face hit when its normal is this close to the face normal
const FACE_HIT_COS: f32 = 0.5;

/// What the ball touched this tick (at most one thing) and whether it left the field
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhysicsEvents {
    pub obstacle_collision: Option<usize>,
    pub paddle_collision: Option<Slot>,
    pub wall_collision: bool,
    /// Open boundary the ball is past after resolution
    pub boundary_crossed: Option<Slot>,
}

impl PhysicsEvents {
    pub fn any(&self) -> bool {
        self.obstacle_collision.is_some() || self.paddle_collision.is_some() || self.wall_collision
    }
}

/// Advance the arena by one tick.
///
/// Paddles move first, then the ball; then at most one collision is resolved,
/// with obstacles taking priority over paddles and paddles over walls.
pub fn update(arena: &mut Arena, dims: &Dimensions) -> PhysicsEvents {
    let field = arena.field;
    for paddle in arena.paddles.iter_mut().filter(|p| p.alive) {
        paddle.advance(&field);
    }

    arena.ball.pos += arena.ball.vel;

    let mut events = PhysicsEvents::default();

    if let Some(index) = resolve_obstacles(&mut arena.ball, &arena.obstacles) {
        events.obstacle_collision = Some(index);
    } else if let Some(slot) = resolve_paddles(&mut arena.ball, &arena.paddles, dims) {
        events.paddle_collision = Some(slot);
    } else if resolve_walls(&mut arena.ball, &field, &arena.walls) {
        events.wall_collision = true;
    }

    arena.ball.vel = clamp_speed(arena.ball.vel, dims.max_ball_speed);
    events.boundary_crossed = arena.crossed_boundary();

    if events.any() {
        tracing::trace!(?events, pos = ?arena.ball.pos, vel = ?arena.ball.vel, "collision");
    }

    events
}

/// First obstacle in list order that touches the ball; later ones are not tested
pub fn resolve_obstacles(ball: &mut Ball, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles.iter().enumerate().find_map(|(index, obstacle)| {
        let contact = obstacle_contact(ball.pos, ball.radius, ball.vel, obstacle)?;
        apply_contact(ball, &contact);
        Some(index)
    })
}

pub fn resolve_walls(ball: &mut Ball, field: &Field, walls: &Walls) -> bool {
    match wall_contact(ball.pos, ball.radius, field, walls) {
        Some(contact) => {
            apply_contact(ball, &contact);
            true
        }
        None => false,
    }
}

fn resolve_paddles(ball: &mut Ball, paddles: &[Paddle], dims: &Dimensions) -> Option<Slot> {
    paddles.iter().filter(|p| p.alive).find_map(|paddle| {
        let contact = rect_contact(ball.pos, ball.radius, ball.vel, paddle.pos, paddle.size)?;
        bounce_off_paddle(ball, paddle, &contact, dims);
        Some(paddle.slot)
    })
}

/// Mirror reflection (only if the ball is moving into the surface) plus push-out
pub fn apply_contact(ball: &mut Ball, contact: &Contact) {
    if ball.vel.dot(contact.normal) < 0.0 {
        ball.vel = reflect(ball.vel, contact.normal);
    }
    ball.pos += contact.normal * contact.penetration * PUSH_OUT_FACTOR;
}

/// Paddle hit: face hits take their angle from where the ball struck the
/// paddle plus some of the paddle's own motion; edge hits mirror. Either way
/// the ball speeds up, capped at the maximum.
fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, contact: &Contact, dims: &Dimensions) {
    let approaching = ball.vel.dot(contact.normal) < 0.0;
    ball.pos += contact.normal * contact.penetration * PUSH_OUT_FACTOR;

    if !approaching {
        return;
    }

    let face = paddle.slot.face_normal();
    let speed = ball.speed();

    if contact.normal.dot(face) > FACE_HIT_COS {
        let tangent = paddle.slot.lateral_axis();
        let half_length = (paddle.length() / 2.0).max(f32::EPSILON);
        let offset = ((ball.pos - paddle.center()).dot(tangent) / half_length).clamp(-1.0, 1.0);
        let angle = offset * dims.max_bounce_angle;

        let direction = face * angle.cos() + tangent * angle.sin();
        let spin = tangent * paddle.velocity * dims.paddle_influence;
        let biased = (direction * speed + spin).normalize_or_zero();
        let direction = if biased == Vec2::ZERO { direction } else { biased };

        ball.vel = direction * speed;
    } else {
        ball.vel = reflect(ball.vel, contact.normal);
    }

    ball.vel = clamp_speed(ball.vel * dims.acceleration, dims.max_ball_speed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::game::state::{profile_and_dimensions, GameMode};
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn classic_arena(obstacles: Vec<Obstacle>) -> (Arena, Dimensions) {
        let config = Config::default();
        let (profile, dims) = profile_and_dimensions(GameMode::TwoPlayers, &config);
        (profile.build_arena(&dims, obstacles), dims)
    }

    #[test]
    fn test_circle_obstacle_dead_centre_reverses_dx() {
        let (mut arena, dims) = classic_arena(vec![Obstacle::Circle {
            center: Vec2::new(400.0, 200.0),
            radius: 30.0,
        }]);
        arena.ball.pos = Vec2::new(400.0 - 30.0 - 8.0 - 2.0, 200.0);
        arena.ball.vel = Vec2::new(5.0, 0.0);

        let events = update(&mut arena, &dims);

        assert_eq!(events.obstacle_collision, Some(0));
        assert!((arena.ball.vel.x + 5.0).abs() < EPS);
        assert!(arena.ball.vel.y.abs() < EPS);
    }

    #[test]
    fn test_first_obstacle_wins() {
        let overlapping = vec![
            Obstacle::Circle {
                center: Vec2::new(400.0, 200.0),
                radius: 30.0,
            },
            Obstacle::Rectangle {
                origin: Vec2::new(365.0, 150.0),
                width: 20.0,
                height: 100.0,
            },
        ];
        let (mut arena, dims) = classic_arena(overlapping);
        arena.ball.pos = Vec2::new(359.0, 200.0);
        arena.ball.vel = Vec2::new(4.0, 0.0);

        let events = update(&mut arena, &dims);
        assert_eq!(events.obstacle_collision, Some(0));
    }

    #[test]
    fn test_wall_bounce_keeps_speed() {
        let (mut arena, dims) = classic_arena(Vec::new());
        arena.ball.pos = Vec2::new(400.0, 10.0);
        arena.ball.vel = Vec2::new(3.0, -4.0);

        let events = update(&mut arena, &dims);

        assert!(events.wall_collision);
        assert!((arena.ball.vel - Vec2::new(3.0, 4.0)).length() < EPS);
        assert!(arena.ball.pos.y >= arena.ball.radius);
    }

    #[test]
    fn test_centre_paddle_hit_goes_straight_and_accelerates() {
        let (mut arena, dims) = classic_arena(Vec::new());
        let paddle = arena.paddle(Slot::Right).unwrap().clone();
        arena.ball.pos = Vec2::new(paddle.face() - arena.ball.radius - 3.0, paddle.lateral_center());
        arena.ball.vel = Vec2::new(6.0, 0.0);

        let events = update(&mut arena, &dims);

        assert_eq!(events.paddle_collision, Some(Slot::Right));
        assert!(arena.ball.vel.x < 0.0);
        assert!(arena.ball.vel.y.abs() < EPS);
        assert!((arena.ball.speed() - 6.0 * dims.acceleration).abs() < EPS);
    }

    #[test]
    fn test_edge_paddle_hit_deflects_up_to_max_angle() {
        let (mut arena, dims) = classic_arena(Vec::new());
        let paddle = arena.paddle(Slot::Left).unwrap().clone();
        // Strike near the bottom end of the left paddle
        arena.ball.pos = Vec2::new(
            paddle.face() + arena.ball.radius + 2.0,
            paddle.pos.y + paddle.size.y - 1.0,
        );
        arena.ball.vel = Vec2::new(-6.0, 0.0);

        update(&mut arena, &dims);

        assert!(arena.ball.vel.x > 0.0);
        assert!(arena.ball.vel.y > 0.0);
        let angle = arena.ball.vel.y.atan2(arena.ball.vel.x);
        assert!(angle <= dims.max_bounce_angle + EPS);
    }

    #[test]
    fn test_paddle_motion_adds_spin() {
        let (mut still, dims) = classic_arena(Vec::new());
        let (mut moving, _) = classic_arena(Vec::new());

        for arena in [&mut still, &mut moving] {
            let paddle = arena.paddle(Slot::Left).unwrap().clone();
            arena.ball.pos = Vec2::new(paddle.face() + arena.ball.radius + 2.0, paddle.lateral_center());
            arena.ball.vel = Vec2::new(-6.0, 0.0);
        }
        // Paddles move before the ball, so start one step back to land the
        // hit at the same spot
        let paddle = moving.paddle_mut(Slot::Left).unwrap();
        paddle.velocity = 5.0;
        paddle.pos.y -= 5.0;

        update(&mut still, &dims);
        update(&mut moving, &dims);

        assert!(still.ball.vel.y.abs() < EPS);
        assert!(moving.ball.vel.y > 0.0);
        assert!((moving.ball.speed() - still.ball.speed()).abs() < EPS);
    }

    #[test]
    fn test_paddle_pinned_at_edge_adds_no_spin() {
        let (mut arena, dims) = classic_arena(Vec::new());
        let paddle = arena.paddle_mut(Slot::Left).unwrap();
        paddle.pos.y = 0.0;
        paddle.velocity = -dims.paddle_speed;
        let paddle = paddle.clone();
        arena.ball.pos = Vec2::new(paddle.face() + arena.ball.radius + 2.0, paddle.lateral_center());
        arena.ball.vel = Vec2::new(-6.0, 0.0);

        let events = update(&mut arena, &dims);

        assert_eq!(events.paddle_collision, Some(Slot::Left));
        assert_eq!(arena.paddle(Slot::Left).unwrap().velocity, 0.0);
        assert!(arena.ball.vel.y.abs() < EPS);
    }

    #[test]
    fn test_max_speed_ball_cannot_pass_through_vertical_paddle() {
        let (mut arena, dims) = classic_arena(Vec::new());
        let paddle = arena.paddle(Slot::Right).unwrap().clone();
        arena.ball.pos = Vec2::new(paddle.face() - arena.ball.radius - 0.1, paddle.lateral_center());
        arena.ball.vel = Vec2::new(dims.max_ball_speed, 0.0);

        let events = update(&mut arena, &dims);

        assert_eq!(events.paddle_collision, Some(Slot::Right));
        assert_eq!(events.boundary_crossed, None);
        assert!(arena.ball.vel.x < 0.0);
        assert!(arena.ball.pos.x + arena.ball.radius <= paddle.face());
    }

    #[test]
    fn test_max_speed_ball_cannot_pass_through_horizontal_paddle() {
        let config = Config::default();
        let (profile, dims) = profile_and_dimensions(GameMode::FourPlayers, &config);
        let mut arena = profile.build_arena(&dims, Vec::new());
        let paddle = arena.paddle(Slot::Top).unwrap().clone();
        arena.ball.pos = Vec2::new(paddle.lateral_center(), paddle.face() + arena.ball.radius + 0.1);
        arena.ball.vel = Vec2::new(0.0, -dims.max_ball_speed);

        let events = update(&mut arena, &dims);

        assert_eq!(events.paddle_collision, Some(Slot::Top));
        assert_eq!(events.boundary_crossed, None);
        assert!(arena.ball.vel.y > 0.0);
        assert!(arena.ball.pos.y - arena.ball.radius >= paddle.face());
    }

    #[test]
    fn test_fast_ball_bounces_off_front_of_rect_obstacle() {
        let (mut arena, dims) = classic_arena(vec![Obstacle::Rectangle {
            origin: Vec2::new(400.0, 150.0),
            width: 10.0,
            height: 100.0,
        }]);
        arena.ball.pos = Vec2::new(400.0 - arena.ball.radius - 0.1, 200.0);
        arena.ball.vel = Vec2::new(dims.max_ball_speed, 0.0);

        let events = update(&mut arena, &dims);

        assert_eq!(events.obstacle_collision, Some(0));
        assert!(arena.ball.vel.x < 0.0);
        assert!(arena.ball.pos.x < 400.0);
    }

    #[test]
    fn test_ball_leaving_paddle_is_not_reflected_back() {
        let (mut arena, dims) = classic_arena(Vec::new());
        let paddle = arena.paddle(Slot::Left).unwrap().clone();
        arena.ball.pos = Vec2::new(paddle.face() + 2.0, paddle.lateral_center());
        arena.ball.vel = Vec2::new(3.0, 0.0);

        update(&mut arena, &dims);

        assert!(arena.ball.vel.x > 0.0);
        assert!((arena.ball.speed() - 3.0).abs() < EPS);
    }

    #[test]
    fn test_reports_crossed_boundary() {
        let (mut arena, dims) = classic_arena(Vec::new());
        arena.ball.pos = Vec2::new(795.0, 40.0);
        arena.ball.vel = Vec2::new(6.0, 0.0);

        let events = update(&mut arena, &dims);
        assert_eq!(events.boundary_crossed, Some(Slot::Right));
        assert!(!events.any());
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_max(
            hits in 1usize..40,
            offset in -1.0f32..1.0,
            paddle_velocity in -7.0f32..7.0,
        ) {
            let (mut arena, dims) = classic_arena(Vec::new());
            let max = dims.max_ball_speed;
            let paddle = arena.paddle(Slot::Right).unwrap().clone();
            let y = paddle.lateral_center() + offset * paddle.length() / 2.0;

            for _ in 0..hits {
                let speed = arena.ball.speed().max(dims.ball_speed);
                arena.ball.pos = Vec2::new(paddle.face() - arena.ball.radius - 1.0, y);
                arena.ball.vel = Vec2::new(speed, 0.0);
                arena.paddle_mut(Slot::Right).unwrap().pos = paddle.pos;
                arena.paddle_mut(Slot::Right).unwrap().velocity = paddle_velocity;
                update(&mut arena, &dims);
                prop_assert!(arena.ball.speed() <= max + 1e-3);
            }
        }

        #[test]
        fn prop_paddles_stay_in_field(velocities in proptest::collection::vec(-50.0f32..50.0, 1..200)) {
            let config = Config::default();
            let (profile, dims) = profile_and_dimensions(GameMode::FourPlayers, &config);
            let mut arena = profile.build_arena(&dims, Vec::new());

            for v in velocities {
                for paddle in arena.paddles.iter_mut() {
                    paddle.velocity = v;
                }
                update(&mut arena, &dims);
                for paddle in &arena.paddles {
                    let (pos, extent, field) = if paddle.slot.is_vertical() {
                        (paddle.pos.y, paddle.size.y, arena.field.height())
                    } else {
                        (paddle.pos.x, paddle.size.x, arena.field.width())
                    };
                    prop_assert!(pos >= 0.0);
                    prop_assert!(pos <= field - extent + 1e-3);
                }
            }
        }
    }
}
