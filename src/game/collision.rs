//! Ball-versus-solid contact detection.
//!
//! Every test answers the same question: given the ball and one solid, is
//! there overlap, and if so which way (unit normal, pointing from the solid
//! toward the ball) and how deep. Resolution lives in the integrator.

use glam::Vec2;

use super::geometry::{centroid, point_to_segment, segment_normal};
use super::map::Obstacle;
use super::state::{Field, Slot, Walls};

/// Normal used when the ball centre sits exactly on a circle's centre
const COINCIDENT_NORMAL: Vec2 = Vec2::X;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector pointing out of the solid, toward the ball
    pub normal: Vec2,
    /// Overlap distance, never negative
    pub penetration: f32,
    pub point: Vec2,
}

pub fn circle_contact(ball: Vec2, radius: f32, center: Vec2, obstacle_radius: f32) -> Option<Contact> {
    let offset = ball - center;
    let distance = offset.length();
    let combined = radius + obstacle_radius;

    if distance >= combined {
        return None;
    }

    let normal = if distance <= f32::EPSILON {
        COINCIDENT_NORMAL
    } else {
        offset / distance
    };

    Some(Contact {
        normal,
        penetration: combined - distance,
        point: center + normal * obstacle_radius,
    })
}

/// Tests the four edges and keeps the closest one; ties go to the earlier edge.
pub fn rhombus_contact(ball: Vec2, radius: f32, vertices: &[Vec2; 4]) -> Option<Contact> {
    let center = centroid(vertices);
    let radius_squared = radius * radius;
    let mut best: Option<(f32, Contact)> = None;

    for i in 0..vertices.len() {
        let start = vertices[i];
        let end = vertices[(i + 1) % vertices.len()];
        let projection = point_to_segment(ball, start, end);

        if projection.distance_squared >= radius_squared {
            continue;
        }
        if matches!(best, Some((closest, _)) if projection.distance_squared >= closest) {
            continue;
        }

        let mut normal = segment_normal(start, end);
        if normal.dot((start + end) * 0.5 - center) < 0.0 {
            normal = -normal;
        }

        best = Some((
            projection.distance_squared,
            Contact {
                normal,
                penetration: radius - projection.distance_squared.sqrt(),
                point: projection.closest,
            },
        ));
    }

    best.map(|(_, contact)| contact)
}

/// Axis-aligned box given by its top-left corner and size.
///
/// The bounce axis is whichever of |dx|, |dy| (ball centre minus closest
/// point) is larger, so exact corner hits are classified as vertical.
/// `vel` only matters once the centre is inside the box.
pub fn rect_contact(ball: Vec2, radius: f32, vel: Vec2, min: Vec2, size: Vec2) -> Option<Contact> {
    let max = min + size;
    let closest = ball.clamp(min, max);
    let offset = ball - closest;

    if offset == Vec2::ZERO {
        return Some(inside_rect_contact(ball, radius, vel, min, max));
    }

    if offset.length_squared() >= radius * radius {
        return None;
    }

    let normal = if offset.x.abs() > offset.y.abs() {
        Vec2::new(offset.x.signum(), 0.0)
    } else {
        Vec2::new(0.0, offset.y.signum())
    };

    Some(Contact {
        normal,
        penetration: (radius - offset.dot(normal)).max(0.0),
        point: closest,
    })
}

/// Ball centre already inside the box.
///
/// A fast ball can end a tick past the middle of a thin box, so the exit
/// face is the nearest one the ball is moving toward (the face it came in
/// through). A still ball leaves through the nearest face.
fn inside_rect_contact(ball: Vec2, radius: f32, vel: Vec2, min: Vec2, max: Vec2) -> Contact {
    let faces = [
        (ball.x - min.x, Vec2::NEG_X),
        (max.x - ball.x, Vec2::X),
        (ball.y - min.y, Vec2::NEG_Y),
        (max.y - ball.y, Vec2::Y),
    ];
    let nearest = |best: (f32, Vec2), face: (f32, Vec2)| if face.0 < best.0 { face } else { best };

    let (depth, normal) = faces
        .into_iter()
        .filter(|(_, normal)| vel.dot(*normal) < 0.0)
        .reduce(nearest)
        .unwrap_or_else(|| faces.into_iter().fold(faces[0], nearest));

    Contact {
        normal,
        penetration: radius + depth,
        point: ball + normal * depth,
    }
}

pub fn obstacle_contact(ball: Vec2, radius: f32, vel: Vec2, obstacle: &Obstacle) -> Option<Contact> {
    match obstacle {
        Obstacle::Circle {
            center,
            radius: obstacle_radius,
        } => circle_contact(ball, radius, *center, *obstacle_radius),
        Obstacle::Rhombus { vertices } => rhombus_contact(ball, radius, vertices),
        Obstacle::Rectangle {
            origin,
            width,
            height,
        } => rect_contact(ball, radius, vel, *origin, Vec2::new(*width, *height)),
    }
}

/// Solid boundary the ball is overlapping, checked left, right, top, bottom
pub fn wall_contact(ball: Vec2, radius: f32, field: &Field, walls: &Walls) -> Option<Contact> {
    Slot::ALL.into_iter().filter(|&side| walls.is_solid(side)).find_map(|side| {
        let (depth, normal, point) = match side {
            Slot::Left => (radius - ball.x, Vec2::X, Vec2::new(0.0, ball.y)),
            Slot::Right => (
                ball.x - (field.width() - radius),
                Vec2::NEG_X,
                Vec2::new(field.width(), ball.y),
            ),
            Slot::Top => (radius - ball.y, Vec2::Y, Vec2::new(ball.x, 0.0)),
            Slot::Bottom => (
                ball.y - (field.height() - radius),
                Vec2::NEG_Y,
                Vec2::new(ball.x, field.height()),
            ),
        };

        (depth > 0.0).then_some(Contact {
            normal,
            penetration: depth,
            point,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::map::Obstacle;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_circle_miss_and_hit() {
        assert!(circle_contact(Vec2::new(0.0, 0.0), 5.0, Vec2::new(20.0, 0.0), 10.0).is_none());

        let c = circle_contact(Vec2::new(8.0, 0.0), 5.0, Vec2::new(20.0, 0.0), 10.0).unwrap();
        assert!((c.normal - Vec2::NEG_X).length() < EPS);
        assert!((c.penetration - 3.0).abs() < EPS);
        assert!((c.point - Vec2::new(10.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_circle_coincident_centres() {
        let c = circle_contact(Vec2::new(5.0, 5.0), 4.0, Vec2::new(5.0, 5.0), 6.0).unwrap();
        assert_eq!(c.normal, Vec2::X);
        assert!((c.penetration - 10.0).abs() < EPS);
        assert!(!c.normal.x.is_nan());
    }

    #[test]
    fn test_rhombus_outward_normal() {
        let rhombus = Obstacle::rhombus(Vec2::new(100.0, 100.0), 40.0, 40.0);
        let Obstacle::Rhombus { vertices } = rhombus else {
            unreachable!()
        };

        // Ball just outside the upper-right edge
        let ball = Vec2::new(100.0 + 22.0, 100.0 - 22.0);
        let c = rhombus_contact(ball, 5.0, &vertices).unwrap();
        let expected = Vec2::new(1.0, -1.0).normalize();
        assert!((c.normal - expected).length() < EPS, "normal {:?}", c.normal);
        assert!(c.penetration > 0.0);

        // Same for the lower-left edge: normal flips to face away from the centre
        let ball = Vec2::new(100.0 - 22.0, 100.0 + 22.0);
        let c = rhombus_contact(ball, 5.0, &vertices).unwrap();
        assert!((c.normal - (-expected)).length() < EPS);
    }

    #[test]
    fn test_rhombus_keeps_closest_edge() {
        let vertices = [
            Vec2::new(0.0, -10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(-10.0, 0.0),
        ];
        // Near the right vertex but slightly above: both right-hand edges are
        // in range, the upper-right one is closer
        let ball = Vec2::new(11.0, -1.5);
        let c = rhombus_contact(ball, 4.0, &vertices).unwrap();
        assert!(c.normal.x > 0.0 && c.normal.y < 0.0, "normal {:?}", c.normal);

        assert!(rhombus_contact(Vec2::new(30.0, 0.0), 4.0, &vertices).is_none());
    }

    #[test]
    fn test_rect_axis_classification() {
        let min = Vec2::new(100.0, 100.0);
        let size = Vec2::new(20.0, 80.0);

        // Approaching the left face
        let c = rect_contact(Vec2::new(95.0, 140.0), 8.0, Vec2::ZERO, min, size).unwrap();
        assert_eq!(c.normal, Vec2::NEG_X);
        assert!((c.penetration - 3.0).abs() < EPS);

        // Approaching the top face
        let c = rect_contact(Vec2::new(110.0, 95.0), 8.0, Vec2::ZERO, min, size).unwrap();
        assert_eq!(c.normal, Vec2::NEG_Y);

        // Corner region, |dx| > |dy| picks the horizontal axis
        let c = rect_contact(Vec2::new(96.0, 98.0), 8.0, Vec2::ZERO, min, size).unwrap();
        assert_eq!(c.normal, Vec2::NEG_X);

        // Exact diagonal corner hit resolves vertically
        let c = rect_contact(Vec2::new(97.0, 97.0), 8.0, Vec2::ZERO, min, size).unwrap();
        assert_eq!(c.normal, Vec2::NEG_Y);

        assert!(rect_contact(Vec2::new(80.0, 140.0), 8.0, Vec2::ZERO, min, size).is_none());
    }

    #[test]
    fn test_rect_ball_centre_inside() {
        let min = Vec2::new(0.0, 0.0);
        let size = Vec2::new(20.0, 100.0);
        let c = rect_contact(Vec2::new(17.0, 50.0), 5.0, Vec2::ZERO, min, size).unwrap();
        assert_eq!(c.normal, Vec2::X);
        assert!((c.penetration - 8.0).abs() < EPS);
    }

    #[test]
    fn test_rect_centre_past_middle_exits_entry_face() {
        let min = Vec2::new(0.0, 0.0);
        let size = Vec2::new(10.0, 100.0);

        // Moving right and already closer to the far face: still the left face
        let c = rect_contact(Vec2::new(6.0, 50.0), 8.0, Vec2::new(14.0, 0.0), min, size).unwrap();
        assert_eq!(c.normal, Vec2::NEG_X);
        assert!((c.penetration - 14.0).abs() < EPS);

        // Moving left, mirrored
        let c = rect_contact(Vec2::new(4.0, 50.0), 8.0, Vec2::new(-14.0, 0.0), min, size).unwrap();
        assert_eq!(c.normal, Vec2::X);

        // Diagonal entry near the top picks the shallower of the two entry faces
        let c = rect_contact(Vec2::new(7.0, 2.0), 8.0, Vec2::new(10.0, 10.0), min, size).unwrap();
        assert_eq!(c.normal, Vec2::NEG_Y);
    }

    #[test]
    fn test_walls() {
        let field = Field::new(800.0, 400.0);
        let walls = Walls::classic();

        let c = wall_contact(Vec2::new(300.0, 3.0), 8.0, &field, &walls).unwrap();
        assert_eq!(c.normal, Vec2::Y);
        assert!((c.penetration - 5.0).abs() < EPS);

        let c = wall_contact(Vec2::new(300.0, 398.0), 8.0, &field, &walls).unwrap();
        assert_eq!(c.normal, Vec2::NEG_Y);

        // Open sides never produce a wall contact
        assert!(wall_contact(Vec2::new(2.0, 200.0), 8.0, &field, &walls).is_none());
        assert!(wall_contact(Vec2::new(300.0, 200.0), 8.0, &field, &walls).is_none());
    }
}
