//! Distance and normal primitives shared by the collision resolver and the AI.
//!
//! Everything here is a pure function over `glam::Vec2`. Degenerate inputs
//! (zero-length segments, zero vectors) return fixed fallbacks instead of NaN.

use glam::Vec2;

/// Normal returned for a zero-length segment
pub const DEGENERATE_NORMAL: Vec2 = Vec2::new(0.0, 1.0);

/// Closest point on a segment and its squared distance to the query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    pub distance_squared: f32,
    pub closest: Vec2,
}

/// Project `point` onto the segment `start..end`, clamping to the endpoints.
pub fn point_to_segment(point: Vec2, start: Vec2, end: Vec2) -> SegmentProjection {
    let segment = end - start;
    let length_squared = segment.length_squared();

    if length_squared <= f32::EPSILON {
        return SegmentProjection {
            distance_squared: point.distance_squared(end),
            closest: end,
        };
    }

    let t = ((point - start).dot(segment) / length_squared).clamp(0.0, 1.0);
    let closest = start + segment * t;

    SegmentProjection {
        distance_squared: point.distance_squared(closest),
        closest,
    }
}

/// Unit vector perpendicular to `start..end`.
///
/// The orientation is arbitrary; callers flip it to face away from their shape.
pub fn segment_normal(start: Vec2, end: Vec2) -> Vec2 {
    let segment = end - start;
    if segment.length_squared() <= f32::EPSILON {
        return DEGENERATE_NORMAL;
    }
    Vec2::new(-segment.y, segment.x).normalize()
}

/// Mirror `velocity` about a surface with unit normal `normal`: v - 2(v.n)n
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Scale `velocity` down so its magnitude never exceeds `max_speed`
pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    velocity.clamp_length_max(max_speed.max(0.0))
}

/// Average of a polygon's vertices
pub fn centroid(vertices: &[Vec2]) -> Vec2 {
    if vertices.is_empty() {
        return Vec2::ZERO;
    }
    vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_projection_inside_segment() {
        let p = point_to_segment(Vec2::new(5.0, 3.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((p.closest - Vec2::new(5.0, 0.0)).length() < EPS);
        assert!((p.distance_squared - 9.0).abs() < EPS);
    }

    #[test]
    fn test_projection_clamps_to_endpoints() {
        let start = Vec2::ZERO;
        let end = Vec2::new(10.0, 0.0);

        let before = point_to_segment(Vec2::new(-4.0, 3.0), start, end);
        assert_eq!(before.closest, start);
        assert!((before.distance_squared - 25.0).abs() < EPS);

        let after = point_to_segment(Vec2::new(13.0, 4.0), start, end);
        assert_eq!(after.closest, end);
        assert!((after.distance_squared - 25.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_segment() {
        let point = Vec2::new(3.0, 4.0);
        let p = point_to_segment(point, Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        assert_eq!(p.closest, Vec2::new(1.0, 1.0));
        assert!((p.distance_squared - 13.0).abs() < EPS);

        let n = segment_normal(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0));
        assert_eq!(n, DEGENERATE_NORMAL);
        assert!(!n.x.is_nan() && !n.y.is_nan());
    }

    #[test]
    fn test_segment_normal_is_unit_and_perpendicular() {
        let a = Vec2::new(2.0, 1.0);
        let b = Vec2::new(7.0, 4.0);
        let n = segment_normal(a, b);
        assert!((n.length() - 1.0).abs() < EPS);
        assert!(n.dot(b - a).abs() < EPS);
    }

    #[test]
    fn test_reflect_preserves_speed() {
        let v = Vec2::new(3.0, -4.0);
        let n = Vec2::new(0.0, 1.0);
        let out = reflect(v, n);
        assert_eq!(out, Vec2::new(3.0, 4.0));
        assert!((out.length() - v.length()).abs() < EPS);

        // Angle of incidence equals angle of reflection
        let diag = Vec2::new(1.0, 1.0).normalize();
        let out = reflect(Vec2::new(5.0, 0.0), diag);
        assert!((out.length() - 5.0).abs() < EPS);
        assert!((Vec2::new(5.0, 0.0).dot(diag).abs() - out.dot(diag).abs()).abs() < EPS);
    }

    #[test]
    fn test_clamp_speed() {
        let v = clamp_speed(Vec2::new(30.0, 40.0), 10.0);
        assert!((v.length() - 10.0).abs() < EPS);
        assert!((v.normalize() - Vec2::new(0.6, 0.8)).length() < EPS);

        let slow = Vec2::new(1.0, 1.0);
        assert_eq!(clamp_speed(slow, 10.0), slow);
    }

    #[test]
    fn test_centroid() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert_eq!(centroid(&square), Vec2::new(1.0, 1.0));
    }
}
