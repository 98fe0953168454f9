//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in cell coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let point = |r: f32, theta: f32| center + Vec2::new(r * theta.cos(), r * theta.sin());

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = point(inner_radius, theta1);
        let outer1 = point(outer_radius, theta1);
        let inner2 = point(inner_radius, theta2);
        let outer2 = point(outer_radius, theta2);

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Arrowhead ship, one cell across. `facing` is -1 for up, 1 for down.
pub fn ship(center: Vec2, color: [f32; 4], facing: f32) -> Vec<Vertex> {
    let f = facing.signum();
    let nose = center + Vec2::new(0.0, 0.7 * f);
    let right = center + Vec2::new(0.55, -0.55 * f);
    let notch = center + Vec2::new(0.0, -0.2 * f);
    let left = center + Vec2::new(-0.55, -0.55 * f);

    vec![
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(right.x, right.y, color),
        Vertex::new(notch.x, notch.y, color),
        Vertex::new(nose.x, nose.y, color),
        Vertex::new(notch.x, notch.y, color),
        Vertex::new(left.x, left.y, color),
    ]
}

/// Plus-shaped grid marker
pub fn cross(center: Vec2, arm: f32, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = thickness * 0.5;
    let mut vertices = rect(
        center - Vec2::new(arm, half),
        center + Vec2::new(arm, half),
        color,
    );
    vertices.extend(rect(
        center - Vec2::new(half, arm),
        center + Vec2::new(half, arm),
        color,
    ));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_counts() {
        let c = [1.0; 4];
        assert_eq!(rect(Vec2::ZERO, Vec2::ONE, c).len(), 6);
        assert_eq!(circle(Vec2::ZERO, 1.0, c, 12).len(), 36);
        assert_eq!(ring(Vec2::ZERO, 0.5, 1.0, c, 12).len(), 72);
        assert_eq!(ship(Vec2::ZERO, c, -1.0).len(), 6);
        assert_eq!(cross(Vec2::ZERO, 0.2, 0.05, c).len(), 12);
    }

    #[test]
    fn test_ship_points_the_right_way() {
        let c = [1.0; 4];
        let up = ship(Vec2::new(5.0, 5.0), c, -1.0);
        assert!(up[0].position[1] < 5.0);
        let down = ship(Vec2::new(5.0, 5.0), c, 1.0);
        assert!(down[0].position[1] > 5.0);
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let center = Vec2::new(3.0, 4.0);
        for v in circle(center, 0.5, [1.0; 4], 16) {
            let p = Vec2::from(v.position);
            assert!(p.distance(center) <= 0.5 + 1e-5);
        }
    }
}
