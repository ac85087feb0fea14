//! Collision detection and response for circles against boxes and edges
//!
//! Only the reference world uses these. Normals always point from the
//! obstacle toward the circle center, ready for reflection.

use glam::Vec2;

/// Outcome of testing a disc against one obstacle
#[derive(Debug, Clone)]
pub struct CollisionResult {
    pub hit: bool,
    /// Closest point on the obstacle's surface
    pub point: Vec2,
    /// Unit push-out direction from the surface to the disc center
    pub normal: Vec2,
    /// How far the disc overlaps the obstacle along `normal`
    pub penetration: f32,
}

impl CollisionResult {
    /// No overlap; the world skips these
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a circle and a box centered on `box_center`
pub fn circle_box_collision(
    center: Vec2,
    radius: f32,
    box_center: Vec2,
    box_size: Vec2,
) -> CollisionResult {
    let half = box_size.abs() / 2.0;
    let local = center - box_center;

    // Center inside the box: push out along the shallowest axis
    if local.x.abs() <= half.x && local.y.abs() <= half.y {
        let dx = half.x - local.x.abs();
        let dy = half.y - local.y.abs();
        let (normal, depth) = if dx < dy {
            (Vec2::new(sign(local.x), 0.0), dx)
        } else {
            (Vec2::new(0.0, sign(local.y)), dy)
        };
        return CollisionResult {
            hit: true,
            point: center - normal * depth,
            normal,
            penetration: depth + radius,
        };
    }

    let closest = box_center + local.clamp(-half, half);
    let delta = center - closest;
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    CollisionResult {
        hit: true,
        point: closest,
        normal: delta / dist,
        penetration: radius - dist,
    }
}

/// Check collision between a circle and a line segment
pub fn circle_segment_collision(center: Vec2, radius: f32, from: Vec2, to: Vec2) -> CollisionResult {
    let line_vec = to - from;
    let line_len_sq = line_vec.length_squared();

    let t = if line_len_sq < 0.0001 {
        0.0 // Degenerate segment, treat as a point
    } else {
        ((center - from).dot(line_vec) / line_len_sq).clamp(0.0, 1.0)
    };
    let closest = from + line_vec * t;
    let delta = center - closest;
    let dist = delta.length();

    if dist >= radius {
        return CollisionResult::miss();
    }

    let normal = if dist > 1e-6 {
        delta / dist
    } else {
        // Center is on the line - use perpendicular to line
        Vec2::new(-line_vec.y, line_vec.x).normalize_or_zero()
    };
    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: radius - dist,
    }
}

/// Check collision between two circles
pub fn circle_circle_collision(
    center: Vec2,
    radius: f32,
    other_center: Vec2,
    other_radius: f32,
) -> CollisionResult {
    let delta = center - other_center;
    let dist = delta.length();
    let reach = radius + other_radius;
    if dist >= reach {
        return CollisionResult::miss();
    }
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        point: other_center + normal * other_radius,
        normal,
        penetration: reach - dist,
    }
}

/// Reflect velocity off a surface
///
/// v' = v - (1 + e)(v·n)n, so e = 1 is a mirror bounce
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, restitution: f32) -> Vec2 {
    velocity - (1.0 + restitution) * velocity.dot(normal) * normal
}

#[inline]
fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
