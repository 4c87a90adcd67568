//! Ray casts against collider shapes
//!
//! All casts take a unit direction and a maximum distance and report the
//! first surface crossed. A ray that starts inside a solid shape (circle or
//! box) reports an immediate hit at its origin, the same way an engine query
//! that starts inside a collider does. That is why a coin has to be excluded
//! from the query set while its own path is traced.

use glam::Vec2;
use serde::Serialize;

use super::body::Collider;

/// Closest intersection along a ray
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RayHit {
    /// Intersection point
    pub point: Vec2,
    /// Unit surface normal, facing back along the ray
    pub normal: Vec2,
    /// Distance from the ray origin
    pub distance: f32,
}

impl RayHit {
    fn at_origin(origin: Vec2, dir: Vec2) -> Self {
        Self {
            point: origin,
            normal: -dir,
            distance: 0.0,
        }
    }
}

const PARALLEL_EPSILON: f32 = 1e-8;

/// Reflect a direction off a surface
///
/// Standard reflection: d' = d - 2(d·n)n
#[inline]
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    dir - 2.0 * dir.dot(normal) * normal
}

/// Cast a ray against any collider
pub fn cast(origin: Vec2, dir: Vec2, max_distance: f32, collider: &Collider) -> Option<RayHit> {
    match *collider {
        Collider::Circle { center, radius } => ray_circle(origin, dir, max_distance, center, radius),
        Collider::Segment { a, b } => ray_segment(origin, dir, max_distance, a, b),
        Collider::Aabb { min, max } => ray_aabb(origin, dir, max_distance, min, max),
    }
}

/// Ray against a solid circle
pub fn ray_circle(
    origin: Vec2,
    dir: Vec2,
    max_distance: f32,
    center: Vec2,
    radius: f32,
) -> Option<RayHit> {
    let m = origin - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(RayHit::at_origin(origin, dir));
    }

    let b = m.dot(dir);
    if b > 0.0 {
        // Outside and pointing away
        return None;
    }

    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let t = -b - disc.sqrt();
    if t > max_distance {
        return None;
    }

    let point = origin + dir * t;
    Some(RayHit {
        point,
        normal: (point - center).normalize_or_zero(),
        distance: t,
    })
}

/// Ray against a two-sided line segment
pub fn ray_segment(origin: Vec2, dir: Vec2, max_distance: f32, a: Vec2, b: Vec2) -> Option<RayHit> {
    let edge = b - a;
    let denom = dir.perp_dot(edge);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let w = a - origin;
    let t = w.perp_dot(edge) / denom;
    let u = w.perp_dot(dir) / denom;
    if t < 0.0 || t > max_distance || !(0.0..=1.0).contains(&u) {
        return None;
    }

    let mut normal = edge.perp().normalize_or_zero();
    if normal.dot(dir) > 0.0 {
        normal = -normal;
    }

    Some(RayHit {
        point: origin + dir * t,
        normal,
        distance: t,
    })
}

/// Ray against a solid axis-aligned box (slab method)
pub fn ray_aabb(origin: Vec2, dir: Vec2, max_distance: f32, min: Vec2, max: Vec2) -> Option<RayHit> {
    if origin.cmpge(min).all() && origin.cmple(max).all() {
        return Some(RayHit::at_origin(origin, dir));
    }

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (o, d, lo, hi) = (origin[axis], dir[axis], min[axis], max[axis]);
        if d.abs() < PARALLEL_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let (mut t0, mut t1) = ((lo - o) / d, (hi - o) / d);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            normal = Vec2::ZERO;
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(t1);
    }

    if t_enter > t_exit || t_enter < 0.0 || t_enter > max_distance {
        return None;
    }

    Some(RayHit {
        point: origin + dir * t_enter,
        normal,
        distance: t_enter,
    })
}
