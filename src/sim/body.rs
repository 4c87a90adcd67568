//! Table bodies: typed kinds, collider shapes and rigid-body state

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a body is on the table, fixed when it is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Coin,
    Hole,
    Obstacle,
    Striker,
}

/// Stable handle for a body in a [`super::World`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Collision geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Circle { center: Vec2, radius: f32 },
    /// Thin wall from `a` to `b`
    Segment { a: Vec2, b: Vec2 },
    /// Axis-aligned box
    Aabb { min: Vec2, max: Vec2 },
}

impl Collider {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Collider::Circle { center, radius }
    }

    pub fn segment(a: Vec2, b: Vec2) -> Self {
        Collider::Segment { a, b }
    }

    /// Box from any two opposite corners
    pub fn aabb(p: Vec2, q: Vec2) -> Self {
        Collider::Aabb {
            min: p.min(q),
            max: p.max(q),
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec2 {
        match *self {
            Collider::Circle { center, .. } => center,
            Collider::Segment { a, b } => (a + b) * 0.5,
            Collider::Aabb { min, max } => (min + max) * 0.5,
        }
    }

    /// Half-size of the bounding box
    pub fn extents(&self) -> Vec2 {
        match *self {
            Collider::Circle { radius, .. } => Vec2::splat(radius),
            Collider::Segment { a, b } => (b - a).abs() * 0.5,
            Collider::Aabb { min, max } => (max - min) * 0.5,
        }
    }

    /// Radius of a round body, read off its bounding box
    #[inline]
    pub fn derived_radius(&self) -> f32 {
        self.extents().x
    }

    /// Same shape moved so its center sits at `center`
    pub fn with_center(self, center: Vec2) -> Self {
        let shift = center - self.center();
        match self {
            Collider::Circle { radius, .. } => Collider::Circle { center, radius },
            Collider::Segment { a, b } => Collider::Segment {
                a: a + shift,
                b: b + shift,
            },
            Collider::Aabb { min, max } => Collider::Aabb {
                min: min + shift,
                max: max + shift,
            },
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        match *self {
            Collider::Circle { center, radius } => p.distance_squared(center) <= radius * radius,
            Collider::Segment { .. } => false,
            Collider::Aabb { min, max } => p.cmpge(min).all() && p.cmple(max).all(),
        }
    }
}

/// A body in the spatial query set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub collider: Collider,
    /// Disabled bodies are skipped by ray casts
    pub enabled: bool,
}

/// Motion state of a body the host steps
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// No further physics response once set
    pub kinematic: bool,
}

impl RigidBody {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            kinematic: false,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
