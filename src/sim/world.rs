//! Spatial query set
//!
//! Holds every body that ray casts can see. Bodies can be temporarily taken
//! out of the query set with [`World::exclude`], which hands back a guard that
//! puts them back when it goes out of scope, on every exit path.

use std::ops::{Deref, DerefMut};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyKind, Collider};
use super::ray::{RayHit, cast};

/// A ray hit tagged with the body it struck
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldHit {
    pub body: BodyId,
    pub kind: BodyKind,
    pub hit: RayHit,
}

/// All bodies on the table (sorted by id for deterministic casts)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    bodies: Vec<Body>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its handle
    pub fn add(&mut self, kind: BodyKind, collider: Collider) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            id,
            kind,
            collider,
            enabled: true,
        });
        id
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// First body of the given kind
    pub fn first_of(&self, kind: BodyKind) -> Option<&Body> {
        self.bodies.iter().find(|b| b.kind == kind)
    }

    pub fn is_enabled(&self, id: BodyId) -> bool {
        self.get(id).is_some_and(|b| b.enabled)
    }

    /// Closest enabled body along a ray
    ///
    /// Ties go to the lower body id.
    pub fn raycast(&self, origin: Vec2, dir: Vec2, max_distance: f32) -> Option<WorldHit> {
        self.bodies
            .iter()
            .filter(|b| b.enabled)
            .filter_map(|b| {
                cast(origin, dir, max_distance, &b.collider).map(|hit| WorldHit {
                    body: b.id,
                    kind: b.kind,
                    hit,
                })
            })
            .min_by(|a, b| {
                a.hit
                    .distance
                    .partial_cmp(&b.hit.distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Take bodies out of the query set until the guard drops
    ///
    /// Bodies that were already disabled stay disabled afterwards.
    pub fn exclude(&mut self, ids: &[BodyId]) -> Exclusion<'_> {
        let mut disabled = Vec::with_capacity(ids.len());
        for body in self.bodies.iter_mut() {
            if body.enabled && ids.contains(&body.id) {
                body.enabled = false;
                disabled.push(body.id);
            }
        }
        Exclusion {
            world: self,
            disabled,
        }
    }

    /// Take every body of a kind out of the query set until the guard drops
    pub fn exclude_kind(&mut self, kind: BodyKind) -> Exclusion<'_> {
        let ids: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.id)
            .collect();
        self.exclude(&ids)
    }
}

/// Scoped exclusion from the query set; restores the bodies on drop
pub struct Exclusion<'w> {
    world: &'w mut World,
    disabled: Vec<BodyId>,
}

impl Exclusion<'_> {
    /// Bodies this guard will restore
    pub fn excluded(&self) -> &[BodyId] {
        &self.disabled
    }
}

impl Deref for Exclusion<'_> {
    type Target = World;

    fn deref(&self) -> &World {
        &*self.world
    }
}

impl DerefMut for Exclusion<'_> {
    fn deref_mut(&mut self) -> &mut World {
        &mut *self.world
    }
}

impl Drop for Exclusion<'_> {
    fn drop(&mut self) {
        for id in &self.disabled {
            if let Some(body) = self.world.get_mut(*id) {
                body.enabled = true;
            }
        }
    }
}
