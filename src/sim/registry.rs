//! Entity registry
//!
//! Pairs every physics body with an identity and a category tag. Iteration
//! is by entity id so anything walking the registry is deterministic.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyHandle, PhysicsWorld};
use super::category::Category;
use crate::error::CoreError;

/// Stable identity of an entity. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ball,
    Paddle,
    Brick,
    Border,
    Bottom,
}

impl EntityKind {
    /// Node name used for lookups
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Ball => "ball",
            EntityKind::Paddle => "paddle",
            EntityKind::Brick => "brick",
            EntityKind::Border => "border",
            EntityKind::Bottom => "bottom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ball" => Some(EntityKind::Ball),
            "paddle" => Some(EntityKind::Paddle),
            "brick" => Some(EntityKind::Brick),
            "border" => Some(EntityKind::Border),
            "bottom" => Some(EntityKind::Bottom),
            _ => None,
        }
    }
}

/// A live entity in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub body: BodyHandle,
    /// Last known position (refreshed from the world when it matters)
    pub position: Vec2,
    /// Visual bounds
    pub size: Vec2,
    /// Draw order for the scene
    pub z: i32,
    /// Assigned by `Registry::register`
    pub category: Option<Category>,
}

impl Entity {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }
}

/// Live entity set plus the body -> entity back-map
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    owners: HashMap<BodyHandle, EntityId>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            owners: HashMap::new(),
            next_id: 1,
        }
    }

    /// Add an untagged entity for an existing body
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        body: BodyHandle,
        position: Vec2,
        size: Vec2,
        z: i32,
    ) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.entities.insert(
            id,
            Entity {
                id,
                kind,
                body,
                position,
                size,
                z,
                category: None,
            },
        );
        self.owners.insert(body, id);
        id
    }

    /// Assign a category tag to an entity and its body
    ///
    /// Returns false (and changes nothing) if the entity does not exist.
    pub fn register<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        id: EntityId,
        category: Category,
    ) -> bool {
        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        entity.category = Some(category);
        world.set_category_bit_mask(entity.body, category.bits());
        true
    }

    /// First entity (by id) with the given name
    pub fn lookup(&self, name: &str) -> Option<&Entity> {
        let kind = EntityKind::from_name(name)?;
        self.entities.values().find(|e| e.kind == kind)
    }

    /// Like `lookup`, but a miss is reported as `LookupMiss`
    pub fn require(&self, name: &str) -> Result<&Entity, CoreError> {
        self.lookup(name)
            .ok_or_else(|| CoreError::LookupMiss(name.to_string()))
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Entity owning a body
    #[inline]
    pub fn owner(&self, body: BodyHandle) -> Option<EntityId> {
        self.owners.get(&body).copied()
    }

    /// Drop an entity from the live set
    pub fn remove(&mut self, id: EntityId) -> Result<Entity, CoreError> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(CoreError::DoubleDestroy(id))?;
        self.owners.remove(&entity.body);
        Ok(entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
