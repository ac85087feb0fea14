//! Rendering collaborator interface
//!
//! The core tells the scene what appeared and what went away; drawing,
//! sprites and particle playback happen on the other side.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::sim::{EffectId, EffectKind, Entity, EntityId, EntityKind, TransientEffect};

/// Receiver of live-set and effect notifications
///
/// Removals for ids the scene no longer holds must be ignored.
pub trait SceneSink {
    fn entity_added(&mut self, entity: &Entity);
    fn entity_removed(&mut self, id: EntityId);
    /// Fire-and-forget visual at `effect.position`
    fn add_transient_effect(&mut self, effect: &TransientEffect, z: i32);
    fn remove_transient_effect(&mut self, id: EffectId);
}

/// Scene that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScene;

impl SceneSink for NullScene {
    fn entity_added(&mut self, _entity: &Entity) {}
    fn entity_removed(&mut self, _id: EntityId) {}
    fn add_transient_effect(&mut self, _effect: &TransientEffect, _z: i32) {}
    fn remove_transient_effect(&mut self, _id: EffectId) {}
}

/// A visible node as the scene sees it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneNode {
    pub kind: EntityKind,
    pub position: Vec2,
    pub size: Vec2,
    pub z: i32,
}

/// One notification, in arrival order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneChange {
    Added(EntityId),
    Removed(EntityId),
    EffectAdded {
        id: EffectId,
        kind: EffectKind,
        position: Vec2,
        z: i32,
    },
    EffectRemoved(EffectId),
}

/// Scene that keeps the node set and a change log (headless runs, tests)
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    pub nodes: BTreeMap<EntityId, SceneNode>,
    pub effects: BTreeMap<EffectId, Vec2>,
    pub log: Vec<SceneChange>,
}

impl RecordingScene {
    pub fn effects_spawned(&self) -> usize {
        self.log
            .iter()
            .filter(|c| matches!(c, SceneChange::EffectAdded { .. }))
            .count()
    }
}

impl SceneSink for RecordingScene {
    fn entity_added(&mut self, entity: &Entity) {
        self.nodes.insert(
            entity.id,
            SceneNode {
                kind: entity.kind,
                position: entity.position,
                size: entity.size,
                z: entity.z,
            },
        );
        self.log.push(SceneChange::Added(entity.id));
    }

    fn entity_removed(&mut self, id: EntityId) {
        if self.nodes.remove(&id).is_some() {
            self.log.push(SceneChange::Removed(id));
        }
    }

    fn add_transient_effect(&mut self, effect: &TransientEffect, z: i32) {
        self.effects.insert(effect.id, effect.position);
        self.log.push(SceneChange::EffectAdded {
            id: effect.id,
            kind: effect.kind,
            position: effect.position,
            z,
        });
    }

    fn remove_transient_effect(&mut self, id: EffectId) {
        if self.effects.remove(&id).is_some() {
            self.log.push(SceneChange::EffectRemoved(id));
        }
    }
}
