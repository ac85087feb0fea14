//! Entity lifecycle
//!
//! Destroying an entity takes its body out of the world right away and
//! leaves a short-lived effect behind at its last position. Effects are
//! timers owned here, aged by the frame clock, never by the arena.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::PhysicsWorld;
use super::registry::{EntityId, EntityKind};
use crate::consts::EFFECT_Z;
use crate::error::CoreError;
use crate::scene::SceneSink;

/// Identity of a transient effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u32);

/// Particle definitions the scene knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Shatter,
}

impl EffectKind {
    /// Asset name of the particle definition
    pub fn asset_name(&self) -> &'static str {
        match self {
            EffectKind::Shatter => "Shatter",
        }
    }
}

/// A visual effect waiting for its removal time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransientEffect {
    pub id: EffectId,
    pub kind: EffectKind,
    pub position: Vec2,
    /// Seconds until removal
    pub remaining: f32,
}

/// What a successful destroy left behind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destroyed {
    pub entity: EntityId,
    pub kind: EntityKind,
    pub effect: EffectId,
    pub position: Vec2,
}

#[derive(Debug, Clone)]
pub struct Lifecycle {
    effects: Vec<TransientEffect>,
    effect_duration: f32,
    next_effect: u32,
}

impl Lifecycle {
    pub fn new(effect_duration: f32) -> Self {
        Self {
            effects: Vec::new(),
            effect_duration,
            next_effect: 1,
        }
    }

    pub fn active_effects(&self) -> &[TransientEffect] {
        &self.effects
    }

    /// Destroy an entity; a second call for the same id is a no-op
    pub fn destroy<W: PhysicsWorld, S: SceneSink>(
        &mut self,
        id: EntityId,
        arena: &mut Arena,
        world: &mut W,
        scene: &mut S,
    ) -> Option<Destroyed> {
        match self.try_destroy(id, arena, world, scene) {
            Ok(destroyed) => Some(destroyed),
            Err(err) => {
                log::debug!("Ignoring destroy: {err}");
                None
            }
        }
    }

    fn try_destroy<W: PhysicsWorld, S: SceneSink>(
        &mut self,
        id: EntityId,
        arena: &mut Arena,
        world: &mut W,
        scene: &mut S,
    ) -> Result<Destroyed, CoreError> {
        let entity = arena.registry.get(id).ok_or(CoreError::DoubleDestroy(id))?;
        let position = world.position(entity.body).unwrap_or(entity.position);

        let effect = self.spawn_effect(EffectKind::Shatter, position, scene);

        let entity = arena.registry.remove(id)?;
        world.remove_body(entity.body);
        scene.entity_removed(id);

        log::debug!("Destroyed {} {:?} at {:?}", entity.name(), id, position);
        Ok(Destroyed {
            entity: id,
            kind: entity.kind,
            effect,
            position,
        })
    }

    fn spawn_effect<S: SceneSink>(&mut self, kind: EffectKind, position: Vec2, scene: &mut S) -> EffectId {
        let id = EffectId(self.next_effect);
        self.next_effect += 1;
        let effect = TransientEffect {
            id,
            kind,
            position,
            remaining: self.effect_duration,
        };
        scene.add_transient_effect(&effect, EFFECT_Z);
        self.effects.push(effect);
        id
    }

    /// Age effects by `dt`, removing the ones whose time is up.
    /// Returns the expired ids in spawn order.
    pub fn advance<S: SceneSink>(&mut self, dt: f32, scene: &mut S) -> Vec<EffectId> {
        let mut expired = Vec::new();
        for effect in &mut self.effects {
            effect.remaining -= dt;
            if effect.remaining <= 0.0 {
                expired.push(effect.id);
            }
        }
        if expired.is_empty() {
            return expired;
        }
        self.effects.retain(|e| e.remaining > 0.0);
        for &id in &expired {
            scene.remove_transient_effect(id);
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingScene;
    use crate::settings::Settings;
    use crate::sim::world::SimpleWorld;

    fn arena_with_bricks() -> (Arena, SimpleWorld, RecordingScene) {
        let settings = Settings::default();
        let mut world = SimpleWorld::new();
        let mut scene = RecordingScene::default();
        let mut arena = Arena::new(settings.arena_size);
        arena.setup(&mut world, &mut scene, &settings);
        (arena, world, scene)
    }

    fn first_brick(arena: &Arena) -> EntityId {
        arena.registry.lookup(EntityKind::Brick.name()).unwrap().id
    }

    #[test]
    fn test_destroy_removes_body_and_spawns_effect() {
        let (mut arena, mut world, mut scene) = arena_with_bricks();
        let mut lifecycle = Lifecycle::new(1.0);
        let brick = first_brick(&arena);
        let body = arena.registry.get(brick).unwrap().body;
        let expected_pos = world.position(body).unwrap();

        let destroyed = lifecycle
            .destroy(brick, &mut arena, &mut world, &mut scene)
            .unwrap();
        assert_eq!(destroyed.entity, brick);
        assert_eq!(destroyed.position, expected_pos);
        assert!(!world.contains(body));
        assert!(!arena.registry.contains(brick));
        assert_eq!(arena.bricks_remaining(), 7);
        assert_eq!(lifecycle.active_effects().len(), 1);
        assert_eq!(scene.effects.get(&destroyed.effect), Some(&expected_pos));
        assert!(!scene.nodes.contains_key(&brick));
    }

    #[test]
    fn test_double_destroy_is_noop() {
        let (mut arena, mut world, mut scene) = arena_with_bricks();
        let mut lifecycle = Lifecycle::new(1.0);
        let brick = first_brick(&arena);

        assert!(lifecycle.destroy(brick, &mut arena, &mut world, &mut scene).is_some());
        assert!(lifecycle.destroy(brick, &mut arena, &mut world, &mut scene).is_none());
        assert_eq!(lifecycle.active_effects().len(), 1);
        assert_eq!(scene.effects_spawned(), 1);
        assert_eq!(arena.bricks_remaining(), 7);
    }

    #[test]
    fn test_effect_expires_after_duration() {
        let (mut arena, mut world, mut scene) = arena_with_bricks();
        let mut lifecycle = Lifecycle::new(1.0);
        let brick = first_brick(&arena);
        let destroyed = lifecycle
            .destroy(brick, &mut arena, &mut world, &mut scene)
            .unwrap();

        assert!(lifecycle.advance(0.5, &mut scene).is_empty());
        assert_eq!(lifecycle.active_effects().len(), 1);
        assert_eq!(lifecycle.advance(0.5, &mut scene), vec![destroyed.effect]);
        assert!(lifecycle.active_effects().is_empty());
        assert!(scene.effects.is_empty());
        // Nothing left to expire
        assert!(lifecycle.advance(1.0, &mut scene).is_empty());
    }

    #[test]
    fn test_effect_removal_survives_scene_teardown() {
        let (mut arena, mut world, mut scene) = arena_with_bricks();
        let mut lifecycle = Lifecycle::new(1.0);
        let brick = first_brick(&arena);
        lifecycle.destroy(brick, &mut arena, &mut world, &mut scene);

        // Scene dropped its nodes before the timer fired
        let mut fresh = RecordingScene::default();
        assert_eq!(lifecycle.advance(2.0, &mut fresh).len(), 1);
        assert!(fresh.effects.is_empty());
    }
}
