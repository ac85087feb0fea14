//! Session state and game events
//!
//! A session owns the arena, the physics world, the scene sink, the paddle
//! controller and the effect timers. Everything is mutated from one thread,
//! one callback at a time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::PhysicsWorld;
use super::lifecycle::{EffectId, Lifecycle, TransientEffect};
use super::paddle::{DragState, PaddleController};
use super::registry::{EntityId, EntityKind};
use crate::scene::SceneSink;
use crate::settings::Settings;

/// Something the host may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An entity (in play, always a brick) was removed
    EntityDestroyed {
        entity: EntityId,
        kind: EntityKind,
        position: Vec2,
    },
    /// The ball reached the bottom edge (loss condition)
    BallHitBottom { ball: EntityId },
    /// A shatter effect started
    EffectSpawned { effect: EffectId, position: Vec2 },
    /// A shatter effect's display time ran out
    EffectExpired { effect: EffectId },
}

/// One running game
pub struct Session<W: PhysicsWorld, S: SceneSink> {
    pub(crate) settings: Settings,
    pub(crate) arena: Arena,
    pub(crate) world: W,
    pub(crate) scene: S,
    pub(crate) controller: PaddleController,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) events: Vec<GameEvent>,
    /// Simulation steps taken
    pub(crate) time_ticks: u64,
}

impl<W: PhysicsWorld, S: SceneSink> Session<W, S> {
    /// Spawn the ball and paddle, then build the arena around them
    pub fn new(settings: Settings, world: W, scene: S) -> Self {
        let mut session = Self::bare(settings, world, scene);
        session.spawn_actors();
        session.setup();
        session
    }

    /// Session with an empty arena; the host calls `spawn_actors` (or not)
    /// and then `setup`
    pub fn bare(settings: Settings, world: W, scene: S) -> Self {
        Self {
            arena: Arena::new(settings.arena_size),
            lifecycle: Lifecycle::new(settings.effect_duration),
            controller: PaddleController::new(),
            events: Vec::new(),
            time_ticks: 0,
            settings,
            world,
            scene,
        }
    }

    /// Add the ball and paddle at their start positions
    pub fn spawn_actors(&mut self) {
        self.arena
            .spawn_actors(&mut self.world, &mut self.scene, &self.settings);
    }

    /// Build the playfield. Repeat calls are ignored.
    pub fn setup(&mut self) {
        self.arena
            .setup(&mut self.world, &mut self.scene, &self.settings);
    }

    /// Destroy an entity now; false if it was already gone
    pub fn destroy(&mut self, id: EntityId) -> bool {
        let Some(destroyed) =
            self.lifecycle
                .destroy(id, &mut self.arena, &mut self.world, &mut self.scene)
        else {
            return false;
        };
        self.events.push(GameEvent::EffectSpawned {
            effect: destroyed.effect,
            position: destroyed.position,
        });
        self.events.push(GameEvent::EntityDestroyed {
            entity: destroyed.entity,
            kind: destroyed.kind,
            position: destroyed.position,
        });
        true
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn drag_state(&self) -> DragState {
        self.controller.state()
    }

    pub fn active_effects(&self) -> &[TransientEffect] {
        self.lifecycle.active_effects()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn bricks_remaining(&self) -> usize {
        self.arena.bricks_remaining()
    }

    pub fn ball_position(&self) -> Option<Vec2> {
        self.actor_position(self.arena.ball)
    }

    pub fn paddle_position(&self) -> Option<Vec2> {
        self.actor_position(self.arena.paddle)
    }

    fn actor_position(&self, id: Option<EntityId>) -> Option<Vec2> {
        let entity = self.arena.registry.get(id?)?;
        self.world.position(entity.body)
    }
}
