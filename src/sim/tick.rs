//! Fixed timestep simulation tick
//!
//! Pointer input is applied between steps. Each step ages effect timers,
//! advances the physics world, then resolves every reported contact in the
//! order the world reported them.

use super::body::PhysicsWorld;
use super::contact::{ContactAction, resolve};
use super::paddle::{DragState, PointerEvent};
use super::state::{GameEvent, Session};
use crate::scene::SceneSink;

impl<W: PhysicsWorld, S: SceneSink> Session<W, S> {
    /// Apply a pointer event to the paddle controller
    pub fn handle_pointer(&mut self, event: PointerEvent) -> DragState {
        self.controller.handle(event, &self.arena, &mut self.world)
    }

    /// Advance the session by one fixed timestep
    pub fn step(&mut self, dt: f32) {
        self.time_ticks += 1;

        // Age effects first so ones spawned this step get their full duration
        for effect in self.lifecycle.advance(dt, &mut self.scene) {
            self.events.push(GameEvent::EffectExpired { effect });
        }

        let contacts = self.world.step(dt);
        for contact in &contacts {
            match resolve(contact, &self.world, &self.arena.registry) {
                ContactAction::None => {}
                ContactAction::BallHitBottom { ball } => {
                    log::info!("Hit bottom");
                    self.events.push(GameEvent::BallHitBottom { ball });
                }
                ContactAction::BreakBrick { brick } => {
                    self.destroy(brick);
                }
            }
        }
    }
}

/// Accumulates variable frame time into fixed steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    accumulator: f32,
    sim_dt: f32,
    max_substeps: u32,
}

impl FrameClock {
    pub fn new(sim_dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            sim_dt,
            max_substeps,
        }
    }

    /// Run as many fixed steps as `frame_dt` covers; returns the count
    pub fn advance<W: PhysicsWorld, S: SceneSink>(
        &mut self,
        session: &mut Session<W, S>,
        frame_dt: f32,
    ) -> u32 {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, 0.1)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= self.sim_dt && substeps < self.max_substeps {
            session.step(self.sim_dt);
            self.accumulator -= self.sim_dt;
            substeps += 1;
        }
        // Drop time we couldn't catch up on instead of spiralling
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.sim_dt);
        }
        substeps
    }
}
