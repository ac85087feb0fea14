//! Pointer-driven paddle control
//!
//! A drag only starts on the paddle itself. While dragging, the paddle follows
//! the pointer's horizontal delta and is teleported (never pushed) so it
//! carries no velocity of its own.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::PhysicsWorld;
use super::registry::EntityKind;

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Pointer input in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { location: Vec2 },
    Moved { location: Vec2, previous: Vec2 },
    Up { location: Vec2 },
    Cancelled,
}

/// Keep the paddle fully inside the arena horizontally
///
/// Applies the lower bound first, so a paddle wider than the arena sits at
/// `arena_width - half_width` instead of panicking.
#[inline]
pub fn clamp_paddle_x(x: f32, half_width: f32, arena_width: f32) -> f32 {
    x.max(half_width).min(arena_width - half_width)
}

#[derive(Debug, Clone, Default)]
pub struct PaddleController {
    state: DragState,
}

impl PaddleController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Apply one pointer event; returns the resulting state
    pub fn handle<W: PhysicsWorld>(
        &mut self,
        event: PointerEvent,
        arena: &Arena,
        world: &mut W,
    ) -> DragState {
        match event {
            PointerEvent::Down { location } => {
                if self.state == DragState::Idle && Self::hits_paddle(location, arena, world) {
                    log::debug!("Paddle grabbed at {location:?}");
                    self.state = DragState::Dragging;
                }
            }
            PointerEvent::Moved { location, previous } => {
                if self.state == DragState::Dragging {
                    Self::drag(location.x - previous.x, arena, world);
                }
            }
            PointerEvent::Up { .. } | PointerEvent::Cancelled => {
                if self.state == DragState::Dragging {
                    log::debug!("Paddle released");
                }
                self.state = DragState::Idle;
            }
        }
        self.state
    }

    fn hits_paddle<W: PhysicsWorld>(location: Vec2, arena: &Arena, world: &W) -> bool {
        world
            .hit_test(location)
            .and_then(|body| arena.registry.owner(body))
            .and_then(|id| arena.registry.get(id))
            .is_some_and(|entity| entity.kind == EntityKind::Paddle)
    }

    fn drag<W: PhysicsWorld>(delta: f32, arena: &Arena, world: &mut W) {
        if delta == 0.0 {
            return;
        }
        let Some(paddle) = arena.paddle.and_then(|id| arena.registry.get(id)) else {
            return;
        };
        let Some(pos) = world.position(paddle.body) else {
            return;
        };
        let x = clamp_paddle_x(pos.x + delta, paddle.half_width(), arena.width());
        world.set_position(paddle.body, Vec2::new(x, pos.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NullScene;
    use crate::settings::Settings;
    use crate::sim::world::SimpleWorld;
    use proptest::prelude::*;

    /// 320-wide arena with a 60-wide paddle at x = 160
    fn setup() -> (Arena, SimpleWorld) {
        let settings = Settings {
            arena_size: Vec2::new(320.0, 480.0),
            paddle_size: Vec2::new(60.0, 12.0),
            ..Settings::default()
        };
        let mut world = SimpleWorld::new();
        let mut arena = Arena::new(settings.arena_size);
        arena.spawn_actors(&mut world, &mut NullScene, &settings);
        arena.setup(&mut world, &mut NullScene, &settings);
        (arena, world)
    }

    fn paddle_pos(arena: &Arena, world: &SimpleWorld) -> Vec2 {
        let body = arena.registry.get(arena.paddle.unwrap()).unwrap().body;
        world.position(body).unwrap()
    }

    fn grab(controller: &mut PaddleController, arena: &Arena, world: &mut SimpleWorld) {
        let location = paddle_pos(arena, world);
        controller.handle(PointerEvent::Down { location }, arena, world);
        assert_eq!(controller.state(), DragState::Dragging);
    }

    fn drag_by(controller: &mut PaddleController, arena: &Arena, world: &mut SimpleWorld, dx: f32) {
        let previous = Vec2::new(100.0, 50.0);
        let location = previous + Vec2::new(dx, 7.0);
        controller.handle(PointerEvent::Moved { location, previous }, arena, world);
    }

    #[test]
    fn test_drag_far_right_clamps() {
        let (arena, mut world) = setup();
        let mut controller = PaddleController::new();
        let start = paddle_pos(&arena, &world);
        assert!((start.x - 160.0).abs() < 0.001);

        grab(&mut controller, &arena, &mut world);
        drag_by(&mut controller, &arena, &mut world, 500.0);

        let pos = paddle_pos(&arena, &world);
        assert!((pos.x - 290.0).abs() < 0.001);
        assert_eq!(pos.y, start.y, "vertical pointer motion is ignored");
    }

    #[test]
    fn test_drag_moves_by_delta() {
        let (arena, mut world) = setup();
        let mut controller = PaddleController::new();
        grab(&mut controller, &arena, &mut world);
        drag_by(&mut controller, &arena, &mut world, -25.0);
        assert!((paddle_pos(&arena, &world).x - 135.0).abs() < 0.001);
        drag_by(&mut controller, &arena, &mut world, 0.0);
        assert!((paddle_pos(&arena, &world).x - 135.0).abs() < 0.001);
    }

    #[test]
    fn test_paddle_has_no_velocity_after_drag() {
        let (arena, mut world) = setup();
        let mut controller = PaddleController::new();
        grab(&mut controller, &arena, &mut world);
        drag_by(&mut controller, &arena, &mut world, 40.0);
        let body = arena.registry.get(arena.paddle.unwrap()).unwrap().body;
        assert_eq!(world.velocity(body), Some(Vec2::ZERO));
    }

    #[test]
    fn test_down_off_paddle_is_ignored() {
        let (arena, mut world) = setup();
        let mut controller = PaddleController::new();

        // Empty space
        let state = controller.handle(
            PointerEvent::Down { location: Vec2::new(20.0, 200.0) },
            &arena,
            &mut world,
        );
        assert_eq!(state, DragState::Idle);

        // On a brick
        let brick = arena.registry.lookup("brick").unwrap();
        let location = world.position(brick.body).unwrap();
        let state = controller.handle(PointerEvent::Down { location }, &arena, &mut world);
        assert_eq!(state, DragState::Idle);

        // Moves while idle do nothing
        drag_by(&mut controller, &arena, &mut world, 50.0);
        assert!((paddle_pos(&arena, &world).x - 160.0).abs() < 0.001);
    }

    #[test]
    fn test_up_and_cancel_always_release() {
        let (arena, mut world) = setup();
        let mut controller = PaddleController::new();

        grab(&mut controller, &arena, &mut world);
        drag_by(&mut controller, &arena, &mut world, 1000.0);
        let state = controller.handle(
            PointerEvent::Up { location: Vec2::new(5000.0, -40.0) },
            &arena,
            &mut world,
        );
        assert_eq!(state, DragState::Idle);

        grab(&mut controller, &arena, &mut world);
        assert_eq!(
            controller.handle(PointerEvent::Cancelled, &arena, &mut world),
            DragState::Idle
        );

        // Release while idle is harmless
        assert_eq!(
            controller.handle(PointerEvent::Cancelled, &arena, &mut world),
            DragState::Idle
        );
    }

    #[test]
    fn test_clamp_paddle_wider_than_arena() {
        assert_eq!(clamp_paddle_x(50.0, 80.0, 100.0), 20.0);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_bounds(deltas in prop::collection::vec(-800.0f32..800.0, 1..20)) {
            let (arena, mut world) = setup();
            let mut controller = PaddleController::new();
            grab(&mut controller, &arena, &mut world);
            for dx in deltas {
                drag_by(&mut controller, &arena, &mut world, dx);
                let x = paddle_pos(&arena, &world).x;
                prop_assert!((30.0..=290.0).contains(&x), "x = {}", x);
            }
        }

        #[test]
        fn prop_clamp_bounds(x in -1000.0f32..1000.0, half in 1.0f32..100.0, width in 200.0f32..600.0) {
            let clamped = clamp_paddle_x(x, half, width);
            prop_assert!(clamped >= half && clamped <= width - half);
        }
    }
}
