//! Arena setup
//!
//! Builds the playfield once per session: border loop, bottom sensor, the
//! brick row, category tags and the ball's launch impulse.

use glam::Vec2;

use super::body::{BodyDesc, PhysicsWorld, Rect};
use super::category::Category;
use super::registry::{EntityId, EntityKind, Registry};
use crate::consts::{ACTOR_Z, BACKGROUND_Z, BRICK_Z};
use crate::scene::SceneSink;
use crate::settings::Settings;

/// Horizontal row of equally sized bricks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickLayout {
    pub count: u32,
    pub brick_size: Vec2,
    pub spacing: f32,
    /// Vertical center of the row
    pub row_y: f32,
}

impl BrickLayout {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            count: settings.number_of_bricks,
            brick_size: settings.brick_size,
            spacing: settings.brick_spacing,
            row_y: settings.arena_size.y * settings.brick_row_fraction,
        }
    }

    /// Width from the first brick's left edge to the last brick's right edge
    pub fn total_width(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.count as f32 * self.brick_size.x + (self.count - 1) as f32 * self.spacing
    }

    /// Left edge of the first brick so the row is centered
    pub fn x_offset(&self, arena_width: f32) -> f32 {
        (arena_width - self.total_width()) / 2.0
    }

    /// Left edge of brick `index`
    pub fn brick_x(&self, arena_width: f32, index: u32) -> f32 {
        self.x_offset(arena_width) + index as f32 * (self.brick_size.x + self.spacing)
    }

    /// Bounds of every brick, left to right
    pub fn slots(&self, arena_width: f32) -> Vec<Rect> {
        (0..self.count)
            .map(|i| {
                let origin = Vec2::new(
                    self.brick_x(arena_width, i),
                    self.row_y - self.brick_size.y / 2.0,
                );
                Rect::new(origin, self.brick_size)
            })
            .collect()
    }
}

/// The playfield and everything living in it
#[derive(Debug, Clone)]
pub struct Arena {
    pub size: Vec2,
    pub registry: Registry,
    pub ball: Option<EntityId>,
    pub paddle: Option<EntityId>,
    pub border: Option<EntityId>,
    pub bottom: Option<EntityId>,
}

impl Arena {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            registry: Registry::new(),
            ball: None,
            paddle: None,
            border: None,
            bottom: None,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.size)
    }

    pub fn bricks_remaining(&self) -> usize {
        self.registry.count(EntityKind::Brick)
    }

    /// Place the ball and paddle the way a scene file would, before setup
    /// wires them. Their bodies carry no tags yet.
    pub fn spawn_actors<W: PhysicsWorld, S: SceneSink>(
        &mut self,
        world: &mut W,
        scene: &mut S,
        settings: &Settings,
    ) {
        let ball_pos = settings.ball_start_position();
        let ball_desc = BodyDesc {
            affected_by_gravity: false,
            allows_rotation: false,
            friction: 0.0,
            ..BodyDesc::default()
        }
        .elastic()
        .with_mass(settings.ball_mass);
        let radius = settings.ball_radius;
        let body = world.create_circle(radius, ball_pos, ball_desc);
        let id = self
            .registry
            .spawn(EntityKind::Ball, body, ball_pos, Vec2::splat(radius * 2.0), ACTOR_Z);
        self.notify_added(scene, id);

        let paddle_pos = settings.paddle_start_position();
        let body = world.create_rect(settings.paddle_size, paddle_pos, BodyDesc::fixed().elastic());
        let id = self.registry.spawn(
            EntityKind::Paddle,
            body,
            paddle_pos,
            settings.paddle_size,
            ACTOR_Z,
        );
        self.notify_added(scene, id);
    }

    /// Build the playfield around whatever actors already exist
    pub fn setup<W: PhysicsWorld, S: SceneSink>(
        &mut self,
        world: &mut W,
        scene: &mut S,
        settings: &Settings,
    ) {
        if self.border.is_some() {
            log::warn!("Arena already set up; ignoring repeat setup");
            return;
        }

        // Scene order isn't guaranteed; a missing actor only disables its wiring
        self.ball = match self.registry.require(EntityKind::Ball.name()) {
            Ok(e) => Some(e.id),
            Err(err) => {
                log::warn!("{err}; ball will not launch");
                None
            }
        };
        self.paddle = match self.registry.require(EntityKind::Paddle.name()) {
            Ok(e) => Some(e.id),
            Err(err) => {
                log::warn!("{err}; paddle dragging disabled");
                None
            }
        };

        let border_desc = BodyDesc::fixed().elastic();
        let body = world.create_edge_loop(self.bounds(), border_desc);
        let border = self
            .registry
            .spawn(EntityKind::Border, body, Vec2::ZERO, self.size, BACKGROUND_Z);
        self.registry.register(world, border, Category::Border);
        self.border = Some(border);

        let body = world.create_edge_segment(
            Vec2::ZERO,
            Vec2::new(self.width(), 0.0),
            BodyDesc::fixed(),
        );
        let bottom = self.registry.spawn(
            EntityKind::Bottom,
            body,
            Vec2::ZERO,
            Vec2::new(self.width(), 0.0),
            BACKGROUND_Z,
        );
        self.registry.register(world, bottom, Category::Bottom);
        self.bottom = Some(bottom);

        if let Some(ball) = self.ball {
            self.registry.register(world, ball, Category::Ball);
            if let Some(entity) = self.registry.get(ball) {
                world.set_contact_test_bit_mask(
                    entity.body,
                    (Category::Brick | Category::Bottom).bits(),
                );
            }
        }
        if let Some(paddle) = self.paddle {
            self.registry.register(world, paddle, Category::Paddle);
        }

        self.setup_bricks(world, scene, settings);

        if let Some(entity) = self.ball.and_then(|id| self.registry.get(id)) {
            world.apply_impulse(entity.body, settings.launch_impulse);
        }

        log::info!(
            "Arena {}x{} ready: {} bricks, ball {}, paddle {}",
            self.width(),
            self.height(),
            self.bricks_remaining(),
            if self.ball.is_some() { "launched" } else { "missing" },
            if self.paddle.is_some() { "ready" } else { "missing" },
        );
    }

    fn setup_bricks<W: PhysicsWorld, S: SceneSink>(
        &mut self,
        world: &mut W,
        scene: &mut S,
        settings: &Settings,
    ) {
        let layout = BrickLayout::from_settings(settings);
        let desc = BodyDesc::fixed().with_category(Category::Brick);

        for slot in layout.slots(self.width()) {
            let center = slot.center();
            let body = world.create_rect(slot.size, center, desc.clone());
            let id = self
                .registry
                .spawn(EntityKind::Brick, body, center, slot.size, BRICK_Z);
            self.registry.register(world, id, Category::Brick);
            self.notify_added(scene, id);
        }
    }

    fn notify_added<S: SceneSink>(&self, scene: &mut S, id: EntityId) {
        if let Some(entity) = self.registry.get(id) {
            scene.entity_added(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingScene;
    use crate::sim::body::Shape;
    use crate::sim::world::SimpleWorld;

    fn layout_355() -> BrickLayout {
        BrickLayout {
            count: 8,
            brick_size: Vec2::new(40.0, 20.0),
            spacing: 5.0,
            row_y: 400.0,
        }
    }

    #[test]
    fn test_brick_layout_fills_exact_width() {
        let layout = layout_355();
        assert!((layout.total_width() - 355.0).abs() < 0.001);
        assert!(layout.x_offset(355.0).abs() < 0.001);
        assert!(layout.brick_x(355.0, 0).abs() < 0.001);
        assert!((layout.brick_x(355.0, 7) - 315.0).abs() < 0.001);
    }

    #[test]
    fn test_brick_layout_non_overlapping_and_inside() {
        let layout = layout_355();
        let slots = layout.slots(355.0);
        assert_eq!(slots.len(), 8);
        for (i, a) in slots.iter().enumerate() {
            assert!(a.min().x >= -0.001 && a.max().x <= 355.001);
            for b in &slots[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn test_brick_layout_is_centered() {
        let layout = layout_355();
        let slots = layout.slots(375.0);
        let left_gap = slots[0].min().x;
        let right_gap = 375.0 - slots[7].max().x;
        assert!((left_gap - 10.0).abs() < 0.001);
        assert!((left_gap - right_gap).abs() < 0.001);
    }

    #[test]
    fn test_empty_row() {
        let layout = BrickLayout {
            count: 0,
            ..layout_355()
        };
        assert_eq!(layout.total_width(), 0.0);
        assert!(layout.slots(100.0).is_empty());
    }

    #[test]
    fn test_setup_wires_everything() {
        let settings = Settings::default();
        let mut world = SimpleWorld::new();
        let mut scene = RecordingScene::default();
        let mut arena = Arena::new(settings.arena_size);
        arena.spawn_actors(&mut world, &mut scene, &settings);
        arena.setup(&mut world, &mut scene, &settings);

        assert_eq!(arena.bricks_remaining(), 8);

        let ball = arena.registry.get(arena.ball.unwrap()).unwrap();
        let ball_desc = world.desc(ball.body).unwrap();
        assert_eq!(ball_desc.category_bit_mask, Category::Ball.bits());
        assert_eq!(
            ball_desc.contact_test_bit_mask,
            Category::Brick.bits() | Category::Bottom.bits()
        );
        // Launch impulse (+2, -2) over mass 0.01
        let vel = world.velocity(ball.body).unwrap();
        assert!((vel - Vec2::new(200.0, -200.0)).length() < 0.01);

        let paddle = arena.registry.get(arena.paddle.unwrap()).unwrap();
        assert_eq!(world.category_bit_mask(paddle.body), Some(Category::Paddle.bits()));

        let border = arena.registry.get(arena.border.unwrap()).unwrap();
        let border_desc = world.desc(border.body).unwrap();
        assert!(!border_desc.is_dynamic);
        assert!(!border_desc.pinned);
        assert_eq!(border_desc.friction, 0.0);
        assert_eq!(border_desc.restitution, 1.0);
        assert_eq!(border_desc.linear_damping, 0.0);
        assert_eq!(border_desc.angular_damping, 0.0);
        assert_eq!(border_desc.category_bit_mask, Category::Border.bits());
        assert!(matches!(world.shape(border.body), Some(Shape::EdgeLoop { .. })));

        let bottom = arena.registry.get(arena.bottom.unwrap()).unwrap();
        assert_eq!(world.category_bit_mask(bottom.body), Some(Category::Bottom.bits()));
        assert_eq!(
            world.shape(bottom.body),
            Some(Shape::Segment {
                from: Vec2::ZERO,
                to: Vec2::new(settings.arena_size.x, 0.0)
            })
        );

        for brick in arena.registry.iter().filter(|e| e.kind == EntityKind::Brick) {
            let desc = world.desc(brick.body).unwrap();
            assert!(!desc.is_dynamic && !desc.allows_rotation && !desc.affected_by_gravity);
            assert_eq!(desc.friction, 0.0);
            assert_eq!(desc.category_bit_mask, Category::Brick.bits());
            assert!((brick.position.y - settings.arena_size.y * 0.8).abs() < 0.001);
            assert_eq!(brick.z, BRICK_Z);
        }

        // Ball, paddle and bricks are visible nodes
        assert_eq!(scene.nodes.len(), 10);
    }

    #[test]
    fn test_setup_tolerates_missing_actors() {
        let settings = Settings::default();
        let mut world = SimpleWorld::new();
        let mut scene = RecordingScene::default();
        let mut arena = Arena::new(settings.arena_size);
        arena.setup(&mut world, &mut scene, &settings);

        assert!(arena.ball.is_none());
        assert!(arena.paddle.is_none());
        assert!(arena.border.is_some());
        assert!(arena.bottom.is_some());
        assert_eq!(arena.bricks_remaining(), 8);
    }

    #[test]
    fn test_repeat_setup_is_ignored() {
        let settings = Settings::default();
        let mut world = SimpleWorld::new();
        let mut scene = RecordingScene::default();
        let mut arena = Arena::new(settings.arena_size);
        arena.spawn_actors(&mut world, &mut scene, &settings);
        arena.setup(&mut world, &mut scene, &settings);
        let bodies = world.body_count();
        let border = arena.border;

        arena.setup(&mut world, &mut scene, &settings);

        assert_eq!(arena.bricks_remaining(), 8);
        assert_eq!(world.body_count(), bodies);
        assert_eq!(arena.border, border);
        let ball = arena.registry.get(arena.ball.unwrap()).unwrap();
        let vel = world.velocity(ball.body).unwrap();
        assert!((vel - Vec2::new(200.0, -200.0)).length() < 0.01);
    }
}
