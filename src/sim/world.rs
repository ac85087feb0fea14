//! Reference physics world
//!
//! A small deterministic `PhysicsWorld`: dynamic discs move ballistically and
//! bounce off every other body; everything else stays where it is put.
//! Contact begins are reported with engine semantics: a pair reports when
//! either body's contact-test mask includes the other's category, and only
//! on the step the two start touching.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::body::{BodyDesc, BodyHandle, Contact, PhysicsWorld, Rect, Shape};
use super::collision::{
    CollisionResult, circle_box_collision, circle_circle_collision, circle_segment_collision,
    reflect_velocity,
};

#[derive(Debug, Clone)]
struct SimBody {
    shape: Shape,
    position: Vec2,
    velocity: Vec2,
    desc: BodyDesc,
}

impl SimBody {
    fn is_solid(&self) -> bool {
        matches!(self.shape, Shape::Circle { .. } | Shape::Rect { .. })
    }

    fn contains_point(&self, point: Vec2) -> bool {
        match self.shape {
            Shape::Circle { radius } => point.distance_squared(self.position) <= radius * radius,
            Shape::Rect { size } => Rect::from_center(self.position, size).contains(point),
            Shape::Segment { .. } | Shape::EdgeLoop { .. } => false,
        }
    }

    /// Collide a disc at `center` against this body's shape
    fn collide_disc(&self, center: Vec2, radius: f32) -> CollisionResult {
        match self.shape {
            Shape::Circle { radius: r } => circle_circle_collision(center, radius, self.position, r),
            Shape::Rect { size } => circle_box_collision(center, radius, self.position, size),
            Shape::Segment { from, to } => {
                circle_segment_collision(center, radius, self.position + from, self.position + to)
            }
            Shape::EdgeLoop { rect } => {
                let corners = rect.corners();
                let mut deepest = CollisionResult::miss();
                for i in 0..corners.len() {
                    let from = self.position + corners[i];
                    let to = self.position + corners[(i + 1) % corners.len()];
                    let result = circle_segment_collision(center, radius, from, to);
                    if result.hit && (!deepest.hit || result.penetration > deepest.penetration) {
                        deepest = result;
                    }
                }
                deepest
            }
        }
    }
}

/// Minimal rigid-body world for headless play and tests
#[derive(Debug, Clone)]
pub struct SimpleWorld {
    bodies: BTreeMap<BodyHandle, SimBody>,
    /// Pairs (lower handle first) touching at the end of the last step
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
    pub gravity: Vec2,
    next_handle: u32,
}

impl Default for SimpleWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleWorld {
    pub fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            touching: BTreeSet::new(),
            gravity: Vec2::new(0.0, -9.8),
            next_handle: 1,
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn shape(&self, body: BodyHandle) -> Option<Shape> {
        self.bodies.get(&body).map(|b| b.shape)
    }

    pub fn desc(&self, body: BodyHandle) -> Option<&BodyDesc> {
        self.bodies.get(&body).map(|b| &b.desc)
    }

    /// Overwrite a body's velocity (test and demo helper)
    pub fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity = velocity;
        }
    }

    fn insert(&mut self, shape: Shape, position: Vec2, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            SimBody {
                shape,
                position,
                velocity: Vec2::ZERO,
                desc,
            },
        );
        handle
    }

    fn reports(a: &BodyDesc, b: &BodyDesc) -> bool {
        a.contact_test_bit_mask & b.category_bit_mask != 0
            || b.contact_test_bit_mask & a.category_bit_mask != 0
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.values_mut() {
            if !body.desc.is_dynamic || body.desc.pinned {
                continue;
            }
            if body.desc.affected_by_gravity {
                body.velocity += gravity * dt;
            }
            if body.desc.linear_damping > 0.0 {
                body.velocity *= (1.0 - body.desc.linear_damping * dt).max(0.0);
            }
            body.position += body.velocity * dt;
        }
    }
}

impl PhysicsWorld for SimpleWorld {
    fn create_edge_loop(&mut self, rect: Rect, mut desc: BodyDesc) -> BodyHandle {
        // Edges never move
        desc.is_dynamic = false;
        self.insert(Shape::EdgeLoop { rect }, Vec2::ZERO, desc)
    }

    fn create_edge_segment(&mut self, from: Vec2, to: Vec2, mut desc: BodyDesc) -> BodyHandle {
        desc.is_dynamic = false;
        self.insert(Shape::Segment { from, to }, Vec2::ZERO, desc)
    }

    fn create_rect(&mut self, size: Vec2, position: Vec2, desc: BodyDesc) -> BodyHandle {
        self.insert(Shape::Rect { size }, position, desc)
    }

    fn create_circle(&mut self, radius: f32, position: Vec2, desc: BodyDesc) -> BodyHandle {
        self.insert(Shape::Circle { radius }, position, desc)
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        self.touching.retain(|&(a, b)| a != body && b != body);
        self.bodies.remove(&body).is_some()
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.position = position;
        }
    }

    fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if b.desc.is_dynamic && b.desc.mass > 0.0 {
                b.velocity += impulse / b.desc.mass;
            }
        }
    }

    fn category_bit_mask(&self, body: BodyHandle) -> Option<u32> {
        self.bodies.get(&body).map(|b| b.desc.category_bit_mask)
    }

    fn set_category_bit_mask(&mut self, body: BodyHandle, bits: u32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.desc.category_bit_mask = bits;
        }
    }

    fn set_contact_test_bit_mask(&mut self, body: BodyHandle, bits: u32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.desc.contact_test_bit_mask = bits;
        }
    }

    fn hit_test(&self, point: Vec2) -> Option<BodyHandle> {
        // Later bodies sit on top
        self.bodies
            .iter()
            .rev()
            .find(|(_, b)| b.is_solid() && b.contains_point(point))
            .map(|(&handle, _)| handle)
    }

    fn step(&mut self, dt: f32) -> Vec<Contact> {
        self.integrate(dt);

        let handles: Vec<BodyHandle> = self.bodies.keys().copied().collect();
        let mut touching = BTreeSet::new();
        let mut contacts = Vec::new();

        for &handle in &handles {
            let Some(body) = self.bodies.get(&handle) else {
                continue;
            };
            let Shape::Circle { radius } = body.shape else {
                continue;
            };
            if !body.desc.is_dynamic {
                continue;
            }

            // Detect everything from the same position before responding
            let hits: Vec<(BodyHandle, CollisionResult, f32, bool)> = handles
                .iter()
                .filter(|&&other| other != handle)
                .filter_map(|&other| {
                    let obstacle = self.bodies.get(&other)?;
                    let result = obstacle.collide_disc(body.position, radius);
                    result.hit.then(|| {
                        let restitution = body.desc.restitution.max(obstacle.desc.restitution);
                        (other, result, restitution, Self::reports(&body.desc, &obstacle.desc))
                    })
                })
                .collect();

            let Some(body) = self.bodies.get_mut(&handle) else {
                continue;
            };
            let mut correction = Vec2::ZERO;
            for (other, result, restitution, reports) in hits {
                // Overlapping surfaces with the same normal push out once
                let needed = result.penetration - correction.dot(result.normal);
                if needed > 0.0 {
                    correction += result.normal * needed;
                }
                // Only bounce if still heading into the surface
                if body.velocity.dot(result.normal) < 0.0 {
                    body.velocity = reflect_velocity(body.velocity, result.normal, restitution);
                }

                let pair = if handle < other {
                    (handle, other)
                } else {
                    (other, handle)
                };
                if touching.insert(pair) && !self.touching.contains(&pair) && reports {
                    contacts.push(Contact {
                        body_a: handle,
                        body_b: other,
                        point: result.point,
                    });
                }
            }
            body.position += correction;
        }

        self.touching = touching;
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::category::Category;

    fn ball_desc() -> BodyDesc {
        BodyDesc {
            affected_by_gravity: false,
            friction: 0.0,
            ..BodyDesc::default()
        }
        .elastic()
        .with_category(Category::Ball)
        .with_mass(0.01)
    }

    #[test]
    fn test_impulse_scales_by_mass() {
        let mut world = SimpleWorld::new();
        let ball = world.create_circle(8.0, Vec2::new(50.0, 50.0), ball_desc());
        world.apply_impulse(ball, Vec2::new(2.0, -2.0));
        let vel = world.velocity(ball).unwrap();
        assert!((vel - Vec2::new(200.0, -200.0)).length() < 0.01);

        // Static bodies ignore impulses
        let wall = world.create_rect(Vec2::splat(10.0), Vec2::ZERO, BodyDesc::fixed());
        world.apply_impulse(wall, Vec2::new(5.0, 0.0));
        assert_eq!(world.velocity(wall), Some(Vec2::ZERO));
    }

    #[test]
    fn test_ball_bounces_inside_edge_loop() {
        let mut world = SimpleWorld::new();
        world.create_edge_loop(
            Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0)),
            BodyDesc::fixed().elastic().with_category(Category::Border),
        );
        let ball = world.create_circle(5.0, Vec2::new(90.0, 50.0), ball_desc());
        world.set_velocity(ball, Vec2::new(240.0, 0.0));

        for _ in 0..30 {
            world.step(1.0 / 120.0);
        }

        let pos = world.position(ball).unwrap();
        let vel = world.velocity(ball).unwrap();
        assert!(pos.x <= 95.0 + 0.01, "ball escaped: {pos:?}");
        assert!(vel.x < 0.0, "ball should be heading back left");
        assert!((vel.length() - 240.0).abs() < 0.1, "elastic bounce keeps speed");
    }

    #[test]
    fn test_contact_reported_once_and_only_when_interested() {
        let mut world = SimpleWorld::new();
        let floor = world.create_edge_segment(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            BodyDesc::fixed().with_category(Category::Bottom),
        );
        let ball = world.create_circle(
            5.0,
            Vec2::new(50.0, 6.0),
            ball_desc().with_contact_test(Category::Bottom.into()),
        );
        world.set_velocity(ball, Vec2::new(0.0, -120.0));

        let mut reported = Vec::new();
        for _ in 0..60 {
            reported.extend(world.step(1.0 / 120.0));
        }
        assert_eq!(reported.len(), 1);
        let c = reported[0];
        assert!((c.body_a, c.body_b) == (ball, floor) || (c.body_a, c.body_b) == (floor, ball));

        // Same setup without interest: bounce but no report
        let mut world = SimpleWorld::new();
        world.create_edge_segment(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            BodyDesc::fixed().with_category(Category::Border),
        );
        let ball = world.create_circle(
            5.0,
            Vec2::new(50.0, 6.0),
            ball_desc().with_contact_test(Category::Bottom.into()),
        );
        world.set_velocity(ball, Vec2::new(0.0, -120.0));
        let mut reported = Vec::new();
        for _ in 0..60 {
            reported.extend(world.step(1.0 / 120.0));
        }
        assert!(reported.is_empty());
        assert!(world.velocity(ball).unwrap().y > 0.0);
    }

    #[test]
    fn test_hit_test_finds_solid_bodies_only() {
        let mut world = SimpleWorld::new();
        world.create_edge_loop(
            Rect::new(Vec2::ZERO, Vec2::new(100.0, 100.0)),
            BodyDesc::fixed(),
        );
        let paddle = world.create_rect(Vec2::new(40.0, 10.0), Vec2::new(50.0, 20.0), BodyDesc::fixed());

        assert_eq!(world.hit_test(Vec2::new(60.0, 22.0)), Some(paddle));
        assert_eq!(world.hit_test(Vec2::new(60.0, 40.0)), None);
        // On the border line itself
        assert_eq!(world.hit_test(Vec2::new(0.0, 50.0)), None);
    }

    #[test]
    fn test_removed_body_is_harmless() {
        let mut world = SimpleWorld::new();
        let brick = world.create_rect(Vec2::new(40.0, 20.0), Vec2::ZERO, BodyDesc::fixed());
        assert!(world.remove_body(brick));
        assert!(!world.remove_body(brick));
        assert!(!world.contains(brick));
        assert_eq!(world.position(brick), None);
        world.set_position(brick, Vec2::ONE);
        world.apply_impulse(brick, Vec2::ONE);
        assert_eq!(world.category_bit_mask(brick), None);
    }
}
