//! Physics collaborator interface
//!
//! The core never integrates motion itself. It talks to a simulator through
//! `PhysicsWorld`: bodies are created from a `BodyDesc`, nudged with impulses,
//! repositioned kinematically, and the simulator reports contact begins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::{Category, CategoryMask};

/// Opaque handle to a body owned by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Axis-aligned rectangle, origin at the lower-left corner (y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// True if the interiors overlap (shared edges don't count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min().x < other.max().x
            && other.min().x < self.max().x
            && self.min().y < other.max().y
            && other.min().y < self.max().y
    }

    /// Corners in counter-clockwise order starting at the origin
    pub fn corners(&self) -> [Vec2; 4] {
        let (min, max) = (self.min(), self.max());
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ]
    }
}

/// Collision shape of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Solid disc centered on the body position
    Circle { radius: f32 },
    /// Solid box centered on the body position
    Rect { size: Vec2 },
    /// Edge segment in body-local coordinates
    Segment { from: Vec2, to: Vec2 },
    /// Hollow rectangle outline in body-local coordinates
    EdgeLoop { rect: Rect },
}

/// Physical properties handed to the simulator at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub is_dynamic: bool,
    pub affected_by_gravity: bool,
    pub allows_rotation: bool,
    pub pinned: bool,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub mass: f32,
    pub category_bit_mask: u32,
    pub contact_test_bit_mask: u32,
}

impl Default for BodyDesc {
    /// Engine defaults: dynamic, everything collides, nothing reports
    fn default() -> Self {
        Self {
            is_dynamic: true,
            affected_by_gravity: true,
            allows_rotation: true,
            pinned: false,
            friction: 0.2,
            restitution: 0.2,
            linear_damping: 0.1,
            angular_damping: 0.1,
            mass: 1.0,
            category_bit_mask: u32::MAX,
            contact_test_bit_mask: 0,
        }
    }
}

impl BodyDesc {
    /// Immovable, frictionless, non-rotating body
    pub fn fixed() -> Self {
        Self {
            is_dynamic: false,
            affected_by_gravity: false,
            allows_rotation: false,
            friction: 0.0,
            ..Self::default()
        }
    }

    /// Perfectly elastic, undamped surface
    pub fn elastic(mut self) -> Self {
        self.restitution = 1.0;
        self.linear_damping = 0.0;
        self.angular_damping = 0.0;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category_bit_mask = category.bits();
        self
    }

    pub fn with_contact_test(mut self, mask: CategoryMask) -> Self {
        self.contact_test_bit_mask = mask.bits();
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }
}

/// A begin-contact report. The pair is unordered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Approximate contact point
    pub point: Vec2,
}

impl Contact {
    /// Same contact with the bodies reported the other way round
    pub fn swapped(self) -> Self {
        Self {
            body_a: self.body_b,
            body_b: self.body_a,
            point: self.point,
        }
    }
}

/// Black-box rigid body simulator
///
/// Calls for handles the world no longer knows about must be harmless:
/// getters return `None`, setters do nothing.
pub trait PhysicsWorld {
    fn create_edge_loop(&mut self, rect: Rect, desc: BodyDesc) -> BodyHandle;
    fn create_edge_segment(&mut self, from: Vec2, to: Vec2, desc: BodyDesc) -> BodyHandle;
    fn create_rect(&mut self, size: Vec2, position: Vec2, desc: BodyDesc) -> BodyHandle;
    fn create_circle(&mut self, radius: f32, position: Vec2, desc: BodyDesc) -> BodyHandle;

    /// Remove a body. Returns false if it was already gone.
    fn remove_body(&mut self, body: BodyHandle) -> bool;
    fn contains(&self, body: BodyHandle) -> bool;

    fn position(&self, body: BodyHandle) -> Option<Vec2>;
    /// Kinematic teleport; velocity is left untouched
    fn set_position(&mut self, body: BodyHandle, position: Vec2);
    fn velocity(&self, body: BodyHandle) -> Option<Vec2>;
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec2);

    fn category_bit_mask(&self, body: BodyHandle) -> Option<u32>;
    fn set_category_bit_mask(&mut self, body: BodyHandle, bits: u32);
    fn set_contact_test_bit_mask(&mut self, body: BodyHandle, bits: u32);

    /// Topmost solid body under a point
    fn hit_test(&self, point: Vec2) -> Option<BodyHandle>;

    /// Advance by `dt` seconds and report contacts that began during the step
    fn step(&mut self, dt: f32) -> Vec<Contact>;
}
