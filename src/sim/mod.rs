//! Deterministic simulation module
//!
//! All gameplay logic lives here. The physics engine and the scene sit behind
//! traits; this module decides what contacts mean and who lives or dies:
//! - Single-threaded, fixed timestep only
//! - Stable iteration order (by entity id / body handle)
//! - No rendering or platform dependencies

pub mod arena;
pub mod body;
pub mod category;
pub mod collision;
pub mod contact;
pub mod lifecycle;
pub mod paddle;
pub mod registry;
pub mod state;
pub mod tick;
pub mod world;

pub use arena::{Arena, BrickLayout};
pub use body::{BodyDesc, BodyHandle, Contact, PhysicsWorld, Rect, Shape};
pub use category::{Category, CategoryMask};
pub use contact::{ContactAction, ContactSide, classify, dispatch, resolve};
pub use lifecycle::{Destroyed, EffectId, EffectKind, Lifecycle, TransientEffect};
pub use paddle::{DragState, PaddleController, PointerEvent, clamp_paddle_x};
pub use registry::{Entity, EntityId, EntityKind, Registry};
pub use state::{GameEvent, Session};
pub use tick::FrameClock;
pub use world::SimpleWorld;
