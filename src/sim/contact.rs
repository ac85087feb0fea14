//! Contact classification
//!
//! Turns a raw begin-contact into the game action it means. Pairs are
//! sorted by category bits first so the reporting order never matters. This
//! module only reads; applying the action is the session's job.

use super::body::{BodyHandle, Contact, PhysicsWorld};
use super::category::Category;
use super::registry::{EntityId, Registry};
use crate::error::CoreError;

/// Game meaning of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    /// Nothing beyond the physical bounce
    None,
    /// The ball touched the bottom edge
    BallHitBottom { ball: EntityId },
    /// The ball touched a brick, which must go
    BreakBrick { brick: EntityId },
}

/// One side of a contact with its tag and owner resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactSide {
    pub body: BodyHandle,
    pub category: Category,
    pub owner: EntityId,
}

/// Order a pair ascending by category bits
pub fn canonical(a: ContactSide, b: ContactSide) -> (ContactSide, ContactSide) {
    if a.category.bits() <= b.category.bits() {
        (a, b)
    } else {
        (b, a)
    }
}

/// Decide what a pair of resolved sides means
pub fn dispatch(a: ContactSide, b: ContactSide) -> ContactAction {
    let (first, second) = canonical(a, b);
    if first.category != Category::Ball {
        return ContactAction::None;
    }
    match second.category {
        Category::Bottom => ContactAction::BallHitBottom { ball: first.owner },
        Category::Brick => ContactAction::BreakBrick {
            brick: second.owner,
        },
        _ => ContactAction::None,
    }
}

fn side<W: PhysicsWorld>(
    body: BodyHandle,
    world: &W,
    registry: &Registry,
) -> Result<ContactSide, CoreError> {
    let category = world
        .category_bit_mask(body)
        .and_then(Category::from_bits)
        .ok_or(CoreError::InvalidContact(body))?;
    let owner = registry
        .owner(body)
        .ok_or(CoreError::InvalidContact(body))?;
    Ok(ContactSide {
        body,
        category,
        owner,
    })
}

/// Classify a contact, reporting bodies that can't be resolved
pub fn classify<W: PhysicsWorld>(
    contact: &Contact,
    world: &W,
    registry: &Registry,
) -> Result<ContactAction, CoreError> {
    let a = side(contact.body_a, world, registry)?;
    let b = side(contact.body_b, world, registry)?;
    Ok(dispatch(a, b))
}

/// Classify a contact; unresolvable ones are dropped
pub fn resolve<W: PhysicsWorld>(contact: &Contact, world: &W, registry: &Registry) -> ContactAction {
    classify(contact, world, registry).unwrap_or_else(|err| {
        log::trace!("Dropped contact: {err}");
        ContactAction::None
    })
}
