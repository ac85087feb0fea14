//! Error taxonomy for the game core.
//!
//! None of these are fatal. Frame-loop entry points log them and carry on.

use thiserror::Error;

use crate::sim::{BodyHandle, EntityId};

/// Conditions raised inside the core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A named entity was not found during wiring.
    #[error("No entity named '{0}'")]
    LookupMiss(String),

    /// A contact referenced a body with no owner or no recognized tag.
    #[error("Contact references unknown body {0:?}")]
    InvalidContact(BodyHandle),

    /// The entity was already removed from the arena.
    #[error("Entity {0:?} already destroyed")]
    DoubleDestroy(EntityId),

    /// Settings could not be parsed.
    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] serde_json::Error),

    /// Settings parsed but hold an unusable value.
    #[error("Invalid value for {field}: {message}")]
    InvalidSetting { field: String, message: String },
}
