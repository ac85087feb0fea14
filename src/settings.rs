//! Arena tuning
//!
//! Every number the session needs at setup time. Loaded from JSON; missing
//! fields fall back to the defaults in `crate::consts`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::CoreError;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Playfield width and height
    pub arena_size: Vec2,

    // === Bricks ===
    pub number_of_bricks: u32,
    /// Visual (and collision) size of one brick
    pub brick_size: Vec2,
    /// Horizontal gap between neighbouring bricks
    pub brick_spacing: f32,
    /// Row height as a fraction of arena height
    pub brick_row_fraction: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_mass: f32,
    /// Start position as a fraction of the arena size
    pub ball_start: Vec2,
    pub launch_impulse: Vec2,

    // === Paddle ===
    pub paddle_size: Vec2,
    pub paddle_y: f32,

    // === Effects ===
    /// Seconds a shatter effect stays visible
    pub effect_duration: f32,

    // === Loop ===
    pub sim_dt: f32,
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_size: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),

            number_of_bricks: NUMBER_OF_BRICKS,
            brick_size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            brick_spacing: BRICK_SPACING,
            brick_row_fraction: BRICK_ROW_FRACTION,

            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            ball_start: Vec2::new(0.5, 0.4),
            launch_impulse: LAUNCH_IMPULSE,

            paddle_size: Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            paddle_y: PADDLE_Y,

            effect_duration: EFFECT_DURATION,

            sim_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: arena {}x{}, {} bricks",
            settings.arena_size.x,
            settings.arena_size.y,
            settings.number_of_bricks
        );
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the session cannot run with
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.arena_size.x <= 0.0 || self.arena_size.y <= 0.0 {
            return Err(invalid("arena_size", "must be positive in both axes"));
        }
        if self.brick_size.x <= 0.0 || self.brick_size.y <= 0.0 {
            return Err(invalid("brick_size", "must be positive in both axes"));
        }
        if self.brick_spacing < 0.0 {
            return Err(invalid("brick_spacing", "must not be negative"));
        }
        if self.ball_radius <= 0.0 {
            return Err(invalid("ball_radius", "must be positive"));
        }
        if self.ball_mass <= 0.0 {
            return Err(invalid("ball_mass", "must be positive"));
        }
        if self.sim_dt <= 0.0 {
            return Err(invalid("sim_dt", "must be positive"));
        }
        if self.max_substeps == 0 {
            return Err(invalid("max_substeps", "must be at least 1"));
        }
        Ok(())
    }

    #[inline]
    pub fn paddle_half_width(&self) -> f32 {
        self.paddle_size.x / 2.0
    }

    /// Absolute ball start position
    pub fn ball_start_position(&self) -> Vec2 {
        self.arena_size * self.ball_start
    }

    /// Absolute paddle start position (horizontally centered)
    pub fn paddle_start_position(&self) -> Vec2 {
        Vec2::new(self.arena_size.x / 2.0, self.paddle_y)
    }
}

fn invalid(field: &str, message: &str) -> CoreError {
    CoreError::InvalidSetting {
        field: field.to_string(),
        message: message.to_string(),
    }
}
