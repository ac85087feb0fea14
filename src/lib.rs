//! Brick Breaker - collision and game-state core
//!
//! Core modules:
//! - `sim`: Entity registry, arena setup, paddle control, contact resolution
//! - `scene`: Rendering collaborator interface (nodes and transient effects)
//! - `settings`: Data-driven arena tuning
//! - `error`: Error taxonomy for the frame-loop callbacks

pub mod error;
pub mod scene;
pub mod settings;
pub mod sim;

pub use error::CoreError;
pub use scene::{NullScene, RecordingScene, SceneSink};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default playfield (portrait phone, points)
    pub const ARENA_WIDTH: f32 = 375.0;
    pub const ARENA_HEIGHT: f32 = 667.0;

    /// Brick row
    pub const NUMBER_OF_BRICKS: u32 = 8;
    pub const BRICK_WIDTH: f32 = 40.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_SPACING: f32 = 5.0;
    /// Row height as a fraction of arena height
    pub const BRICK_ROW_FRACTION: f32 = 0.8;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Impulse units per launch are divided by this to get points/s
    pub const BALL_MASS: f32 = 0.01;
    /// One-time launch impulse (rightward-downward)
    pub const LAUNCH_IMPULSE: Vec2 = Vec2::new(2.0, -2.0);

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 60.0;
    pub const PADDLE_HEIGHT: f32 = 14.0;
    pub const PADDLE_Y: f32 = 50.0;

    /// How long a shatter effect stays on screen (seconds)
    pub const EFFECT_DURATION: f32 = 1.0;

    /// Draw order
    pub const BACKGROUND_Z: i32 = 0;
    pub const ACTOR_Z: i32 = 1;
    pub const BRICK_Z: i32 = 2;
    pub const EFFECT_Z: i32 = 3;
}
