//! Brick Breaker headless runner
//!
//! Plays one session on the reference physics world with a scripted pointer
//! that drags the paddle under the ball, logging every game event.

use brick_breaker::sim::{FrameClock, GameEvent, PointerEvent, Session, SimpleWorld};
use brick_breaker::{RecordingScene, Settings};
use glam::Vec2;

/// Display refresh the runner pretends to have
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many seconds of play
const MAX_SECONDS: f32 = 120.0;
/// Environment variable holding optional settings JSON
const SETTINGS_ENV: &str = "BRICK_BREAKER_SETTINGS";

/// Scripted player: holds the paddle and drags it toward the ball
struct AutoPlayer {
    pointer: Option<Vec2>,
}

impl AutoPlayer {
    fn new() -> Self {
        Self { pointer: None }
    }

    fn input(&mut self, session: &Session<SimpleWorld, RecordingScene>) -> Option<PointerEvent> {
        let paddle = session.paddle_position()?;
        let Some(previous) = self.pointer else {
            self.pointer = Some(paddle);
            return Some(PointerEvent::Down { location: paddle });
        };

        let ball = session.ball_position()?;
        // Limited hand speed so the paddle can miss
        let max_step = 6.0;
        let dx = (ball.x - paddle.x).clamp(-max_step, max_step);
        let location = previous + Vec2::new(dx, 0.0);
        self.pointer = Some(location);
        Some(PointerEvent::Moved { location, previous })
    }

    fn release(&mut self) -> PointerEvent {
        let location = self.pointer.take().unwrap_or_default();
        PointerEvent::Up { location }
    }
}

fn load_settings() -> Settings {
    match std::env::var(SETTINGS_ENV) {
        Ok(json) => Settings::from_json(&json).unwrap_or_else(|err| {
            log::error!("{SETTINGS_ENV} ignored: {err}");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brick Breaker (headless) starting...");

    let settings = load_settings();
    let mut clock = FrameClock::new(settings.sim_dt, settings.max_substeps);
    let mut session = Session::new(settings, SimpleWorld::new(), RecordingScene::default());
    let mut player = AutoPlayer::new();

    let mut bottom_hits = 0u32;
    let mut elapsed = 0.0;
    while elapsed < MAX_SECONDS && session.bricks_remaining() > 0 {
        if let Some(event) = player.input(&session) {
            session.handle_pointer(event);
        }
        clock.advance(&mut session, FRAME_DT);
        elapsed += FRAME_DT;

        for event in session.drain_events() {
            match event {
                GameEvent::EntityDestroyed { kind, position, .. } => {
                    log::info!(
                        "{:>6.2}s  {} destroyed at ({:.0}, {:.0}), {} left",
                        elapsed,
                        kind.name(),
                        position.x,
                        position.y,
                        session.bricks_remaining()
                    );
                }
                GameEvent::BallHitBottom { .. } => bottom_hits += 1,
                GameEvent::EffectSpawned { .. } | GameEvent::EffectExpired { .. } => {}
            }
        }
    }
    session.handle_pointer(player.release());

    log::info!(
        "Finished after {:.1}s ({} ticks): {} bricks left, ball hit bottom {} times",
        elapsed,
        session.time_ticks(),
        session.bricks_remaining(),
        bottom_hits
    );
}
