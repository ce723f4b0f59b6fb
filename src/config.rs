/// Tuning constants and the start-time configuration built from them.
///
/// All distances are playfield units (the playfield is 600 × 800), all
/// velocities are units per frame at the 60 Hz cadence.

use anyhow::{ensure, Result};

// ── Playfield ─────────────────────────────────────────────────────────────────

pub const WIDTH: f64 = 600.0;
pub const HEIGHT: f64 = 800.0;
pub const FPS: u32 = 60;

/// Height of the grass strip drawn along the bottom edge (decoration only).
pub const GROUND_HEIGHT: f64 = 100.0;

// ── Body ──────────────────────────────────────────────────────────────────────

pub const BODY_WIDTH: f64 = 60.0;
pub const BODY_HEIGHT: f64 = 45.0;
pub const GRAVITY: f64 = 0.25;
/// Negative is upward.
pub const FLAP_STRENGTH: f64 = -6.0;

// ── Obstacles ─────────────────────────────────────────────────────────────────

pub const OBSTACLE_WIDTH: f64 = 100.0;
pub const GAP_HEIGHT: f64 = 3.0 * BODY_HEIGHT;
pub const OBSTACLE_SPEED: f64 = 3.0;
pub const SPAWN_CAP: usize = 4;
/// Minimum height of either segment of an obstacle.
pub const SEGMENT_MARGIN: f64 = 50.0;

// ── Session ───────────────────────────────────────────────────────────────────

pub const SCORE_INCREMENT: u32 = 25;
pub const GAME_DURATION_SECS: u32 = 30;

/// Every tunable of one game.  Fixed for the lifetime of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub width: f64,
    pub height: f64,
    pub fps: u32,
    pub body_width: f64,
    pub body_height: f64,
    pub gravity: f64,
    pub flap_strength: f64,
    pub obstacle_width: f64,
    pub gap_height: f64,
    pub obstacle_speed: f64,
    pub spawn_cap: usize,
    pub segment_margin: f64,
    pub score_increment: u32,
    pub duration_secs: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: WIDTH,
            height: HEIGHT,
            fps: FPS,
            body_width: BODY_WIDTH,
            body_height: BODY_HEIGHT,
            gravity: GRAVITY,
            flap_strength: FLAP_STRENGTH,
            obstacle_width: OBSTACLE_WIDTH,
            gap_height: GAP_HEIGHT,
            obstacle_speed: OBSTACLE_SPEED,
            spawn_cap: SPAWN_CAP,
            segment_margin: SEGMENT_MARGIN,
            score_increment: SCORE_INCREMENT,
            duration_secs: GAME_DURATION_SECS,
        }
    }
}

impl GameConfig {
    /// Lowest valid gap top offset.
    pub fn min_gap_top(&self) -> f64 {
        self.segment_margin
    }

    /// Highest valid gap top offset; keeps the lower segment at least
    /// `segment_margin` tall.
    pub fn max_gap_top(&self) -> f64 {
        self.height - self.gap_height - self.segment_margin
    }

    /// Largest y the body's top edge may take.
    pub fn max_body_y(&self) -> f64 {
        self.height - self.body_height
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0.0 && self.height > 0.0,
            "playfield must have a positive size, got {}x{}",
            self.width,
            self.height
        );
        ensure!(self.fps > 0, "frame rate must be positive");
        ensure!(
            self.body_width > 0.0 && self.body_height > 0.0 && self.body_height < self.height,
            "body of {}x{} does not fit the playfield",
            self.body_width,
            self.body_height
        );
        ensure!(self.gap_height > 0.0, "gap height must be positive");
        ensure!(self.segment_margin > 0.0, "segment margin must be positive");
        ensure!(
            self.min_gap_top() <= self.max_gap_top(),
            "gap of {} with margin {} leaves no room in a playfield {} high",
            self.gap_height,
            self.segment_margin,
            self.height
        );
        ensure!(self.duration_secs > 0, "session duration must be positive");
        Ok(())
    }
}
