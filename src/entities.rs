/// All game entity types — pure data, no logic.

use crate::clock::SessionTimer;
use crate::config::GameConfig;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle, top-left origin, y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

// ── Character body ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Left edge; never changes.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Vertical velocity in units per frame (positive = downward).
    pub vel_y: f64,
    pub active: bool,
}

impl Body {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// A pipe pair: an upper segment hanging from the top and a lower segment
/// standing on the floor, separated by a gap.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Left edge.
    pub x: f64,
    pub width: f64,
    /// Distance from the top of the playfield to the top of the gap; this
    /// is also the height of the upper segment.
    pub gap_top: f64,
    pub gap_height: f64,
    /// Playfield height the segments were sized against.
    pub field_height: f64,
    pub passed: bool,
}

impl Obstacle {
    /// Trailing edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn upper_height(&self) -> f64 {
        self.gap_top
    }

    pub fn lower_height(&self) -> f64 {
        self.field_height - self.gap_top - self.gap_height
    }

    pub fn upper_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.upper_height())
    }

    pub fn lower_rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.gap_top + self.gap_height,
            self.width,
            self.lower_height(),
        )
    }
}

/// Live obstacles in spawn order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    FlapUp,
    FlapDown,
    /// Any other key: starts a session or acknowledges its end.
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    Collision,
    OutOfBounds,
    TimeExpired,
    UserQuit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Instructions shown, waiting for the first key.
    Waiting,
    Running,
    /// Game over shown, waiting for acknowledgment.
    Ended(EndReason),
}

/// What the driver should do after an input event has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSession {
    pub config: GameConfig,
    pub body: Body,
    pub field: ObstacleField,
    pub score: u32,
    pub timer: SessionTimer,
    pub phase: Phase,
    /// When set, acknowledging game over exits instead of restarting.
    pub exit_on_ack: bool,
}

// ── Render output ─────────────────────────────────────────────────────────────

/// Everything the renderer needs for one frame, in playfield units.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameView {
    pub field_width: f64,
    pub field_height: f64,
    pub body: Rect,
    /// (upper, lower) segment pair per live obstacle.
    pub obstacles: Vec<(Rect, Rect)>,
    pub score: u32,
    pub remaining_secs: u32,
    pub show_instructions: bool,
    pub game_over: bool,
    pub end_reason: Option<EndReason>,
}
