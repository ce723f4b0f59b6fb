/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current value
/// (and, where needed, an RNG handle) and returns a brand-new value.  Side
/// effects are limited to the injected RNG and log output.

use log::{debug, info, trace};
use rand::Rng;

use crate::clock::SessionTimer;
use crate::config::GameConfig;
use crate::entities::{
    Body, Control, EndReason, FrameView, GameSession, InputEvent, Key, Obstacle, ObstacleField,
    Phase, Rect,
};

// ── Character body ────────────────────────────────────────────────────────────

/// Inactive body centred at (width / 2, ⌊height / 3⌋ + 50), at rest.
pub fn init_body(cfg: &GameConfig) -> Body {
    let cx = (cfg.width / 2.0).floor();
    let cy = (cfg.height / 3.0).floor() + 50.0;
    Body {
        x: cx - cfg.body_width / 2.0,
        y: cy - cfg.body_height / 2.0,
        w: cfg.body_width,
        h: cfg.body_height,
        vel_y: 0.0,
        active: false,
    }
}

/// One physics step: gravity, integrate, clamp to the playfield.
pub fn update_body(body: &Body, cfg: &GameConfig) -> Body {
    if !body.active {
        return body.clone();
    }
    let vel_y = body.vel_y + cfg.gravity;
    let y = (body.y + vel_y).clamp(0.0, cfg.max_body_y());
    Body {
        y,
        vel_y,
        ..body.clone()
    }
}

pub fn flap_up(body: &Body, cfg: &GameConfig) -> Body {
    if !body.active {
        return body.clone();
    }
    Body {
        vel_y: cfg.flap_strength,
        ..body.clone()
    }
}

/// Twice the up impulse, same sign.
pub fn flap_down(body: &Body, cfg: &GameConfig) -> Body {
    if !body.active {
        return body.clone();
    }
    Body {
        vel_y: cfg.flap_strength * 2.0,
        ..body.clone()
    }
}

pub fn activate(body: &Body) -> Body {
    Body {
        active: true,
        ..body.clone()
    }
}

pub fn reset_body(cfg: &GameConfig) -> Body {
    init_body(cfg)
}

// ── Obstacle field ────────────────────────────────────────────────────────────

/// A fresh obstacle with its left edge at `x` and a uniformly random gap.
pub fn new_obstacle(x: f64, cfg: &GameConfig, rng: &mut impl Rng) -> Obstacle {
    let gap_top = rng.gen_range(cfg.min_gap_top()..=cfg.max_gap_top());
    Obstacle {
        x,
        width: cfg.obstacle_width,
        gap_top,
        gap_height: cfg.gap_height,
        field_height: cfg.height,
        passed: false,
    }
}

/// Add one obstacle at the right edge when the body is active and the field
/// holds fewer than `spawn_cap` obstacles.
pub fn spawn_if_needed(
    field: &ObstacleField,
    active: bool,
    cfg: &GameConfig,
    rng: &mut impl Rng,
) -> ObstacleField {
    if !active || field.len() >= cfg.spawn_cap {
        return field.clone();
    }
    let obstacle = new_obstacle(cfg.width, cfg, rng);
    debug!(
        "spawned obstacle gap_top={:.1} live={}",
        obstacle.gap_top,
        field.len() + 1
    );
    let mut obstacles = field.obstacles.clone();
    obstacles.push(obstacle);
    ObstacleField { obstacles }
}

pub fn advance_field(field: &ObstacleField, cfg: &GameConfig) -> ObstacleField {
    ObstacleField {
        obstacles: field
            .obstacles
            .iter()
            .map(|o| Obstacle {
                x: o.x - cfg.obstacle_speed,
                ..o.clone()
            })
            .collect(),
    }
}

/// Drop every obstacle whose trailing edge has left the playfield.
pub fn cull_field(field: &ObstacleField) -> ObstacleField {
    let obstacles: Vec<Obstacle> = field
        .obstacles
        .iter()
        .filter(|o| o.right() >= 0.0)
        .cloned()
        .collect();
    let removed = field.len() - obstacles.len();
    if removed > 0 {
        trace!("culled {} obstacle(s)", removed);
    }
    ObstacleField { obstacles }
}

/// Mark every unpassed obstacle whose trailing edge is left of
/// `body_left` as passed.  Returns the new field and how many were marked.
pub fn detect_passes(field: &ObstacleField, body_left: f64) -> (ObstacleField, u32) {
    let mut count = 0;
    let obstacles = field
        .obstacles
        .iter()
        .map(|o| {
            if !o.passed && o.right() < body_left {
                count += 1;
                Obstacle {
                    passed: true,
                    ..o.clone()
                }
            } else {
                o.clone()
            }
        })
        .collect();
    (ObstacleField { obstacles }, count)
}

// ── Collision & scoring ───────────────────────────────────────────────────────

/// Closed-interval AABB test; shared edges count as overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() <= b.right() && b.left() <= a.right() && a.top() <= b.bottom() && b.top() <= a.bottom()
}

pub fn check_collision(body: &Body, field: &ObstacleField) -> bool {
    let r = body.rect();
    field
        .obstacles
        .iter()
        .any(|o| overlaps(&r, &o.upper_rect()) || overlaps(&r, &o.lower_rect()))
}

/// The body has reached the floor.
pub fn check_out_of_bounds(body: &Body, cfg: &GameConfig) -> bool {
    body.rect().bottom() >= cfg.height
}

pub fn score_delta(pass_count: u32, cfg: &GameConfig) -> u32 {
    pass_count * cfg.score_increment
}

// ── Session ───────────────────────────────────────────────────────────────────

/// A session in `Waiting`, ready for its first key press.
pub fn new_session(config: GameConfig, exit_on_ack: bool) -> GameSession {
    GameSession {
        body: init_body(&config),
        field: ObstacleField::default(),
        score: 0,
        timer: SessionTimer::new(config.fps, config.duration_secs),
        phase: Phase::Waiting,
        exit_on_ack,
        config,
    }
}

/// Back to `Waiting` with every owned value reset.
pub fn reset_session(session: &GameSession) -> GameSession {
    new_session(session.config.clone(), session.exit_on_ack)
}

fn end_session(session: GameSession, reason: EndReason) -> GameSession {
    info!(
        "session ended: {:?}, score {}, {:.2}s elapsed",
        reason,
        session.score,
        session.timer.elapsed_secs()
    );
    GameSession {
        phase: Phase::Ended(reason),
        ..session
    }
}

/// Apply one input event.
pub fn handle_input(session: &GameSession, event: InputEvent) -> (GameSession, Control) {
    match (session.phase, event) {
        (Phase::Running, InputEvent::Quit) => (
            end_session(session.clone(), EndReason::UserQuit),
            Control::Exit,
        ),
        (_, InputEvent::Quit) => (session.clone(), Control::Exit),

        (Phase::Waiting, InputEvent::KeyDown(key)) => {
            info!("session started");
            let started = GameSession {
                body: activate(&session.body),
                timer: session.timer.restart(),
                phase: Phase::Running,
                ..session.clone()
            };
            // The starting key also counts as a flap.
            (apply_key(&started, key), Control::Continue)
        }
        (Phase::Running, InputEvent::KeyDown(key)) => (apply_key(session, key), Control::Continue),

        (Phase::Ended(_), InputEvent::KeyDown(_)) => {
            if session.exit_on_ack {
                (session.clone(), Control::Exit)
            } else {
                debug!("game over acknowledged, resetting");
                (reset_session(session), Control::Continue)
            }
        }
    }
}

fn apply_key(session: &GameSession, key: Key) -> GameSession {
    let body = match key {
        Key::FlapUp => flap_up(&session.body, &session.config),
        Key::FlapDown => flap_down(&session.body, &session.config),
        Key::Other => return session.clone(),
    };
    GameSession {
        body,
        ..session.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance a running session by one fixed frame.  Sessions in any other
/// phase are returned unchanged.
pub fn tick(session: &GameSession, rng: &mut impl Rng) -> GameSession {
    if session.phase != Phase::Running {
        return session.clone();
    }
    let cfg = &session.config;
    let timer = session.timer.tick();

    // ── 1. Body physics ──────────────────────────────────────────────────────
    let body = update_body(&session.body, cfg);

    // ── 2. Field: spawn, scroll, cull ────────────────────────────────────────
    let field = spawn_if_needed(&session.field, body.active, cfg, rng);
    let field = advance_field(&field, cfg);
    let field = cull_field(&field);

    let next = GameSession {
        body,
        field,
        timer,
        ..session.clone()
    };

    // ── 3. Termination by contact ────────────────────────────────────────────
    if check_collision(&next.body, &next.field) {
        return end_session(next, EndReason::Collision);
    }
    if check_out_of_bounds(&next.body, cfg) {
        return end_session(next, EndReason::OutOfBounds);
    }

    // ── 4. Passes & score ────────────────────────────────────────────────────
    let (field, passes) = detect_passes(&next.field, next.body.x);
    let next = GameSession {
        field,
        score: next.score + score_delta(passes, cfg),
        ..next
    };

    // ── 5. Time limit ────────────────────────────────────────────────────────
    if next.timer.expired() {
        return end_session(next, EndReason::TimeExpired);
    }
    next
}

// ── Render view ───────────────────────────────────────────────────────────────

pub fn frame_view(session: &GameSession) -> FrameView {
    let (game_over, end_reason) = match session.phase {
        Phase::Ended(reason) => (true, Some(reason)),
        _ => (false, None),
    };
    FrameView {
        field_width: session.config.width,
        field_height: session.config.height,
        body: session.body.rect(),
        obstacles: session
            .field
            .obstacles
            .iter()
            .map(|o| (o.upper_rect(), o.lower_rect()))
            .collect(),
        score: session.score,
        remaining_secs: session.timer.remaining_secs(),
        show_instructions: session.phase == Phase::Waiting,
        game_over,
        end_reason,
    }
}
