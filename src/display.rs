/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable `FrameView`.
/// No game logic is performed; this module only scales playfield rectangles
/// onto the terminal grid and translates them into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use flying_pigs::config::GROUND_HEIGHT;
use flying_pigs::entities::{EndReason, FrameView, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_SKY: Color = Color::Rgb { r: 135, g: 206, b: 250 };
const C_GRASS: Color = Color::Rgb { r: 34, g: 139, b: 34 };
const C_PIPE: Color = Color::Rgb { r: 60, g: 170, b: 40 };
const C_PIPE_EDGE: Color = Color::Rgb { r: 30, g: 100, b: 20 };
const C_PIG: Color = Color::Rgb { r: 255, g: 160, b: 190 };
const C_TEXT: Color = Color::White;
const C_GAME_OVER: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps playfield units onto the cells inside the border.
struct Viewport {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    sx: f64,
    sy: f64,
}

impl Viewport {
    fn new(view: &FrameView, width: u16, height: u16) -> Self {
        // Row 0 and the last row hold the border; column 0 and the last too.
        let cols = width.saturating_sub(2).max(1);
        let rows = height.saturating_sub(2).max(1);
        Viewport {
            left: 1,
            top: 1,
            cols,
            rows,
            sx: cols as f64 / view.field_width,
            sy: rows as f64 / view.field_height,
        }
    }

    /// Cell span covered by `r`, clipped to the viewport.  `None` when the
    /// rectangle is entirely off-screen.
    fn cells(&self, r: &Rect) -> Option<(u16, u16, u16, u16)> {
        let c0 = (r.left() * self.sx).floor().max(0.0);
        let c1 = (r.right() * self.sx).ceil().min(self.cols as f64);
        let r0 = (r.top() * self.sy).floor().max(0.0);
        let r1 = (r.bottom() * self.sy).ceil().min(self.rows as f64);
        if c1 <= c0 || r1 <= r0 {
            return None;
        }
        Some((
            self.left + c0 as u16,
            self.top + r0 as u16,
            (c1 - c0) as u16,
            (r1 - r0) as u16,
        ))
    }

    fn centre_col(&self, text: &str) -> u16 {
        let len = text.chars().count() as u16;
        self.left + (self.cols / 2).saturating_sub(len / 2)
    }

    fn row_at(&self, fraction: f64) -> u16 {
        self.top + (self.rows as f64 * fraction) as u16
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    view: &FrameView,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let vp = Viewport::new(view, width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_background(out, &vp, view)?;
    for (upper, lower) in &view.obstacles {
        draw_segment(out, &vp, upper)?;
        draw_segment(out, &vp, lower)?;
    }
    draw_pig(out, &vp, &view.body)?;
    draw_hud(out, &vp, view)?;

    if view.show_instructions {
        draw_instructions(out, &vp)?;
    }
    if view.game_over {
        draw_game_over(out, &vp, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border & background ───────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 1..height.saturating_sub(1) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn fill<W: Write>(
    out: &mut W,
    (col, row, w, h): (u16, u16, u16, u16),
    ch: char,
) -> std::io::Result<()> {
    let line: String = std::iter::repeat(ch).take(w as usize).collect();
    for r in row..row + h {
        out.queue(cursor::MoveTo(col, r))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn draw_background<W: Write>(out: &mut W, vp: &Viewport, view: &FrameView) -> std::io::Result<()> {
    let sky = Rect::new(0.0, 0.0, view.field_width, view.field_height);
    let ground = Rect::new(
        0.0,
        view.field_height - GROUND_HEIGHT,
        view.field_width,
        GROUND_HEIGHT,
    );

    out.queue(style::SetBackgroundColor(C_SKY))?;
    if let Some(cells) = vp.cells(&sky) {
        fill(out, cells, ' ')?;
    }
    out.queue(style::SetBackgroundColor(C_GRASS))?;
    if let Some(cells) = vp.cells(&ground) {
        fill(out, cells, ' ')?;
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_segment<W: Write>(out: &mut W, vp: &Viewport, seg: &Rect) -> std::io::Result<()> {
    let Some((col, row, w, h)) = vp.cells(seg) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_PIPE))?;
    out.queue(style::SetBackgroundColor(C_PIPE_EDGE))?;
    fill(out, (col, row, w, h), '█')?;
    // Darker rim on both sides when the pipe is wide enough to show one.
    if w >= 3 {
        out.queue(style::SetForegroundColor(C_PIPE_EDGE))?;
        fill(out, (col, row, 1, h), '▌')?;
        fill(out, (col + w - 1, row, 1, h), '▐')?;
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

fn draw_pig<W: Write>(out: &mut W, vp: &Viewport, body: &Rect) -> std::io::Result<()> {
    // Sprite (up to 2 rows, 4 cols):
    //   ^..^   ← ears and eyes
    //   (oo)   ← snout
    let Some((col, row, w, h)) = vp.cells(body) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(Color::Black))?;
    out.queue(style::SetBackgroundColor(C_PIG))?;
    let sprite = ["^..^", "(oo)"];
    for (i, line) in sprite.iter().enumerate().take(h.max(1) as usize) {
        let text: String = line.chars().take(w.max(1) as usize).collect();
        out.queue(cursor::MoveTo(col, row + i as u16))?;
        out.queue(Print(text))?;
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, vp: &Viewport, view: &FrameView) -> std::io::Result<()> {
    let right = vp.left + vp.cols;

    let score = format!("Score: {}", view.score);
    out.queue(cursor::MoveTo(
        right.saturating_sub(score.chars().count() as u16 + 1),
        vp.top,
    ))?;
    out.queue(style::SetForegroundColor(C_TEXT))?;
    out.queue(style::SetBackgroundColor(C_SKY))?;
    out.queue(Print(&score))?;

    let timer = format!("Time: {}s", view.remaining_secs);
    out.queue(cursor::MoveTo(
        right.saturating_sub(timer.chars().count() as u16 + 1),
        vp.top + vp.rows.saturating_sub(1),
    ))?;
    out.queue(style::SetBackgroundColor(C_GRASS))?;
    out.queue(Print(&timer))?;

    out.queue(style::ResetColor)?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centred<W: Write>(
    out: &mut W,
    vp: &Viewport,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(vp.centre_col(text), row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_instructions<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(style::SetBackgroundColor(C_SKY))?;
    draw_centred(out, vp, vp.row_at(1.0 / 3.0), "Ready player one?", C_TEXT)?;
    draw_centred(out, vp, vp.row_at(0.5), "Press any key to start", C_TEXT)?;
    draw_centred(
        out,
        vp,
        vp.row_at(0.75),
        "Press U to move up, D to move down",
        C_TEXT,
    )?;
    out.queue(style::ResetColor)?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, vp: &Viewport, view: &FrameView) -> std::io::Result<()> {
    let reason = match view.end_reason {
        Some(EndReason::Collision) => "You hit a pipe",
        Some(EndReason::OutOfBounds) => "You hit the ground",
        Some(EndReason::TimeExpired) => "Time is up",
        Some(EndReason::UserQuit) | None => "",
    };
    let score_line = format!("Final Score: {}", view.score);
    let row = vp.row_at(1.0 / 3.0);

    out.queue(style::SetBackgroundColor(Color::Black))?;
    draw_centred(out, vp, row, "GAME OVER!", C_GAME_OVER)?;
    if !reason.is_empty() {
        draw_centred(out, vp, row + 1, reason, C_TEXT)?;
    }
    draw_centred(out, vp, row + 2, &score_line, C_TEXT)?;
    draw_centred(out, vp, row + 4, "Press any key - Q to quit", C_HINT)?;
    out.queue(style::ResetColor)?;
    Ok(())
}
