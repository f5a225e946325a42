/// Rendering layer: all terminal output lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session state. The simulation runs in pixel space; this module projects
/// pixel rectangles onto character cells (one cell stands for an 8x16 px
/// block) and translates state into terminal commands. No game logic.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use astro_assault::compute::HUD_H;
use astro_assault::entities::{GameStatus, Rect, SessionState};

/// Pixel size of one character cell.
pub const CELL_W: f64 = 8.0;
pub const CELL_H: f64 = 16.0;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_BAR: Color = Color::DarkBlue;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Green;
const C_HUD_TOKENS: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_ASTEROID: Color = Color::Grey;
const C_ALIEN: Color = Color::Magenta;
const C_BULLET: Color = Color::Yellow;
const C_ENEMY_BULLET: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, state)?;

    for a in &state.asteroids {
        fill_rect(out, &a.rect(), '▓', C_ASTEROID)?;
    }
    if let Some(al) = &state.alien {
        fill_rect(out, &al.rect(), '▒', C_ALIEN)?;
    }
    for b in &state.bullets {
        fill_rect(out, &b.rect(), '║', C_BULLET)?;
    }
    for b in &state.enemy_bullets {
        fill_rect(out, &b.rect(), '↓', C_ENEMY_BULLET)?;
    }
    draw_player(out, state)?;
    draw_controls_hint(out, state)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    let rows = (state.height / CELL_H) as u16;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Pixel-to-cell projection ──────────────────────────────────────────────────

/// Cell span covered by a pixel rectangle: (col, row, cols, rows). Always at
/// least one cell each way so thin sprites stay visible.
fn cell_span(r: &Rect) -> (u16, u16, u16, u16) {
    let col = (r.x / CELL_W).floor().max(0.0) as u16;
    let row = (r.y / CELL_H).floor().max(0.0) as u16;
    let cols = ((r.w / CELL_W).ceil() as u16).max(1);
    let rows = ((r.h / CELL_H).ceil() as u16).max(1);
    (col, row, cols, rows)
}

/// Draw an entity as a filled glyph rectangle (the placeholder form every
/// sprite degrades to).
fn fill_rect<W: Write>(out: &mut W, r: &Rect, glyph: char, color: Color) -> std::io::Result<()> {
    let (col, row, cols, rows) = cell_span(r);
    out.queue(style::SetForegroundColor(color))?;
    let line: String = std::iter::repeat(glyph).take(cols as usize).collect();
    for dy in 0..rows {
        out.queue(cursor::MoveTo(col, row + dy))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── HUD band ──────────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    let cols = (state.width / CELL_W) as u16;
    let hud_rows = (HUD_H / CELL_H).floor() as u16;
    let text_row = hud_rows / 2;

    // Lives, left
    out.queue(cursor::MoveTo(2, text_row))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    let hearts: String = "♥".repeat(state.lives as usize);
    out.queue(Print(format!("{} {}", state.lives, hearts)))?;

    // Level, centre
    let level_str = format!("LVL {}", state.level);
    out.queue(cursor::MoveTo(
        (cols / 2).saturating_sub(level_str.chars().count() as u16 / 2),
        text_row,
    ))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    // Tokens and stored best, right
    let score_str = if state.best.score > 0 {
        format!("SCORE {}  BEST {}", state.tokens, state.best.score)
    } else {
        format!("SCORE {}", state.tokens)
    };
    let rx = cols.saturating_sub(score_str.chars().count() as u16 + 2);
    out.queue(cursor::MoveTo(rx, text_row))?;
    out.queue(style::SetForegroundColor(C_HUD_TOKENS))?;
    out.queue(Print(&score_str))?;

    // Separator at the play-field boundary
    out.queue(cursor::MoveTo(0, hud_rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HUD_BAR))?;
    out.queue(Print("─".repeat(cols as usize)))?;

    Ok(())
}

// ── Player ────────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    let r = state.player.rect();

    // Hull below, nose tip on the top row
    let hull = Rect::new(r.x, r.y + CELL_H, r.w, r.h - CELL_H);
    fill_rect(out, &hull, '█', C_PLAYER)?;

    let (col, row, cols, _) = cell_span(&r);
    out.queue(cursor::MoveTo(col + cols / 2, row))?;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(Print("▲"))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    let rows = (state.height / CELL_H) as u16;
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &SessionState) -> std::io::Result<()> {
    let score_line = format!("Tokens: {:>5}   Level: {:>3}", state.tokens, state.level);
    let best_line = if state.new_record {
        format!(
            "★ NEW RECORD: {} tokens, level {} ★",
            state.best.score, state.best.level
        )
    } else {
        format!("Best: {} tokens, level {}", state.best.score, state.best.level)
    };

    let box_lines: &[&str] = &[
        "╔════════════════════╗",
        "║    GAME  OVER      ║",
        "╚════════════════════╝",
    ];
    let best_color = if state.new_record {
        Color::Yellow
    } else {
        Color::DarkGrey
    };

    let cols = (state.width / CELL_W) as u16;
    let rows = (state.height / CELL_H) as u16;
    let cx = cols / 2;
    let total_rows = box_lines.len() + 3; // box + score + best + hint
    let start_row = (rows / 2).saturating_sub(total_rows as u16 / 2);

    for (i, msg) in box_lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(Color::Red))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + box_lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let best_row = score_row + 1;
    let col = cx.saturating_sub(best_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, best_row))?;
    out.queue(style::SetForegroundColor(best_color))?;
    out.queue(Print(&best_line))?;

    let hint = "R - Play Again  Q - Quit";
    let hint_row = best_row + 1;
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, hint_row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
