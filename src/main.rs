mod display;

use std::collections::HashMap;
use std::env;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use log::{error, info};
use rand::thread_rng;

use astro_assault::compute::{init_state, tick};
use astro_assault::entities::{GameStatus, Intents, SessionState};
use astro_assault::records::{load_best, save_best, BestRecord};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS, what the speed constants are tuned for

// ── Held-key input model ──────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Intents derived from the keyboard for this frame. A second source (a
/// touch panel, say) would OR in via `Intents::merge`.
fn keyboard_intents(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Intents {
    Intents {
        left: is_held(key_frame, &KeyCode::Left, frame)
            || is_held(key_frame, &KeyCode::Char('a'), frame)
            || is_held(key_frame, &KeyCode::Char('A'), frame),
        right: is_held(key_frame, &KeyCode::Right, frame)
            || is_held(key_frame, &KeyCode::Char('d'), frame)
            || is_held(key_frame, &KeyCode::Char('D'), frame),
        fire: is_held(key_frame, &KeyCode::Char(' '), frame),
    }
}

// ── Start screen ──────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_start_screen<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    best: BestRecord,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  ASTRO  ASSAULT  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if best.score > 0 || best.level > 0 {
        let best_str = format!("Best: {} tokens, level {}", best.score, best.level);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(best_str.chars().count() as u16 / 2),
            cy.saturating_sub(3),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&best_str))?;
    }

    let blurb: &[&str] = &[
        "Shoot the falling asteroids, take down the alien.",
        "10 tokens per level; every level speeds things up.",
    ];
    for (i, line) in blurb.iter().enumerate() {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(line.chars().count() as u16 / 2),
            cy.saturating_sub(1) + i as u16,
        ))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*line))?;
    }

    let hint = "ENTER - Start   Q - Quit";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(hint.chars().count() as u16 / 2),
        cy + 2,
    ))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind, .. })) => {
                if kind != KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(MenuResult::Quit)
                    }
                    _ => {}
                }
            }
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit), // input thread gone
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to the start screen.
///
/// Input model: instead of acting on each key event individually, a
/// `key_frame` map records the frame number of the last press/repeat event
/// for every key. Each frame the live keys become the tick's intents, so
/// Space plus a direction key work simultaneously with no interference.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut SessionState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    // Press: record key + handle one-shot actions
                    KeyEventKind::Press => {
                        key_frame.insert(code.clone(), frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(true);
                            }
                            KeyCode::Char('c')
                                if modifiers.contains(KeyModifiers::CONTROL) =>
                            {
                                return Ok(true);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if state.status == GameStatus::GameOver =>
                            {
                                return Ok(false);
                            }
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code.clone(), frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Resize(cols, rows) => {
                    // The simulation reads the surface size every tick, so
                    // the new dimensions apply on the next frame.
                    state.width = cols as f64 * display::CELL_W;
                    state.height = rows as f64 * display::CELL_H;
                }
                _ => {}
            }
        }

        // ── One simulation step from this frame's intents ─────────────────────
        if state.status == GameStatus::Playing {
            let intents = keyboard_intents(&key_frame, frame);
            *state = tick(state, &intents, &mut rng);

            if state.shot_fired {
                // Fire-and-forget shot sound; a silent terminal just ignores BEL.
                let _ = write!(out, "\x07");
            }
            if state.status == GameStatus::GameOver && state.new_record {
                // Persist the record exactly at the transition.
                save_best(state.best);
            }
        }

        display::render(out, state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    if env::args().any(|a| a == "--log") {
        // Best-effort file logging; the game runs fine without it.
        let _ = simple_logging::log_to_file("astro_assault.log", log::LevelFilter::Info);
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    // Fail fast before any session state exists.
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                error!("input thread stopped: {}", e);
                break;
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    loop {
        // Reload each time so a fresh record shows up after a restart
        let best = load_best();
        match show_start_screen(out, rx, best)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let (cols, rows) = terminal::size()?;
                let width = cols as f64 * display::CELL_W;
                let height = rows as f64 * display::CELL_H;
                let mut state = init_state(width, height, best);
                info!("session start: surface {}x{} px", width, height);
                let quit = game_loop(out, &mut state, rx)?;
                if quit {
                    break;
                }
                // Otherwise loop back to the start screen
            }
        }
    }
    Ok(())
}
