mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use flying_pigs::clock::FrameClock;
use flying_pigs::compute::{frame_view, handle_input, new_session, tick};
use flying_pigs::config::GameConfig;
use flying_pigs::entities::{Control, GameSession, InputEvent, Key};

// ── Command line ──────────────────────────────────────────────────────────────

const USAGE: &str = "usage: flying_pigs [--once] [--seed <u64>] [--duration <secs>]";

struct Options {
    /// Exit after the first game over instead of returning to the start screen.
    once: bool,
    seed: Option<u64>,
    duration_secs: Option<u32>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options> {
    let mut opts = Options {
        once: false,
        seed: None,
        duration_secs: None,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--once" => opts.once = true,
            "--seed" => {
                let v = args.next().context("--seed needs a value")?;
                opts.seed = Some(v.parse().with_context(|| format!("bad seed {v:?}"))?);
            }
            "--duration" => {
                let v = args.next().context("--duration needs a value")?;
                opts.duration_secs =
                    Some(v.parse().with_context(|| format!("bad duration {v:?}"))?);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    Ok(opts)
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so log lines go to `path`, or nowhere
/// when it cannot be created.  Never stderr.
fn log_target(path: &Path) -> env_logger::Target {
    match File::create(path) {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(_) => env_logger::Target::Pipe(Box::new(std::io::sink())),
    }
}

fn init_logging() {
    let path = std::env::temp_dir().join("flying_pigs.log");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(log_target(&path))
        .init();
}

// ── Input mapping ─────────────────────────────────────────────────────────────

/// Translate a terminal event into a game input.  Releases, repeats,
/// mouse and resize events produce nothing.
fn map_event(ev: &Event) -> Option<InputEvent> {
    let Event::Key(KeyEvent {
        code,
        kind,
        modifiers,
        ..
    }) = ev
    else {
        return None;
    };
    if *kind != KeyEventKind::Press {
        return None;
    }
    let input = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputEvent::Quit,
        KeyCode::Char('u') | KeyCode::Char('U') | KeyCode::Up | KeyCode::Char(' ') => {
            InputEvent::KeyDown(Key::FlapUp)
        }
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Down => {
            InputEvent::KeyDown(Key::FlapDown)
        }
        _ => InputEvent::KeyDown(Key::Other),
    };
    Some(input)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits (or acknowledges game over in `--once` mode).
///
/// Each iteration drains all pending input, runs however many fixed 60 Hz
/// steps the wall clock says are due, then renders once.
fn game_loop<W: Write>(
    out: &mut W,
    mut session: GameSession,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut clock = FrameClock::new(session.config.fps, Instant::now());

    loop {
        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Some(input) = map_event(&ev) else {
                continue;
            };
            let (next, control) = handle_input(&session, input);
            session = next;
            if control == Control::Exit {
                return Ok(());
            }
        }

        for _ in 0..clock.steps_due(Instant::now()) {
            session = tick(&session, rng);
        }

        let (width, height) = terminal::size().context("reading terminal size")?;
        display::render(out, &frame_view(&session), width, height)
            .context("rendering frame")?;

        thread::sleep(clock.until_next(Instant::now()));
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let opts = parse_args(std::env::args().skip(1))?;
    init_logging();

    let mut config = GameConfig::default();
    if let Some(secs) = opts.duration_secs {
        config.duration_secs = secs;
    }
    config.validate().context("invalid game configuration")?;

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("starting with {:?}", config);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

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
                warn!("input thread stopped: {e}");
                break;
            }
        }
    });

    let session = new_session(config, opts.once);
    let result = game_loop(&mut out, session, &mut rng, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press))
    }

    fn args(list: &[&str]) -> Result<Options> {
        parse_args(list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter())
    }

    // ── map_event ─────────────────────────────────────────────────────────────

    #[test]
    fn flap_up_keys() {
        for code in [KeyCode::Char('u'), KeyCode::Char('U'), KeyCode::Up, KeyCode::Char(' ')] {
            assert_eq!(map_event(&press(code)), Some(InputEvent::KeyDown(Key::FlapUp)));
        }
    }

    #[test]
    fn flap_down_keys() {
        for code in [KeyCode::Char('d'), KeyCode::Char('D'), KeyCode::Down] {
            assert_eq!(map_event(&press(code)), Some(InputEvent::KeyDown(Key::FlapDown)));
        }
    }

    #[test]
    fn quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc] {
            assert_eq!(map_event(&press(code)), Some(InputEvent::Quit));
        }
        let ctrl_c = Event::Key(KeyEvent::new_with_kind(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            KeyEventKind::Press,
        ));
        assert_eq!(map_event(&ctrl_c), Some(InputEvent::Quit));
    }

    #[test]
    fn other_keys_are_plain_presses() {
        for code in [KeyCode::Char('c'), KeyCode::Char('x'), KeyCode::Enter, KeyCode::Left] {
            assert_eq!(map_event(&press(code)), Some(InputEvent::KeyDown(Key::Other)));
        }
    }

    #[test]
    fn release_and_repeat_are_ignored() {
        for kind in [KeyEventKind::Release, KeyEventKind::Repeat] {
            let ev = Event::Key(KeyEvent::new_with_kind(KeyCode::Char('u'), KeyModifiers::NONE, kind));
            assert_eq!(map_event(&ev), None);
        }
    }

    #[test]
    fn non_key_events_are_ignored() {
        assert_eq!(map_event(&Event::Resize(80, 24)), None);
        assert_eq!(map_event(&Event::FocusGained), None);
    }

    // ── parse_args ────────────────────────────────────────────────────────────

    #[test]
    fn no_args_gives_defaults() {
        let o = args(&[]).unwrap();
        assert!(!o.once);
        assert_eq!(o.seed, None);
        assert_eq!(o.duration_secs, None);
    }

    #[test]
    fn all_options_parse() {
        let o = args(&["--once", "--seed", "42", "--duration", "15"]).unwrap();
        assert!(o.once);
        assert_eq!(o.seed, Some(42));
        assert_eq!(o.duration_secs, Some(15));
    }

    #[test]
    fn missing_value_is_rejected() {
        assert!(args(&["--seed"]).is_err());
        assert!(args(&["--duration"]).is_err());
    }

    #[test]
    fn bad_value_is_rejected() {
        assert!(args(&["--seed", "pig"]).is_err());
        assert!(args(&["--duration", "-3"]).is_err());
    }

    #[test]
    fn unknown_argument_is_rejected() {
        assert!(args(&["--fast"]).is_err());
    }

    // ── log_target ────────────────────────────────────────────────────────────

    #[test]
    fn unwritable_log_path_never_falls_back_to_stderr() {
        let path = std::env::temp_dir()
            .join("flying_pigs_missing_dir")
            .join("nested")
            .join("flying_pigs.log");
        assert!(matches!(log_target(&path), env_logger::Target::Pipe(_)));
    }
}
