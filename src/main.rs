use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use courtside_score::config::SessionConfig;
use courtside_score::engine::Player;
use courtside_score::persist::{FileStore, STORAGE_KEY, ScoreStore};
use courtside_score::session::{Command, ScoreView, Session, apply_command};

const HELP: &str = "a/b point | u undo | reset | n next match | t toggle server | s a|b set server | name a|b NAME | l log | ? help | q quit";

enum Input {
    Command(Command),
    ShowLog,
    Help,
    Quit,
    Unknown(String),
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig::from_env();
    let dir = config
        .data_dir
        .clone()
        .context("no data directory: set SCORE_DATA_DIR or HOME")?;
    let store = FileStore::new(dir);
    tracing::info!("score file: {}", store.path_for(STORAGE_KEY).display());

    let mut session = Session::open(store, &config);
    run(&mut session, io::stdin().lock(), io::stdout().lock())
}

fn run<S: ScoreStore>(
    session: &mut Session<S>,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    writeln!(out, "{HELP}")?;
    writeln!(out, "{}", board_line(&session.view()))?;

    for line in input.lines() {
        let line = line.context("failed to read stdin")?;
        match parse_input(&line) {
            Input::Command(cmd) => {
                apply_command(session, cmd);
                writeln!(out, "{}", board_line(&session.view()))?;
            }
            Input::ShowLog => {
                for entry in &session.logs {
                    writeln!(out, "{entry}")?;
                }
            }
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Quit => break,
            Input::Unknown(raw) if raw.is_empty() => {}
            Input::Unknown(raw) => writeln!(out, "unknown command: {raw}")?,
        }
        out.flush()?;
    }
    Ok(())
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let mut parts = line.splitn(3, char::is_whitespace);
    let head = parts.next().unwrap_or_default();
    let player = |raw: Option<&str>| match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("a") => Some(Player::A),
        Some("b") => Some(Player::B),
        _ => None,
    };
    match head.to_ascii_lowercase().as_str() {
        "a" => Input::Command(Command::Point(Player::A)),
        "b" => Input::Command(Command::Point(Player::B)),
        "u" | "undo" => Input::Command(Command::Undo),
        "reset" => Input::Command(Command::Reset),
        "n" | "next" => Input::Command(Command::StartNextMatch),
        "t" => Input::Command(Command::ToggleServer),
        "s" => match player(parts.next()) {
            Some(p) => Input::Command(Command::SetServer(p)),
            None => Input::Unknown(line.to_string()),
        },
        "name" => {
            let who = player(parts.next());
            let name = parts.next().map(str::trim).unwrap_or_default();
            match who {
                Some(p) if !name.is_empty() => Input::Command(Command::Rename {
                    player: p,
                    name: name.to_string(),
                }),
                _ => Input::Unknown(line.to_string()),
            }
        }
        "l" | "log" => Input::ShowLog,
        "?" | "help" => Input::Help,
        "q" | "quit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

fn board_line(view: &ScoreView) -> String {
    let mark = |p: Player| if view.server == p { "*" } else { " " };
    let status = if view.match_over { " | MATCH OVER (n for next)" } else { "" };
    format!(
        "{}{} {:>2} - {:<2} {}{} | Games {}-{} | Sets {}-{}{}",
        mark(Player::A),
        view.player_a_name,
        view.point_label_a,
        view.point_label_b,
        view.player_b_name,
        mark(Player::B),
        view.games_a,
        view.games_b,
        view.sets_a,
        view.sets_b,
        status
    )
}
