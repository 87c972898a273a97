#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that lets two players duel on a shared board.

mod config;
mod render;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use tile_duel_core::{Direction, GameConfig};
use tile_duel_system_session::Session;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Two-player tile merging duel in the terminal.
#[derive(Debug, Parser)]
#[command(name = "tile-duel", version, about)]
struct Args {
    /// TOML file with a `[game]` table of settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for tile spawning.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of cells along each board edge.
    #[arg(long)]
    size: Option<u32>,
    /// Tile value that wins the game.
    #[arg(long)]
    win_value: Option<u32>,
    /// Merge animation length in milliseconds.
    #[arg(long)]
    animation_ms: Option<u64>,
    /// Play alone: a stuck board is lost instead of scored.
    #[arg(long)]
    solo: bool,
    /// Moves to play without a prompt, separated by commas or spaces.
    #[arg(long, value_name = "MOVES")]
    script: Option<String>,
}

/// Input line understood by the front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Input {
    Move(Direction),
    Restart,
    Quit,
}

fn parse_input(token: &str) -> Result<Input> {
    match token.trim().to_ascii_lowercase().as_str() {
        "restart" | "n" => Ok(Input::Restart),
        "quit" | "q" => Ok(Input::Quit),
        other => Ok(Input::Move(other.parse().with_context(|| {
            format!("`{token}` is not a move, use up/down/left/right, wasd, n or q")
        })?)),
    }
}

/// Entry point for the Tile Duel command-line interface.
fn main() -> Result<()> {
    install_tracing();
    let args = Args::parse();
    let config = config::load(
        args.config.as_deref(),
        config::Overrides {
            rng_seed: args.seed,
            board_dimension: args.size,
            win_value: args.win_value,
            merge_animation_ms: args.animation_ms,
            solo: args.solo,
        },
    )?;
    info!(?config, "configuration loaded");

    let mut session = Session::new(config.clone()).context("failed to start a game")?;
    match args.script {
        Some(script) => play_script(&mut session, &config, &script),
        None => play_interactive(&mut session, &config),
    }
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Plays a fixed list of moves on the simulated clock, one throttle window apart.
fn play_script(session: &mut Session, config: &GameConfig, script: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for token in script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        match parse_input(token)? {
            Input::Move(direction) => session.move_tiles(direction),
            Input::Restart => session.start_game(),
            Input::Quit => break,
        }
        session.advance(config.throttle_window());
        report_events(session, &mut stdout)?;
    }
    show(session, &mut stdout)
}

/// Reads moves from stdin, forwarding wall-clock time to the session.
fn play_interactive(session: &mut Session, config: &GameConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut last_tick = Instant::now();
    show(session, &mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        advance_wall_clock(session, &mut last_tick);

        match parse_input(&line) {
            Ok(Input::Move(direction)) => {
                session.move_tiles(direction);
                thread::sleep(config.throttle_window());
                advance_wall_clock(session, &mut last_tick);
            }
            Ok(Input::Restart) => session.start_game(),
            Ok(Input::Quit) => break,
            Err(error) => {
                writeln!(stdout, "{error:#}").context("failed to write to stdout")?;
                continue;
            }
        }
        report_events(session, &mut stdout)?;
        show(session, &mut stdout)?;
    }
    Ok(())
}

fn advance_wall_clock(session: &mut Session, last_tick: &mut Instant) {
    let now = Instant::now();
    let elapsed: Duration = now.duration_since(*last_tick);
    *last_tick = now;
    session.advance(elapsed);
}

fn report_events(session: &mut Session, out: &mut impl Write) -> Result<()> {
    for event in session.drain_events() {
        if let Some(message) = render::notice(&event) {
            writeln!(out, "{message}").context("failed to write to stdout")?;
        }
    }
    Ok(())
}

fn show(session: &Session, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", render::board(session)).context("failed to write to stdout")?;
    if let Some(verdict) = render::verdict(session.status()) {
        writeln!(out, "{verdict}").context("failed to write to stdout")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves_and_controls() {
        assert_eq!(parse_input("left").expect("move"), Input::Move(Direction::Left));
        assert_eq!(parse_input(" W ").expect("move"), Input::Move(Direction::Up));
        assert_eq!(parse_input("n").expect("restart"), Input::Restart);
        assert_eq!(parse_input("q").expect("quit"), Input::Quit);
        assert!(parse_input("diagonal").is_err());
    }

    #[test]
    fn script_moves_are_spaced_past_the_throttle() {
        let config = GameConfig {
            rng_seed: 3,
            ..GameConfig::default()
        };
        let mut session = Session::new(config.clone()).expect("valid config");
        let mut sink = Vec::new();
        for token in ["left", "up", "right", "down"] {
            if let Ok(Input::Move(direction)) = parse_input(token) {
                session.move_tiles(direction);
            }
            session.advance(config.throttle_window());
            report_events(&mut session, &mut sink).expect("write");
        }
        let output = String::from_utf8(sink).expect("utf8");
        assert!(!output.contains("still moving"), "unexpected drop: {output}");
    }
}
