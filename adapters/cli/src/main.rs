#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Color Wars in a terminal.

mod config;
mod render;
mod script;

use std::{
    fs,
    io::{self, BufRead, Write},
};

use anyhow::{Context, Result};
use clap::Parser;
use color_wars_core::{Command, Event, PlayerId, TurnPhase};
use color_wars_system_autoplay::{Autoplay, Config as AutoplayConfig};
use color_wars_world::{self as world, query, Game};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{Cli, Settings},
    render::{describe, render_board, Names},
    script::{parse_line, ScriptLine},
};

/// Entry point for the Color Wars command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::resolve(&cli)?;
    let game = Game::new(settings.game_config()?).context("invalid game configuration")?;
    info!(
        width = settings.width,
        height = settings.height,
        players = settings.names.len(),
        "starting game"
    );

    let stdout = io::stdout();
    let mut session = Session {
        game,
        names: Names::new(settings.names.clone()),
        out: stdout.lock(),
    };
    writeln!(session.out, "Welcome to Color Wars.")?;
    session.print_board()?;

    if cli.autoplay {
        session.autoplay(&settings)
    } else if let Some(path) = &cli.script {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        for (index, line) in contents.lines().enumerate() {
            let parsed = parse_line(index + 1, line)
                .with_context(|| format!("invalid script {}", path.display()))?;
            session.run(parsed)?;
        }
        Ok(())
    } else {
        session.interactive()
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

struct Session<W: Write> {
    game: Game,
    names: Names,
    out: W,
}

impl<W: Write> Session<W> {
    fn run(&mut self, line: ScriptLine) -> Result<()> {
        match line {
            ScriptLine::Skip => Ok(()),
            ScriptLine::Reset => self.submit(Command::Reset).map(drop),
            ScriptLine::Move(cell) => match query::current_player(&self.game) {
                Some(player) => self.submit(Command::AttemptMove { player, cell }).map(drop),
                None => {
                    writeln!(self.out, "the game is over; enter `reset` to play again")?;
                    Ok(())
                }
            },
        }
    }

    fn submit(&mut self, command: Command) -> Result<Vec<Event>> {
        debug!(?command, "submitting command");
        let mut events = Vec::new();
        world::apply(&mut self.game, command, &mut events);

        for event in &events {
            if let Some(line) = describe(event, &self.names) {
                writeln!(self.out, "{line}")?;
            }
        }
        let changed = events
            .iter()
            .any(|event| matches!(event, Event::MoveAccepted { .. } | Event::GameReset));
        if changed {
            self.print_board()?;
        }
        Ok(events)
    }

    fn print_board(&mut self) -> Result<()> {
        let board = render_board(&query::snapshot(&self.game));
        write!(self.out, "{board}")?;
        Ok(())
    }

    fn prompt(&mut self) -> Result<()> {
        match query::phase(&self.game) {
            TurnPhase::AwaitingMove { player } => {
                let name = self.names.of(player);
                write!(self.out, "{name} (x y)> ")?;
            }
            TurnPhase::Resolving | TurnPhase::GameOver { .. } => write!(self.out, "> ")?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn interactive(&mut self) -> Result<()> {
        let stdin = io::stdin();
        self.prompt()?;
        for (index, line) in stdin.lock().lines().enumerate() {
            let line = line.context("failed to read from stdin")?;
            match parse_line(index + 1, &line) {
                Ok(parsed) => self.run(parsed)?,
                Err(error) => writeln!(self.out, "{error}")?,
            }
            self.prompt()?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn autoplay(&mut self, settings: &Settings) -> Result<()> {
        let players: Vec<PlayerId> = query::player_states(&self.game)
            .iter()
            .map(|player| player.id)
            .collect();
        let mut autoplay = Autoplay::new(AutoplayConfig::new(
            players,
            settings.strategy,
            settings.seed,
        ));

        let mut pending: Vec<Event> = query::current_player(&self.game)
            .map(|player| Event::TurnAdvanced { player })
            .into_iter()
            .collect();
        for _ in 0..settings.max_moves {
            let mut commands = Vec::new();
            autoplay.handle(
                &pending,
                &query::snapshot(&self.game),
                query::is_first_round(&self.game),
                &mut commands,
            );
            if commands.is_empty() {
                break;
            }

            pending.clear();
            for command in commands {
                pending.extend(self.submit(command)?);
            }
        }

        if let TurnPhase::AwaitingMove { player } = query::phase(&self.game) {
            let name = self.names.of(player);
            writeln!(
                self.out,
                "stopped after {} moves; {name} to move",
                settings.max_moves
            )?;
        }
        Ok(())
    }
}
