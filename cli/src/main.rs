use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use gridplay_core::connect_four::{ConnectFour, DropOutcome};
use gridplay_core::minesweeper::{Board, GameConfig, RevealOutcome};
use gridplay_core::{CellCount, Coord};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use command::{ConnectFourCommand, MinesweeperCommand};

mod command;
mod render;

/// Play grid games from the terminal, one command per line on stdin.
#[derive(Parser, Debug)]
#[command(name = "gridplay", version)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity,

    /// Print one JSON snapshot per line instead of a text grid
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    game: Game,
}

#[derive(Subcommand, Debug)]
enum Game {
    /// Commands: `r X Y` reveal, `f X Y` flag, `reset`, `quit` (1-based coordinates)
    Minesweeper(MinesweeperArgs),
    /// Commands: a column number 0-6, `reset`, `quit`
    ConnectFour,
}

#[derive(Args, Debug)]
struct MinesweeperArgs {
    /// JSON board config, overrides the size flags
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = GameConfig::DEFAULT_WIDTH)]
    width: Coord,

    #[arg(long, default_value_t = GameConfig::DEFAULT_HEIGHT)]
    height: Coord,

    #[arg(long, default_value_t = GameConfig::DEFAULT_MINES)]
    mines: CellCount,

    /// Fixed seed for reproducible mine layouts
    #[arg(long)]
    seed: Option<u64>,
}

impl MinesweeperArgs {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => GameConfig::new(self.width, self.height, self.mines),
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn run_minesweeper(
    config: GameConfig,
    json: bool,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let mut board = Board::new(config).context("invalid board configuration")?;
    log::info!("Minesweeper {:?}", board.config());
    render::minesweeper(&board, json, out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<MinesweeperCommand>() {
            Ok(command) => command,
            Err(err) => {
                log::warn!("{err:#}");
                continue;
            }
        };

        let updated = match command {
            MinesweeperCommand::Reveal(coords) => match board.make_move(coords) {
                Ok(outcome) => {
                    match outcome {
                        RevealOutcome::HitMine => log::info!("Hit a mine at {:?}", coords),
                        RevealOutcome::Won => log::info!("Cleared in {:?}", board.elapsed()),
                        _ => {}
                    }
                    outcome.has_update()
                }
                Err(err) => {
                    log::warn!("Cannot reveal {:?}: {}", coords, err);
                    false
                }
            },
            MinesweeperCommand::Flag(coords) => {
                let flagged = board.cell(coords).map(|cell| cell.is_flagged());
                if matches!(flagged, Ok(false)) && board.mines_remaining() <= 0 {
                    log::warn!("No flags left");
                    continue;
                }
                match board.flag(coords) {
                    Ok(outcome) => outcome.has_update(),
                    Err(err) => {
                        log::warn!("Cannot flag {:?}: {}", coords, err);
                        false
                    }
                }
            }
            MinesweeperCommand::Reset => {
                board.reset();
                true
            }
            MinesweeperCommand::Quit => break,
        };
        if updated {
            render::minesweeper(&board, json, out)?;
        }
    }
    Ok(())
}

fn run_connect_four(json: bool, input: impl BufRead, out: &mut impl Write) -> Result<()> {
    let mut board = ConnectFour::new();
    render::connect_four(&board, json, out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ConnectFourCommand>() {
            Ok(command) => command,
            Err(err) => {
                log::warn!("{err:#}");
                continue;
            }
        };

        let updated = match command {
            ConnectFourCommand::Drop(column) => match board.drop_piece(column) {
                Ok(outcome) => {
                    match outcome {
                        DropOutcome::NoChange => {
                            log::warn!("Column {} does not accept pieces", column)
                        }
                        DropOutcome::Won { .. } => log::info!("{:?} wins", board.current_turn()),
                        DropOutcome::Placed { .. } => {}
                    }
                    outcome.has_update()
                }
                Err(err) => {
                    log::warn!("Cannot drop in column {}: {}", column, err);
                    false
                }
            },
            ConnectFourCommand::Reset => {
                board.reset();
                true
            }
            ConnectFourCommand::Quit => break,
        };
        if updated {
            render::connect_four(&board, json, out)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    match cli.game {
        Game::Minesweeper(args) => {
            run_minesweeper(args.game_config()?, cli.json, stdin.lock(), &mut stdout)
        }
        Game::ConnectFour => run_connect_four(cli.json, stdin.lock(), &mut stdout),
    }
}
