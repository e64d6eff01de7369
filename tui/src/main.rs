use std::io::{self, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, execute, queue};
use demine_core::{Board, GameConfig};
use rand::Rng;

use crate::input::Command;

mod input;
mod ui;

// Board dimensions and mine count are fixed at compile time.
const BOARD_WIDTH: u8 = 100;
const BOARD_HEIGHT: u8 = 25;
const MINE_COUNT: u16 = 200;

#[derive(Parser)]
#[command(name = "demine", version, about = "Terminal minesweeper")]
struct Cli {
    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity,
}

/// Restores the terminal on every exit path, including panics.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let config = GameConfig::new((BOARD_WIDTH, BOARD_HEIGHT), MINE_COUNT)
        .context("invalid board configuration")?;
    let mut board = Board::new(config, rand::rng().random());
    log::info!(
        "new {}x{} game with {} mines",
        BOARD_WIDTH,
        BOARD_HEIGHT,
        MINE_COUNT
    );

    let screen = ui::Screen::layout(board.size())?;
    let _guard = TerminalGuard::enter()?;
    let mut out = BufWriter::new(io::stdout());
    execute!(out, Clear(ClearType::All))?;
    screen.draw(&mut out, &board)?;

    // quitting takes two presses of `q` in a row
    let mut armed_quit = false;
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(command) = input::map_key(key) else {
            armed_quit = false;
            continue;
        };

        if command == Command::Quit {
            if armed_quit {
                break;
            }
            armed_quit = true;
        } else {
            armed_quit = false;
            match command {
                Command::Move(direction) => board.move_cursor(direction),
                Command::Reveal => {
                    board.reveal_at_cursor();
                }
                Command::ToggleFlag => {
                    board.toggle_flag_at_cursor();
                }
                Command::NewGame => {
                    board.start_new_game();
                    queue!(out, Clear(ClearType::All))?;
                }
                Command::Quit => unreachable!(),
            }
        }
        screen.draw(&mut out, &board)?;
    }

    out.flush()?;
    Ok(())
}
