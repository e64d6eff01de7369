//! Presentation layer: batched crossterm drawing of the header, the grid,
//! and the end-of-game panel. All game state comes from read-only board
//! queries; nothing here mutates the engine.

use std::io::{self, Write};

use anyhow::bail;
use crossterm::{
    cursor::{MoveTo, Show},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use demine_core::{Board, CellState, GamePhase, LossMarker};

const TITLE: &str = "Minesweeper";
const HEADER_HEIGHT: u16 = 4;
const END_WIDTH: u16 = 24;
const END_HEIGHT: u16 = 8;

const HIDDEN_CHAR: char = '.';
const FLAG_CHAR: char = 'F';
const EMPTY_CHAR: char = ' ';
const MINE_CHAR: char = 'X';
const WRONG_FLAG_CHAR: char = 'n';
const RIGHT_FLAG_CHAR: char = 'y';

/// Centering offsets computed once from the terminal dimensions.
pub struct Screen {
    cols: u16,
    rows: u16,
    h_pad: u16,
    v_pad: u16,
    board_width: u16,
    board_height: u16,
}

impl Screen {
    pub fn layout(board_size: (u8, u8)) -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let board_width = u16::from(board_size.0);
        let board_height = u16::from(board_size.1);
        let need_cols = board_width + 2;
        let need_rows = board_height + 2 + HEADER_HEIGHT;
        if cols < need_cols || rows < need_rows {
            bail!(
                "terminal is {cols}x{rows} but the board needs at least {need_cols}x{need_rows}"
            );
        }
        Ok(Self {
            cols,
            rows,
            h_pad: (cols - need_cols) / 2,
            v_pad: (rows - need_rows) / 2,
            board_width,
            board_height,
        })
    }

    pub fn draw(&self, out: &mut impl Write, board: &Board) -> io::Result<()> {
        self.draw_header(out, board)?;
        self.draw_grid(out, board)?;
        if board.phase().is_finished() {
            self.draw_end_panel(out, board)?;
        } else {
            let (x, y) = board.cursor();
            queue!(
                out,
                MoveTo(
                    self.h_pad + 1 + u16::from(x),
                    self.v_pad + HEADER_HEIGHT + 1 + u16::from(y)
                ),
                Show
            )?;
        }
        out.flush()
    }

    fn draw_header(&self, out: &mut impl Write, board: &Board) -> io::Result<()> {
        let width = self.board_width + 2;
        draw_box(out, self.h_pad, self.v_pad, width, HEADER_HEIGHT)?;

        let center = width / 2;
        let title_col = self.h_pad + center - (TITLE.len() as u16) / 2;
        queue!(out, MoveTo(title_col, self.v_pad), Print(TITLE))?;

        let version = concat!("v", env!("CARGO_PKG_VERSION"));
        let version_col = self.h_pad + width - 1 - version.len() as u16;
        queue!(out, MoveTo(version_col, self.v_pad), Print(version))?;

        let (x, y) = board.cursor();
        let coords_x = format!("x: {:3}/{:3}", u16::from(x) + 1, self.board_width);
        let coords_y = format!("y: {:3}/{:3}", u16::from(y) + 1, self.board_height);
        queue!(out, MoveTo(self.h_pad + 2, self.v_pad + 1), Print(coords_x))?;
        queue!(out, MoveTo(self.h_pad + 2, self.v_pad + 2), Print(coords_y))?;

        let mines = format!("Mines:{:4}", board.remaining_mines());
        let flags = format!("Flags:{:4}", board.count_flags());
        let mines_col = self.h_pad + width - 2 - mines.len() as u16;
        let flags_col = self.h_pad + width - 2 - flags.len() as u16;
        queue!(out, MoveTo(mines_col, self.v_pad + 1), Print(mines))?;
        queue!(out, MoveTo(flags_col, self.v_pad + 2), Print(flags))?;

        let score = format!("Score:{:3}", board.score());
        let score_col = self.h_pad + center - (score.len() as u16) / 2;
        queue!(out, MoveTo(score_col, self.v_pad + 2), Print(score))?;
        Ok(())
    }

    fn draw_grid(&self, out: &mut impl Write, board: &Board) -> io::Result<()> {
        let top = self.v_pad + HEADER_HEIGHT;
        draw_box(
            out,
            self.h_pad,
            top,
            self.board_width + 2,
            self.board_height + 2,
        )?;

        let lost = board.phase() == GamePhase::Lost;
        for y in 0..self.board_height {
            queue!(out, MoveTo(self.h_pad + 1, top + 1 + y))?;
            for x in 0..self.board_width {
                let coords = (x as u8, y as u8);
                let (glyph, color) = if lost {
                    lost_cell_appearance(board, coords)
                } else {
                    cell_appearance(board.cell_at(coords))
                };
                match color {
                    Some(color) => {
                        queue!(out, SetForegroundColor(color), Print(glyph), ResetColor)?
                    }
                    None => queue!(out, Print(glyph))?,
                }
            }
        }
        Ok(())
    }

    fn draw_end_panel(&self, out: &mut impl Write, board: &Board) -> io::Result<()> {
        let x = (self.cols - END_WIDTH) / 2;
        let y = (self.rows - END_HEIGHT) / 2;
        draw_box(out, x, y, END_WIDTH, END_HEIGHT)?;
        for row in 1..END_HEIGHT - 1 {
            queue!(
                out,
                MoveTo(x + 1, y + row),
                Print(" ".repeat(usize::from(END_WIDTH) - 2))
            )?;
        }

        let won = board.phase() == GamePhase::Won;
        let verdict = if won { "You won" } else { "You lose" };
        let elapsed = board.elapsed_secs();
        let time = format!("Elapsed: {}:{:02}", elapsed / 60, elapsed % 60);
        let flagged = if won {
            board.total_mines()
        } else {
            board.correctly_flagged_mines()
        };
        let mines = format!("Mines: {}/{}", flagged, board.total_mines());
        let hint = "q to quit, r to retry";

        for (row, line) in [(1, verdict), (3, time.as_str()), (4, mines.as_str()), (6, hint)] {
            let col = x + (END_WIDTH - line.len() as u16) / 2;
            queue!(out, MoveTo(col, y + row), Print(line))?;
        }
        queue!(out, MoveTo(x + (END_WIDTH - hint.len() as u16) / 2, y + 6))?;
        Ok(())
    }
}

fn draw_box(out: &mut impl Write, x: u16, y: u16, width: u16, height: u16) -> io::Result<()> {
    let horiz = "=".repeat(usize::from(width) - 2);
    queue!(out, MoveTo(x, y), Print(format!("\\{horiz}/")))?;
    for row in 1..height - 1 {
        queue!(
            out,
            MoveTo(x, y + row),
            Print('|'),
            MoveTo(x + width - 1, y + row),
            Print('|')
        )?;
    }
    queue!(out, MoveTo(x, y + height - 1), Print(format!("\\{horiz}/")))?;
    Ok(())
}

fn cell_appearance(cell: CellState) -> (char, Option<Color>) {
    match cell {
        CellState::Hidden => (HIDDEN_CHAR, Some(Color::DarkGrey)),
        CellState::Flagged => (FLAG_CHAR, Some(Color::Yellow)),
        CellState::Revealed(0) => (EMPTY_CHAR, None),
        CellState::Revealed(count) => (
            char::from_digit(u32::from(count), 10).unwrap_or('?'),
            Some(digit_color(count)),
        ),
    }
}

/// Final display after a loss: flags are judged and unflagged mines exposed;
/// everything else keeps its in-game appearance.
fn lost_cell_appearance(board: &Board, coords: (u8, u8)) -> (char, Option<Color>) {
    match board.loss_marker_at(coords) {
        Some(LossMarker::CorrectFlag) => (RIGHT_FLAG_CHAR, Some(Color::Green)),
        Some(LossMarker::IncorrectFlag) => (WRONG_FLAG_CHAR, Some(Color::Red)),
        Some(LossMarker::MissedMine) => {
            let triggered = board.triggered_mine() == Some(coords);
            (MINE_CHAR, Some(if triggered { Color::Red } else { Color::White }))
        }
        None => cell_appearance(board.cell_at(coords)),
    }
}

fn digit_color(count: u8) -> Color {
    match count {
        1 => Color::Blue,
        2 => Color::Green,
        3 => Color::Red,
        4 => Color::Magenta,
        5 => Color::DarkRed,
        6 => Color::Cyan,
        7 => Color::White,
        _ => Color::Grey,
    }
}
