use std::collections::{HashSet, VecDeque};
use std::num::Saturating;
use std::time::Instant;

use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::cell::{CellState, LossMarker};
use crate::error::{GameError, Result};
use crate::minefield::Minefield;
use crate::types::{nd, CellCount, Coord2, Direction};
use crate::{GameConfig, MarkOutcome, RevealOutcome};

/// Valid transitions are `Playing -> Won` and `Playing -> Lost`; a finished
/// game accepts no further transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Playing
    }
}

/// Authoritative game state: mine layout, the player-visible cell plane,
/// cursor, and phase. Owned by the game-loop driver and mutated one command
/// at a time.
#[derive(Clone, Debug)]
pub struct Board {
    config: GameConfig,
    minefield: Minefield,
    cells: Array2<CellState>,
    cursor: Coord2,
    first_move: bool,
    phase: GamePhase,
    flagged_count: Saturating<CellCount>,
    triggered_mine: Option<Coord2>,
    rng: SmallRng,
    started_at: Instant,
    ended_at: Option<Instant>,
}

impl Board {
    /// Creates a board with a freshly generated minefield. The seed drives
    /// both the initial placement and any later first-move relocation.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let minefield = Minefield::generate(config, &mut rng);
        Self::from_parts(config, minefield, rng)
    }

    /// Creates a board over a prepared minefield; fixture entry point.
    pub fn with_minefield(minefield: Minefield, seed: u64) -> Self {
        let config = GameConfig::new_unchecked(minefield.size(), minefield.mine_count());
        Self::from_parts(config, minefield, SmallRng::seed_from_u64(seed))
    }

    fn from_parts(config: GameConfig, minefield: Minefield, rng: SmallRng) -> Self {
        let size = minefield.size();
        Self {
            config,
            minefield,
            cells: Array2::default(nd(size)),
            cursor: (size.0 / 2, size.1 / 2),
            first_move: true,
            phase: GamePhase::Playing,
            flagged_count: Saturating(0),
            triggered_mine: None,
            rng,
            started_at: Instant::now(),
            ended_at: None,
        }
    }

    /// Discards the current game and starts a fresh one on the same
    /// configuration: new mines, cleared planes, re-centered cursor.
    pub fn start_new_game(&mut self) {
        self.minefield = Minefield::generate(self.config, &mut self.rng);
        let size = self.minefield.size();
        self.cells = Array2::default(nd(size));
        self.cursor = (size.0 / 2, size.1 / 2);
        self.first_move = true;
        self.phase = GamePhase::Playing;
        self.flagged_count = Saturating(0);
        self.triggered_mine = None;
        self.started_at = Instant::now();
        self.ended_at = None;
        log::debug!("started a new game");
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.minefield.size()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn cursor(&self) -> Coord2 {
        self.cursor
    }

    pub fn total_mines(&self) -> CellCount {
        self.minefield.mine_count()
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.cells[nd(coords)]
    }

    /// Only meaningful for end-of-game display and debugging; during play the
    /// presentation layer has no business reading the mine mask.
    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.minefield.contains_mine(coords)
    }

    /// Live adjacent-mine count, independent of visibility.
    pub fn neighbor_mine_count(&self, coords: Coord2) -> u8 {
        self.minefield.adjacent_mine_count(coords)
    }

    /// The mine the player detonated, recorded on loss.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn count_flags(&self) -> CellCount {
        self.flagged_count.0
    }

    /// May go negative when the player over-flags; displayed as-is.
    pub fn remaining_mines(&self) -> isize {
        (self.minefield.mine_count() as isize) - (self.flagged_count.0 as isize)
    }

    /// Seconds of play, frozen once the game ends.
    pub fn elapsed_secs(&self) -> u64 {
        self.ended_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.started_at)
            .as_secs()
    }

    /// Moves the cursor one cell, clamped to the board edges; ignored once
    /// the game has finished.
    pub fn move_cursor(&mut self, direction: Direction) {
        if self.phase.is_finished() {
            return;
        }
        let (dx, dy) = direction.delta();
        let (width, height) = self.size();
        let x = self.cursor.0.saturating_add_signed(dx).min(width - 1);
        let y = self.cursor.1.saturating_add_signed(dy).min(height - 1);
        self.cursor = (x, y);
    }

    /// Player-facing flag toggle; contract violations become silent no-ops.
    pub fn toggle_flag_at_cursor(&mut self) -> MarkOutcome {
        self.toggle_flag(self.cursor).unwrap_or(MarkOutcome::NoChange)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.minefield.validate_coords(coords)?;
        self.check_playing()?;

        Ok(match self.cells[nd(coords)] {
            CellState::Hidden => {
                self.cells[nd(coords)] = CellState::Flagged;
                self.flagged_count += 1;
                MarkOutcome::Changed
            }
            CellState::Flagged => {
                self.cells[nd(coords)] = CellState::Hidden;
                self.flagged_count -= 1;
                MarkOutcome::Changed
            }
            CellState::Revealed(_) => MarkOutcome::NoChange,
        })
    }

    /// Player-facing reveal; contract violations become silent no-ops.
    pub fn reveal_at_cursor(&mut self) -> RevealOutcome {
        self.reveal(self.cursor).unwrap_or(RevealOutcome::NoChange)
    }

    /// Reveals a hidden cell, relocating a first-move mine, cascading through
    /// zero-count regions, and settling the game phase.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.minefield.validate_coords(coords)?;
        self.check_playing()?;

        if !matches!(self.cells[nd(coords)], CellState::Hidden) {
            // flagged cells block the reveal, revealed cells have nothing left
            return Ok(RevealOutcome::NoChange);
        }

        if self.minefield.contains_mine(coords) {
            if self.first_move {
                self.minefield.relocate_mine(coords, &mut self.rng);
            } else {
                self.triggered_mine = Some(coords);
                self.end_game(GamePhase::Lost);
                return Ok(RevealOutcome::HitMine);
            }
        }

        self.first_move = false;
        self.flood_reveal(coords);

        if self.score() == 0 {
            self.end_game(GamePhase::Won);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Uncovers `start` and, when its count is zero, floods the whole
    /// zero-count region and its numbered border. The worklist bounds memory
    /// by the board size; flagged and revealed cells block the cascade.
    fn flood_reveal(&mut self, start: Coord2) {
        self.uncover(start);

        if self.minefield.adjacent_mine_count(start) != 0 {
            return;
        }

        let mut visited = HashSet::from([start]);
        let mut to_visit: VecDeque<_> = self.minefield.iter_neighbors(start).collect();

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }
            if !matches!(self.cells[nd(coords)], CellState::Hidden) {
                continue;
            }

            self.uncover(coords);

            if self.minefield.adjacent_mine_count(coords) == 0 {
                to_visit.extend(
                    self.minefield
                        .iter_neighbors(coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn uncover(&mut self, coords: Coord2) {
        debug_assert!(matches!(self.cells[nd(coords)], CellState::Hidden));
        debug_assert!(!self.minefield.contains_mine(coords));
        let count = self.minefield.adjacent_mine_count(coords);
        self.cells[nd(coords)] = CellState::Revealed(count);
        log::trace!("revealed {:?} with count {}", coords, count);
    }

    /// Number of unrevealed zero-count regions plus individually unrevealed
    /// numbered safe cells; reaches zero exactly when every safe cell is
    /// revealed. Recomputed in full on each call.
    pub fn score(&self) -> CellCount {
        let mut marks = self.cells.map(|cell| cell.is_revealed());
        let mut total = 0;

        for coords in self.iter_coords() {
            if self.minefield.contains_mine(coords)
                || self.minefield.adjacent_mine_count(coords) != 0
                || marks[nd(coords)]
            {
                continue;
            }
            self.mark_region(&mut marks, coords);
            total += 1;
        }

        for coords in self.iter_coords() {
            if !marks[nd(coords)] && !self.minefield.contains_mine(coords) {
                total += 1;
            }
        }
        total
    }

    /// Marks the zero-count region reachable from `start` plus its numbered
    /// border, stopping at already-marked cells.
    fn mark_region(&self, marks: &mut Array2<bool>, start: Coord2) {
        let mut to_visit = vec![start];
        while let Some(coords) = to_visit.pop() {
            if marks[nd(coords)] {
                continue;
            }
            marks[nd(coords)] = true;
            if self.minefield.adjacent_mine_count(coords) == 0 {
                to_visit.extend(self.minefield.iter_neighbors(coords));
            }
        }
    }

    /// Read-only end-of-loss classification; `None` for cells that are
    /// neither flagged nor mined.
    pub fn loss_marker_at(&self, coords: Coord2) -> Option<LossMarker> {
        let flagged = self.cells[nd(coords)].is_flagged();
        let mined = self.minefield.contains_mine(coords);
        match (flagged, mined) {
            (true, true) => Some(LossMarker::CorrectFlag),
            (true, false) => Some(LossMarker::IncorrectFlag),
            (false, true) => Some(LossMarker::MissedMine),
            (false, false) => None,
        }
    }

    /// Mines the player had correctly flagged, shown in the loss summary.
    pub fn correctly_flagged_mines(&self) -> CellCount {
        self.iter_coords()
            .filter(|&coords| {
                self.cells[nd(coords)].is_flagged() && self.minefield.contains_mine(coords)
            })
            .count()
            .try_into()
            .unwrap()
    }

    fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (width, height) = self.size();
        (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
    }

    fn end_game(&mut self, phase: GamePhase) {
        if self.phase.is_finished() {
            return;
        }
        debug_assert!(phase.is_finished());
        self.phase = phase;
        self.ended_at = Some(Instant::now());
        log::debug!("game over: {:?}", phase);
    }

    fn check_playing(&self) -> Result<()> {
        if self.phase.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
