use serde::{Deserialize, Serialize};

/// Player-visible state of a single board cell.
///
/// A cell is exactly one of hidden, flagged, or revealed, so a revealed cell
/// can never carry a flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    /// Uncovered, carrying the adjacent-mine count shown to the player.
    Revealed(u8),
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// How a cell is classified on the end-of-game screen after a loss.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossMarker {
    /// Flagged and mined.
    CorrectFlag,
    /// Flagged but not mined.
    IncorrectFlag,
    /// Mined and never flagged.
    MissedMine,
}
