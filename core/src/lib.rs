use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use minefield::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod minefield;
mod types;

/// Construction-time board parameters. The mine count must stay strictly
/// below the cell count so rejection sampling always terminates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::EmptyBoard);
        }
        if mines >= mult(size.0, size.1) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Outcome of a flag command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Outcome of a reveal command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_requires_a_safe_cell() {
        assert_eq!(
            GameConfig::new((4, 4), 16).unwrap_err(),
            GameError::TooManyMines
        );
        assert_eq!(
            GameConfig::new((4, 4), 17).unwrap_err(),
            GameError::TooManyMines
        );
        let config = GameConfig::new((4, 4), 15).unwrap();
        assert_eq!(config.total_cells(), 16);
    }

    #[test]
    fn config_rejects_empty_boards() {
        assert_eq!(GameConfig::new((0, 5), 1).unwrap_err(), GameError::EmptyBoard);
        assert_eq!(GameConfig::new((5, 0), 1).unwrap_err(), GameError::EmptyBoard);
    }
}
