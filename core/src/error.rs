use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("coordinates outside the board")]
    OutOfBounds,
    #[error("mine count must be smaller than the number of cells")]
    TooManyMines,
    #[error("board must have at least one cell")]
    EmptyBoard,
    #[error("game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = std::result::Result<T, GameError>;
