use thiserror::Error;

use crate::GamePhase;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board needs at least one row and one column")]
    InvalidDimensions,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Board does not match the field configuration")]
    LayoutMismatch,
    #[error("Cell states contradict the mine layout")]
    InvalidCells,
    #[error("Action not allowed while the game is {phase:?}")]
    InvalidAction { phase: GamePhase },
}

pub type Result<T> = core::result::Result<T, GameError>;
