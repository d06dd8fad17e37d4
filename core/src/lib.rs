#![no_std]

extern crate alloc;

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use reveal::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod generator;
mod reveal;
mod session;
mod types;

/// Dimensions and mine count of a field.
///
/// Always holds at least one cell and strictly fewer mines than cells, so a safe starting cell exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldConfigRepr")]
pub struct FieldConfig {
    rows: Coord,
    columns: Coord,
    mines: CellCount,
}

#[derive(Deserialize)]
struct FieldConfigRepr {
    rows: Coord,
    columns: Coord,
    mines: CellCount,
}

impl TryFrom<FieldConfigRepr> for FieldConfig {
    type Error = GameError;

    fn try_from(repr: FieldConfigRepr) -> Result<Self> {
        Self::new(repr.rows, repr.columns, repr.mines)
    }
}

impl FieldConfig {
    /// 9×9 with 10 mines.
    pub const BEGINNER: Self = Self::new_unchecked(9, 9, 10);

    pub(crate) const fn new_unchecked(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    pub fn new(rows: Coord, columns: Coord, mines: CellCount) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(GameError::InvalidDimensions);
        }
        if mines >= mult(rows, columns) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(rows, columns, mines))
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn columns(&self) -> Coord {
        self.columns
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn size(&self) -> (Coord, Coord) {
        (self.rows, self.columns)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }

    /// Number of cells that must be revealed to win.
    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub const fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.column < self.columns
    }

    pub fn validate(&self, position: Position) -> Result<Position> {
        if self.contains(position) {
            Ok(position)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Row-major flat index, `row * columns + column`.
    pub fn flat_index(&self, position: Position) -> Option<CellCount> {
        self.contains(position).then(|| {
            CellCount::from(position.row) * CellCount::from(self.columns)
                + CellCount::from(position.column)
        })
    }

    /// Inverse of [`FieldConfig::flat_index`]. `flat` must be below `total_cells()`.
    pub fn position_at(&self, flat: CellCount) -> Position {
        let columns = CellCount::from(self.columns);
        Position::new((flat / columns) as Coord, (flat % columns) as Coord)
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::BEGINNER
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Merges outcomes of multi-cell reveals, the most severe one wins.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
