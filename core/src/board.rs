use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// A `rows × columns` grid of cells, stored row-major.
///
/// The board is the only owner of its cells; every mutation goes through `&mut Board`. Its size is the shape of the
/// cell grid. Deserializing fails unless the neighbour counts match the mines and no cell is both revealed and flagged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    cells: Array2<Cell>,
    #[serde(skip_serializing)]
    mine_count: CellCount,
}

#[derive(Deserialize)]
struct BoardRepr {
    cells: Array2<Cell>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = GameError;

    fn try_from(repr: BoardRepr) -> Result<Self> {
        let (rows, columns) = repr.cells.dim();
        if rows == 0 || columns == 0 || Coord::try_from(rows).is_err() || Coord::try_from(columns).is_err() {
            return Err(GameError::InvalidDimensions);
        }

        let layout = Self::build(&repr.cells.map(|cell| cell.mined));
        let consistent = repr.cells.iter().zip(layout.cells.iter()).all(|(cell, laid_out)| {
            cell.mined_neighbours == laid_out.mined_neighbours && !(cell.revealed && cell.flagged)
        });
        if !consistent {
            return Err(GameError::InvalidCells);
        }

        Ok(Self {
            cells: repr.cells,
            mine_count: layout.mine_count,
        })
    }
}

impl Board {
    /// Builds the board and derives every neighbour count from `mine_mask`, whose dimensions must fit in [`Coord`].
    pub(crate) fn build(mine_mask: &Array2<bool>) -> Self {
        let (rows, columns) = mine_mask.dim();
        let bounds = (rows as Coord, columns as Coord);
        let cells = Array2::from_shape_fn(mine_mask.raw_dim(), |(row, column)| {
            let position = Position::new(row as Coord, column as Coord);
            let mined_neighbours = NeighbourIter::new(position, bounds)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count() as u8;
            Cell::new(mine_mask[[row, column]], mined_neighbours)
        });
        let mine_count = mine_mask.iter().filter(|&&mined| mined).count() as CellCount;

        Self { cells, mine_count }
    }

    /// The 1×1 mine-free stand-in shown before the first click generates the real board.
    pub fn placeholder() -> Self {
        Self::build(&Array2::default([1, 1]))
    }

    /// Lays mines at exactly the given positions, without any shuffling.
    pub fn from_mines(rows: Coord, columns: Coord, mines: &[Position]) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(GameError::InvalidDimensions);
        }

        let mut mine_mask: Array2<bool> = Array2::default([usize::from(rows), usize::from(columns)]);
        for &position in mines {
            if position.row >= rows || position.column >= columns {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[position.to_nd_index()] = true;
        }

        Ok(Self::build(&mine_mask))
    }

    pub fn rows(&self) -> Coord {
        self.cells.nrows() as Coord
    }

    pub fn columns(&self) -> Coord {
        self.cells.ncols() as Coord
    }

    pub fn size(&self) -> (Coord, Coord) {
        (self.rows(), self.columns())
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows() && position.column < self.columns()
    }

    pub fn get(&self, position: Position) -> Option<&Cell> {
        self.cells.get(position.to_nd_index())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        mult(self.rows(), self.columns()) - self.mine_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.revealed).count() as CellCount
    }

    pub fn flagged_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.flagged).count() as CellCount
    }

    pub fn neighbours(&self, position: Position) -> NeighbourIter {
        NeighbourIter::new(position, self.size())
    }

    pub fn flagged_neighbours(&self, position: Position) -> u8 {
        self.neighbours(position)
            .filter(|&pos| self[pos].flagged)
            .count() as u8
    }

    /// Iterates all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells
            .indexed_iter()
            .map(|((row, column), cell)| (Position::new(row as Coord, column as Coord), cell))
    }

    pub(crate) fn cell_mut(&mut self, position: Position) -> &mut Cell {
        &mut self.cells[position.to_nd_index()]
    }
}

impl Index<Position> for Board {
    type Output = Cell;

    fn index(&self, position: Position) -> &Self::Output {
        &self.cells[position.to_nd_index()]
    }
}
