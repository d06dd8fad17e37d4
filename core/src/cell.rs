use serde::{Deserialize, Serialize};

/// One square of the board.
///
/// `mined` and `mined_neighbours` are fixed when the board is generated. `revealed` and `flagged` are the
/// mutable game state and are never both set.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) mined: bool,
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
    pub(crate) mined_neighbours: u8,
}

impl Cell {
    pub(crate) const fn new(mined: bool, mined_neighbours: u8) -> Self {
        Self {
            mined,
            revealed: false,
            flagged: false,
            mined_neighbours,
        }
    }

    pub const fn mined(&self) -> bool {
        self.mined
    }

    pub const fn revealed(&self) -> bool {
        self.revealed
    }

    pub const fn flagged(&self) -> bool {
        self.flagged
    }

    pub const fn mined_neighbours(&self) -> u8 {
        self.mined_neighbours
    }

    /// What the player sees while the game is running.
    pub const fn view(&self) -> CellView {
        match (self.revealed, self.mined, self.flagged) {
            (true, true, _) => CellView::Detonated,
            (true, false, _) => CellView::Revealed(self.mined_neighbours),
            (false, _, true) => CellView::Flagged,
            (false, _, false) => CellView::Hidden,
        }
    }

    /// What the player sees once the game is over: hidden mines are shown and wrong flags are marked.
    pub const fn final_view(&self) -> CellView {
        match (self.revealed, self.mined, self.flagged) {
            (true, _, _) => self.view(),
            (false, false, true) => CellView::WrongFlag,
            (false, true, true) => CellView::Flagged,
            (false, true, false) => CellView::Mine,
            (false, false, false) => CellView::Hidden,
        }
    }
}

/// Player-visible state of a cell, as drawn by a front-end.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    /// A mine that was revealed by the player.
    Detonated,
    /// A mine left hidden when the game ended.
    Mine,
    /// A flag placed on a safe cell, shown when the game ended.
    WrongFlag,
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::WrongFlag)
    }
}
