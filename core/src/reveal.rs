use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// How a flood treats flagged cells it runs into.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagPolicy {
    /// Flagged cells are swept up and revealed like any other cell, losing their flag.
    #[default]
    Sweep,
    /// Flagged cells stop the flood and keep their flag.
    Block,
}

impl Board {
    /// Reveals `origin` and, when it has no mined neighbours, every cell connected to it through zero cells.
    ///
    /// Returns how many cells became revealed.
    pub fn flood_reveal(&mut self, origin: Position) -> CellCount {
        self.flood_reveal_with(origin, FlagPolicy::Sweep)
    }

    pub fn flood_reveal_with(&mut self, origin: Position, policy: FlagPolicy) -> CellCount {
        if !self.contains(origin) {
            return 0;
        }

        let mut revealed: CellCount = 0;
        if self.reveal_cell(origin) {
            revealed += 1;
        }

        // an already revealed origin still spreads, a flood never re-enters revealed cells
        let mut to_visit = Vec::new();
        self.push_spread(origin, policy, &mut to_visit);

        while let Some(position) = to_visit.pop() {
            if !self.reveal_cell(position) {
                continue;
            }
            revealed += 1;
            log::trace!(
                "Flood revealed cell at {:?}, mined neighbours: {}",
                position,
                self[position].mined_neighbours
            );
            self.push_spread(position, policy, &mut to_visit);
        }

        revealed
    }

    /// Whether every safe cell of a field with `config` is revealed.
    pub fn is_won(&self, config: &FieldConfig) -> bool {
        self.revealed_count() == config.safe_cells()
    }

    /// Whether `position` is revealed and has exactly as many flagged neighbours as mined ones.
    pub fn can_chord_reveal(&self, position: Position) -> bool {
        match self.get(position) {
            Some(cell) if cell.revealed => cell.mined_neighbours == self.flagged_neighbours(position),
            _ => false,
        }
    }

    /// Reveals all unflagged neighbours of a satisfied revealed cell. Anything else is a no-op.
    ///
    /// A mined neighbour left unflagged is revealed on its own and reported as [`RevealOutcome::HitMine`].
    pub fn chord_reveal(&mut self, position: Position) -> RevealOutcome {
        self.chord_reveal_with(position, FlagPolicy::Sweep)
    }

    pub fn chord_reveal_with(&mut self, position: Position, policy: FlagPolicy) -> RevealOutcome {
        if !self.can_chord_reveal(position) {
            return RevealOutcome::NoChange;
        }

        let mut outcome = RevealOutcome::NoChange;
        for neighbour in self.neighbours(position) {
            let cell = self[neighbour];
            if cell.flagged {
                continue;
            }

            if cell.mined {
                if self.reveal_cell(neighbour) {
                    log::debug!("Chord at {:?} revealed mine at {:?}", position, neighbour);
                    outcome = outcome | RevealOutcome::HitMine;
                }
            } else if self.flood_reveal_with(neighbour, policy) > 0 {
                outcome = outcome | RevealOutcome::Revealed;
            }
        }
        outcome
    }

    /// Flags or unflags a cell that is not revealed.
    pub fn toggle_flag(&mut self, position: Position) -> MarkOutcome {
        if !self.contains(position) {
            return MarkOutcome::NoChange;
        }

        let cell = self.cell_mut(position);
        if cell.revealed {
            MarkOutcome::NoChange
        } else {
            cell.flagged = !cell.flagged;
            MarkOutcome::Changed
        }
    }

    /// Marks a single cell revealed without propagating, returns whether it was hidden.
    pub(crate) fn reveal_cell(&mut self, position: Position) -> bool {
        let cell = self.cell_mut(position);
        if cell.revealed {
            return false;
        }
        cell.revealed = true;
        cell.flagged = false;
        true
    }

    fn push_spread(&self, position: Position, policy: FlagPolicy, to_visit: &mut Vec<Position>) {
        let cell = self[position];
        if cell.mined || cell.mined_neighbours != 0 {
            return;
        }

        to_visit.extend(self.neighbours(position).filter(|&pos| {
            let neighbour = self[pos];
            !neighbour.revealed && (policy == FlagPolicy::Sweep || !neighbour.flagged)
        }));
    }
}
