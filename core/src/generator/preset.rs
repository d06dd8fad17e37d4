use alloc::vec::Vec;
use ndarray::Array2;

use super::*;

/// Places mines exactly where it is told to, used to replay a known layout.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetGenerator {
    mines: Vec<Position>,
}

impl PresetGenerator {
    pub fn new(mines: impl IntoIterator<Item = Position>) -> Self {
        Self {
            mines: mines.into_iter().collect(),
        }
    }
}

impl BoardGenerator for PresetGenerator {
    fn generate(self, config: FieldConfig) -> Board {
        let mut mine_mask: Array2<bool> =
            Array2::default([usize::from(config.rows()), usize::from(config.columns())]);
        for position in self.mines {
            if config.contains(position) {
                mine_mask[position.to_nd_index()] = true;
            } else {
                log::warn!("Preset mine at {:?} is outside the field, skipped", position);
            }
        }

        let board = Board::build(&mine_mask);
        if board.mine_count() != config.mines() {
            log::warn!(
                "Preset mine count mismatch, actual: {}, configured: {}",
                board.mine_count(),
                config.mines()
            );
        }
        board
    }
}
