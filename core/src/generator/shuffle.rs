use alloc::vec::Vec;
use ndarray::Array2;
use rand::Rng;

use super::*;

/// Lays out `config.mines()` mines uniformly at random, never on `safe`.
///
/// All flat cell indices are shuffled with Fisher-Yates and the first `mines` of them become mines. If `safe` landed
/// among those, it trades places with the first index after the cut, so only the cell itself is guaranteed safe, not
/// its neighbours.
pub fn generate<R: Rng>(config: FieldConfig, safe: Position, rng: &mut R) -> Board {
    let total_cells = config.total_cells();
    let mine_cut = usize::from(config.mines());

    let mut flat_positions: Vec<CellCount> = (0..total_cells).collect();
    for i in (1..flat_positions.len()).rev() {
        let j = rng.random_range(0..=i);
        flat_positions.swap(i, j);
    }

    match config.flat_index(safe) {
        Some(flat_safe) => {
            if let Some(slot) = flat_positions[..mine_cut]
                .iter()
                .position(|&flat| flat == flat_safe)
            {
                log::trace!("Moving mine off safe cell {:?}", safe);
                flat_positions.swap(slot, mine_cut);
            }
        }
        None => log::warn!(
            "Safe cell {:?} is outside the {:?} field, no cell is kept safe",
            safe,
            config.size()
        ),
    }

    let mut mine_mask: Array2<bool> =
        Array2::default([usize::from(config.rows()), usize::from(config.columns())]);
    for &flat in &flat_positions[..mine_cut] {
        mine_mask[config.position_at(flat).to_nd_index()] = true;
    }

    log::debug!(
        "Generated {}x{} board with {} mines, safe cell {:?}",
        config.rows(),
        config.columns(),
        config.mines(),
        safe
    );
    Board::build(&mine_mask)
}

/// Seeded random generation around a safe starting cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShuffleGenerator {
    seed: u64,
    safe: Position,
}

impl ShuffleGenerator {
    pub fn new(seed: u64, safe: Position) -> Self {
        Self { seed, safe }
    }
}

impl BoardGenerator for ShuffleGenerator {
    fn generate(self, config: FieldConfig) -> Board {
        use rand::SeedableRng;
        use rand::rngs::SmallRng;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        generate(config, self.safe, &mut rng)
    }
}
