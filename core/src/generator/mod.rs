use crate::*;
pub use preset::*;
pub use shuffle::*;

mod preset;
mod shuffle;

/// A strategy producing a fresh board for a field configuration.
pub trait BoardGenerator {
    fn generate(self, config: FieldConfig) -> Board;
}
