//! Random tiles tinted toward each cell's color

use crate::compose::{CellFill, GridComposer, GridInput, paint_grid};
use crate::io::error::{MosaicError, Result};
use image::RgbaImage;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Places a randomly chosen tile in every cell and tints it
///
/// The tile choice ignores color; the tint pulls each tile toward the cell's
/// average color so the master image still shows through. The same seed
/// always gives the same output.
#[derive(Clone, Copy, Debug)]
pub struct RandomComposer {
    seed: u64,
    tint_strength: u8,
}

impl RandomComposer {
    /// Create a composer with a fixed seed and tint strength
    pub const fn new(seed: u64, tint_strength: u8) -> Self {
        Self {
            seed,
            tint_strength,
        }
    }
}

impl GridComposer for RandomComposer {
    fn compose(&self, input: &GridInput<'_>) -> Result<RgbaImage> {
        let tiles = input.pool.tiles();
        if tiles.is_empty() {
            return Err(MosaicError::InsufficientTiles {
                registered: 0,
                loaded: 0,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut fills = Vec::with_capacity(input.layout.cell_count());
        for color in input.averages.iter() {
            let choice = rng.random_range(0..tiles.len());
            if let Some(tile) = tiles.get(choice) {
                fills.push(CellFill::Tinted {
                    tile: &tile.image,
                    target: *color,
                    strength: self.tint_strength,
                });
            }
        }

        Ok(paint_grid(input.layout, &fills, input.progress))
    }
}
