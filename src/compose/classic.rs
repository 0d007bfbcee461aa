//! Nearest-color tiling

use crate::algorithm::matching::{MatchPolicy, TileMatcher};
use crate::compose::{CellFill, GridComposer, GridInput, paint_grid};
use crate::io::configuration::ExhaustionPolicy;
use crate::io::error::{MosaicError, Result};
use image::RgbaImage;
use tracing::debug;

/// Fills each cell with the pool tile whose average color is closest
///
/// Cells are matched left to right, top to bottom. With
/// [`MatchPolicy::Unique`] each tile is handed out at most once until the
/// pool runs dry, after which `exhaustion` applies.
#[derive(Clone, Copy, Debug)]
pub struct ClassicComposer {
    policy: MatchPolicy,
    exhaustion: ExhaustionPolicy,
}

impl ClassicComposer {
    /// Create a composer with the given reuse and exhaustion policies
    pub const fn new(policy: MatchPolicy, exhaustion: ExhaustionPolicy) -> Self {
        Self { policy, exhaustion }
    }

    /// Pool position chosen for every cell, in scan order
    ///
    /// # Errors
    ///
    /// Returns an error if the pool is empty, or the unique policy is
    /// exhausted and configured to fail
    pub fn assign(&self, input: &GridInput<'_>) -> Result<Vec<usize>> {
        let cells = input.layout.cell_count();
        let mut matcher = TileMatcher::new(
            input.pool.averages(),
            self.policy,
            self.exhaustion,
            cells,
        );

        let mut assignment = Vec::with_capacity(cells);
        for (column, row) in input.layout.cells() {
            let target = input
                .averages
                .get(column, row)
                .ok_or_else(|| MosaicError::InvalidParameter {
                    parameter: "average_map",
                    value: format!("{}x{}", input.averages.columns(), input.averages.rows()),
                    reason: "does not match the grid layout".to_string(),
                })?;
            assignment.push(matcher.select(target)?);
        }

        debug!(
            cells,
            assigned = matcher.assigned(),
            pool = input.pool.len(),
            remaining = matcher.remaining(),
            "tiles assigned"
        );
        Ok(assignment)
    }
}

impl GridComposer for ClassicComposer {
    fn compose(&self, input: &GridInput<'_>) -> Result<RgbaImage> {
        let assignment = self.assign(input)?;
        let fills = assignment
            .iter()
            .map(|&index| {
                input
                    .pool
                    .get(index)
                    .map(|tile| CellFill::Tile(&tile.image))
                    .ok_or(MosaicError::InsufficientTiles {
                        registered: input.pool.len(),
                        loaded: input.pool.len(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(paint_grid(input.layout, &fills, input.progress))
    }
}
