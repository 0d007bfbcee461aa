//! Nearest-color tile selection
//!
//! Tiles are compared by the Euclidean distance between their average color
//! and a cell's average color. Ties go to the tile that comes first in pool
//! order.

use crate::algorithm::bitset::CandidateSet;
use crate::io::configuration::ExhaustionPolicy;
use crate::io::error::{MosaicError, Result};
use crate::math::color::distance_squared;
use image::Rgb;

/// Whether a tile may be assigned to more than one cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchPolicy {
    /// Every cell matches against the whole pool
    #[default]
    AllowRepeats,
    /// A tile leaves the candidate set once assigned
    Unique,
}

/// Position of the color closest to `target`, first one on ties
pub fn nearest(target: Rgb<u8>, colors: &[Rgb<u8>]) -> Option<usize> {
    colors
        .iter()
        .enumerate()
        .min_by_key(|&(_, &color)| distance_squared(target, color))
        .map(|(index, _)| index)
}

/// Like [`nearest`], restricted to positions still in `candidates`
pub fn nearest_candidate(
    target: Rgb<u8>,
    colors: &[Rgb<u8>],
    candidates: &CandidateSet,
) -> Option<usize> {
    candidates
        .iter()
        .filter_map(|index| colors.get(index).map(|&color| (index, color)))
        .min_by_key(|&(_, color)| distance_squared(target, color))
        .map(|(index, _)| index)
}

/// Stateful matcher that assigns pool tiles to cells in scan order
///
/// Under [`MatchPolicy::Unique`] the matcher remembers which tiles were
/// handed out. When none are left, [`ExhaustionPolicy`] decides between
/// starting over with the full pool and failing the run.
#[derive(Clone, Debug)]
pub struct TileMatcher {
    averages: Vec<Rgb<u8>>,
    policy: MatchPolicy,
    exhaustion: ExhaustionPolicy,
    candidates: CandidateSet,
    assigned: usize,
    cells: usize,
}

impl TileMatcher {
    /// Prepare a matcher for a grid of `cells` cells
    pub fn new(
        averages: Vec<Rgb<u8>>,
        policy: MatchPolicy,
        exhaustion: ExhaustionPolicy,
        cells: usize,
    ) -> Self {
        let candidates = CandidateSet::full(averages.len());
        Self {
            averages,
            policy,
            exhaustion,
            candidates,
            assigned: 0,
            cells,
        }
    }

    /// Choose the pool tile for the next cell
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pool is empty
    /// - The unique policy ran out of tiles and exhaustion is set to fail
    pub fn select(&mut self, target: Rgb<u8>) -> Result<usize> {
        if self.averages.is_empty() {
            return Err(MosaicError::InsufficientTiles {
                registered: 0,
                loaded: 0,
            });
        }

        let chosen = match self.policy {
            MatchPolicy::AllowRepeats => nearest(target, &self.averages),
            MatchPolicy::Unique => {
                if self.candidates.is_empty() {
                    match self.exhaustion {
                        ExhaustionPolicy::Repeat => self.candidates.refill(),
                        ExhaustionPolicy::Fail => {
                            return Err(MosaicError::TilePoolExhausted {
                                filled: self.assigned,
                                cells: self.cells,
                            });
                        }
                    }
                }
                let chosen = nearest_candidate(target, &self.averages, &self.candidates);
                if let Some(index) = chosen {
                    self.candidates.remove(index);
                }
                chosen
            }
        };

        let index = chosen.ok_or(MosaicError::TilePoolExhausted {
            filled: self.assigned,
            cells: self.cells,
        })?;
        self.assigned += 1;
        Ok(index)
    }

    /// Number of cells assigned so far
    pub const fn assigned(&self) -> usize {
        self.assigned
    }

    /// Tiles still available under the unique policy
    pub fn remaining(&self) -> usize {
        self.candidates.count()
    }
}
