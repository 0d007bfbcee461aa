//! Mosaic composers
//!
//! A [`MosaicType`] picks exactly one composer per generation. The grid-based
//! composers share [`GridComposer`] and paint through [`paint_grid`]; text art
//! bypasses the grid and the tile pool entirely.

/// Master image to glyphs to image
pub mod ascii;
/// Nearest-color tiling
pub mod classic;
/// Fixed bitmap font used for text art
pub mod glyphs;
/// Flat color blocks
pub mod plain;
/// Random tiles tinted toward the cell color
pub mod random;

use crate::algorithm::matching::MatchPolicy;
use crate::io::configuration::MosaicConfig;
use crate::io::error::Result;
use crate::io::progress::PhaseProgress;
use crate::math::color::tint;
use crate::spatial::{AverageColorMap, GridLayout, TilePool};
use image::{Rgb, Rgba, RgbaImage};
use rayon::prelude::*;

pub use ascii::{AsciiArt, AsciiArtComposer};
pub use classic::ClassicComposer;
pub use plain::PlainColorComposer;
pub use random::RandomComposer;

/// Kind of output a generation produces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MosaicType {
    /// Each cell is a solid block of its average color
    PlainColor,
    /// Each cell receives the pool tile closest to its average color
    Classic(MatchPolicy),
    /// Each cell receives a random pool tile tinted toward its average color
    Random,
    /// The master image rendered as monochrome text art
    AsciiArt,
}

impl MosaicType {
    /// Whether the type needs a non-empty tile library
    pub const fn requires_tiles(self) -> bool {
        matches!(self, Self::Classic(_) | Self::Random)
    }

    /// Whether the type works on the cell grid
    pub const fn uses_grid(self) -> bool {
        !matches!(self, Self::AsciiArt)
    }

    /// Short name for logs
    pub const fn label(self) -> &'static str {
        match self {
            Self::PlainColor => "plain-color",
            Self::Classic(MatchPolicy::AllowRepeats) => "classic",
            Self::Classic(MatchPolicy::Unique) => "classic-unique",
            Self::Random => "random",
            Self::AsciiArt => "ascii-art",
        }
    }
}

/// Everything a grid composer reads
pub struct GridInput<'a> {
    /// Cell geometry
    pub layout: &'a GridLayout,
    /// Average color of each cell
    pub averages: &'a AverageColorMap,
    /// Loaded tiles; empty for plain color
    pub pool: &'a TilePool,
    /// Composition phase counter, one increment per grid row
    pub progress: &'a PhaseProgress<'a>,
}

/// A composer that fills the cell grid
pub trait GridComposer: Send + Sync {
    /// Produce the output canvas
    ///
    /// # Errors
    ///
    /// Returns an error when the composer cannot fill every cell
    fn compose(&self, input: &GridInput<'_>) -> Result<RgbaImage>;
}

/// Pick the grid composer for `mosaic_type`
///
/// Returns `None` for text art, which does not use the grid.
pub fn grid_composer(
    mosaic_type: MosaicType,
    config: &MosaicConfig,
) -> Option<Box<dyn GridComposer>> {
    match mosaic_type {
        MosaicType::PlainColor => Some(Box::new(PlainColorComposer)),
        MosaicType::Classic(policy) => {
            Some(Box::new(ClassicComposer::new(policy, config.exhaustion)))
        }
        MosaicType::Random => Some(Box::new(RandomComposer::new(
            config.seed,
            config.tint_strength,
        ))),
        MosaicType::AsciiArt => None,
    }
}

/// Content painted into one cell
#[derive(Clone, Copy, Debug)]
pub enum CellFill<'a> {
    /// Solid color
    Solid(Rgba<u8>),
    /// Tile pixels copied as-is
    Tile(&'a RgbaImage),
    /// Tile pixels blended toward a color
    Tinted {
        /// Source tile
        tile: &'a RgbaImage,
        /// Color blended in
        target: Rgb<u8>,
        /// Blend amount out of 255
        strength: u8,
    },
}

impl CellFill<'_> {
    fn paint_row(&self, dest: &mut [u8], dy: u32) {
        match *self {
            Self::Solid(color) => {
                for pixel in dest.chunks_exact_mut(4) {
                    pixel.copy_from_slice(&color.0);
                }
            }
            Self::Tile(tile) => {
                if let Some(src) = tile_row(tile, dy, dest.len()) {
                    dest.copy_from_slice(src);
                }
            }
            Self::Tinted {
                tile,
                target,
                strength,
            } => {
                if let Some(src) = tile_row(tile, dy, dest.len()) {
                    for (out, pixel) in dest.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                        let source = Rgba([
                            pixel.first().copied().unwrap_or(0),
                            pixel.get(1).copied().unwrap_or(0),
                            pixel.get(2).copied().unwrap_or(0),
                            pixel.get(3).copied().unwrap_or(255),
                        ]);
                        out.copy_from_slice(&tint(source, target, strength).0);
                    }
                }
            }
        }
    }
}

// Row `dy` of a tile, only if it is exactly as wide as the destination span
fn tile_row(tile: &RgbaImage, dy: u32, span: usize) -> Option<&[u8]> {
    let stride = tile.width() as usize * 4;
    if stride != span {
        return None;
    }
    let start = dy as usize * stride;
    tile.as_raw().get(start..start + stride)
}

/// Paint one fill per cell into a fresh output canvas
///
/// `fills` is in row-major scan order and must hold one entry per cell.
/// Pixels beyond the last whole cell stay transparent. Grid rows map to
/// disjoint horizontal bands of the canvas and are painted in parallel.
pub fn paint_grid(
    layout: &GridLayout,
    fills: &[CellFill<'_>],
    progress: &PhaseProgress<'_>,
) -> RgbaImage {
    let mut canvas = RgbaImage::new(layout.output.width, layout.output.height);
    let stride = layout.output.width as usize * 4;
    let band = stride * layout.cell.height as usize;
    let span = layout.cell.width as usize * 4;
    let columns = layout.columns as usize;

    canvas
        .par_chunks_mut(band)
        .take(layout.rows as usize)
        .enumerate()
        .for_each(|(row, pixels)| {
            let row_fills = fills.get(row * columns..(row + 1) * columns).unwrap_or(&[]);
            for (dy, line) in pixels.chunks_exact_mut(stride).enumerate() {
                for (column, fill) in row_fills.iter().enumerate() {
                    let start = column * span;
                    if let Some(dest) = line.get_mut(start..start + span) {
                        fill.paint_row(dest, dy as u32);
                    }
                }
            }
            progress.increment();
        });

    canvas
}
