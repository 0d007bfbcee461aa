//! Spatial data structures
//!
//! This module contains:
//! - Grid geometry derived from output and tile sizes
//! - The per-cell average color map
//! - Tile registrations and the loaded tile pool

/// Grid geometry and the average color map
pub mod grid;
/// Tile registrations and loaded tiles
pub mod tiles;

pub use grid::{AverageColorMap, CellRect, GridLayout, Size};
pub use tiles::{LoadedTile, Tile, TileLibrary, TilePool};
