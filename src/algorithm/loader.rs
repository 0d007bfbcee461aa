//! Concurrent tile loading
//!
//! Every registered tile is resolved, decoded, fitted to the cell size and
//! averaged on the worker pool. Results are collected in library order, so
//! the pool order never depends on which worker finished first.

use crate::algorithm::averaging::average_image;
use crate::algorithm::lifecycle::CancellationToken;
use crate::io::error::{MosaicError, Result};
use crate::io::image::read_stream;
use crate::io::progress::PhaseProgress;
use crate::io::storage::StorageAccess;
use crate::spatial::{LoadedTile, Size, Tile, TilePool};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Scale and center-crop an image so it covers exactly `cell`
pub fn fit_to_cell(image: &DynamicImage, cell: Size) -> RgbaImage {
    image
        .resize_to_fill(cell.width, cell.height, FilterType::Triangle)
        .into_rgba8()
}

/// Turns tile registrations into cell-sized buffers
pub struct TileLoader<'a> {
    storage: &'a dyn StorageAccess,
    cell: Size,
}

impl<'a> TileLoader<'a> {
    /// Create a loader resolving handles through `storage`
    pub const fn new(storage: &'a dyn StorageAccess, cell: Size) -> Self {
        Self { storage, cell }
    }

    /// Load a single tile
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The handle no longer resolves or its stream cannot be read
    /// - The bytes cannot be decoded as an image
    pub fn load(&self, library_index: usize, tile: &Tile) -> Result<LoadedTile> {
        let stream = self.storage.open(tile.handle())?;
        let bytes = read_stream(stream).map_err(|e| MosaicError::StorageAccessRevoked {
            handle: tile.handle().to_string(),
            source: Some(e),
        })?;

        let decoded =
            image::load_from_memory(&bytes).map_err(|e| MosaicError::TileDecodeFailure {
                name: tile.name().to_string(),
                source: e,
            })?;
        drop(bytes);

        let image = fit_to_cell(&decoded, self.cell);
        drop(decoded);
        let average = average_image(&image);

        Ok(LoadedTile {
            name: tile.name().to_string(),
            library_index,
            image,
            average,
        })
    }

    /// Load every tile on the current worker pool
    ///
    /// Tiles that fail are logged and left out. One progress increment is
    /// reported per tile, loaded or dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No tile could be loaded
    /// - Cancellation was requested while tiles were loading
    pub fn load_all(
        &self,
        tiles: &[Tile],
        progress: &PhaseProgress<'_>,
        cancel: &CancellationToken,
    ) -> Result<TilePool> {
        let results: Vec<Option<LoadedTile>> = tiles
            .par_iter()
            .enumerate()
            .map(|(index, tile)| {
                if cancel.is_cancelled() {
                    return None;
                }
                let loaded = match self.load(index, tile) {
                    Ok(loaded) => Some(loaded),
                    Err(error) => {
                        warn!(
                            tile = tile.name(),
                            handle = %tile.handle(),
                            key = error.message_key(),
                            %error,
                            "dropping tile"
                        );
                        None
                    }
                };
                progress.increment();
                loaded
            })
            .collect();

        cancel.check("loading tiles")?;

        let loaded: Vec<LoadedTile> = results.into_iter().flatten().collect();
        let dropped = tiles.len() - loaded.len();
        debug!(loaded = loaded.len(), dropped, "tile loading finished");

        if loaded.is_empty() {
            return Err(MosaicError::InsufficientTiles {
                registered: tiles.len(),
                loaded: 0,
            });
        }
        Ok(TilePool::new(loaded))
    }
}
