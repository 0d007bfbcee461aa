//! Registered tiles and the loaded tile pool
//!
//! A [`Tile`] in the library is only a name plus a [`SourceHandle`]; no bytes
//! are read at registration. Loading produces [`LoadedTile`]s, which live in a
//! [`TilePool`] owned by a single generation and are dropped with it.

use crate::io::storage::SourceHandle;
use image::{Rgb, RgbaImage};

/// A registered tile: display name and deferred source
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    name: String,
    handle: SourceHandle,
}

impl Tile {
    /// Create a registration entry
    pub fn new(name: impl Into<String>, handle: SourceHandle) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }

    /// Name the tile was registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source handle resolved at generation time
    pub const fn handle(&self) -> &SourceHandle {
        &self.handle
    }
}

/// Ordered collection of registered tiles
///
/// Duplicate names are allowed; lookups and removals act on the first match.
#[derive(Clone, Debug, Default)]
pub struct TileLibrary {
    tiles: Vec<Tile>,
}

impl TileLibrary {
    /// Create an empty library
    pub const fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    /// Append a tile, regardless of whether its name is already present
    pub fn register(&mut self, name: impl Into<String>, handle: SourceHandle) {
        self.tiles.push(Tile::new(name, handle));
    }

    /// Remove the first tile named `name`
    ///
    /// Returns the removed entry; absent names are a no-op.
    pub fn remove(&mut self, name: &str) -> Option<Tile> {
        let index = self.tiles.iter().position(|tile| tile.name == name)?;
        Some(self.tiles.remove(index))
    }

    /// First tile named `name`
    pub fn find(&self, name: &str) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.name == name)
    }

    /// Drop every registration
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Number of registered tiles
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether nothing is registered
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in registration order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterate over tiles in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }
}

impl<'a> IntoIterator for &'a TileLibrary {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiles.iter()
    }
}

/// A tile decoded and fitted to the cell size
#[derive(Clone, Debug)]
pub struct LoadedTile {
    /// Name the tile was registered under
    pub name: String,
    /// Position of the tile in the library at load time
    pub library_index: usize,
    /// Pixels, exactly one cell in size
    pub image: RgbaImage,
    /// Mean RGB color of `image`
    pub average: Rgb<u8>,
}

/// Tiles that survived loading, in library order
///
/// Owned by one generation; dropping the pool frees every decoded buffer.
#[derive(Debug, Default)]
pub struct TilePool {
    tiles: Vec<LoadedTile>,
}

impl TilePool {
    /// Build a pool from loaded tiles, keeping their order
    pub const fn new(tiles: Vec<LoadedTile>) -> Self {
        Self { tiles }
    }

    /// Number of usable tiles
    pub const fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile loaded
    pub const fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at pool position `index`
    pub fn get(&self, index: usize) -> Option<&LoadedTile> {
        self.tiles.get(index)
    }

    /// Tiles in pool order
    pub fn tiles(&self) -> &[LoadedTile] {
        &self.tiles
    }

    /// Average colors in pool order
    pub fn averages(&self) -> Vec<Rgb<u8>> {
        self.tiles.iter().map(|tile| tile.average).collect()
    }

    /// Total bytes of decoded pixels held by the pool
    pub fn retained_bytes(&self) -> usize {
        self.tiles.iter().map(|tile| tile.image.as_raw().len()).sum()
    }

    /// Free every buffer now, returning how many tiles were released
    pub fn release(&mut self) -> usize {
        let released = self.tiles.len();
        self.tiles = Vec::new();
        released
    }
}
