//! Engine constants and runtime configuration defaults

use crate::io::error::{Result, invalid_parameter};

// Grid defaults
/// Default tile cell width in pixels
pub const DEFAULT_TILE_WIDTH: u32 = 25;
/// Default tile cell height in pixels
pub const DEFAULT_TILE_HEIGHT: u32 = 25;

/// Largest output edge accepted by the engine
pub const MAX_OUTPUT_DIMENSION: u32 = 20_000;

// Text-art settings
/// Pixel stride used when sampling the master image for text art
pub const DEFAULT_ASCII_RATIO: u32 = 5;

/// Glyph ramp ordered from densest to blank
pub const ASCII_GLYPHS: [char; 11] = ['#', '#', '@', '%', '=', '+', '*', ':', '-', '.', ' '];

/// Width and height of one rendered glyph cell before scaling
pub const GLYPH_CELL_SIZE: u32 = 8;

/// Default integer scale applied to glyph cells
pub const DEFAULT_GLYPH_SCALE: u32 = 1;

/// Largest glyph scale accepted by the configuration
pub const MAX_GLYPH_SCALE: u32 = 64;

// Progress windows, in percent of total work
/// Averaging phase window
pub const AVERAGING_WINDOW: (u8, u8) = (0, 33);
/// Tile loading phase window
pub const LOADING_WINDOW: (u8, u8) = (33, 66);
/// Composition phase window
pub const COMPOSING_WINDOW: (u8, u8) = (66, 100);

// Random mosaic settings
/// Fixed seed for reproducible random placement
pub const DEFAULT_SEED: u64 = 42;

/// Default tint blend toward the cell color (0 keeps the tile, 255 is flat)
pub const DEFAULT_TINT_STRENGTH: u8 = 128;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// JPEG quality used by the encoding helper
pub const JPEG_QUALITY: u8 = 90;

/// Behavior of the unique-assignment policy once every tile has been used
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    /// Refill the candidate set with the whole pool and keep going
    #[default]
    Repeat,
    /// Abort the run with a pool-exhausted failure
    Fail,
}

/// Runtime knobs that stay fixed across generations
#[derive(Clone, Debug)]
pub struct MosaicConfig {
    /// Worker threads for averaging and loading (`None` uses every core)
    pub worker_threads: Option<usize>,
    /// What the unique policy does when the pool runs dry
    pub exhaustion: ExhaustionPolicy,
    /// Sampling stride for text art
    pub ascii_ratio: u32,
    /// Integer scale applied to rendered glyphs
    pub glyph_scale: u32,
    /// Seed for the random mosaic
    pub seed: u64,
    /// Tint blend toward the cell color for the random mosaic
    pub tint_strength: u8,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            exhaustion: ExhaustionPolicy::default(),
            ascii_ratio: DEFAULT_ASCII_RATIO,
            glyph_scale: DEFAULT_GLYPH_SCALE,
            seed: DEFAULT_SEED,
            tint_strength: DEFAULT_TINT_STRENGTH,
        }
    }
}

impl MosaicConfig {
    /// Check the configuration for values the engine cannot run with
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error for a zero thread count, a zero
    /// sampling ratio, or a glyph scale outside `1..=MAX_GLYPH_SCALE`
    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == Some(0) {
            return Err(invalid_parameter(
                "worker_threads",
                &0,
                &"must be at least 1",
            ));
        }
        if self.ascii_ratio == 0 {
            return Err(invalid_parameter("ascii_ratio", &0, &"must be at least 1"));
        }
        if self.glyph_scale == 0 || self.glyph_scale > MAX_GLYPH_SCALE {
            return Err(invalid_parameter(
                "glyph_scale",
                &self.glyph_scale,
                &format!("must be between 1 and {MAX_GLYPH_SCALE}"),
            ));
        }
        Ok(())
    }

    /// Number of workers the engine pool will run with
    pub fn resolved_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}
