//! Command-line interface for generating a mosaic from files on disk

use crate::algorithm::executor::{GenerationRequest, MosaicEngine};
use crate::algorithm::matching::MatchPolicy;
use crate::compose::MosaicType;
use crate::io::configuration::{
    DEFAULT_ASCII_RATIO, DEFAULT_GLYPH_SCALE, DEFAULT_SEED, DEFAULT_TILE_HEIGHT,
    DEFAULT_TILE_WIDTH, DEFAULT_TINT_STRENGTH, ExhaustionPolicy, MosaicConfig, OUTPUT_SUFFIX,
};
use crate::io::error::{MosaicError, Result};
use crate::io::image::{is_supported_image, save_image};
use crate::io::logging::Verbosity;
use crate::io::progress::TerminalProgress;
use crate::io::storage::FileStorage;
use crate::spatial::Size;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Mosaic style selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Flat blocks of each cell's average color
    Plain,
    /// Closest tile per cell, tiles may repeat
    Classic,
    /// Closest unused tile per cell
    Unique,
    /// Random tiles tinted toward each cell's color
    Random,
    /// Black-on-white text art
    Ascii,
}

impl From<Mode> for MosaicType {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Plain => Self::PlainColor,
            Mode::Classic => Self::Classic(MatchPolicy::AllowRepeats),
            Mode::Unique => Self::Classic(MatchPolicy::Unique),
            Mode::Random => Self::Random,
            Mode::Ascii => Self::AsciiArt,
        }
    }
}

/// What the unique mode does once every tile has been used
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Exhaustion {
    /// Start over with the full tile set
    Repeat,
    /// Stop with an error
    Fail,
}

impl From<Exhaustion> for ExhaustionPolicy {
    fn from(value: Exhaustion) -> Self {
        match value {
            Exhaustion::Repeat => Self::Repeat,
            Exhaustion::Fail => Self::Fail,
        }
    }
}

#[derive(Parser)]
#[command(name = "photomosaic")]
#[command(
    author,
    version,
    about = "Build photomosaics, flat color abstractions and text art from an image"
)]
/// Command-line arguments for the mosaic generator
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Master image to reproduce
    #[arg(value_name = "MASTER")]
    pub master: PathBuf,

    /// Directory of tile images
    #[arg(short, long, value_name = "DIR")]
    pub tiles: Option<PathBuf>,

    /// Output file (defaults to <master>_mosaic.png next to the master)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output width in pixels (keeps the master's aspect ratio if height is omitted)
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Output height in pixels (keeps the master's aspect ratio if width is omitted)
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Cell width in pixels
    #[arg(long, default_value_t = DEFAULT_TILE_WIDTH)]
    pub tile_width: u32,

    /// Cell height in pixels
    #[arg(long, default_value_t = DEFAULT_TILE_HEIGHT)]
    pub tile_height: u32,

    /// Mosaic style
    #[arg(short, long, value_enum, default_value_t = Mode::Classic)]
    pub mode: Mode,

    /// Behavior of the unique mode once tiles run out
    #[arg(long, value_enum, default_value_t = Exhaustion::Repeat)]
    pub on_exhaustion: Exhaustion,

    /// Sampling stride for text art
    #[arg(short, long, default_value_t = DEFAULT_ASCII_RATIO)]
    pub ratio: u32,

    /// Glyph scale for text art
    #[arg(long, default_value_t = DEFAULT_GLYPH_SCALE)]
    pub glyph_scale: u32,

    /// Seed for the random mode
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Tint strength for the random mode (0-255)
    #[arg(long, default_value_t = DEFAULT_TINT_STRENGTH)]
    pub tint: u8,

    /// Worker threads (defaults to every core)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Also write the text-art text to this file
    #[arg(long, value_name = "FILE")]
    pub text: Option<PathBuf>,

    /// Suppress progress and warnings
    #[arg(short, long)]
    pub quiet: bool,

    /// Log phase timings
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Mosaic type selected by `--mode`
    pub fn mosaic_type(&self) -> MosaicType {
        self.mode.into()
    }

    /// Engine configuration assembled from the flags
    pub fn config(&self) -> MosaicConfig {
        MosaicConfig {
            worker_threads: self.threads,
            exhaustion: self.on_exhaustion.into(),
            ascii_ratio: self.ratio,
            glyph_scale: self.glyph_scale,
            seed: self.seed,
            tint_strength: self.tint,
        }
    }

    /// Log verbosity selected by `--quiet` / `--verbose`
    pub const fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Cell size from `--tile-width` / `--tile-height`
    pub const fn tile_size(&self) -> Size {
        Size::new(self.tile_width, self.tile_height)
    }

    /// Output size, filling in a missing edge from the master's aspect ratio
    pub fn output_size(&self, master: Size) -> Size {
        let scaled = |value: u32, numerator: u32, denominator: u32| -> u32 {
            if denominator == 0 {
                return value.max(1);
            }
            let result = u64::from(value) * u64::from(numerator) / u64::from(denominator);
            u32::try_from(result).unwrap_or(u32::MAX).max(1)
        };

        match (self.width, self.height) {
            (Some(w), Some(h)) => Size::new(w, h),
            (Some(w), None) => Size::new(w, scaled(w, master.height, master.width)),
            (None, Some(h)) => Size::new(scaled(h, master.width, master.height), h),
            (None, None) => master,
        }
    }

    /// Where the result is written
    pub fn output_path(&self) -> PathBuf {
        if let Some(ref output) = self.output {
            return output.clone();
        }
        let stem = self.master.file_stem().unwrap_or_default();
        let output_name = format!("{}{OUTPUT_SUFFIX}.png", stem.to_string_lossy());

        if let Some(parent) = self.master.parent() {
            parent.join(output_name)
        } else {
            PathBuf::from(output_name)
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Image files in `dir`, sorted by path
///
/// # Errors
///
/// Returns a file system error if the directory cannot be listed
pub fn collect_tile_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let listing_error = |source| MosaicError::FileSystem {
        path: dir.to_path_buf(),
        operation: "list tile directory",
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(listing_error)? {
        let path = entry.map_err(listing_error)?.path();
        if path.is_file() && is_supported_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Runs one generation described by the command line
pub struct MosaicRunner {
    cli: Cli,
    progress: Option<Arc<TerminalProgress>>,
}

impl MosaicRunner {
    /// Create a runner for the parsed arguments
    pub fn new(cli: Cli) -> Self {
        let progress = cli
            .should_show_progress()
            .then(|| Arc::new(TerminalProgress::new()));
        Self { cli, progress }
    }

    /// Load inputs, generate, and write the outputs
    ///
    /// Returns the path the image was written to.
    ///
    /// # Errors
    ///
    /// Returns an error if reading inputs, generating or writing outputs fails
    pub fn run(&self) -> Result<PathBuf> {
        let storage = Arc::new(FileStorage::new());
        let mut engine = MosaicEngine::with_config(storage.clone(), self.cli.config())?;
        if let Some(ref progress) = self.progress {
            engine = engine.with_progress(progress.clone());
        }

        let master_path = &self.cli.master;
        let bytes = std::fs::read(master_path).map_err(|e| MosaicError::FileSystem {
            path: master_path.clone(),
            operation: "read master image",
            source: e,
        })?;
        let master_size = engine.set_master_image(bytes).map_err(|e| match e {
            MosaicError::ImageLoad { source, .. } => MosaicError::ImageLoad {
                path: master_path.clone(),
                source,
            },
            other => other,
        })?;

        if let Some(ref dir) = self.cli.tiles {
            for path in collect_tile_paths(dir)? {
                let name = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                engine.register_tile(name, storage.grant(&path));
            }
        }
        info!(tiles = engine.library().len(), "tiles registered");

        let request = GenerationRequest::new(
            self.cli.output_size(master_size),
            self.cli.tile_size(),
            self.cli.mosaic_type(),
        );
        let generated = engine.generate(&request);
        if let Some(ref progress) = self.progress {
            progress.finish();
        }
        let image = generated?;

        let output_path = self.cli.output_path();
        save_image(&image, &output_path)?;

        if let (Some(text_path), Some(text)) = (&self.cli.text, engine.ascii_text()) {
            std::fs::write(text_path, text).map_err(|e| MosaicError::FileSystem {
                path: text_path.clone(),
                operation: "write text art",
                source: e,
            })?;
        }

        info!(path = %output_path.display(), "mosaic written");
        Ok(output_path)
    }
}
