//! Generation orchestration
//!
//! [`MosaicEngine`] owns the master image and the tile library and runs a
//! generation as a fixed sequence of phases on a bounded worker pool:
//!
//! 1. Precondition checks (master present, tiles present, sizes valid)
//! 2. Master resized to the output size
//! 3. Row-parallel averaging into the color map
//! 4. Tile-parallel loading into the tile pool (tile-based types only)
//! 5. Composition by the composer the mosaic type selects
//!
//! Each parallel phase completes fully before the next one starts. Whatever
//! the outcome, the tile pool is released and the allocator hint signalled
//! before `generate` returns.

use crate::algorithm::averaging::build_average_map;
use crate::algorithm::lifecycle::{
    AllocatorHint, CancellationToken, GenerationScope, NoAllocatorHint,
};
use crate::algorithm::loader::TileLoader;
use crate::compose::{AsciiArtComposer, GridInput, MosaicType, grid_composer};
use crate::io::configuration::{MAX_OUTPUT_DIMENSION, MosaicConfig};
use crate::io::error::{MosaicError, Result, invalid_parameter};
use crate::io::image::{decode_image, read_stream};
use crate::io::progress::{NoProgress, Phase, PhaseProgress, ProgressSink};
use crate::io::storage::{SourceHandle, StorageAccess};
use crate::spatial::{GridLayout, Size, Tile, TileLibrary};
use image::RgbaImage;
use image::imageops::FilterType;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Parameters of a single generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Size of the output canvas
    pub output_size: Size,
    /// Size of one grid cell (ignored by text art)
    pub tile_size: Size,
    /// Composer to run
    pub mosaic_type: MosaicType,
}

impl GenerationRequest {
    /// Create a request
    pub const fn new(output_size: Size, tile_size: Size, mosaic_type: MosaicType) -> Self {
        Self {
            output_size,
            tile_size,
            mosaic_type,
        }
    }
}

// Encoded master bytes; decoded only for the duration of a resize
struct MasterImage {
    bytes: Vec<u8>,
    size: Size,
}

/// The mosaic generation engine
///
/// Registration calls and `generate` take `&mut self`, so a library can never
/// change underneath a running generation.
pub struct MosaicEngine {
    config: MosaicConfig,
    storage: Arc<dyn StorageAccess>,
    progress: Arc<dyn ProgressSink>,
    allocator: Arc<dyn AllocatorHint>,
    cancellation: CancellationToken,
    workers: ThreadPool,
    master: Option<MasterImage>,
    library: TileLibrary,
    ascii_text: Option<String>,
}

impl MosaicEngine {
    /// Create an engine with the default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be started
    pub fn new(storage: Arc<dyn StorageAccess>) -> Result<Self> {
        Self::with_config(storage, MosaicConfig::default())
    }

    /// Create an engine with an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The worker pool cannot be started
    pub fn with_config(storage: Arc<dyn StorageAccess>, config: MosaicConfig) -> Result<Self> {
        config.validate()?;
        let threads = config.resolved_threads();
        let workers = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("mosaic-worker-{index}"))
            .build()
            .map_err(|e| MosaicError::WorkerPool {
                reason: e.to_string(),
            })?;
        debug!(threads, "worker pool started");

        Ok(Self {
            config,
            storage,
            progress: Arc::new(NoProgress),
            allocator: Arc::new(NoAllocatorHint),
            cancellation: CancellationToken::new(),
            workers,
            master: None,
            library: TileLibrary::new(),
            ascii_text: None,
        })
    }

    /// Report progress to `sink`
    #[must_use]
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Signal `hint` at the end of every generation
    #[must_use]
    pub fn with_allocator_hint(mut self, hint: Arc<dyn AllocatorHint>) -> Self {
        self.allocator = hint;
        self
    }

    /// Register the master image from encoded bytes
    ///
    /// The bytes are decoded once to validate them; the decoded pixels are
    /// dropped straight away and only the encoded form is kept. Replaces any
    /// previous master.
    ///
    /// # Errors
    ///
    /// Returns an image load error if the bytes do not decode
    pub fn set_master_image(&mut self, bytes: Vec<u8>) -> Result<Size> {
        let decoded = decode_image(&bytes)?;
        let size = Size::new(decoded.width(), decoded.height());
        drop(decoded);
        debug!(width = size.width, height = size.height, "master image set");
        self.master = Some(MasterImage { bytes, size });
        Ok(size)
    }

    /// Register the master image from a stream
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be read or does not decode
    pub fn set_master_from_reader(&mut self, reader: impl Read) -> Result<Size> {
        let bytes = read_stream(reader).map_err(|e| MosaicError::FileSystem {
            path: PathBuf::from("<stream>"),
            operation: "read master image",
            source: e,
        })?;
        self.set_master_image(bytes)
    }

    /// Size of the registered master image
    pub fn master_size(&self) -> Option<Size> {
        self.master.as_ref().map(|master| master.size)
    }

    /// Register a tile; duplicates by name are kept
    pub fn register_tile(&mut self, name: impl Into<String>, handle: SourceHandle) {
        self.library.register(name, handle);
    }

    /// Remove the first tile named `name`; absent names are ignored
    pub fn remove_tile(&mut self, name: &str) -> Option<Tile> {
        self.library.remove(name)
    }

    /// Forget the master image, every tile and the last text art
    pub fn reset(&mut self) {
        self.master = None;
        self.library.clear();
        self.ascii_text = None;
    }

    /// Registered tiles
    pub const fn library(&self) -> &TileLibrary {
        &self.library
    }

    /// Text produced by the most recent text-art generation
    pub fn ascii_text(&self) -> Option<&str> {
        self.ascii_text.as_deref()
    }

    /// Token that cancels the running or next generation
    ///
    /// `generate` clears the token when it starts.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Active configuration
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    fn ascii_composer(&self) -> AsciiArtComposer {
        AsciiArtComposer::new(self.config.ascii_ratio, self.config.glyph_scale)
    }

    /// Produce a mosaic
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No master image is registered
    /// - A tile-based type is requested with no tiles, or every tile fails to load
    /// - The output or tile size is invalid, or the text art would be too large
    /// - The unique policy runs out of tiles and is configured to fail
    /// - The generation is cancelled
    pub fn generate(&mut self, request: &GenerationRequest) -> Result<RgbaImage> {
        let started = Instant::now();
        let master = self.master.as_ref().ok_or(MosaicError::MissingMasterImage)?;
        if request.mosaic_type.requires_tiles() && self.library.is_empty() {
            return Err(MosaicError::InsufficientTiles {
                registered: 0,
                loaded: 0,
            });
        }
        validate_output(request.output_size)?;
        let layout = if request.mosaic_type.uses_grid() {
            Some(GridLayout::new(request.output_size, request.tile_size)?)
        } else {
            self.ascii_composer().canvas_size(request.output_size)?;
            None
        };

        self.cancellation.reset();
        let cancel = &self.cancellation;
        let sink: &dyn ProgressSink = self.progress.as_ref();
        let mut scope = GenerationScope::new(self.allocator.as_ref());

        let resized = resize_master(master, request.output_size)?;
        cancel.check("resizing")?;

        let Some(layout) = layout else {
            let composer = self.ascii_composer();
            let progress = PhaseProgress::new(
                sink,
                Phase::Composing,
                composer.sampled_rows(resized.height()),
            );
            let art = composer.compose(&resized, &progress)?;
            drop(resized);
            info!(
                mode = request.mosaic_type.label(),
                width = art.image.width(),
                height = art.image.height(),
                elapsed_ms = started.elapsed().as_millis(),
                "generation finished"
            );
            self.ascii_text = Some(art.text);
            return Ok(art.image);
        };

        let averaging = PhaseProgress::new(sink, Phase::Averaging, layout.rows as usize);
        let averages = self
            .workers
            .install(|| build_average_map(&resized, &layout, &averaging, cancel))?;
        drop(resized);
        let covered = layout.covered();
        debug!(
            columns = layout.columns,
            rows = layout.rows,
            covered_width = covered.width,
            covered_height = covered.height,
            elapsed_ms = started.elapsed().as_millis(),
            "averaging finished"
        );

        if request.mosaic_type.requires_tiles() {
            let tiles = self.library.tiles();
            let loading = PhaseProgress::new(sink, Phase::LoadingTiles, tiles.len());
            let loader = TileLoader::new(self.storage.as_ref(), layout.cell);
            let pool = self
                .workers
                .install(|| loader.load_all(tiles, &loading, cancel))?;
            scope.adopt_pool(pool);
        }
        cancel.check("composing")?;

        let composer = grid_composer(request.mosaic_type, &self.config).ok_or_else(|| {
            invalid_parameter(
                "mosaic_type",
                &request.mosaic_type.label(),
                &"has no grid composer",
            )
        })?;
        let composing = PhaseProgress::new(sink, Phase::Composing, layout.rows as usize);
        let input = GridInput {
            layout: &layout,
            averages: &averages,
            pool: scope.pool(),
            progress: &composing,
        };
        let image = self.workers.install(|| composer.compose(&input))?;

        info!(
            mode = request.mosaic_type.label(),
            cells = layout.cell_count(),
            tiles = scope.pool().len(),
            elapsed_ms = started.elapsed().as_millis(),
            "generation finished"
        );
        Ok(image)
    }
}

fn validate_output(size: Size) -> Result<()> {
    if size.is_empty() || size.width > MAX_OUTPUT_DIMENSION || size.height > MAX_OUTPUT_DIMENSION
    {
        return Err(invalid_parameter(
            "output_size",
            &format!("{}x{}", size.width, size.height),
            &format!("both edges must be between 1 and {MAX_OUTPUT_DIMENSION}"),
        ));
    }
    Ok(())
}

// Decode, resize to exactly `output`, and drop the decoded original
fn resize_master(master: &MasterImage, output: Size) -> Result<RgbaImage> {
    let decoded = decode_image(&master.bytes)?;
    let resized = if decoded.width() == output.width && decoded.height() == output.height {
        decoded.into_rgba8()
    } else {
        let resized = decoded.resize_exact(output.width, output.height, FilterType::Triangle);
        drop(decoded);
        resized.into_rgba8()
    };
    Ok(resized)
}
