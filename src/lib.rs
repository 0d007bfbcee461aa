//! Photomosaic generation engine
//!
//! A master image is divided into a grid of cells, each cell is reduced to its
//! average color, and the grid is then rebuilt from color-matched tiles, flat
//! color blocks, randomly tinted tiles, or rendered as monochrome text art.

#![forbid(unsafe_code)]

/// Averaging, tile loading, matching and generation orchestration
pub mod algorithm;
/// Interchangeable mosaic composers
pub mod compose;
/// Configuration, errors, progress, storage, codecs and the CLI
pub mod io;
/// Color arithmetic
pub mod math;
/// Grid geometry, color map and tile collections
pub mod spatial;

pub use algorithm::executor::{GenerationRequest, MosaicEngine};
pub use algorithm::lifecycle::{AllocatorHint, CancellationToken};
pub use algorithm::matching::MatchPolicy;
pub use compose::MosaicType;
pub use io::configuration::{ExhaustionPolicy, MosaicConfig};
pub use io::error::{MosaicError, Result};
pub use io::progress::{Phase, ProgressSink, ProgressUpdate};
pub use io::storage::{FileStorage, MemoryStorage, SourceHandle, StorageAccess};
pub use spatial::Size;
