//! Error types and localization keys for mosaic generation

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
///
/// Every variant maps to a message key through [`MosaicError::message_key`],
/// so a front end can localize the failure instead of showing the raw error.
#[derive(Debug)]
pub enum MosaicError {
    /// Generation was requested before any master image was registered
    MissingMasterImage,

    /// A tile-based mosaic type was selected but the tile pool is empty
    ///
    /// Raised either up front (nothing registered) or after loading, when
    /// every registered tile was dropped.
    InsufficientTiles {
        /// Number of tiles registered in the library
        registered: usize,
        /// Number of tiles that survived loading
        loaded: usize,
    },

    /// A single tile could not be decoded
    TileDecodeFailure {
        /// Name the tile was registered under
        name: String,
        /// Underlying decoder error
        source: image::ImageError,
    },

    /// A tile's source handle no longer resolves to readable bytes
    StorageAccessRevoked {
        /// Opaque handle token that failed to resolve
        handle: String,
        /// Underlying I/O error, when the storage reported one
        source: Option<std::io::Error>,
    },

    /// The unique-assignment policy ran out of tiles before the grid was full
    TilePoolExhausted {
        /// Cells already filled when the pool ran dry
        filled: usize,
        /// Total cells in the grid
        cells: usize,
    },

    /// Request parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to decode an image that is not a tile (master image, CLI input)
    ImageLoad {
        /// Path or label of the image
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to encode or save a generated image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Generation was cancelled through its cancellation token
    Cancelled {
        /// Phase that observed the cancellation
        phase: &'static str,
    },

    /// The bounded worker pool could not be created
    WorkerPool {
        /// Description of the failure
        reason: String,
    },
}

impl MosaicError {
    /// Localization key describing this failure
    ///
    /// Front ends look the key up in their resource tables; the engine never
    /// hands out display text of its own.
    pub const fn message_key(&self) -> &'static str {
        match self {
            Self::MissingMasterImage => "MosaicServiceErrorMasterImage",
            Self::InsufficientTiles { .. } => "MosaicServiceErrorTiles",
            Self::TileDecodeFailure { .. } => "MosaicServiceErrorTileDecode",
            Self::StorageAccessRevoked { .. } => "MosaicServiceErrorStorageAccess",
            Self::TilePoolExhausted { .. } => "MosaicServiceErrorTilePoolExhausted",
            Self::InvalidParameter { .. } => "MosaicServiceErrorParameters",
            Self::ImageLoad { .. } | Self::ImageExport { .. } | Self::FileSystem { .. } => {
                "MosaicServiceErrorImage"
            }
            Self::Cancelled { .. } => "MosaicServiceErrorCancelled",
            Self::WorkerPool { .. } => "MosaicServiceErrorInternal",
        }
    }

    /// Whether the failure only affects a single tile
    ///
    /// Per-tile failures are absorbed by the loader; everything else aborts
    /// the run.
    pub const fn is_tile_local(&self) -> bool {
        matches!(
            self,
            Self::TileDecodeFailure { .. } | Self::StorageAccessRevoked { .. }
        )
    }
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMasterImage => write!(f, "No master image has been registered"),
            Self::InsufficientTiles { registered, loaded } => {
                write!(
                    f,
                    "Mosaic type requires tiles but none are usable ({loaded} of {registered} loaded)"
                )
            }
            Self::TileDecodeFailure { name, source } => {
                write!(f, "Failed to decode tile '{name}': {source}")
            }
            Self::StorageAccessRevoked { handle, source } => match source {
                Some(err) => write!(f, "Storage handle '{handle}' no longer resolves: {err}"),
                None => write!(f, "Storage handle '{handle}' no longer resolves"),
            },
            Self::TilePoolExhausted { filled, cells } => {
                write!(
                    f,
                    "Unique tile pool exhausted after filling {filled} of {cells} cells"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Cancelled { phase } => write!(f, "Generation cancelled during {phase}"),
            Self::WorkerPool { reason } => write!(f, "Failed to start worker pool: {reason}"),
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TileDecodeFailure { source, .. }
            | Self::ImageLoad { source, .. }
            | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::StorageAccessRevoked {
                source: Some(source),
                ..
            } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<memory>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
