//! Codec boundary: decoding sources and encoding results
//!
//! Everything that touches encoded bytes goes through here, so the rest of
//! the engine only ever sees decoded RGBA buffers.

use crate::io::configuration::JPEG_QUALITY;
use crate::io::error::{MosaicError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Decode an in-memory image of any supported format
///
/// # Errors
///
/// Returns an image load error if the format is unknown or the data is corrupt
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(MosaicError::from)
}

/// Drain a source stream into memory
///
/// # Errors
///
/// Propagates the stream's I/O error
pub fn read_stream(mut stream: impl Read) -> std::io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Read only the header of an encoded image and report its size
///
/// # Errors
///
/// Returns an image load error if the format cannot be recognised or the
/// header is malformed
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| MosaicError::ImageLoad {
            path: PathBuf::from("<memory>"),
            source: image::ImageError::IoError(e),
        })?;
    reader.into_dimensions().map_err(MosaicError::from)
}

/// Scale an image to fit inside a `size`×`size` box, keeping its aspect ratio
pub fn resized_preview(image: &DynamicImage, size: u32) -> DynamicImage {
    image.resize(size.max(1), size.max(1), FilterType::Triangle)
}

/// Encode a generated image as JPEG bytes
///
/// Alpha is dropped; JPEG has no transparency.
///
/// # Errors
///
/// Returns an export error if the encoder rejects the image
pub fn encode_jpeg(image: &RgbaImage) -> Result<Vec<u8>> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| MosaicError::ImageExport {
            path: PathBuf::from("<memory>"),
            source: e,
        })?;
    Ok(bytes)
}

/// Save a generated image, picking the format from the file extension
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The extension is not a supported image format
/// - The image cannot be written
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    let export_error = |source| MosaicError::ImageExport {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(export_error)?;
    if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgba8(image.clone())
            .into_rgb8()
            .save_with_format(path, format)
            .map_err(export_error)
    } else {
        image.save_with_format(path, format).map_err(export_error)
    }
}

/// Whether `path` carries an extension the decoder understands
pub fn is_supported_image(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok_and(|format| format.can_read())
}
