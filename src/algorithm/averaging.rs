//! Per-cell average colors of the resized master image
//!
//! Averaging runs row-parallel. The color map is split into one mutable view
//! per grid row before any worker starts, so each worker can only ever write
//! the cells of the row it was handed; the borrow checker enforces the
//! partition rather than an agreement between workers.

use crate::algorithm::lifecycle::CancellationToken;
use crate::io::error::{Result, invalid_parameter};
use crate::io::progress::PhaseProgress;
use crate::math::color::ColorAccumulator;
use crate::spatial::{AverageColorMap, CellRect, GridLayout};
use image::{GenericImageView, Rgb, RgbaImage, imageops};
use ndarray::Axis;
use ndarray::parallel::prelude::*;

/// Mean RGB color of the pixels inside `rect`
///
/// Parts of the rectangle outside the image are ignored.
pub fn average_cell(image: &RgbaImage, rect: CellRect) -> Rgb<u8> {
    let view = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height);
    let mut accumulator = ColorAccumulator::new();
    for (_, _, pixel) in view.pixels() {
        accumulator.add(&pixel);
    }
    accumulator.mean()
}

/// Mean RGB color of a whole image
pub fn average_image(image: &RgbaImage) -> Rgb<u8> {
    let mut accumulator = ColorAccumulator::new();
    for pixel in image.pixels() {
        accumulator.add(pixel);
    }
    accumulator.mean()
}

/// Build the average color map for `image` laid out as `layout`
///
/// `image` must already be resized to the layout's output size. One progress
/// increment is reported per finished grid row.
///
/// # Errors
///
/// Returns an error if:
/// - The image size does not match the layout's output size
/// - Cancellation was requested while rows were being averaged
pub fn build_average_map(
    image: &RgbaImage,
    layout: &GridLayout,
    progress: &PhaseProgress<'_>,
    cancel: &CancellationToken,
) -> Result<AverageColorMap> {
    let (width, height) = image.dimensions();
    if width != layout.output.width || height != layout.output.height {
        return Err(invalid_parameter(
            "master_image",
            &format!("{width}x{height}"),
            &format!(
                "must be resized to {}x{} before averaging",
                layout.output.width, layout.output.height
            ),
        ));
    }

    let mut map = AverageColorMap::blank(layout);
    map.as_array_mut()
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(row, mut cells)| {
            if cancel.is_cancelled() {
                return;
            }
            for (column, cell) in cells.iter_mut().enumerate() {
                *cell = average_cell(image, layout.cell_rect(column as u32, row as u32));
            }
            progress.increment();
        });

    cancel.check("averaging")?;
    Ok(map)
}
