//! Text art: sample the master, map gray levels to glyphs, render the text
//!
//! The master is sampled every `ratio` pixels in both directions. Sampled
//! rows alternate between emitted and skipped, starting with an emitted one,
//! which roughly compensates for glyphs being taller than they are wide.

use crate::compose::glyphs::is_inked;
use crate::io::configuration::{ASCII_GLYPHS, GLYPH_CELL_SIZE, MAX_OUTPUT_DIMENSION};
use crate::io::error::{Result, invalid_parameter};
use crate::io::progress::PhaseProgress;
use crate::math::color::{gray, ramp_index};
use crate::spatial::Size;
use image::{Rgba, RgbaImage};

const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Result of a text-art run
#[derive(Clone, Debug)]
pub struct AsciiArt {
    /// Glyph rows, each terminated by a line break
    pub text: String,
    /// `text` rendered black on white
    pub image: RgbaImage,
}

/// Glyph representing a pixel's gray level
pub fn glyph_for(pixel: &Rgba<u8>) -> char {
    ASCII_GLYPHS
        .get(ramp_index(gray(pixel)))
        .copied()
        .unwrap_or(' ')
}

/// Image → text → image transform
#[derive(Clone, Copy, Debug)]
pub struct AsciiArtComposer {
    ratio: u32,
    scale: u32,
}

impl AsciiArtComposer {
    /// Create a composer sampling every `ratio` pixels and drawing glyphs at
    /// `scale` times the font size
    pub fn new(ratio: u32, scale: u32) -> Self {
        Self {
            ratio: ratio.max(1),
            scale: scale.max(1),
        }
    }

    /// Number of sampled rows for an image `height` pixels tall
    pub const fn sampled_rows(&self, height: u32) -> usize {
        height.div_ceil(self.ratio) as usize
    }

    /// Canvas the text art of a `master`-sized image will be drawn on
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if either edge would exceed
    /// `MAX_OUTPUT_DIMENSION`
    pub fn canvas_size(&self, master: Size) -> Result<Size> {
        let columns = master.width.div_ceil(self.ratio);
        let rows = master.height.div_ceil(self.ratio).div_ceil(2);
        glyph_canvas(columns, rows, self.scale)
    }

    /// Convert the master to glyph text
    ///
    /// One progress increment is reported per sampled row, emitted or not.
    pub fn to_text(&self, master: &RgbaImage, progress: &PhaseProgress<'_>) -> String {
        let (width, height) = master.dimensions();
        let step = self.ratio as usize;
        let mut text = String::new();
        let mut emit = true;

        for y in (0..height).step_by(step) {
            if emit {
                for x in (0..width).step_by(step) {
                    if let Some(pixel) = master.get_pixel_checked(x, y) {
                        text.push(glyph_for(pixel));
                    }
                }
                text.push('\n');
            }
            emit = !emit;
            progress.increment();
        }

        text
    }

    /// Run the whole transform
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if the rendered canvas would be too
    /// large; nothing is sampled in that case
    pub fn compose(
        &self,
        master: &RgbaImage,
        progress: &PhaseProgress<'_>,
    ) -> Result<AsciiArt> {
        let (width, height) = master.dimensions();
        self.canvas_size(Size::new(width, height))?;
        let text = self.to_text(master, progress);
        let image = render_text(&text, self.scale)?;
        Ok(AsciiArt { text, image })
    }
}

// Pixel size of a `columns`×`rows` block of glyphs, bounded by the output limit
fn glyph_canvas(columns: u32, rows: u32, scale: u32) -> Result<Size> {
    let too_large = || {
        invalid_parameter(
            "glyph_scale",
            &scale,
            &format!("text art would exceed {MAX_OUTPUT_DIMENSION} pixels per edge"),
        )
    };
    let cell = GLYPH_CELL_SIZE.checked_mul(scale.max(1)).ok_or_else(too_large)?;
    let width = columns.checked_mul(cell).ok_or_else(too_large)?;
    let height = rows.checked_mul(cell).ok_or_else(too_large)?;
    if width > MAX_OUTPUT_DIMENSION || height > MAX_OUTPUT_DIMENSION {
        return Err(too_large());
    }
    Ok(Size::new(width, height))
}

/// Bounding box of `text` in the fixed font at `scale`
///
/// # Errors
///
/// Returns an invalid parameter error if either edge would exceed
/// `MAX_OUTPUT_DIMENSION`
pub fn measure_text(text: &str, scale: u32) -> Result<Size> {
    let longest = text
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let columns = u32::try_from(longest).unwrap_or(u32::MAX);
    let rows = u32::try_from(text.lines().count()).unwrap_or(u32::MAX);
    glyph_canvas(columns, rows, scale)
}

/// Draw `text` black on white on a canvas sized to its bounding box
///
/// Empty text yields a single white pixel.
///
/// # Errors
///
/// Returns an invalid parameter error if the canvas would be too large
pub fn render_text(text: &str, scale: u32) -> Result<RgbaImage> {
    let scale = scale.max(1);
    let bounds = measure_text(text, scale)?;
    let cell = GLYPH_CELL_SIZE * scale;
    let mut canvas = RgbaImage::from_pixel(bounds.width.max(1), bounds.height.max(1), PAPER);

    for (row, line) in text.lines().enumerate() {
        for (column, ch) in line.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            // Both indices fit: the canvas check bounded columns and rows
            let origin_x = column as u32 * cell;
            let origin_y = row as u32 * cell;
            for gy in 0..GLYPH_CELL_SIZE {
                for gx in 0..GLYPH_CELL_SIZE {
                    if !is_inked(ch, gx, gy) {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let x = origin_x + gx * scale + sx;
                            let y = origin_y + gy * scale + sy;
                            if let Some(pixel) = canvas.get_pixel_mut_checked(x, y) {
                                *pixel = INK;
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(canvas)
}
