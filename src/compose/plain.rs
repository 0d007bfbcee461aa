//! Flat color blocks

use crate::compose::{CellFill, GridComposer, GridInput, paint_grid};
use crate::io::error::Result;
use crate::math::color::opaque;
use image::RgbaImage;

/// Paints every cell as a solid rectangle of its average color
///
/// Needs no tiles. The output depends only on the color map, so repeated
/// runs over the same input are pixel-identical.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainColorComposer;

impl GridComposer for PlainColorComposer {
    fn compose(&self, input: &GridInput<'_>) -> Result<RgbaImage> {
        let fills: Vec<CellFill<'_>> = input
            .averages
            .iter()
            .map(|&color| CellFill::Solid(opaque(color)))
            .collect();
        Ok(paint_grid(input.layout, &fills, input.progress))
    }
}
