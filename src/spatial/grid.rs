//! Grid geometry and the per-cell average color map
//!
//! The grid is never stored on its own: it is derived from the output size
//! and the tile size. Columns and rows are the floor of the respective
//! quotients, so trailing pixels that do not fill a whole cell are left out.

use crate::io::error::{Result, invalid_parameter};
use image::Rgb;
use ndarray::Array2;

/// Width and height in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent
    pub width: u32,
    /// Vertical extent
    pub height: u32,
}

impl Size {
    /// Create a size
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either edge is zero
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Pixel rectangle covered by one cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Cell width
    pub width: u32,
    /// Cell height
    pub height: u32,
}

/// Derived grid of `columns`×`rows` cells of `cell` size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    /// Output canvas size
    pub output: Size,
    /// Size of one cell
    pub cell: Size,
    /// Number of cells across (`tX`)
    pub columns: u32,
    /// Number of cells down (`tY`)
    pub rows: u32,
}

impl GridLayout {
    /// Derive the grid for an output canvas and a cell size
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if either size has a zero edge, or
    /// the cell does not fit at least once in each direction
    pub fn new(output: Size, cell: Size) -> Result<Self> {
        if output.is_empty() {
            return Err(invalid_parameter(
                "output_size",
                &format!("{}x{}", output.width, output.height),
                &"both edges must be positive",
            ));
        }
        if cell.is_empty() {
            return Err(invalid_parameter(
                "tile_size",
                &format!("{}x{}", cell.width, cell.height),
                &"both edges must be positive",
            ));
        }

        let columns = output.width / cell.width;
        let rows = output.height / cell.height;
        if columns == 0 || rows == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &format!("{}x{}", cell.width, cell.height),
                &format!(
                    "must fit inside the {}x{} output",
                    output.width, output.height
                ),
            ));
        }

        Ok(Self {
            output,
            cell,
            columns,
            rows,
        })
    }

    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Pixel rectangle of cell (`column`, `row`)
    pub const fn cell_rect(&self, column: u32, row: u32) -> CellRect {
        CellRect {
            x: column * self.cell.width,
            y: row * self.cell.height,
            width: self.cell.width,
            height: self.cell.height,
        }
    }

    /// Pixel area actually covered by whole cells
    pub const fn covered(&self) -> Size {
        Size::new(
            self.columns * self.cell.width,
            self.rows * self.cell.height,
        )
    }

    /// Row-major iterator over every `(column, row)` pair
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + use<> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| (column, row)))
    }
}

/// Mean color of every grid cell, indexed `[row, column]`
///
/// Filled once during averaging and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AverageColorMap {
    colors: Array2<Rgb<u8>>,
}

impl AverageColorMap {
    /// Wrap a filled color array of shape `(rows, columns)`
    pub const fn from_array(colors: Array2<Rgb<u8>>) -> Self {
        Self { colors }
    }

    /// Black map matching a layout, ready to be filled
    pub fn blank(layout: &GridLayout) -> Self {
        Self {
            colors: Array2::from_elem(
                (layout.rows as usize, layout.columns as usize),
                Rgb([0, 0, 0]),
            ),
        }
    }

    /// Number of cells across
    pub fn columns(&self) -> usize {
        self.colors.ncols()
    }

    /// Number of cells down
    pub fn rows(&self) -> usize {
        self.colors.nrows()
    }

    /// Number of cells in the map
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the map has no cells
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color of cell (`column`, `row`)
    pub fn get(&self, column: u32, row: u32) -> Option<Rgb<u8>> {
        self.colors.get((row as usize, column as usize)).copied()
    }

    /// Mutable access for the averaging phase
    pub(crate) const fn as_array_mut(&mut self) -> &mut Array2<Rgb<u8>> {
        &mut self.colors
    }

    /// Row-major iterator over cell colors
    pub fn iter(&self) -> impl Iterator<Item = &Rgb<u8>> {
        self.colors.iter()
    }
}
