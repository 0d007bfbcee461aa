//! Tests for grid derivation and the average color map

#[cfg(test)]
mod tests {
    use image::Rgb;
    use ndarray::Array2;
    use photomosaic::spatial::{AverageColorMap, CellRect, GridLayout, Size};

    // Tests an evenly divisible grid
    // Verified by swapping columns and rows
    #[test]
    fn test_even_grid() {
        let layout = GridLayout::new(Size::new(100, 100), Size::new(10, 10))
            .expect("Failed to derive grid");

        assert_eq!(layout.columns, 10);
        assert_eq!(layout.rows, 10);
        assert_eq!(layout.cell_count(), 100);
        assert_eq!(layout.covered(), Size::new(100, 100));
    }

    // Tests trailing pixels are truncated rather than forming partial cells
    // Verified by rounding the quotient up
    #[test]
    fn test_truncated_grid() {
        let layout = GridLayout::new(Size::new(105, 95), Size::new(10, 10))
            .expect("Failed to derive grid");

        assert_eq!(layout.columns, 10);
        assert_eq!(layout.rows, 9);
        assert_eq!(layout.covered(), Size::new(100, 90));
    }

    // Tests invalid sizes are rejected with the parameter key
    // Verified by removing the fit check
    #[test]
    fn test_invalid_sizes() {
        let zero_tile = GridLayout::new(Size::new(100, 100), Size::new(0, 10));
        let zero_output = GridLayout::new(Size::new(0, 100), Size::new(10, 10));
        let oversized = GridLayout::new(Size::new(100, 100), Size::new(101, 10));

        for result in [zero_tile, zero_output, oversized] {
            let error = result.expect_err("Invalid grid was accepted");
            assert_eq!(error.message_key(), "MosaicServiceErrorParameters");
        }
    }

    // Tests cell rectangles and row-major iteration
    // Verified by iterating columns in the outer loop
    #[test]
    fn test_cell_geometry() {
        let layout = GridLayout::new(Size::new(30, 20), Size::new(10, 10))
            .expect("Failed to derive grid");

        assert_eq!(
            layout.cell_rect(2, 1),
            CellRect {
                x: 20,
                y: 10,
                width: 10,
                height: 10
            }
        );

        let cells: Vec<(u32, u32)> = layout.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(&cells[..4], &[(0, 0), (1, 0), (2, 0), (0, 1)]);
    }

    // Tests the map is indexed by column then row
    // Verified by transposing the lookup
    #[test]
    fn test_average_map_lookup() {
        let colors = Array2::from_shape_fn((2, 3), |(row, column)| {
            Rgb([row as u8, column as u8, 0])
        });
        let map = AverageColorMap::from_array(colors);

        assert_eq!(map.rows(), 2);
        assert_eq!(map.columns(), 3);
        assert_eq!(map.len(), 6);
        assert_eq!(map.get(2, 1), Some(Rgb([1, 2, 0])));
        assert_eq!(map.get(3, 0), None);

        let order: Vec<Rgb<u8>> = map.iter().copied().collect();
        assert_eq!(order[1], Rgb([0, 1, 0]));
        assert_eq!(order[3], Rgb([1, 0, 0]));
    }

    // Tests a blank map matches the layout
    // Verified by creating the array with swapped axes
    #[test]
    fn test_blank_map() {
        let layout = GridLayout::new(Size::new(40, 20), Size::new(10, 10))
            .expect("Failed to derive grid");
        let map = AverageColorMap::blank(&layout);

        assert_eq!(map.columns(), 4);
        assert_eq!(map.rows(), 2);
        assert!(!map.is_empty());
        assert!(map.iter().all(|&color| color == Rgb([0, 0, 0])));
    }
}
