/// Color averaging, distance, luminance and tinting
pub mod color;
