//! Color arithmetic shared by averaging, matching and text art

use image::{Rgb, Rgba};

/// Running per-channel sum for computing a mean color
///
/// Alpha is ignored; only the RGB channels contribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorAccumulator {
    red: u64,
    green: u64,
    blue: u64,
    count: u64,
}

impl ColorAccumulator {
    /// Start an empty accumulation
    pub const fn new() -> Self {
        Self {
            red: 0,
            green: 0,
            blue: 0,
            count: 0,
        }
    }

    /// Add one pixel
    pub fn add(&mut self, pixel: &Rgba<u8>) {
        let [r, g, b, _] = pixel.0;
        self.red += u64::from(r);
        self.green += u64::from(g);
        self.blue += u64::from(b);
        self.count += 1;
    }

    /// Number of pixels seen
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean, truncated; black when nothing was added
    pub const fn mean(&self) -> Rgb<u8> {
        if self.count == 0 {
            return Rgb([0, 0, 0]);
        }
        // Each mean is bounded by the largest channel value, so it fits in u8
        Rgb([
            (self.red / self.count) as u8,
            (self.green / self.count) as u8,
            (self.blue / self.count) as u8,
        ])
    }
}

/// Squared Euclidean distance between two colors in RGB space
///
/// Ordering by the squared distance is the same as ordering by the distance,
/// without the square root.
pub const fn distance_squared(a: Rgb<u8>, b: Rgb<u8>) -> u32 {
    let dr = a.0[0].abs_diff(b.0[0]) as u32;
    let dg = a.0[1].abs_diff(b.0[1]) as u32;
    let db = a.0[2].abs_diff(b.0[2]) as u32;
    dr * dr + dg * dg + db * db
}

/// Euclidean distance between two colors in RGB space
pub fn distance(a: Rgb<u8>, b: Rgb<u8>) -> f64 {
    f64::from(distance_squared(a, b)).sqrt()
}

/// Unweighted luminance `(R + G + B) / 3`
pub const fn gray(pixel: &Rgba<u8>) -> u8 {
    let [r, g, b, _] = pixel.0;
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

/// Position on an 11-step ramp for a gray level, `floor(gray * 10 / 255)`
pub const fn ramp_index(gray: u8) -> usize {
    (gray as usize * 10) / 255
}

/// Blend `pixel` toward `target` by `strength` out of 255
///
/// Alpha is preserved.
pub const fn tint(pixel: Rgba<u8>, target: Rgb<u8>, strength: u8) -> Rgba<u8> {
    let keep = 255 - strength as u32;
    let take = strength as u32;
    let [r, g, b, a] = pixel.0;
    let [tr, tg, tb] = target.0;
    Rgba([
        ((r as u32 * keep + tr as u32 * take) / 255) as u8,
        ((g as u32 * keep + tg as u32 * take) / 255) as u8,
        ((b as u32 * keep + tb as u32 * take) / 255) as u8,
        a,
    ])
}

/// Opaque RGBA version of an RGB color
pub const fn opaque(color: Rgb<u8>) -> Rgba<u8> {
    let [r, g, b] = color.0;
    Rgba([r, g, b, 255])
}
