//! Conversion from linear radiance to 8-bit display values.

use crate::{Color, ImageBuffer};
use lumen_math::Interval;

/// Display gamma applied after clamping.
pub const DISPLAY_GAMMA: f64 = 2.2;

/// Map one linear channel to a display value.
///
/// Clamps to [0, 1], gamma-corrects and rounds to the nearest integer.
#[inline]
pub fn tone_map(linear: f64) -> u8 {
    let clamped = Interval::UNIT.clamp(linear);
    let scaled = clamped.powf(1.0 / DISPLAY_GAMMA) * 255.0 + 0.5;
    // NaN casts to 0
    scaled.clamp(0.0, 255.0) as u8
}

/// Convert a color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [tone_map(color.x), tone_map(color.y), tone_map(color.z)]
}

/// Tone-mapped image, row-major from the top-left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl DisplayImage {
    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Interleaved RGB bytes, as image encoders expect them.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

impl ImageBuffer {
    /// Tone-map every pixel for display.
    pub fn to_display(&self) -> DisplayImage {
        DisplayImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|c| color_to_rgb(*c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_map_endpoints() {
        assert_eq!(tone_map(0.0), 0);
        assert_eq!(tone_map(1.0), 255);
    }

    #[test]
    fn test_tone_map_clamps() {
        assert_eq!(tone_map(-3.0), 0);
        assert_eq!(tone_map(12.0), 255);
        assert_eq!(tone_map(f64::INFINITY), 255);
        assert_eq!(tone_map(f64::NAN), 0);
    }

    #[test]
    fn test_tone_map_gamma() {
        // 0.5^(1/2.2) * 255 = 186.08
        assert_eq!(tone_map(0.5), 186);
        // Gamma lifts dark values well above a linear mapping
        assert!(tone_map(0.1) > 26);
    }

    #[test]
    fn test_tone_map_monotonic() {
        let mut previous = 0;
        for i in 0..=10_000 {
            let value = tone_map(i as f64 / 8_000.0 - 0.1);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_to_display() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(1, 0, Color::new(1.0, 0.0, 0.5));

        let display = image.to_display();
        assert_eq!(display.get(0, 0), [0, 0, 0]);
        assert_eq!(display.get(1, 0), [255, 0, 186]);
        assert_eq!(display.to_bytes(), vec![0, 0, 0, 255, 0, 186]);
    }
}
