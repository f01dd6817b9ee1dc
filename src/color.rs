// src/color.rs

//! Defines the `Rgb` pixel type and the periodic banding used to color escape counts.

use std::fmt;

/// An RGB pixel, each channel in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Formats as the three decimal channel values separated by spaces, as in a P3 body.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}

/// Maps an escape count `n` to `(n mod 256, 2n mod 256, 4n mod 256)`.
///
/// Wrapping multiplication is exact here: 2^32 is a multiple of 256, so the
/// low byte of the wrapped product equals the true product mod 256.
#[inline]
pub fn colorize(n: u32) -> Rgb {
    Rgb {
        r: (n % 256) as u8,
        g: (n.wrapping_mul(2) % 256) as u8,
        b: (n.wrapping_mul(4) % 256) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_colorize_small_counts() {
        assert_eq!(colorize(0), Rgb::BLACK);
        assert_eq!(colorize(1), Rgb::new(1, 2, 4));
        assert_eq!(colorize(10), Rgb::new(10, 20, 40));
    }

    #[test]
    fn test_colorize_wraps_each_channel() {
        assert_eq!(colorize(64), Rgb::new(64, 128, 0));
        assert_eq!(colorize(100), Rgb::new(100, 200, 144));
        assert_eq!(colorize(256), Rgb::BLACK);
        assert_eq!(colorize(300), Rgb::new(44, 88, 176));
    }

    #[test]
    fn test_colorize_matches_modular_definition() {
        for n in (0u32..5000).chain([u32::MAX / 4, u32::MAX / 2 + 7, u32::MAX]) {
            let wide = n as u64;
            let pixel = colorize(n);
            assert_eq!(pixel.r as u64, wide % 256, "n = {}", n);
            assert_eq!(pixel.g as u64, (2 * wide) % 256, "n = {}", n);
            assert_eq!(pixel.b as u64, (4 * wide) % 256, "n = {}", n);
        }
    }

    #[test]
    fn test_display_is_space_separated() {
        assert_eq!(Rgb::new(10, 20, 40).to_string(), "10 20 40");
    }
}
