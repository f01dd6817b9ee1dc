// src/viewport.rs

//! Mapping from pixel indices to points on the complex plane.
//!
//! The image grid is laid over the viewport rectangle with pixel `(0, 0)` at
//! `(min_real, min_imaginary)`. Index `size` would land exactly on the max
//! bound, but the render loop only ever visits `0..size`.

/// Rectangular region of the complex plane mapped onto the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min_real: f64,
    pub max_real: f64,
    pub min_imaginary: f64,
    pub max_imaginary: f64,
}

impl Viewport {
    pub fn new(min_real: f64, max_real: f64, min_imaginary: f64, max_imaginary: f64) -> Self {
        Self {
            min_real,
            max_real,
            min_imaginary,
            max_imaginary,
        }
    }

    /// Real part of the point under column `x` of an image `width` pixels wide.
    #[inline]
    pub fn real_at(&self, x: usize, width: usize) -> f64 {
        map_to_real(x, width, self.min_real, self.max_real)
    }

    /// Imaginary part of the point under row `y` of an image `height` pixels tall.
    #[inline]
    pub fn imaginary_at(&self, y: usize, height: usize) -> f64 {
        map_to_imaginary(y, height, self.min_imaginary, self.max_imaginary)
    }

    /// Complex point `(real, imaginary)` under pixel `(x, y)`.
    pub fn point_at(&self, x: usize, y: usize, width: usize, height: usize) -> (f64, f64) {
        (self.real_at(x, width), self.imaginary_at(y, height))
    }

    /// Checks that the viewport is a finite, non-degenerate rectangle.
    pub fn validate(&self) -> Result<(), String> {
        let bounds = [
            ("min_real", self.min_real),
            ("max_real", self.max_real),
            ("min_imaginary", self.min_imaginary),
            ("max_imaginary", self.max_imaginary),
        ];
        if let Some((name, value)) = bounds.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{} must be finite, got {}", name, value));
        }
        if self.max_real <= self.min_real {
            return Err(format!(
                "max_real ({}) must be greater than min_real ({})",
                self.max_real, self.min_real
            ));
        }
        if self.max_imaginary <= self.min_imaginary {
            return Err(format!(
                "max_imaginary ({}) must be greater than min_imaginary ({})",
                self.max_imaginary, self.min_imaginary
            ));
        }
        Ok(())
    }
}

/// Linear interpolation of column `x` onto `[min_real, max_real)`.
///
/// `width` must be non-zero; no bounds check is done on `x`.
#[inline]
pub fn map_to_real(x: usize, width: usize, min_real: f64, max_real: f64) -> f64 {
    let range = max_real - min_real;
    x as f64 * (range / width as f64) + min_real
}

/// Linear interpolation of row `y` onto `[min_imaginary, max_imaginary)`.
///
/// `height` must be non-zero; no bounds check is done on `y`.
#[inline]
pub fn map_to_imaginary(y: usize, height: usize, min_imaginary: f64, max_imaginary: f64) -> f64 {
    let range = max_imaginary - min_imaginary;
    y as f64 * (range / height as f64) + min_imaginary
}
