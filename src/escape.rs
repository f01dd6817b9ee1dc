// src/escape.rs

//! Escape-time evaluation of the Mandelbrot recurrence `z <- z^2 + c`.

/// Squared magnitude at which a point is known to diverge (`|z| >= 2`).
pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// Number of iterations before `c` escapes, or `max_iterations` if it never does.
///
/// Iteration starts from `z = 0` and stops as soon as `|z|^2 >= 4` or the
/// cap is reached, so the result is always in `0..=max_iterations`.
#[inline]
pub fn escape_iterations(c_real: f64, c_imaginary: f64, max_iterations: u32) -> u32 {
    let mut z_real = 0.0f64;
    let mut z_imaginary = 0.0f64;
    let mut i = 0;

    while i < max_iterations
        && z_real * z_real + z_imaginary * z_imaginary < ESCAPE_RADIUS_SQUARED
    {
        let next_real = z_real * z_real - z_imaginary * z_imaginary + c_real;
        z_imaginary = 2.0 * z_real * z_imaginary + c_imaginary;
        z_real = next_real;
        i += 1;
    }
    i
}
