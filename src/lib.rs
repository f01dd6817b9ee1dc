// src/lib.rs

//! Escape-time Mandelbrot renderer with plain-text PPM output.
//!
//! The pipeline is `params` -> `render` -> `ppm`: the parameter file gives
//! the resolution, iteration cap and viewport, the render driver evaluates
//! every pixel in parallel, and the writer serializes the finished image.

/// Pixel type and escape-count coloring.
pub mod color;
/// Optional JSON run configuration.
pub mod config;
/// Library error types.
pub mod error;
/// Escape-time evaluation.
pub mod escape;
/// Parameter file loading and validation.
pub mod params;
/// ASCII PPM writer.
pub mod ppm;
/// Parallel render driver.
pub mod render;
/// Pixel to complex-plane mapping.
pub mod viewport;

pub use color::{colorize, Rgb};
pub use config::Config;
pub use error::{ParamsError, RenderError};
pub use escape::escape_iterations;
pub use params::{RenderParams, ValidationMode};
pub use ppm::{save_ppm, write_ppm};
pub use render::{render, Image, RenderOptions, SchedulingMode};
pub use viewport::{map_to_imaginary, map_to_real, Viewport};
