// src/render.rs

//! The parallel render driver.
//!
//! Every pixel is a pure function of its `(x, y)` position and the
//! `RenderParams`, so the buffer is split into disjoint row ranges and each
//! worker writes only its own slice. No locks guard the pixels themselves;
//! `std::thread::scope` joins every worker before `render` returns, which is
//! the barrier between the render phase and the image writer.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::thread;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::color::{colorize, Rgb};
use crate::error::RenderError;
use crate::escape::escape_iterations;
use crate::params::RenderParams;

/// How rows are handed out to the workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulingMode {
    /// One contiguous, near-equal stripe of rows per worker, fixed up front.
    #[default]
    StaticChunks,
    /// Workers take the next unrendered row until none are left.
    RowStealing,
}

/// Explicit threading configuration for a single render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Number of worker threads. Values below 1 are treated as 1.
    pub worker_count: usize,
    pub scheduling: SchedulingMode,
}

impl RenderOptions {
    /// Renders everything on the calling thread.
    pub fn single_threaded() -> Self {
        Self {
            worker_count: 1,
            scheduling: SchedulingMode::StaticChunks,
        }
    }

    pub fn with_workers(worker_count: usize, scheduling: SchedulingMode) -> Self {
        Self {
            worker_count,
            scheduling,
        }
    }

    /// Workers actually used for an image `image_height` rows tall.
    ///
    /// At least one, and never more than one per row.
    pub fn effective_workers(&self, image_height: usize) -> usize {
        self.worker_count.clamp(1, image_height.max(1))
    }
}

impl Default for RenderOptions {
    /// One worker per available processor, static chunks.
    fn default() -> Self {
        Self {
            worker_count: available_workers(),
            scheduling: SchedulingMode::StaticChunks,
        }
    }
}

/// Processor count reported by the OS, or 1 if it cannot be determined.
pub fn available_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// A rendered image: `width * height` pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Image {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Iterates over the image rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        // A zero-width image has no pixels, so the chunk size never matters there.
        self.pixels.chunks(self.width.max(1))
    }
}

/// Renders the Mandelbrot image described by `params`.
///
/// The output depends only on `params`; worker count and scheduling mode
/// change how fast it is produced, never what is produced.
pub fn render(params: &RenderParams, options: RenderOptions) -> Result<Image, RenderError> {
    let width = params.image_width;
    let height = params.image_height;
    let len = params
        .pixel_count()
        .ok_or(RenderError::TooLarge { width, height })?;

    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len)?;
    pixels.resize(len, Rgb::BLACK);

    if len > 0 {
        let workers = options.effective_workers(height);
        debug!(
            "Rendering {}x{} with {} worker(s), {:?}",
            width, height, workers, options.scheduling
        );
        match options.scheduling {
            SchedulingMode::StaticChunks => render_static(params, &mut pixels, workers)?,
            SchedulingMode::RowStealing => render_row_stealing(params, &mut pixels, workers)?,
        }
    }

    Ok(Image {
        width,
        height,
        pixels,
    })
}

/// Renders one pixel row; `row.len()` is the image width.
fn render_row(params: &RenderParams, row: &mut [Rgb], y: usize) {
    let width = params.image_width;
    let c_imaginary = params.viewport.imaginary_at(y, params.image_height);
    for (x, pixel) in row.iter_mut().enumerate() {
        let c_real = params.viewport.real_at(x, width);
        *pixel = colorize(escape_iterations(c_real, c_imaginary, params.max_iterations));
    }
}

/// Renders the rows in `stripe`, the first of which is image row `start_y`.
fn render_stripe(params: &RenderParams, stripe: &mut [Rgb], start_y: usize) {
    for (offset, row) in stripe.chunks_exact_mut(params.image_width).enumerate() {
        render_row(params, row, start_y + offset);
    }
}

fn render_static(
    params: &RenderParams,
    buffer: &mut [Rgb],
    workers: usize,
) -> Result<(), RenderError> {
    if workers <= 1 {
        render_stripe(params, buffer, 0);
        return Ok(());
    }

    let width = params.image_width;
    let height = params.image_height;
    let rows_per_worker = height / workers;
    let remainder = height % workers;

    // Split the buffer into disjoint stripes up front.
    let mut stripes = Vec::with_capacity(workers);
    let mut remaining = buffer;
    let mut start_y = 0;

    for i in 0..workers {
        let rows = rows_per_worker + usize::from(i < remainder);
        let (stripe, rest) = remaining.split_at_mut(rows * width);
        debug!("Worker {} takes rows {}..{}", i, start_y, start_y + rows);
        stripes.push((stripe, start_y));
        remaining = rest;
        start_y += rows;
    }

    thread::scope(|s| -> Result<(), RenderError> {
        for (i, (stripe, start_y)) in stripes.into_iter().enumerate() {
            thread::Builder::new()
                .name(format!("render-{}", i))
                .spawn_scoped(s, move || render_stripe(params, stripe, start_y))
                .map_err(RenderError::Spawn)?;
        }
        Ok(())
    })
}

fn render_row_stealing(
    params: &RenderParams,
    buffer: &mut [Rgb],
    workers: usize,
) -> Result<(), RenderError> {
    let rows = Mutex::new(buffer.chunks_exact_mut(params.image_width).enumerate());

    thread::scope(|s| -> Result<(), RenderError> {
        for i in 0..workers {
            let rows = &rows;
            thread::Builder::new()
                .name(format!("render-{}", i))
                .spawn_scoped(s, move || {
                    let mut rendered = 0usize;
                    loop {
                        // Hold the lock only long enough to claim a row.
                        let next = match rows.lock() {
                            Ok(mut rows) => rows.next(),
                            Err(_) => break,
                        };
                        let Some((y, row)) = next else { break };
                        render_row(params, row, y);
                        rendered += 1;
                    }
                    trace!("Worker {} rendered {} row(s)", i, rendered);
                })
                .map_err(RenderError::Spawn)?;
        }
        Ok(())
    })
}
