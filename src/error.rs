// src/error.rs

//! Error types shared by the parameter loader and the render driver.

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or checking the render parameters.
///
/// Every variant is a configuration error: the binary reports it and exits
/// with status 1 without touching the output image.
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Could not open parameter file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Missing value for {0}")]
    Missing(&'static str),
    #[error("Malformed value for {field}: {token:?}")]
    Malformed { field: &'static str, token: String },
    #[error("Invalid parameters: {0}")]
    Invalid(String),
}

/// Failures of the render phase.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image of {width}x{height} pixels does not fit in memory")]
    TooLarge { width: usize, height: usize },
    #[error("Failed to allocate pixel buffer: {0}")]
    Allocation(#[from] TryReserveError),
    #[error("Failed to spawn render worker: {0}")]
    Spawn(#[source] std::io::Error),
}
