// src/params.rs

//! Loads the render parameters from the whitespace-delimited parameter file.
//!
//! The file holds seven values in a fixed order:
//!
//! ```text
//! <image_width> <image_height> <max_iterations>
//! <min_real> <max_real> <min_imaginary> <max_imaginary>
//! ```
//!
//! Line breaks carry no meaning; any whitespace separates values and
//! anything after the seventh value is ignored.

use std::fs;
use std::path::Path;
use std::str::{FromStr, SplitWhitespace};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::ParamsError;
use crate::viewport::Viewport;

/// Default parameter file name, resolved against the working directory.
pub const PARAMETER_FILE: &str = "mandelbrot parameters.txt";

/// How strictly the parameter file is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Reject missing, malformed, or out-of-range values.
    #[default]
    Strict,
    /// Accept anything. Once a value is missing or unparsable it and every
    /// later value read as zero, and no range checks are made.
    Legacy,
}

/// Image resolution, iteration cap, and viewport for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub image_width: usize,
    pub image_height: usize,
    pub max_iterations: u32,
    pub viewport: Viewport,
}

impl RenderParams {
    /// Reads and parses the parameter file at `path`.
    ///
    /// Only I/O failures are `Open` errors. Bytes that are not UTF-8 are
    /// replaced, so they surface as malformed tokens or are ignored when they
    /// follow the seventh value.
    pub fn load(path: &Path, mode: ValidationMode) -> Result<Self, ParamsError> {
        let bytes = fs::read(path).map_err(|source| ParamsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Self::parse(&String::from_utf8_lossy(&bytes), mode)
    }

    /// Parses parameter text. In strict mode the result is also validated.
    pub fn parse(text: &str, mode: ValidationMode) -> Result<Self, ParamsError> {
        let mut tokens = Tokens::new(text, mode);

        let image_width = tokens.next("image_width")?;
        let image_height = tokens.next("image_height")?;
        let max_iterations = tokens.next("max_iterations")?;
        let min_real = tokens.next("min_real")?;
        let max_real = tokens.next("max_real")?;
        let min_imaginary = tokens.next("min_imaginary")?;
        let max_imaginary = tokens.next("max_imaginary")?;

        let params = RenderParams {
            image_width,
            image_height,
            max_iterations,
            viewport: Viewport::new(min_real, max_real, min_imaginary, max_imaginary),
        };

        if mode == ValidationMode::Strict {
            params.validate()?;
        }
        Ok(params)
    }

    /// Checks for a positive resolution and cap and a non-degenerate viewport.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(ParamsError::Invalid(format!(
                "image dimensions must be positive, got {}x{}",
                self.image_width, self.image_height
            )));
        }
        if self.max_iterations == 0 {
            return Err(ParamsError::Invalid(
                "max_iterations must be positive".to_string(),
            ));
        }
        if self.pixel_count().is_none() {
            return Err(ParamsError::Invalid(format!(
                "{}x{} pixels overflows the address space",
                self.image_width, self.image_height
            )));
        }
        self.viewport.validate().map_err(ParamsError::Invalid)
    }

    /// `image_width * image_height`, or `None` on overflow.
    pub fn pixel_count(&self) -> Option<usize> {
        self.image_width.checked_mul(self.image_height)
    }
}

/// Token cursor over the parameter text.
///
/// In legacy mode it mimics a failed stream: after the first bad token every
/// read yields the type's default.
struct Tokens<'a> {
    iter: SplitWhitespace<'a>,
    mode: ValidationMode,
    failed: bool,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str, mode: ValidationMode) -> Self {
        Self {
            iter: text.split_whitespace(),
            mode,
            failed: false,
        }
    }

    fn next<T>(&mut self, field: &'static str) -> Result<T, ParamsError>
    where
        T: FromStr + Default,
    {
        if self.failed {
            warn!("Parameter {} not read; using 0", field);
            return Ok(T::default());
        }

        let error = match self.iter.next() {
            Some(token) => match token.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(_) => ParamsError::Malformed {
                    field,
                    token: token.to_string(),
                },
            },
            None => ParamsError::Missing(field),
        };

        match self.mode {
            ValidationMode::Strict => Err(error),
            ValidationMode::Legacy => {
                warn!("{}; using 0", error);
                self.failed = true;
                Ok(T::default())
            }
        }
    }
}
