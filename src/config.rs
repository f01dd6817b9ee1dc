// src/config.rs

//! Run configuration for the renderer.
//!
//! Everything here has a default that reproduces the classic behavior:
//! read `mandelbrot parameters.txt`, write `mandelbrot fractal.ppm`, and use
//! one worker per processor with static row chunks. An optional JSON file
//! can override any part of it; missing fields keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::params::{ValidationMode, PARAMETER_FILE};
use crate::ppm::OUTPUT_FILE;
use crate::render::{available_workers, RenderOptions, SchedulingMode};

/// Optional configuration file, resolved against the working directory.
pub const CONFIG_FILE: &str = "mandelbrot.json";

/// Root of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub render: RenderConfig,
}

/// Where the render parameters come from and how they are checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub parameter_file: PathBuf,
    pub validation: ValidationMode,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            parameter_file: PathBuf::from(PARAMETER_FILE),
            validation: ValidationMode::Strict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub image_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            image_file: PathBuf::from(OUTPUT_FILE),
        }
    }
}

/// Threading settings for the render driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of workers. `None` means one per available processor.
    pub worker_count: Option<usize>,
    pub scheduling: SchedulingMode,
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions::with_workers(
            self.worker_count.unwrap_or_else(available_workers),
            self.scheduling,
        )
    }
}

impl Config {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse configuration")
    }

    /// Loads the configuration at `path`, or the defaults if no file exists there.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_defaults_match_classic_file_names() {
        let config = Config::default();
        assert_eq!(config.input.parameter_file, PathBuf::from(PARAMETER_FILE));
        assert_eq!(config.input.validation, ValidationMode::Strict);
        assert_eq!(config.output.image_file, PathBuf::from(OUTPUT_FILE));
        assert_eq!(config.render.worker_count, None);
        assert_eq!(config.render.scheduling, SchedulingMode::StaticChunks);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "render": { "worker_count": 3 } }"#).unwrap();
        assert_eq!(config.render.worker_count, Some(3));
        assert_eq!(config.render.scheduling, SchedulingMode::StaticChunks);
        assert_eq!(config.input, InputConfig::default());
    }

    #[test]
    fn test_enum_spellings() {
        let config = Config::from_json(
            r#"{
                "input": { "validation": "legacy" },
                "render": { "scheduling": "row-stealing" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.input.validation, ValidationMode::Legacy);
        assert_eq!(config.render.scheduling, SchedulingMode::RowStealing);
    }

    #[test]
    fn test_unknown_scheduling_is_rejected() {
        assert!(Config::from_json(r#"{ "render": { "scheduling": "dynamic" } }"#).is_err());
    }

    #[test]
    fn test_render_options_from_config() {
        let fixed = RenderConfig {
            worker_count: Some(2),
            scheduling: SchedulingMode::RowStealing,
        };
        assert_eq!(
            fixed.options(),
            RenderOptions::with_workers(2, SchedulingMode::RowStealing)
        );
        assert_eq!(
            RenderConfig::default().options().worker_count,
            available_workers()
        );
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = Config::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_rejects_bad_json() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::load_or_default(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid configuration"), "{:#}", err);
    }
}
