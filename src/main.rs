// In src/main.rs

//! Entry point: load parameters, render, write the PPM image.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use log::{error, info};

use mandelbrot_ppm::config::{Config, CONFIG_FILE};
use mandelbrot_ppm::{render, save_ppm, ParamsError, RenderParams};

/// Parameter file or configuration could not be used.
const EXIT_CONFIGURATION_ERROR: u8 = 1;
/// Render or output failed after the parameters were accepted.
const EXIT_RUNTIME_ERROR: u8 = 2;

fn main() -> ExitCode {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting mandelbrot-ppm...");

    let config = match Config::load_or_default(Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIGURATION_ERROR);
        }
    };

    // The output file is not touched until the parameters are in hand.
    let params = match RenderParams::load(&config.input.parameter_file, config.input.validation) {
        Ok(params) => params,
        Err(e @ ParamsError::Open { .. }) => {
            println!("Could not open file!");
            error!("{}", e);
            return ExitCode::from(EXIT_CONFIGURATION_ERROR);
        }
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(EXIT_CONFIGURATION_ERROR);
        }
    };
    info!(
        "Parameters loaded: {}x{}, {} iterations, viewport {:?}",
        params.image_width, params.image_height, params.max_iterations, params.viewport
    );

    match render_and_save(&config, &params) {
        Ok(()) => {
            info!("mandelbrot-ppm exited successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}. Root cause: {:?}", e, e.root_cause());
            ExitCode::from(EXIT_RUNTIME_ERROR)
        }
    }
}

fn render_and_save(config: &Config, params: &RenderParams) -> anyhow::Result<()> {
    let options = config.render.options();

    let started = Instant::now();
    let image = render(params, options).context("Failed to render image")?;
    info!(
        "Rendered {} pixels with {} worker(s) ({:?}) in {:.3?}",
        image.pixels().len(),
        options.effective_workers(image.height()),
        options.scheduling,
        started.elapsed()
    );

    save_ppm(&image, &config.output.image_file)?;
    info!("Image written to {}", config.output.image_file.display());
    Ok(())
}
