// src/ppm.rs

//! Plain-text (P3) PPM output.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use tempfile::NamedTempFile;

use crate::render::Image;

/// Default output file name, resolved against the working directory.
pub const OUTPUT_FILE: &str = "mandelbrot fractal.ppm";

/// Magic number of the ASCII PPM variant.
pub const PPM_MAGIC: &str = "P3";

/// Largest channel value written in the header.
pub const MAX_CHANNEL_VALUE: u8 = u8::MAX;

/// Writes `image` as ASCII PPM.
///
/// The three header lines are followed by exactly `width * height` triples in
/// row-major order, one image row per line.
pub fn write_ppm<W: Write>(image: &Image, mut out: W) -> io::Result<()> {
    writeln!(out, "{}", PPM_MAGIC)?;
    writeln!(out, "{} {}", image.width(), image.height())?;
    writeln!(out, "{}", MAX_CHANNEL_VALUE)?;

    for row in image.rows() {
        for (x, pixel) in row.iter().enumerate() {
            if x > 0 {
                out.write_all(b" ")?;
            }
            write!(out, "{}", pixel)?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// Writes `image` to `path`, replacing any existing file.
///
/// The image goes to a temporary file next to `path` first and is renamed into
/// place only once it is complete, so a failed write leaves no partial image.
pub fn save_ppm(image: &Image, path: &Path) -> Result<()> {
    replace_file(path, |out| write_ppm(image, out))?;
    debug!(
        "Wrote {}x{} image to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

fn replace_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create output image {}", path.display()))?;

    {
        let mut out = BufWriter::new(staged.as_file_mut());
        write(&mut out)
            .and_then(|()| out.flush())
            .with_context(|| format!("Failed to write output image {}", path.display()))?;
    }

    staged
        .persist(path)
        .with_context(|| format!("Failed to move output image into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{RenderParams, ValidationMode};
    use crate::render::{render, RenderOptions};
    use test_log::test;

    fn sample_image() -> Image {
        let params =
            RenderParams::parse("4 2 10 -2.0 1.0 -1.0 1.0", ValidationMode::Strict).unwrap();
        render(&params, RenderOptions::single_threaded()).unwrap()
    }

    fn to_string(image: &Image) -> String {
        let mut out = Vec::new();
        write_ppm(image, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_lines() {
        let text = to_string(&sample_image());
        assert!(text.starts_with("P3\n4 2\n255\n"), "{:?}", text);
    }

    #[test]
    fn test_body_has_one_triple_per_pixel() {
        let image = sample_image();
        let text = to_string(&image);
        let body: Vec<u32> = text
            .lines()
            .skip(3)
            .flat_map(str::split_whitespace)
            .map(|v| v.parse().unwrap())
            .collect();

        assert_eq!(body.len(), 8 * 3);
        assert!(body.iter().all(|&v| v <= 255));

        let expected: Vec<u32> = image
            .pixels()
            .iter()
            .flat_map(|p| [p.r as u32, p.g as u32, p.b as u32])
            .collect();
        assert_eq!(body, expected);
    }

    #[test]
    fn test_one_line_per_row() {
        let text = to_string(&sample_image());
        let rows: Vec<&str> = text.lines().skip(3).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|row| row.split_whitespace().count() == 4 * 3));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_empty_image_writes_header_only() {
        let params = RenderParams::parse("0 3 10 -2 1 -1 1", ValidationMode::Legacy).unwrap();
        let image = render(&params, RenderOptions::single_threaded()).unwrap();
        assert_eq!(to_string(&image), "P3\n0 3\n255\n");
    }

    #[test]
    fn test_save_ppm_writes_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(OUTPUT_FILE);
        let image = sample_image();

        save_ppm(&image, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_string(&image));
    }

    #[test]
    fn test_save_ppm_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(OUTPUT_FILE);
        std::fs::write(&path, "stale").unwrap();
        let image = sample_image();

        save_ppm(&image, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), to_string(&image));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_leaves_no_partial_image() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(OUTPUT_FILE);

        let err = replace_file(&path, |out| {
            out.write_all(b"P3\n4 2\n255\n0 0 0")?;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        })
        .unwrap_err();

        assert!(err.to_string().contains("Failed to write output image"));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_write_keeps_previous_image() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(OUTPUT_FILE);
        let previous = "P3\n1 1\n255\n1 2 3\n";
        std::fs::write(&path, previous).unwrap();

        let result = replace_file(&path, |out| {
            out.write_all(b"P3\n")?;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), previous);
    }

    #[test]
    fn test_save_ppm_reports_bad_path() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("missing").join(OUTPUT_FILE);
        let err = save_ppm(&sample_image(), &path).unwrap_err();
        assert!(err.to_string().contains("Failed to create output image"));
    }
}
