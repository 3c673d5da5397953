//! Image serialization.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{color_to_rgb8, ImageBuffer, RenderError};

/// Write the image as plain-text PPM (P3), gamma corrected.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> Result<(), RenderError> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb8(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save the image as a PPM file.
pub fn save_ppm(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let file = File::create(path.as_ref())?;
    write_ppm(image, BufWriter::new(file))?;
    log::info!("Saved {}", path.as_ref().display());
    Ok(())
}

/// Save the image through the `image` crate as PNG (or whatever format the
/// extension names).
pub fn save_png(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let buffer = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8()).ok_or(
        RenderError::InvalidResolution {
            width: image.width,
            height: image.height,
        },
    )?;

    buffer.save(path.as_ref())?;
    log::info!("Saved {}", path.as_ref().display());
    Ok(())
}
