//! Image serialization for tone-mapped frames.

use crate::error::RenderResult;
use crate::DisplayImage;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// File formats a frame can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain-text PPM (`P3`)
    Ppm,
    /// PNG via the `image` crate
    Png,
}

impl OutputFormat {
    /// Pick a format from the file extension, defaulting to PPM.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => OutputFormat::Png,
            _ => OutputFormat::Ppm,
        }
    }
}

/// Write an image as plain-text PPM: a `P3` header, then one `r g b` line
/// per pixel from the top-left.
pub fn write_ppm<W: Write>(image: &DisplayImage, mut writer: W) -> RenderResult<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for [r, g, b] in &image.pixels {
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save an image as plain-text PPM.
pub fn save_ppm(image: &DisplayImage, path: impl AsRef<Path>) -> RenderResult<()> {
    let file = File::create(path)?;
    write_ppm(image, BufWriter::new(file))
}

/// Encode an image as 8-bit RGB PNG.
pub fn write_png<W: Write>(image: &DisplayImage, writer: W) -> RenderResult<()> {
    PngEncoder::new(writer).write_image(
        &image.to_bytes(),
        image.width,
        image.height,
        ColorType::Rgb8.into(),
    )?;
    Ok(())
}

/// Save an image as PNG.
pub fn save_png(image: &DisplayImage, path: impl AsRef<Path>) -> RenderResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_png(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write an image to any byte sink in the given format.
pub fn write<W: Write>(image: &DisplayImage, writer: W, format: OutputFormat) -> RenderResult<()> {
    match format {
        OutputFormat::Ppm => write_ppm(image, writer),
        OutputFormat::Png => write_png(image, writer),
    }
}

/// Save an image in the given format.
pub fn save(image: &DisplayImage, path: impl AsRef<Path>, format: OutputFormat) -> RenderResult<()> {
    let path = path.as_ref();
    log::info!("Writing {}x{} image to {}", image.width, image.height, path.display());
    match format {
        OutputFormat::Ppm => save_ppm(image, path),
        OutputFormat::Png => save_png(image, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_image() -> DisplayImage {
        DisplayImage {
            width: 2,
            height: 1,
            pixels: vec![[255, 0, 0], [1, 2, 3]],
        }
    }

    #[test]
    fn test_write_ppm() {
        let mut out = Vec::new();
        write_ppm(&tiny_image(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 0 0\n1 2 3\n");
    }

    #[test]
    fn test_write_png_to_memory() {
        let mut out = Vec::new();
        write(&tiny_image(), &mut out, OutputFormat::Png).unwrap();

        let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(1, 0).0, [1, 2, 3]);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out.png")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("out.PNG")), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("image.ppm")), OutputFormat::Ppm);
        assert_eq!(OutputFormat::from_path(Path::new("image")), OutputFormat::Ppm);
    }

    #[test]
    fn test_save_round_trip_to_disk() {
        let dir = std::env::temp_dir().join(format!("lumen_output_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let ppm = dir.join("tiny.ppm");
        save(&tiny_image(), &ppm, OutputFormat::Ppm).unwrap();
        assert!(std::fs::read_to_string(&ppm).unwrap().starts_with("P3\n2 1\n"));

        let png = dir.join("tiny.png");
        save(&tiny_image(), &png, OutputFormat::Png).unwrap();
        let decoded = image::open(&png).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(1, 0).0, [1, 2, 3]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
