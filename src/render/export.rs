//! # Image Export
//!
//! Crops a decoded [`Surface`] to the used extent and encodes it as a PNG.
//! Black pixels become luma 0, everything else luma 255.

use image::{GrayImage, ImageEncoder, Luma};
use std::path::Path;
use thiserror::Error;

use super::surface::Surface;

/// Errors that can occur while exporting a surface.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Image encoding error: {0}")]
    ImageEncode(String),

    #[error("Nothing to export: image extent is {0}x{1}")]
    Empty(u32, u32),
}

/// Copy `[0, width) x [0, height)` of the surface into a grayscale image.
///
/// The crop is clamped to the surface bound.
pub fn to_gray_image(surface: &Surface, width: u32, height: u32) -> GrayImage {
    let width = width.min(surface.max_width() as u32);
    let height = height.min(surface.max_height() as u32);

    GrayImage::from_fn(width, height, |x, y| {
        if surface.pixel(x as usize, y as usize) {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    })
}

/// Encode the cropped surface as PNG bytes.
pub fn to_png(surface: &Surface, width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let img = to_gray_image(surface, width, height);
    if img.width() == 0 || img.height() == 0 {
        return Err(ExportError::Empty(img.width(), img.height()));
    }

    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::L8,
        )
        .map_err(|e: image::ImageError| ExportError::ImageEncode(e.to_string()))?;

    Ok(png_bytes)
}

/// Save the cropped surface to `path`; the format follows the extension.
pub fn save(surface: &Surface, width: u32, height: u32, path: &Path) -> Result<(), ExportError> {
    let img = to_gray_image(surface, width, height);
    if img.width() == 0 || img.height() == 0 {
        return Err(ExportError::Empty(img.width(), img.height()));
    }

    img.save(path)
        .map_err(|e| ExportError::ImageEncode(format!("Failed to save {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_and_colors() {
        let mut surface = Surface::new(64, 64);
        surface.paint_strip(0, 0, 0x80);
        surface.paint_strip(5, 0, 0xFF);

        let img = to_gray_image(&surface, 2, 8);
        assert_eq!(img.dimensions(), (2, 8));
        assert_eq!(img.get_pixel(0, 0), &Luma([0]));
        assert_eq!(img.get_pixel(0, 1), &Luma([255]));
        // Column 1 was never painted
        assert_eq!(img.get_pixel(1, 0), &Luma([255]));
    }

    #[test]
    fn test_png_signature() {
        let mut surface = Surface::new(8, 8);
        surface.paint_strip(0, 0, 0xAA);
        let png = to_png(&surface, 1, 8).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_empty_extent_is_an_error() {
        let surface = Surface::new(8, 8);
        assert!(matches!(to_png(&surface, 0, 0), Err(ExportError::Empty(0, 0))));
    }

    #[test]
    fn test_crop_clamped_to_bound() {
        let surface = Surface::new(4, 8);
        let img = to_gray_image(&surface, 100, 100);
        assert_eq!(img.dimensions(), (4, 8));
    }
}
