//! Grayscale image import/export for heightmaps.

use std::path::Path;

use image::GrayImage;
use rainfall_core::{ErosionError, Heightmap};
use thiserror::Error;

/// Errors that can occur while reading or writing heightmap images.
#[derive(Error, Debug)]
pub enum HeightmapIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Erosion setup failed: {0}")]
    Erosion(#[from] ErosionError),
    #[error("Image of {width}x{height} does not fit in memory")]
    TooLarge { width: usize, height: usize },
}

/// Loads any image the `image` crate can decode as a heightmap.
///
/// Color images are converted to 8-bit luma first; intensity 0 maps to -1.0
/// and 255 to 1.0.
pub fn load_heightmap(path: &Path) -> Result<Heightmap, HeightmapIoError> {
    let gray = image::open(path)?.into_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    Ok(Heightmap::from_gray(width, height, gray.as_raw())?)
}

/// Saves a heightmap as an 8-bit grayscale image; the format follows the
/// file extension.
///
/// Elevations outside `[-1, 1]` are clamped.
pub fn save_heightmap(heightmap: &Heightmap, path: &Path) -> Result<(), HeightmapIoError> {
    let too_large = || HeightmapIoError::TooLarge {
        width: heightmap.width(),
        height: heightmap.height(),
    };
    let width = u32::try_from(heightmap.width()).map_err(|_| too_large())?;
    let height = u32::try_from(heightmap.height()).map_err(|_| too_large())?;

    let img = GrayImage::from_raw(width, height, heightmap.to_gray()).ok_or_else(too_large)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    img.save(path)?;
    Ok(())
}
