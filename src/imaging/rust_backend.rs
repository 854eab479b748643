//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP, TIFF) | `image` crate, format sniffed from content |
//! | EXIF orientation | `exif` (kamadak-exif) `Reader::read_from_container` |
//! | Orientation correction | `DynamicImage::{fliph, flipv, rotate90, rotate180, rotate270}` |
//! | Fit | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` with configured quality |
//! | Encode other | `DynamicImage::save_with_format`, format from extension |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::orientation::Orientation;
use super::params::FitParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Read the raw EXIF orientation value from a JPEG/TIFF/PNG/WebP container.
fn read_exif_orientation(path: &Path) -> Result<u32, BackendError> {
    let file = File::open(path).map_err(BackendError::Io)?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| BackendError::ProcessingFailed(format!("No EXIF data: {}", e)))?;
    let field = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .ok_or_else(|| BackendError::ProcessingFailed("No orientation tag".into()))?;
    field
        .value
        .get_uint(0)
        .ok_or_else(|| BackendError::ProcessingFailed("Orientation tag is not an integer".into()))
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let format = ImageFormat::from_path(path).map_err(|_| {
        BackendError::ProcessingFailed(format!("Unsupported output format: {}", path.display()))
    })?;

    match format {
        ImageFormat::Jpeg => save_jpeg(img, path, quality),
        other => img.save_with_format(path, other).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to save {}: {}", path.display(), e))
        }),
    }
}

/// Encode and save as JPEG. Alpha is dropped; JPEG has no alpha channel.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn read_orientation(&self, path: &Path) -> Result<Orientation, BackendError> {
        read_exif_orientation(path).map(Orientation::from_exif)
    }

    fn fit(&self, params: &FitParams) -> Result<Dimensions, BackendError> {
        let img = params.orientation.apply(load_image(&params.source)?);
        let (width, height) = calculate_fit_dimensions((img.width(), img.height()), params.limit);

        let fitted = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        save_image(&fitted, &params.output, params.quality.value())?;
        Ok(Dimensions { width, height })
    }
}
