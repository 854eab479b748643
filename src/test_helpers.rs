//! Shared test utilities: scratch files and synthetic images.
//!
//! The images are generated in-process so the test suite needs no fixture
//! files on disk. [`jpeg_with_orientation`] splices a minimal EXIF APP1
//! segment into an encoded JPEG so orientation handling can be exercised
//! end to end.

use image::{ImageEncoder, RgbImage};
use std::fs;
use std::path::Path;

/// Create an empty file, creating parent directories as needed.
pub fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

/// Encode a `width × height` gradient as JPEG bytes.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Write a valid JPEG of the given size.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, jpeg_bytes(width, height)).unwrap();
}

/// Write a valid PNG of the given size.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]))
        .save(path)
        .unwrap();
}

/// Big-endian TIFF block holding one IFD0 entry: Orientation (0x0112) = `code`.
fn exif_orientation_tiff(code: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&code.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff
}

/// JPEG bytes carrying an EXIF orientation tag, inserted right after SOI.
pub fn jpeg_with_orientation(width: u32, height: u32, code: u16) -> Vec<u8> {
    let jpeg = jpeg_bytes(width, height);
    let tiff = exif_orientation_tiff(code);

    let mut payload = b"Exif\x00\x00".to_vec();
    payload.extend_from_slice(&tiff);
    let segment_len = (payload.len() + 2) as u16;

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Write an EXIF-tagged JPEG to `path`.
pub fn create_oriented_jpeg(path: &Path, width: u32, height: u32, code: u16) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, jpeg_with_orientation(width, height, code)).unwrap();
}
