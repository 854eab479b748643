//! EXIF orientation correction.
//!
//! Cameras store pixels in sensor order and record how the picture should be
//! turned in the EXIF `Orientation` tag (0x0112). Before fitting an image we
//! undo that, so outputs display upright in browsers that ignore EXIF.
//!
//! | Code | Correction |
//! |---|---|
//! | 1 | none |
//! | 2 | flip horizontal |
//! | 3 | rotate 180° |
//! | 4 | flip horizontal, rotate 180° |
//! | 5 | flip vertical, rotate 270° |
//! | 6 | rotate 270° |
//! | 7 | flip vertical, rotate 90° |
//! | 8 | rotate 90° |
//!
//! Rotations are counter-clockwise. Flips are applied before the rotation.

use image::DynamicImage;

/// A single geometric step. Rotation angles are counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    FlipHorizontal,
    FlipVertical,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Transform {
    fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Transform::FlipHorizontal => img.fliph(),
            Transform::FlipVertical => img.flipv(),
            // `image` rotates clockwise.
            Transform::Rotate90 => img.rotate270(),
            Transform::Rotate180 => img.rotate180(),
            Transform::Rotate270 => img.rotate90(),
        }
    }
}

/// The eight EXIF orientation values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90Cw,
    Transverse,
    Rotate270Cw,
}

impl Orientation {
    /// Map a raw tag value. Anything outside 1-8 is treated as 1.
    pub fn from_exif(code: u32) -> Self {
        match code {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90Cw,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270Cw,
            _ => Orientation::Normal,
        }
    }

    pub fn exif_code(self) -> u32 {
        match self {
            Orientation::Normal => 1,
            Orientation::FlipHorizontal => 2,
            Orientation::Rotate180 => 3,
            Orientation::FlipVertical => 4,
            Orientation::Transpose => 5,
            Orientation::Rotate90Cw => 6,
            Orientation::Transverse => 7,
            Orientation::Rotate270Cw => 8,
        }
    }

    /// Steps that bring a stored image upright, in application order.
    pub fn corrections(self) -> &'static [Transform] {
        use Transform::*;
        match self {
            Orientation::Normal => &[],
            Orientation::FlipHorizontal => &[FlipHorizontal],
            Orientation::Rotate180 => &[Rotate180],
            Orientation::FlipVertical => &[FlipHorizontal, Rotate180],
            Orientation::Transpose => &[FlipVertical, Rotate270],
            Orientation::Rotate90Cw => &[Rotate270],
            Orientation::Transverse => &[FlipVertical, Rotate90],
            Orientation::Rotate270Cw => &[Rotate90],
        }
    }

    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        self.corrections()
            .iter()
            .fold(img, |img, step| step.apply(img))
    }
}
