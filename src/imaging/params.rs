//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! [`operations`](super::operations), which decides what to produce for a
//! planned item, and the [`backend`](super::backend), which does the pixel
//! work. Tests swap in a mock backend without touching operation logic.

use super::orientation::Orientation;
use std::path::PathBuf;

/// Quality setting for lossy image encoding, always within 1-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Parameters for an orient-and-fit operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FitParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Bounding box edge in pixels.
    pub limit: u32,
    /// Correction applied before fitting.
    pub orientation: Orientation,
    /// Used only when the output is JPEG.
    pub quality: Quality,
}
