//! Transform engine. Pure Rust, no system image libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **EXIF orientation** | `exif` (kamadak-exif) |
//! | **Orient → fit → save** | `image`, Lanczos3 resampling |
//! | **Copy** | `std::io::copy`, SHA-256 comparison via `sha2` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Orientation**: EXIF code → geometric corrections
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`transform`] of one planned item

pub mod backend;
mod calculations;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_fit_dimensions;
pub use operations::{
    TransformError, TransformOptions, TransformOutcome, ensure_dir, ensure_parent_dir, transform,
};
pub use orientation::Orientation;
pub use params::{FitParams, Quality};
pub use rust_backend::RustBackend;
