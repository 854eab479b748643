//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the capability seam between the transform
//! logic and the pixel work: reading the EXIF orientation and producing a
//! fitted output. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::orientation::Orientation;
use super::params::FitParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across the worker pool.
pub trait ImageBackend: Sync {
    /// Read the EXIF orientation tag.
    ///
    /// Returns an error when the file has no EXIF block, no orientation tag,
    /// or the block cannot be parsed. Callers treat every error as
    /// [`Orientation::Normal`].
    fn read_orientation(&self, path: &Path) -> Result<Orientation, BackendError>;

    /// Decode, orient, fit, and save. Returns the output dimensions.
    fn fit(&self, params: &FitParams) -> Result<Dimensions, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        /// Orientation returned for every read; `None` simulates a missing tag.
        pub orientation: Option<Orientation>,
        /// Dimensions reported by `fit`.
        pub output_dimensions: Option<Dimensions>,
        /// Sources whose `fit` call fails.
        pub failing_sources: HashSet<PathBuf>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        ReadOrientation(String),
        Fit {
            source: String,
            output: String,
            limit: u32,
            orientation: u32,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_orientation(orientation: Orientation) -> Self {
            Self {
                orientation: Some(orientation),
                ..Self::default()
            }
        }

        pub fn failing_on(sources: impl IntoIterator<Item = PathBuf>) -> Self {
            Self {
                failing_sources: sources.into_iter().collect(),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Recorded fit operations only, sorted by output path so tests do
        /// not depend on worker completion order.
        pub fn fits(&self) -> Vec<RecordedOp> {
            let mut fits: Vec<RecordedOp> = self
                .get_operations()
                .into_iter()
                .filter(|op| matches!(op, RecordedOp::Fit { .. }))
                .collect();
            fits.sort_by_key(|op| match op {
                RecordedOp::Fit { output, .. } => output.clone(),
                RecordedOp::ReadOrientation(p) => p.clone(),
            });
            fits
        }
    }

    impl ImageBackend for MockBackend {
        fn read_orientation(&self, path: &Path) -> Result<Orientation, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::ReadOrientation(path.to_string_lossy().to_string()));

            self.orientation
                .ok_or_else(|| BackendError::ProcessingFailed("No mock orientation".to_string()))
        }

        fn fit(&self, params: &FitParams) -> Result<Dimensions, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Fit {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                limit: params.limit,
                orientation: params.orientation.exif_code(),
                quality: params.quality.value(),
            });

            if self.failing_sources.contains(&params.source) {
                return Err(BackendError::ProcessingFailed(format!(
                    "Failed to decode {}",
                    params.source.display()
                )));
            }
            Ok(self.output_dimensions.unwrap_or(Dimensions {
                width: params.limit,
                height: params.limit,
            }))
        }
    }

    #[test]
    fn mock_records_fit() {
        let backend = MockBackend::new();

        let dims = backend
            .fit(&FitParams {
                source: "/source.jpg".into(),
                output: "/output.jpg".into(),
                limit: 800,
                orientation: Orientation::Rotate90Cw,
                quality: super::super::params::Quality::new(90),
            })
            .unwrap();
        assert_eq!(dims, Dimensions { width: 800, height: 800 });

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Fit {
                limit: 800,
                orientation: 6,
                quality: 90,
                ..
            }
        ));
    }

    #[test]
    fn mock_missing_orientation_is_error() {
        let backend = MockBackend::new();
        assert!(backend.read_orientation(Path::new("/a.jpg")).is_err());

        let backend = MockBackend::with_orientation(Orientation::Rotate180);
        assert_eq!(
            backend.read_orientation(Path::new("/a.jpg")).unwrap(),
            Orientation::Rotate180
        );
    }

    #[test]
    fn mock_fails_configured_sources() {
        let backend = MockBackend::failing_on([PathBuf::from("/bad.jpg")]);
        let result = backend.fit(&FitParams {
            source: "/bad.jpg".into(),
            output: "/out.jpg".into(),
            limit: 10,
            orientation: Orientation::Normal,
            quality: Default::default(),
        });
        assert!(result.is_err());
    }
}
