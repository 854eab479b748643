//! Shared types passed between the classifier, scheduler and post writer.
//!
//! A [`WorkList`] is built once by [`classify`](crate::classify) and is
//! read-only afterwards. Nothing downstream mutates a [`PlannedItem`].

use std::path::{Path, PathBuf};

/// What to do with a planned item's source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Byte-for-byte copy (the "no resize" sentinel, size limit 0).
    Copy,
    /// Decode, orient, and fit into a `limit × limit` box.
    Fit(u32),
}

/// Broad media category, derived from a file extension.
///
/// Drives both the link prefix a file is filed under and the tag shape the
/// post writer emits for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// JPEG or PNG.
    Image,
    /// MP3 or Ogg.
    Audio,
    Other,
}

const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];
const PNG_EXTENSIONS: &[&str] = &["png"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// True for `.jpg` / `.jpeg` in any case.
pub fn is_jpeg(path: &Path) -> bool {
    JPEG_EXTENSIONS.contains(&extension_of(path).as_str())
}

impl MediaKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = extension_of(path);
        if JPEG_EXTENSIONS.contains(&ext.as_str()) || PNG_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Image
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Audio
        } else {
            MediaKind::Other
        }
    }
}

/// One unit of work: a source file, where its output lands, and how to make it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Site-relative path with forward slashes, e.g. `images/trip/a.jpg`.
    /// Also the dedup key in the post file.
    pub link: String,
    pub action: Action,
    pub kind: MediaKind,
}

impl PlannedItem {
    /// Bounding-box dimension in pixels, or 0 for a plain copy.
    pub fn size_limit(&self) -> u32 {
        match self.action {
            Action::Copy => 0,
            Action::Fit(limit) => limit,
        }
    }

    /// Source file name, for display.
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// Links synthesized for the designated feature image.
///
/// Both end up in the post's front matter (`image_menu`, `image_feature`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLinks {
    pub menu: String,
    pub feature: String,
}

/// Classifier output: every planned item plus the feature links, if the
/// feature file was present in the input directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkList {
    pub items: Vec<PlannedItem>,
    pub feature: Option<FeatureLinks>,
}

impl WorkList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
