//! Output locations under the site root.
//!
//! ```text
//! {base_dir}/
//! ├── static/
//! │   ├── images/{slug}/...              # ordinary images
//! │   ├── images/feature_images/m_*, f_* # menu + feature variants
//! │   ├── audio/{slug}/...
//! │   └── other/{slug}/...
//! └── content/{slug}.en.md               # the post
//! ```
//!
//! Links are built with forward slashes regardless of platform; they go into
//! markdown, not the filesystem. [`SiteLayout::destination`] turns a link into
//! a path.

use std::path::{Path, PathBuf};

/// Directory holding the menu and feature variants of every post.
pub const FEATURE_IMAGE_DIR: &str = "images/feature_images";

/// Site-root-relative output locations for one slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub base_dir: PathBuf,
    pub slug: String,
}

impl SiteLayout {
    pub fn new(base_dir: impl Into<PathBuf>, slug: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            slug: slug.into(),
        }
    }

    pub fn static_dir(&self) -> PathBuf {
        self.base_dir.join("static")
    }

    pub fn content_dir(&self) -> PathBuf {
        self.base_dir.join("content")
    }

    /// File name of the post, `{slug}.en.md`.
    pub fn post_file_name(&self) -> String {
        format!("{}.en.md", self.slug)
    }

    pub fn post_path(&self) -> PathBuf {
        self.content_dir().join(self.post_file_name())
    }

    pub fn image_link(&self, name: &str) -> String {
        format!("images/{}/{}", self.slug, name)
    }

    pub fn audio_link(&self, name: &str) -> String {
        format!("audio/{}/{}", self.slug, name)
    }

    pub fn other_link(&self, name: &str) -> String {
        format!("other/{}/{}", self.slug, name)
    }

    pub fn menu_link(name: &str) -> String {
        format!("{FEATURE_IMAGE_DIR}/m_{name}")
    }

    pub fn feature_link(name: &str) -> String {
        format!("{FEATURE_IMAGE_DIR}/f_{name}")
    }

    /// Absolute output path for a link.
    pub fn destination(&self, link: &str) -> PathBuf {
        join_link(&self.static_dir(), link)
    }

    /// Output directories for display, in the order they are reported.
    pub fn output_dirs(&self) -> Vec<(&'static str, PathBuf)> {
        let static_dir = self.static_dir();
        vec![
            ("Image", static_dir.join("images").join(&self.slug)),
            ("Feature", join_link(&static_dir, FEATURE_IMAGE_DIR)),
            ("Audio", static_dir.join("audio").join(&self.slug)),
            ("Other", static_dir.join("other").join(&self.slug)),
            ("Page", self.content_dir()),
        ]
    }
}

fn join_link(base: &Path, link: &str) -> PathBuf {
    link.split('/').fold(base.to_path_buf(), |p, s| p.join(s))
}
