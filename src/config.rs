//! Bundle configuration.
//!
//! A bundle is described by a single TOML file that sits next to the media
//! it describes. The directory containing the config file *is* the input
//! directory, so a typical layout looks like:
//!
//! ```text
//! drafts/trip/
//! ├── gmb.toml        # this file (never copied)
//! ├── hero.jpg        # feature image
//! ├── a.jpg
//! ├── b.png
//! ├── c.mp3
//! └── notes.txt
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! base_dir = "site"         # Site root; relative paths resolve against the working directory
//! slug = "trip"             # Content collection identifier (required)
//! feature = "hero.jpg"      # Designated feature image (optional)
//!
//! img_limit = 800           # Bounding box for ordinary JPEGs
//! menu_limit = 900          # Bounding box for the menu-sized feature variant
//! feature_limit = 1280      # Bounding box for the full-size feature variant
//! jpeg_quality = 95         # JPEG encoding quality (1-100)
//!
//! ignore = ["Thumbs.db"]    # Extra file names to leave out of the bundle
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "gmb.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Bundle configuration loaded from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// Site root. Outputs land under `static/` and `content/` below it.
    pub base_dir: String,
    /// Content collection identifier; names the output subdirectories and the post.
    pub slug: String,
    /// File name of the designated feature image, if any.
    pub feature: Option<String>,
    /// Bounding box for ordinary JPEG images.
    pub img_limit: u32,
    /// Bounding box for the menu-sized feature variant.
    pub menu_limit: u32,
    /// Bounding box for the full-size feature variant.
    pub feature_limit: u32,
    /// JPEG encoding quality for resized outputs.
    pub jpeg_quality: u32,
    /// File names in the input directory that are never bundled.
    pub ignore: Vec<String>,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            base_dir: String::new(),
            slug: String::new(),
            feature: None,
            img_limit: 800,
            menu_limit: 900,
            feature_limit: 1280,
            jpeg_quality: 95,
            ignore: Vec::new(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl BundleConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_dir.trim().is_empty() {
            return Err(ConfigError::Validation("base_dir must be set".into()));
        }
        if self.slug.trim().is_empty() {
            return Err(ConfigError::Validation("slug must be set".into()));
        }
        if self.slug.contains(['/', '\\']) || self.slug == "." || self.slug == ".." {
            return Err(ConfigError::Validation(format!(
                "slug must be a single path segment, got {:?}",
                self.slug
            )));
        }
        for (key, value) in [
            ("img_limit", self.img_limit),
            ("menu_limit", self.menu_limit),
            ("feature_limit", self.feature_limit),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation(format!("{key} must be non-zero")));
            }
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Validation(
                "jpeg_quality must be 1-100".into(),
            ));
        }
        if self.feature.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "feature must be a file name when set".into(),
            ));
        }
        Ok(())
    }

    /// Resolve `base_dir` against `cwd`, the directory gmb was started in.
    ///
    /// The config file's location plays no part: `base_dir = "site"` means
    /// `./site` wherever the config lives.
    pub fn resolve_base_dir(&self, cwd: &Path) -> PathBuf {
        let base = Path::new(&self.base_dir);
        if base.is_absolute() {
            base.to_path_buf()
        } else {
            cwd.join(base)
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective worker count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, never below 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Load, parse and validate a config file.
pub fn load_config(path: &Path) -> Result<BundleConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: BundleConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// The input directory for a config file: the file's own directory, made
/// absolute against the current working directory.
pub fn input_dir(config_path: &Path) -> io::Result<PathBuf> {
    let parent = config_path.parent().unwrap_or(Path::new(""));
    if parent.is_absolute() {
        return Ok(parent.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    if parent.as_os_str().is_empty() {
        Ok(cwd)
    } else {
        Ok(cwd.join(parent))
    }
}
