//! Work-list construction.
//!
//! Turns the direct entries of the input directory into [`PlannedItem`]s.
//! The listing is non-recursive and sorted by file name, so the same
//! directory always yields the same work list.
//!
//! ## Classification
//!
//! | Entry | Link | Action |
//! |---|---|---|
//! | feature file | `images/feature_images/m_<name>` | fit `menu_limit` |
//! | feature file | `images/feature_images/f_<name>` | fit `feature_limit` |
//! | `.jpg` / `.jpeg` | `images/<slug>/<name>` | fit `img_limit` |
//! | `.png` | `images/<slug>/<name>` | copy |
//! | `.mp3` / `.ogg` | `audio/<slug>/<name>` | copy |
//! | anything else | `other/<slug>/<name>` | copy |
//!
//! Extensions match in any case. PNGs are copied verbatim, never resized.
//!
//! Skipped: directories, the config file, the post file, and any name on
//! the `ignore` list.

use crate::config::BundleConfig;
use crate::layout::SiteLayout;
use crate::types::{Action, FeatureLinks, MediaKind, PlannedItem, WorkList, is_jpeg};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("cannot read input directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Pixel bounds for the three resize targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub img: u32,
    pub menu: u32,
    pub feature: u32,
}

impl Limits {
    pub fn from_config(config: &BundleConfig) -> Self {
        Self {
            img: config.img_limit,
            menu: config.menu_limit,
            feature: config.feature_limit,
        }
    }
}

/// Everything the classifier needs besides the directory itself.
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    pub layout: SiteLayout,
    pub feature: Option<String>,
    pub limits: Limits,
    /// File names never bundled (config file, post file, ignore list).
    pub excluded: BTreeSet<String>,
}

impl ClassifyOptions {
    /// Build options from a loaded config. `config_path` is excluded by
    /// file name, as is the post file for this slug.
    pub fn from_config(config: &BundleConfig, layout: SiteLayout, config_path: &Path) -> Self {
        let mut excluded: BTreeSet<String> = config.ignore.iter().cloned().collect();
        if let Some(name) = config_path.file_name() {
            excluded.insert(name.to_string_lossy().into_owned());
        }
        excluded.insert(layout.post_file_name());
        Self {
            layout,
            feature: config.feature.clone(),
            limits: Limits::from_config(config),
            excluded,
        }
    }
}

/// List `input_dir` and plan one or two outputs per file.
pub fn build_work_list(
    input_dir: &Path,
    options: &ClassifyOptions,
) -> Result<WorkList, ClassifyError> {
    let mut names = collect_file_names(input_dir)?;
    names.retain(|name| !options.excluded.contains(name));

    let mut work_list = WorkList::default();
    for name in &names {
        let source = input_dir.join(name);
        if options.feature.as_deref() == Some(name.as_str()) {
            let (menu, feature) = plan_feature(&source, name, options);
            work_list.feature = Some(FeatureLinks {
                menu: menu.link.clone(),
                feature: feature.link.clone(),
            });
            work_list.items.push(menu);
            work_list.items.push(feature);
        } else {
            work_list.items.push(plan_item(&source, name, options));
        }
    }

    log::debug!(
        "planned {} item(s) from {} file(s) in {}",
        work_list.len(),
        names.len(),
        input_dir.display()
    );
    Ok(work_list)
}

/// Plan the single output for an ordinary (non-feature) file.
pub fn plan_item(source: &Path, name: &str, options: &ClassifyOptions) -> PlannedItem {
    let layout = &options.layout;
    let kind = MediaKind::from_path(Path::new(name));
    let (link, action) = match kind {
        MediaKind::Image if is_jpeg(Path::new(name)) => {
            (layout.image_link(name), Action::Fit(options.limits.img))
        }
        MediaKind::Image => (layout.image_link(name), Action::Copy),
        MediaKind::Audio => (layout.audio_link(name), Action::Copy),
        MediaKind::Other => (layout.other_link(name), Action::Copy),
    };
    PlannedItem {
        source: source.to_path_buf(),
        destination: layout.destination(&link),
        link,
        action,
        kind,
    }
}

/// Plan the menu and feature variants of the feature image, in that order.
pub fn plan_feature(
    source: &Path,
    name: &str,
    options: &ClassifyOptions,
) -> (PlannedItem, PlannedItem) {
    let layout = &options.layout;
    let kind = MediaKind::from_path(Path::new(name));
    let variant = |link: String, limit: u32| PlannedItem {
        source: source.to_path_buf(),
        destination: layout.destination(&link),
        link,
        action: Action::Fit(limit),
        kind,
    };
    (
        variant(SiteLayout::menu_link(name), options.limits.menu),
        variant(SiteLayout::feature_link(name), options.limits.feature),
    )
}

/// Sorted names of the regular files directly inside `dir`.
fn collect_file_names(dir: &Path) -> Result<Vec<String>, ClassifyError> {
    let read_err = |source| ClassifyError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!("skipping non UTF-8 file name {:?}", raw),
        }
    }
    names.sort();
    Ok(names)
}
