//! The generated post file.
//!
//! A post is a markdown file with a front-matter block written once, on
//! first run, followed by an append-only list of tag blocks, one per
//! bundled asset:
//!
//! ```text
//! ---
//! title: "trip"
//! date: 2024-05-01
//! description: "DESCRIPTION"
//! toplevel: false
//! draft: true
//! image_feature: "/images/feature_images/f_hero.jpg"
//! image_menu: "/images/feature_images/m_hero.jpg"
//! ---
//!
//! TEXT
//!
//! {{% fig-l src="/images/trip/a.jpg" %}}  {{% /fig-l %}}
//!
//! {{% audio src="/audio/trip/c.mp3" %}}  {{% /audio %}}
//!
//! [Link title](/other/trip/notes.txt)
//! ```
//!
//! ## Deduplication
//!
//! The file itself is the only index. Before appending, the current contents
//! are read once as raw bytes; an item is skipped when its link already
//! appears anywhere in that snapshot. Because the snapshot is not re-read between appends,
//! two items with the same link in one run would both be written. The
//! classifier never produces duplicate links, so this only matters if a
//! second writer is ever introduced.
//!
//! Feature links sit in the front matter, so the feature image never gets a
//! body tag.

use crate::types::{FeatureLinks, MediaKind, PlannedItem};
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("cannot create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot append to {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Placeholder metadata written into a new post's front matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMetadata {
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub feature: Option<FeatureLinks>,
}

impl PostMetadata {
    /// Metadata for a fresh post dated today (local time).
    pub fn new(slug: &str, feature: Option<FeatureLinks>) -> Self {
        Self::dated(slug, chrono::Local::now().date_naive(), feature)
    }

    pub fn dated(slug: &str, date: NaiveDate, feature: Option<FeatureLinks>) -> Self {
        Self {
            title: slug.replace('-', " "),
            date,
            description: "DESCRIPTION".to_string(),
            feature,
        }
    }
}

/// Render the front-matter block plus the body placeholder.
pub fn render_front_matter(meta: &PostMetadata) -> String {
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str(&format!("title: \"{}\"\n", meta.title));
    out.push_str(&format!("date: {}\n", meta.date.format("%Y-%m-%d")));
    out.push_str(&format!("description: \"{}\"\n", meta.description));
    out.push_str("toplevel: false\n");
    out.push_str("draft: true\n");
    if let Some(feature) = &meta.feature {
        out.push_str(&format!("image_feature: \"/{}\"\n", feature.feature));
        out.push_str(&format!("image_menu: \"/{}\"\n", feature.menu));
    }
    out.push_str("---\n\nTEXT\n");
    out
}

/// Render the tag block for one link.
pub fn render_tag(kind: MediaKind, link: &str) -> String {
    match kind {
        MediaKind::Image => format!("{{{{% fig-l src=\"/{link}\" %}}}}  {{{{% /fig-l %}}}}"),
        MediaKind::Audio => format!("{{{{% audio src=\"/{link}\" %}}}}  {{{{% /audio %}}}}"),
        MediaKind::Other => format!("[Link title](/{link})"),
    }
}

/// Create the post (and its directory) unless it already exists.
///
/// Returns `true` when the file was created. An existing file is never
/// touched.
pub fn ensure_post(path: &Path, meta: &PostMetadata) -> Result<bool, PostError> {
    let create_err = |source| PostError::Create {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(create_err)?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            log::debug!("post {} exists, front matter left as is", path.display());
            return Ok(false);
        }
        Err(e) => return Err(create_err(e)),
    };
    file.write_all(render_front_matter(meta).as_bytes())
        .map_err(create_err)?;
    log::info!("created post {}", path.display());
    Ok(true)
}

/// Links appended and links skipped by one [`append_tags`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppendReport {
    pub appended: Vec<String>,
    pub already_present: Vec<String>,
}

/// Append a tag block for every item whose link is not yet in the post.
pub fn append_tags(path: &Path, items: &[PlannedItem]) -> Result<AppendReport, PostError> {
    // Raw bytes: a hand-edited post need not be valid UTF-8.
    let snapshot = fs::read(path).map_err(|source| PostError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let append_err = |source| PostError::Append {
        path: path.to_path_buf(),
        source,
    };
    let file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(append_err)?;
    let mut writer = BufWriter::new(file);

    let mut report = AppendReport::default();
    for item in items {
        if contains_bytes(&snapshot, item.link.as_bytes()) {
            report.already_present.push(item.link.clone());
            continue;
        }
        let tag = render_tag(MediaKind::from_path(&item.destination), &item.link);
        writeln!(writer, "\n{tag}").map_err(append_err)?;
        report.appended.push(item.link.clone());
    }
    writer.flush().map_err(append_err)?;

    log::debug!(
        "appended {} tag(s), {} already present",
        report.appended.len(),
        report.already_present.len()
    );
    Ok(report)
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}
