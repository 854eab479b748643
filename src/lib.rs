//! # gmb
//!
//! Bundles a directory of media assets into a static site as one post.
//! Point it at a `gmb.toml` sitting next to the assets: images are fitted
//! to a pixel bound, everything else is copied, and a markdown post with a
//! tag per asset is created (or extended) under the site's content tree.
//!
//! # Architecture: Plan, then Execute
//!
//! ```text
//! 1. Plan      gmb.toml + input dir  →  WorkList       (no writes)
//! 2. Execute   WorkList              →  static/ files  (bounded worker pool)
//!                                    →  content/{slug}.en.md (calling thread)
//! ```
//!
//! Every output link is decided during planning, so the post can be written
//! while the transforms are still running. The post file is the only state
//! carried between runs: a tag is appended only when its link is not yet in
//! the file, so re-running over the same directory is safe.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `gmb.toml` loading and validation |
//! | [`layout`] | Output directories and link construction under the site root |
//! | [`classify`] | Lists the input directory and plans one or two outputs per file |
//! | [`imaging`] | EXIF orientation, fit-to-bound resizing, byte copies |
//! | [`process`] | Runs every planned item on a bounded rayon pool |
//! | [`post`] | Front matter creation and deduplicated tag appends |
//! | [`pipeline`] | One run end to end: plan, post, directories, transforms |
//! | [`types`] | Shared types (`PlannedItem`, `WorkList`, `MediaKind`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Only JPEGs Are Resized
//!
//! Ordinary PNGs are copied untouched; only JPEGs are fitted to `img_limit`.
//! The feature image is the exception: both its menu and feature variants are
//! always fitted, whatever the format.
//!
//! ## Failures Stay Local
//!
//! A file that cannot be decoded or copied fails alone. The rest of the run
//! completes, the failure is listed in the summary, and the process exits
//! non-zero. Configuration, directory listing, and post errors stop the run.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, orientation, resampling, and encoding all go through the `image`
//! crate; EXIF is read with `kamadak-exif`. No system libraries are needed.

pub mod classify;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod post;
pub mod process;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
