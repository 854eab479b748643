//! CLI output formatting.
//!
//! Each item is shown by its positional index and its link, the identity it
//! has in the post. Paths and per-item status are indented context lines.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! Input: /photos/trip
//! Outputs
//!     Image: /site/static/images/trip
//!     Feature: /site/static/images/feature_images
//!     Audio: /site/static/audio/trip
//!     Other: /site/static/other/trip
//!     Page: /site/content
//! Work list (3 items)
//!     001 hero.jpg → images/feature_images/m_hero.jpg (fit 900px)
//!     002 hero.jpg → images/feature_images/f_hero.jpg (fit 1280px)
//!     003 c.mp3 → audio/trip/c.mp3 (copy)
//! ```
//!
//! ## Process
//!
//! ```text
//! 001 images/feature_images/m_hero.jpg
//!     resized: 900x600
//! 003 audio/trip/c.mp3
//!     copied: 48213 bytes
//! ```
//!
//! ## Summary
//!
//! ```text
//! Post: created /site/content/trip.en.md
//! Tags: 1 appended, 0 already present
//! Processed 3 items: 2 resized, 1 copied, 0 unchanged, 0 failed
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::imaging::{Orientation, TransformOutcome};
use crate::pipeline::{Plan, RunSummary};
use crate::process::ProcessEvent;
use crate::types::Action;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_action(action: Action) -> String {
    match action {
        Action::Copy => "copy".to_string(),
        Action::Fit(limit) => format!("fit {}px", limit),
    }
}

fn format_outcome(outcome: &TransformOutcome) -> String {
    match outcome {
        TransformOutcome::Copied { bytes } => format!("copied: {} bytes", bytes),
        TransformOutcome::Unchanged => "unchanged".to_string(),
        TransformOutcome::Resized {
            width,
            height,
            orientation: Orientation::Normal,
        } => format!("resized: {}x{}", width, height),
        TransformOutcome::Resized {
            width,
            height,
            orientation,
        } => format!(
            "resized: {}x{} (orientation {})",
            width,
            height,
            orientation.exif_code()
        ),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Format the resolved directories and the work list.
pub fn format_plan(plan: &Plan) -> Vec<String> {
    let mut lines = vec![format!("Input: {}", plan.input_dir.display())];

    lines.push("Outputs".to_string());
    for (label, dir) in plan.layout.output_dirs() {
        lines.push(format!("{}{}: {}", indent(1), label, dir.display()));
    }

    let items = &plan.work_list.items;
    lines.push(format!("Work list ({})", plural(items.len(), "item")));
    for (i, item) in items.iter().enumerate() {
        lines.push(format!(
            "{}{} {} \u{2192} {} ({})",
            indent(1),
            format_index(i + 1),
            item.source_name(),
            item.link,
            format_action(item.action)
        ));
    }
    lines
}

pub fn print_plan(plan: &Plan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Process
// ============================================================================

/// Format a single progress event as display lines.
///
/// Start events produce no output; the item is shown once it finishes.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::ItemStarted { .. } => Vec::new(),
        ProcessEvent::ItemFinished {
            index,
            link,
            outcome,
        } => vec![
            format!("{} {}", format_index(*index), link),
            format!("{}{}", indent(1), format_outcome(outcome)),
        ],
        ProcessEvent::ItemFailed { index, link, error } => vec![
            format!("{} {}", format_index(*index), link),
            format!("{}FAILED: {}", indent(1), error),
        ],
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the end-of-run summary, including every failure.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let process = &summary.process;
    let mut lines = vec![
        format!(
            "Post: {} {}",
            if summary.post_created {
                "created"
            } else {
                "updated"
            },
            summary.post_path.display()
        ),
        format!(
            "Tags: {} appended, {} already present",
            summary.tags.appended.len(),
            summary.tags.already_present.len()
        ),
        format!(
            "Processed {}: {} resized, {} copied, {} unchanged, {} failed",
            plural(summary.items, "item"),
            process.resized(),
            process.copied(),
            process.unchanged(),
            process.failures.len()
        ),
    ];

    if !process.failures.is_empty() {
        lines.push("Failures".to_string());
        for failure in &process.failures {
            lines.push(format!(
                "{}{} {}",
                indent(1),
                format_index(failure.index),
                failure.link
            ));
            lines.push(format!("{}Source: {}", indent(2), failure.source.display()));
            lines.push(format!("{}{}", indent(2), failure.error));
        }
    }
    lines
}

pub fn print_summary(summary: &RunSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}
