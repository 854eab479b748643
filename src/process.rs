//! Concurrent processing of the work list.
//!
//! Every planned item becomes one independent unit of work: a copy or an
//! orient-and-fit. Units run on a dedicated [rayon](https://docs.rs/rayon)
//! pool sized by `processing.max_processes` (capped at the core count), so a
//! large input directory never opens more files or decode buffers at once
//! than there are workers.
//!
//! ## Guarantees
//!
//! - Every destination directory exists before any unit starts writing
//!   ([`prepare_directories`]); each unit re-checks its own parent as well.
//!   Directory creation is create-if-absent, so racing units are harmless.
//! - Units are independent. Completion order is unspecified.
//! - [`run_all`] returns exactly when every launched unit has finished.
//! - A failing unit does not stop its siblings. Failures are collected in
//!   the [`ProcessReport`] and progress is streamed as [`ProcessEvent`]s.
//!
//! There is no cancellation and no timeout: a stuck unit holds up the return
//! of [`run_all`].

use crate::imaging::{
    ImageBackend, TransformError, TransformOptions, TransformOutcome, ensure_dir, transform,
};
use crate::types::PlannedItem;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to prepare output directories: {0}")]
    Prepare(#[from] TransformError),
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Progress events sent while the pool works through the list.
///
/// `index` is the item's 1-based position in the work list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    ItemStarted {
        index: usize,
        link: String,
    },
    ItemFinished {
        index: usize,
        link: String,
        outcome: TransformOutcome,
    },
    ItemFailed {
        index: usize,
        link: String,
        error: String,
    },
}

/// Scheduler settings.
#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    /// Worker count; at least 1.
    pub threads: usize,
    pub transform: TransformOptions,
}

/// A unit that finished successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub index: usize,
    pub link: String,
    pub outcome: TransformOutcome,
}

/// A unit that failed, with the error that stopped it.
#[derive(Debug)]
pub struct ItemFailure {
    pub index: usize,
    pub link: String,
    pub source: PathBuf,
    pub error: TransformError,
}

/// Per-item results of one [`run_all`] call, in work-list order.
#[derive(Debug, Default)]
pub struct ProcessReport {
    pub completed: Vec<ItemResult>,
    pub failures: Vec<ItemFailure>,
}

impl ProcessReport {
    /// Units launched, which always equals units finished.
    pub fn launched(&self) -> usize {
        self.completed.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn resized(&self) -> usize {
        self.count(|o| matches!(o, TransformOutcome::Resized { .. }))
    }

    pub fn copied(&self) -> usize {
        self.count(|o| matches!(o, TransformOutcome::Copied { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, TransformOutcome::Unchanged))
    }

    fn count(&self, pred: impl Fn(&TransformOutcome) -> bool) -> usize {
        self.completed.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Create every distinct destination directory up front.
///
/// Returns the number of distinct directories ensured.
pub fn prepare_directories(items: &[PlannedItem]) -> Result<usize, ProcessError> {
    let dirs: BTreeSet<&Path> = items
        .iter()
        .filter_map(|item| item.destination.parent())
        .collect();
    for dir in &dirs {
        ensure_dir(dir)?;
    }
    log::debug!("ensured {} output director(ies)", dirs.len());
    Ok(dirs.len())
}

/// Run every item on a bounded pool and wait for all of them.
pub fn run_all(
    backend: &impl ImageBackend,
    items: &[PlannedItem],
    options: &ProcessOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessReport, ProcessError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads.max(1))
        .build()?;

    let send = |event: ProcessEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    let results: Vec<(usize, &PlannedItem, Result<TransformOutcome, TransformError>)> =
        pool.install(|| {
            items
                .par_iter()
                .enumerate()
                .map(|(i, item)| {
                    let index = i + 1;
                    log::info!("[{}] {} started", index, item.link);
                    send(ProcessEvent::ItemStarted {
                        index,
                        link: item.link.clone(),
                    });
                    let result = transform(backend, item, &options.transform);
                    match &result {
                        Ok(outcome) => {
                            log::info!("[{}] {} finished", index, item.link);
                            send(ProcessEvent::ItemFinished {
                                index,
                                link: item.link.clone(),
                                outcome: *outcome,
                            })
                        }
                        Err(e) => {
                            log::warn!("{} failed: {}", item.link, e);
                            send(ProcessEvent::ItemFailed {
                                index,
                                link: item.link.clone(),
                                error: e.to_string(),
                            })
                        }
                    }
                    (index, item, result)
                })
                .collect()
        });

    let mut report = ProcessReport::default();
    for (index, item, result) in results {
        match result {
            Ok(outcome) => report.completed.push(ItemResult {
                index,
                link: item.link.clone(),
                outcome,
            }),
            Err(error) => report.failures.push(ItemFailure {
                index,
                link: item.link.clone(),
                source: item.source.clone(),
                error,
            }),
        }
    }
    Ok(report)
}
