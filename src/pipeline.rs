//! One bundling run, end to end.
//!
//! [`plan`] resolves everything that can be decided without touching the
//! output tree (input directory, site layout, work list). [`execute`] then
//! writes: it creates the post, prepares output directories, and runs the
//! transforms and the tag appends side by side. [`run`] is both in sequence.
//!
//! Transforms and tag appends are independent. Tags depend only on links,
//! which are fixed at plan time, so the post is written on the calling
//! thread while the worker pool runs on a scoped thread. The post file
//! handle never leaves the calling thread.

use crate::classify::{self, ClassifyError, ClassifyOptions};
use crate::config::{self, BundleConfig, ConfigError};
use crate::imaging::{ImageBackend, Quality, TransformOptions};
use crate::layout::SiteLayout;
use crate::post::{self, AppendReport, PostError, PostMetadata};
use crate::process::{self, ProcessError, ProcessEvent, ProcessOptions, ProcessReport};
use crate::types::WorkList;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot resolve working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Post(#[from] PostError),
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("transform worker panicked")]
    WorkerPanicked,
}

/// A resolved run, ready to execute.
#[derive(Debug, Clone)]
pub struct Plan {
    pub input_dir: PathBuf,
    pub layout: SiteLayout,
    pub work_list: WorkList,
    pub process: ProcessOptions,
}

/// What one run did.
#[derive(Debug)]
pub struct RunSummary {
    pub items: usize,
    pub post_path: PathBuf,
    pub post_created: bool,
    pub tags: AppendReport,
    pub process: ProcessReport,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.process.is_success()
    }
}

/// Resolve directories and build the work list for `config`.
pub fn plan(config: &BundleConfig, config_path: &Path) -> Result<Plan, PipelineError> {
    config.validate()?;
    let input_dir = config::input_dir(config_path).map_err(PipelineError::WorkingDir)?;
    let cwd = std::env::current_dir().map_err(PipelineError::WorkingDir)?;
    let layout = SiteLayout::new(config.resolve_base_dir(&cwd), config.slug.clone());
    log::info!(
        "bundling {} into {}",
        input_dir.display(),
        layout.base_dir.display()
    );

    let options = ClassifyOptions::from_config(config, layout.clone(), config_path);
    let work_list = classify::build_work_list(&input_dir, &options)?;

    Ok(Plan {
        input_dir,
        layout,
        work_list,
        process: ProcessOptions {
            threads: config::effective_threads(&config.processing),
            transform: TransformOptions {
                quality: Quality::new(config.jpeg_quality),
            },
        },
    })
}

/// Write the post and every output of `plan`.
///
/// Per-item failures land in [`RunSummary::process`]; only failures that
/// stop the whole run (post file, directories, pool) are returned as errors.
pub fn execute<B: ImageBackend>(
    plan: &Plan,
    backend: &B,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, PipelineError> {
    let post_path = plan.layout.post_path();
    let metadata = PostMetadata::new(&plan.layout.slug, plan.work_list.feature.clone());
    let post_created = post::ensure_post(&post_path, &metadata)?;

    let items = &plan.work_list.items;
    process::prepare_directories(items)?;

    let (process, tags) = std::thread::scope(|scope| {
        let worker = scope.spawn(|| process::run_all(backend, items, &plan.process, events));
        let tags = post::append_tags(&post_path, items);
        (worker.join(), tags)
    });
    let process = process.map_err(|_| PipelineError::WorkerPanicked)??;
    let tags = tags?;

    Ok(RunSummary {
        items: items.len(),
        post_path,
        post_created,
        tags,
        process,
    })
}

/// [`plan`] then [`execute`].
pub fn run<B: ImageBackend>(
    config: &BundleConfig,
    config_path: &Path,
    backend: &B,
    events: Option<Sender<ProcessEvent>>,
) -> Result<RunSummary, PipelineError> {
    let plan = plan(config, config_path)?;
    execute(&plan, backend, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::touch;
    use std::fs;
    use tempfile::TempDir;

    /// Input dir with a config file next to the assets, absolute site root beside it.
    fn setup(files: &[&str], feature: Option<&str>) -> (TempDir, BundleConfig, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("input");
        fs::create_dir_all(&input).unwrap();
        for name in files {
            fs::write(input.join(name), name.as_bytes()).unwrap();
        }
        let config_path = input.join("gmb.toml");
        touch(&config_path);
        let config = BundleConfig {
            base_dir: tmp.path().join("site").to_string_lossy().into_owned(),
            slug: "trip".into(),
            feature: feature.map(String::from),
            processing: crate::config::ProcessingConfig {
                max_processes: Some(2),
            },
            ..BundleConfig::default()
        };
        (tmp, config, config_path)
    }

    #[test]
    fn plan_resolves_input_dir_and_layout() {
        let (tmp, config, config_path) = setup(&["a.jpg"], None);
        let plan = plan(&config, &config_path).unwrap();

        assert_eq!(plan.input_dir, tmp.path().join("input"));
        assert_eq!(
            plan.layout.post_path(),
            tmp.path().join("site/content/trip.en.md")
        );
        assert_eq!(plan.work_list.len(), 1);
        assert!((1..=2).contains(&plan.process.threads));
    }

    #[test]
    fn relative_base_dir_follows_working_dir_not_config_location() {
        let (_tmp, mut config, config_path) = setup(&["a.jpg"], None);
        config.base_dir = "site".into();

        let plan = plan(&config, &config_path).unwrap();

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(plan.layout.base_dir, cwd.join("site"));
        assert_ne!(plan.layout.base_dir, plan.input_dir.join("site"));
    }

    #[test]
    fn plan_rejects_invalid_config() {
        let (_tmp, mut config, config_path) = setup(&[], None);
        config.slug.clear();
        assert!(matches!(
            plan(&config, &config_path),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn run_mixed_directory() {
        let (tmp, config, config_path) = setup(&["a.jpg", "b.png", "c.mp3", "notes.txt"], None);
        let backend = MockBackend::new();

        let summary = run(&config, &config_path, &backend, None).unwrap();

        assert!(summary.is_success());
        assert!(summary.post_created);
        assert_eq!(summary.items, 4);
        assert_eq!(summary.tags.appended.len(), 4);
        assert_eq!(summary.process.resized(), 1);
        assert_eq!(summary.process.copied(), 3);

        let site = tmp.path().join("site/static");
        assert!(site.join("images/trip/b.png").exists());
        assert!(site.join("audio/trip/c.mp3").exists());
        assert_eq!(fs::read(site.join("other/trip/notes.txt")).unwrap(), b"notes.txt");

        let post = fs::read_to_string(&summary.post_path).unwrap();
        assert!(post.contains("{{% fig-l src=\"/images/trip/a.jpg\" %}}"));
        assert!(post.contains("{{% fig-l src=\"/images/trip/b.png\" %}}"));
        assert!(post.contains("{{% audio src=\"/audio/trip/c.mp3\" %}}"));
        assert!(post.contains("[Link title](/other/trip/notes.txt)"));
        assert!(!post.contains("gmb.toml"));
    }

    #[test]
    fn run_with_feature_image() {
        let (_tmp, config, config_path) = setup(&["hero.jpg"], Some("hero.jpg"));
        let backend = MockBackend::new();

        let summary = run(&config, &config_path, &backend, None).unwrap();

        assert_eq!(summary.items, 2);
        assert!(summary.tags.appended.is_empty());
        let fits = backend.fits();
        assert!(matches!(&fits[0], RecordedOp::Fit { limit: 1280, .. }));
        assert!(matches!(&fits[1], RecordedOp::Fit { limit: 900, .. }));

        let post = fs::read_to_string(&summary.post_path).unwrap();
        assert!(post.contains("image_feature: \"/images/feature_images/f_hero.jpg\""));
        assert!(post.contains("image_menu: \"/images/feature_images/m_hero.jpg\""));
        assert!(!post.contains("fig-l"));
    }

    #[test]
    fn second_run_adds_no_tags() {
        let (_tmp, config, config_path) = setup(&["a.jpg", "c.mp3"], None);
        let backend = MockBackend::new();

        let first = run(&config, &config_path, &backend, None).unwrap();
        let post_after_first = fs::read(&first.post_path).unwrap();
        let second = run(&config, &config_path, &backend, None).unwrap();

        assert!(!second.post_created);
        assert!(second.tags.appended.is_empty());
        assert_eq!(second.tags.already_present.len(), 2);
        assert_eq!(second.process.unchanged(), 1);
        assert_eq!(fs::read(&second.post_path).unwrap(), post_after_first);
    }

    #[test]
    fn item_failure_does_not_stop_the_run() {
        let (tmp, config, config_path) = setup(&["bad.jpg", "ok.txt"], None);
        let backend = MockBackend::failing_on([tmp.path().join("input/bad.jpg")]);

        let summary = run(&config, &config_path, &backend, None).unwrap();

        assert!(!summary.is_success());
        assert_eq!(summary.process.failures.len(), 1);
        assert_eq!(summary.process.completed.len(), 1);
        // Tags depend only on links, so both are written
        assert_eq!(summary.tags.appended.len(), 2);
    }

    #[test]
    fn empty_input_still_creates_post() {
        let (_tmp, config, config_path) = setup(&[], None);
        let summary = run(&config, &config_path, &MockBackend::new(), None).unwrap();

        assert_eq!(summary.items, 0);
        assert!(summary.post_created);
        assert!(summary.post_path.exists());
    }

    #[test]
    fn events_are_forwarded() {
        let (_tmp, config, config_path) = setup(&["a.txt", "b.txt"], None);
        let (tx, rx) = std::sync::mpsc::channel();

        run(&config, &config_path, &MockBackend::new(), Some(tx)).unwrap();

        let finished = rx
            .iter()
            .filter(|e| matches!(e, ProcessEvent::ItemFinished { .. }))
            .count();
        assert_eq!(finished, 2);
    }
}
