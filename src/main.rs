use clap::Parser;
use gmb::imaging::RustBackend;
use gmb::{config, output, pipeline};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gmb")]
#[command(about = "Bundle a directory of media assets into a static-site post")]
#[command(long_about = "\
Bundle a directory of media assets into a static-site post

The config file lives in the directory being bundled:

  trip/
  ├── gmb.toml        # base_dir, slug, feature, limits
  ├── hero.jpg        # feature image → images/feature_images/{m_,f_}hero.jpg
  ├── a.jpg           # fitted to img_limit → images/<slug>/a.jpg
  ├── b.png           # copied → images/<slug>/b.png
  ├── c.mp3           # copied → audio/<slug>/c.mp3
  └── notes.txt       # copied → other/<slug>/notes.txt

The post is created at <base_dir>/content/<slug>.en.md on first run.
Later runs only append tags for assets not yet linked from it.

Set RUST_LOG=info or RUST_LOG=debug for diagnostics.")]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let bundle_config = config::load_config(&cli.config)?;
    let plan = pipeline::plan(&bundle_config, &cli.config)?;
    output::print_plan(&plan);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = pipeline::execute(&plan, &RustBackend::new(), Some(tx));
    if printer.join().is_err() {
        log::warn!("progress printer panicked");
    }

    let summary = result?;
    output::print_summary(&summary);

    if !summary.is_success() {
        return Err(format!("{} item(s) failed", summary.process.failures.len()).into());
    }
    Ok(())
}
