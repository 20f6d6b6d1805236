//! CWRU CLI: build, catalog, fetch and cache management commands.
//!
//! Commands:
//! - `build`: window, split and shuffle one (family, speed) selection; optionally export it
//! - `catalog`: list the recordings a selection contains, with their labels
//! - `fetch`: download every recording of a selection into the local cache
//! - `cache status`: report which recordings of a selection are cached

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cwru_core::data::{LogProgress, MatSignalSource, RecordingCache};
use cwru_core::domain::{DatasetRequest, ExperimentFamily, Rpm, DEFAULT_TEST_RATIO};
use cwru_core::export::export_dataset;
use cwru_core::{Catalog, CwruConfig, Dataset};
use env_logger::Env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cwru",
    version,
    about = "CWRU bearing-fault dataset builder"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the windowed train/test dataset for one experiment and speed.
    Build {
        /// Experiment family: 12DriveEndFault, 12FanEndFault or 48DriveEndFault.
        family: String,

        /// Motor speed: 1797, 1772, 1750 or 1730.
        rpm: String,

        /// Window length in samples.
        #[arg(long)]
        length: usize,

        /// Fraction of each recording's windows held out for testing.
        #[arg(long, default_value_t = DEFAULT_TEST_RATIO)]
        test_ratio: f64,

        /// Write train.csv, test.csv and manifest.json into this directory.
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the recordings selected for an experiment and speed.
    Catalog {
        family: String,
        rpm: String,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Download every recording of a selection into the local cache.
    Fetch {
        family: String,
        rpm: String,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report which recordings of a selection are cached, and their sizes.
    Status {
        family: String,
        rpm: String,

        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Where recordings come from. Flags override the config file.
#[derive(Args)]
struct SourceArgs {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cache root. Defaults to ~/Datasets/CWRU.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Replacement catalog table.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Offline mode: no network access, cache misses are errors.
    #[arg(long, default_value_t = false)]
    offline: bool,
}

impl SourceArgs {
    fn resolve(self) -> Result<CwruConfig> {
        let mut config = match &self.config {
            Some(path) => CwruConfig::from_file(path)?,
            None => CwruConfig::default(),
        };
        if self.data_dir.is_some() {
            config.data_dir = self.data_dir;
        }
        if self.catalog.is_some() {
            config.catalog = self.catalog;
        }
        config.offline |= self.offline;
        log::debug!("effective config: {config:?}");
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            family,
            rpm,
            length,
            test_ratio,
            output,
            source,
        } => run_build(&family, &rpm, length, test_ratio, output, source),
        Commands::Catalog {
            family,
            rpm,
            source,
        } => run_catalog(&family, &rpm, source),
        Commands::Fetch {
            family,
            rpm,
            source,
        } => run_fetch(&family, &rpm, source),
        Commands::Cache { action } => match action {
            CacheAction::Status {
                family,
                rpm,
                source,
            } => run_cache_status(&family, &rpm, source),
        },
    }
}

fn parse_selection(family: &str, rpm: &str) -> Result<(ExperimentFamily, Rpm)> {
    let family = ExperimentFamily::parse_requestable(family)?;
    let rpm: Rpm = rpm.parse()?;
    Ok((family, rpm))
}

fn load_catalog(config: &CwruConfig) -> Result<Catalog> {
    config.load_catalog().context("loading recording catalog")
}

fn run_build(
    family: &str,
    rpm: &str,
    length: usize,
    test_ratio: f64,
    output: Option<PathBuf>,
    source: SourceArgs,
) -> Result<()> {
    let request = DatasetRequest::parse(family, rpm, length, test_ratio)?;
    let config = source.resolve()?;
    let catalog = load_catalog(&config)?;
    let acquirer = config.acquirer()?;

    let dataset = Dataset::build(&request, &catalog, &MatSignalSource::new(&acquirer))?;
    print_summary(&dataset);

    if let Some(dir) = output {
        let manifest = export_dataset(&dataset, &dir)
            .with_context(|| format!("exporting dataset to {}", dir.display()))?;
        println!(
            "Exported {} train / {} test rows to: {}",
            manifest.train_rows,
            manifest.test_rows,
            dir.display()
        );
    }

    Ok(())
}

fn run_catalog(family: &str, rpm: &str, source: SourceArgs) -> Result<()> {
    let (family, rpm) = parse_selection(family, rpm)?;
    let config = source.resolve()?;
    let selection = load_catalog(&config)?.select(family, rpm);

    println!("{family} @ {rpm} rpm: {} recordings", selection.len());
    println!();
    println!("{:>5}  {:<18} {}", "Label", "Recording", "URL");
    println!("{}", "-".repeat(72));
    for (label, rec) in selection.iter().enumerate() {
        println!("{label:>5}  {:<18} {}", rec.id, rec.url);
    }

    Ok(())
}

fn run_fetch(family: &str, rpm: &str, source: SourceArgs) -> Result<()> {
    let (family, rpm) = parse_selection(family, rpm)?;
    let config = source.resolve()?;
    let selection = load_catalog(&config)?.select(family, rpm);
    let acquirer = config.acquirer()?;

    println!(
        "Fetching {} recordings into {} (source: {})",
        selection.len(),
        acquirer.cache().root().display(),
        acquirer.fetcher_name().unwrap_or("cache only")
    );
    let summary = acquirer.fetch_all(&selection, &LogProgress);

    if !summary.all_succeeded() {
        for (id, err) in &summary.errors {
            eprintln!("Error for {id}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_cache_status(family: &str, rpm: &str, source: SourceArgs) -> Result<()> {
    let (family, rpm) = parse_selection(family, rpm)?;
    let config = source.resolve()?;
    let selection = load_catalog(&config)?.select(family, rpm);
    let cache = RecordingCache::new(config.data_dir());

    let rows = cache.status(&selection);
    let cached = rows.iter().filter(|r| r.cached).count();
    let total_size: u64 = rows.iter().filter_map(|r| r.size_bytes).sum();

    println!("Cache: {}", cache.root().display());
    println!("Selection: {family} @ {rpm} rpm");
    println!("Cached: {cached}/{}", rows.len());
    println!("Total size: {}", format_size(total_size));
    println!();
    println!("{:<18} {:<8} {:>10}", "Recording", "Cached", "Size");
    println!("{}", "-".repeat(38));
    for row in &rows {
        let size = row.size_bytes.map(format_size).unwrap_or_else(|| "-".into());
        let mark = if row.cached { "yes" } else { "no" };
        println!("{:<18} {:<8} {:>10}", row.id, mark, size);
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn print_summary(dataset: &Dataset) {
    let request = &dataset.request;
    println!();
    println!("=== Dataset ===");
    println!("Experiment:     {}", request.family);
    println!("Speed:          {} rpm", request.rpm);
    println!("Window length:  {}", request.window_len);
    println!("Test ratio:     {}", request.test_ratio);
    println!(
        "X_train:        ({}, {})",
        dataset.train.len(),
        dataset.window_len()
    );
    println!("X_test:         ({}, {})", dataset.test.len(), dataset.window_len());
    println!("Classes:        {}", dataset.nclasses);
    println!("Hash:           {}", dataset.fingerprint().short());
    println!();
    println!("--- Recordings ---");
    println!(
        "{:>5}  {:<18} {:>9} {:>8} {:>6} {:>6} {:>9}",
        "Label", "Recording", "Samples", "Windows", "Train", "Test", "Discarded"
    );
    for rec in &dataset.recordings {
        println!(
            "{:>5}  {:<18} {:>9} {:>8} {:>6} {:>6} {:>9}",
            rec.label, rec.id, rec.samples, rec.windows, rec.train, rec.test, rec.discarded
        );
        if rec.windows == 0 {
            println!("WARNING: recording {} is shorter than one window", rec.id);
        }
    }
    println!();
}
