//! sortmedia - Dedupe and sort photos and videos by the date they were taken.
//!
//! Usage:
//!   sortmedia SRC DST                  Move media into DST/<year>/<month>/<day>
//!   sortmedia -c SRC DST               Copy instead of move
//!   sortmedia -d SRC DST               Dry run: log what would happen
//!   sortmedia -e private -n trips SRC DST
//!                                      Skip SRC/private, move SRC/trips as is
//!   sortmedia --help                   Show help

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Context, Result};
use serde::Deserialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use sortmedia_analyze::{FfprobeDateSource, MetadataResolver};
use sortmedia_core::{DirectoryPolicy, SortConfig, TransferMode};
use sortmedia_scan::MediaSorter;

#[derive(Debug, Parser)]
#[command(
    name = "sortmedia",
    version,
    about = "Dedupe and sort photos and videos by creation date",
    long_about = "sortmedia walks SOURCE and places every photo and video under \
                  DESTINATION/<year>/<month>/<day>, using EXIF for photos and \
                  ffprobe for videos. Files without a date go to \
                  DESTINATION/unknown. Identical content is never placed twice \
                  and existing files are never overwritten."
)]
struct Cli {
    /// Directory to collect photos and videos from
    source: PathBuf,

    /// Root of the sorted library
    destination: PathBuf,

    /// Copy files instead of moving them
    #[arg(short, long)]
    copy: bool,

    /// Log what would happen without touching the filesystem
    #[arg(short, long)]
    dry: bool,

    /// Directories to transfer as a whole, without sorting their contents
    #[arg(short = 'n', long, value_name = "DIR", value_delimiter = ',')]
    noprocess: Vec<PathBuf>,

    /// Directories to leave alone entirely
    #[arg(short, long, value_name = "DIR", value_delimiter = ',')]
    excludes: Vec<PathBuf>,

    /// Follow symbolic links instead of skipping them
    #[arg(short = 'L', long)]
    follow_symlinks: bool,

    /// ffprobe binary used to date videos
    #[arg(long, value_name = "PATH")]
    ffprobe: Option<PathBuf>,

    /// TOML file with default options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Options read from `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    copy: bool,
    dry_run: bool,
    follow_symlinks: bool,
    ffprobe: Option<PathBuf>,
    #[serde(flatten)]
    policy: DirectoryPolicy,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let file = match &cli.config {
        Some(path) => load_config_file(path).inspect_err(log_fatal)?,
        None => FileConfig::default(),
    };
    let ffprobe = cli.ffprobe.clone().or_else(|| file.ffprobe.clone());
    let config = build_config(&cli, file).inspect_err(log_fatal)?;

    let mut resolver = MetadataResolver::new();
    if let Some(program) = ffprobe {
        resolver = resolver.with_video_source(FfprobeDateSource::with_program(program));
    }

    let report = MediaSorter::with_resolver(resolver)
        .run(&config)
        .wrap_err_with(|| format!("Cannot sort {}", config.source.display()))
        .inspect_err(log_fatal)?;

    if !report.is_success() {
        warn!(
            "{} item(s) could not be placed and were left in place",
            report.failures.len()
        );
    }
    info!("Finished in {:.2}s", report.duration.as_secs_f64());

    Ok(())
}

/// Install the `tracing` subscriber. `RUST_LOG` overrides the flags.
fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Fatal errors are logged before color-eyre prints its report.
fn log_fatal(report: &color_eyre::Report) {
    error!("{}", fatal_message(report));
}

/// The error and its causes on one line.
fn fatal_message(report: &color_eyre::Report) -> String {
    format!("{report:#}")
}

fn default_level(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

fn load_config_file(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&text).wrap_err_with(|| format!("Invalid config file {}", path.display()))
}

/// Merge the config file with the command line. Flags are OR-ed and lists
/// are appended.
fn build_config(cli: &Cli, file: FileConfig) -> Result<SortConfig> {
    let mode = if cli.copy || file.copy {
        TransferMode::Copy
    } else {
        TransferMode::Move
    };

    let mut policy = file.policy;
    policy.extend(DirectoryPolicy::new(
        cli.excludes.clone(),
        cli.noprocess.clone(),
    ));

    SortConfig::builder()
        .source(cli.source.clone())
        .destination(cli.destination.clone())
        .mode(mode)
        .dry_run(cli.dry || file.dry_run)
        .policy(policy)
        .follow_symlinks(cli.follow_symlinks || file.follow_symlinks)
        .build()
        .context("Invalid configuration")
}
