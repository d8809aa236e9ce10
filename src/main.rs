use anyhow::{Context, Result};
use clap::{builder::PossibleValuesParser, Parser};
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{Arc, Mutex},
};
use tracing::{error, info, warn};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    prelude::*,
    Layer, Registry,
};

mod batch;
mod config;
mod media;
#[cfg(test)]
mod test_helpers;

use batch::{Interrupt, Orchestrator, RunStatus};
use config::{
    filter_urls, load_urls, Config, LogFormat, Settings, SettingsError, VALID_QUALITIES,
};
use media::YtDlpEngine;

const LOG_FILE_NAME: &str = "download.log";
const EXIT_INTERRUPTED: u8 = 130;
const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "Concurrent batch media downloader", long_about = None)]
struct Args {
    /// File with URLs, one per line
    #[arg(short, long, default_value = "links.txt")]
    file: PathBuf,

    /// Save directory
    #[arg(short, long, default_value = "downloads")]
    dir: PathBuf,

    /// Max parallel downloads
    #[arg(short, long, default_value_t = 2)]
    workers: usize,

    /// Video quality
    #[arg(
        short,
        long,
        default_value = "best",
        value_parser = PossibleValuesParser::new(VALID_QUALITIES)
    )]
    quality: String,

    /// Download audio only (mp3)
    #[arg(short, long)]
    audio_only: bool,

    /// List of URLs (overrides --file)
    #[arg(long, num_args = 1..)]
    urls: Option<Vec<String>>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn get_config_path(args: &Args) -> Option<PathBuf> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("BATCH_GRAB_CONFIG") {
        return Some(PathBuf::from(path));
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = Path::new(&xdg_config_home)
            .join("batch-grab")
            .join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = home.join(".config").join("batch-grab").join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    None
}

fn load_settings(config_path: Option<&Path>) -> Result<Settings, SettingsError> {
    match config_path {
        Some(path) => Settings::from_file(path),
        None => Ok(Settings::default()),
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console plus an append-only `download.log` in the save directory.
fn build_layers(save_dir: &Path, format: LogFormat) -> Result<Vec<BoxedLayer>> {
    std::fs::create_dir_all(save_dir)
        .with_context(|| format!("Failed to create save directory {}", save_dir.display()))?;

    let log_path = save_dir.join(LOG_FILE_NAME);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    let file_writer = Mutex::new(log_file);

    let layers: Vec<BoxedLayer> = match format {
        LogFormat::Json => vec![
            fmt::layer().json().boxed(),
            fmt::layer().json().with_writer(file_writer).boxed(),
        ],
        LogFormat::Text => vec![
            fmt::layer().boxed(),
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .boxed(),
        ],
    };
    Ok(layers)
}

fn init_logging(save_dir: &Path, format: LogFormat) -> Result<()> {
    let layers = build_layers(save_dir, format)?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .context("Failed to install log subscriber")
}

/// Logs engine availability unless there is nothing to download. Returns
/// `false` if Ctrl-C arrives first.
async fn check_engine(engine: &YtDlpEngine, has_work: bool, interrupt: Interrupt) -> bool {
    tokio::select! {
        biased;
        _ = interrupt.wait() => {
            warn!("Download interrupted by user.");
            false
        }
        _ = async {
            if has_work {
                engine.test_availability().await;
            }
        } => true,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let interrupt = Interrupt::listen();

    // Nothing below can log until the save directory is known, so early
    // failures go straight to stderr.
    let config_path = get_config_path(&args);
    let settings = match load_settings(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let urls = match &args.urls {
        Some(urls) => filter_urls(urls),
        None => load_urls(&args.file),
    };

    let config = match Config::new(
        &args.dir,
        args.workers,
        &args.quality,
        args.audio_only,
        urls,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if let Err(e) = init_logging(config.save_dir(), settings.get_logging_format()) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting batch-grab...");
    if let Some(path) = &config_path {
        info!("Loaded settings from: {}", path.display());
    }

    let engine = YtDlpEngine::new(settings.engine.clone());
    let has_work = !config.urls().is_empty();
    if !check_engine(&engine, has_work, interrupt.clone()).await {
        return ExitCode::from(EXIT_INTERRUPTED);
    }

    let orchestrator = Orchestrator::new(config, Arc::new(engine));
    match orchestrator.run_until(interrupt.wait()).await {
        Ok(RunStatus::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        Ok(RunStatus::NoWork | RunStatus::Completed(_)) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Critical error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
