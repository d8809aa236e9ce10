mod settings;
mod urls;

pub use settings::{EngineSettings, LogFormat, Settings, SettingsError};
pub use urls::{filter_urls, load_urls};

use std::{fmt, path::PathBuf, str::FromStr};
use thiserror::Error;

/// Quality values accepted on the command line, in display order.
pub const VALID_QUALITIES: [&str; 5] = ["best", "worst", "720", "480", "360"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("workers must be at least 1, got {0}")]
    InvalidWorkers(usize),

    #[error("invalid quality '{quality}', expected one of: {valid}")]
    InvalidQuality { quality: String, valid: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Best,
    Worst,
    /// Best stream no taller than this many pixels. Only the heights in
    /// [`VALID_QUALITIES`] are constructible.
    MaxHeight(u32),
}

impl FromStr for Quality {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best" => Ok(Quality::Best),
            "worst" => Ok(Quality::Worst),
            "720" => Ok(Quality::MaxHeight(720)),
            "480" => Ok(Quality::MaxHeight(480)),
            "360" => Ok(Quality::MaxHeight(360)),
            other => Err(ConfigError::InvalidQuality {
                quality: other.to_string(),
                valid: VALID_QUALITIES.join(", "),
            }),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Best => f.write_str("best"),
            Quality::Worst => f.write_str("worst"),
            Quality::MaxHeight(height) => write!(f, "{height}"),
        }
    }
}

/// Settings for a single batch run. Validated on construction and never
/// mutated afterwards, so it is shared between tasks without locking.
#[derive(Debug, Clone)]
pub struct Config {
    save_dir: PathBuf,
    max_workers: usize,
    quality: Quality,
    audio_only: bool,
    urls: Vec<String>,
}

impl Config {
    pub fn new(
        save_dir: impl Into<PathBuf>,
        max_workers: usize,
        quality: &str,
        audio_only: bool,
        urls: Vec<String>,
    ) -> Result<Self, ConfigError> {
        if max_workers < 1 {
            return Err(ConfigError::InvalidWorkers(max_workers));
        }
        let quality = quality.parse()?;

        Ok(Self {
            save_dir: save_dir.into(),
            max_workers,
            quality,
            audio_only,
            urls,
        })
    }

    pub fn save_dir(&self) -> &PathBuf {
        &self.save_dir
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn audio_only(&self) -> bool {
        self.audio_only
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Extension the engine is expected to produce for this run.
    pub fn output_extension(&self) -> &'static str {
        if self.audio_only {
            "mp3"
        } else {
            "mp4"
        }
    }
}
