use super::{
    engine::{EngineError, MediaEngine},
    format::{FormatOptions, OutputTarget},
    types::MediaMetadata,
};
use crate::config::EngineSettings;
use async_trait::async_trait;
use std::{
    process::{Output, Stdio},
    time::Duration,
};
use tokio::process::Command;
use tracing::{debug, info, warn};

pub struct YtDlpEngine {
    settings: EngineSettings,
}

impl YtDlpEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    fn common_args(opts: &FormatOptions) -> Vec<String> {
        let mut args = vec!["--format".to_string(), opts.format.clone()];
        if opts.ignore_errors {
            args.push("--ignore-errors".to_string());
        }
        if opts.no_warnings {
            args.push("--no-warnings".to_string());
        }
        args
    }

    fn probe_args(url: &str, opts: &FormatOptions) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--no-download".to_string(),
            "--no-playlist".to_string(),
        ];
        args.extend(Self::common_args(opts));
        args.push(url.to_string());
        args
    }

    fn fetch_args(url: &str, opts: &FormatOptions) -> Vec<String> {
        let mut args = Self::common_args(opts);
        match opts.target {
            OutputTarget::Video { container } => {
                args.push("--merge-output-format".to_string());
                args.push(container.to_string());
            }
            OutputTarget::Audio { codec } => {
                args.push("--extract-audio".to_string());
                args.push("--audio-format".to_string());
                args.push(codec.to_string());
            }
        }
        args.push("--no-playlist".to_string());
        args.push("--no-progress".to_string());
        if let Some(template) = &opts.output_template {
            args.push("--output".to_string());
            args.push(template.clone());
        }
        args.push(url.to_string());
        args
    }

    /// Runs the engine binary to completion. The child is killed if the
    /// timeout elapses or the calling task is aborted.
    async fn run(
        &self,
        operation: &'static str,
        args: &[String],
        timeout: Duration,
    ) -> Result<Output, EngineError> {
        let child = Command::new(&self.settings.binary)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(timeout, child)
            .await
            .map_err(|_| EngineError::TimedOut {
                operation,
                secs: timeout.as_secs(),
            })?
            .map_err(|source| EngineError::Spawn {
                binary: self.settings.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            let message = last_error_line(&output.stderr).unwrap_or_else(|| {
                format!("{} exited with {}", self.settings.binary, output.status)
            });
            return Err(EngineError::Failed(message));
        }

        Ok(output)
    }

    /// Logs whether the engine and ffmpeg are installed. Never fatal: a missing
    /// engine shows up as per-URL failures.
    pub async fn test_availability(&self) -> bool {
        let yt_dlp_available = match Command::new(&self.settings.binary)
            .arg("--version")
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout);
                info!(
                    "{} is available, version: {}",
                    self.settings.binary,
                    version.trim()
                );
                true
            }
            Ok(_) => {
                warn!("{} --version failed", self.settings.binary);
                false
            }
            Err(e) => {
                warn!("{} not found: {}", self.settings.binary, e);
                false
            }
        };

        // ffmpeg does the merging and mp3 extraction
        match Command::new("ffmpeg").arg("-version").output().await {
            Ok(output) if output.status.success() => {
                let version_line = String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .next()
                    .unwrap_or("unknown")
                    .to_string();
                debug!("ffmpeg is available: {}", version_line);
            }
            Ok(_) => warn!("ffmpeg -version failed"),
            Err(e) => warn!(
                "ffmpeg not found: {} (stream merging and audio extraction will fail)",
                e
            ),
        }

        yt_dlp_available
    }
}

fn parse_metadata(stdout: &[u8]) -> Result<Option<MediaMetadata>, EngineError> {
    let json_str = String::from_utf8_lossy(stdout);
    let json_str = json_str.trim();
    if json_str.is_empty() || json_str == "null" {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(json_str)?))
}

/// The engine prints its diagnosis last; earlier stderr lines are warnings.
fn last_error_line(stderr: &[u8]) -> Option<String> {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl MediaEngine for YtDlpEngine {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract_info(
        &self,
        url: &str,
        opts: &FormatOptions,
    ) -> Result<Option<MediaMetadata>, EngineError> {
        debug!("Extracting metadata with yt-dlp for: {}", url);
        let args = Self::probe_args(url, opts);
        let output = self
            .run("metadata extraction", &args, self.settings.probe_timeout())
            .await?;
        parse_metadata(&output.stdout)
    }

    async fn download(&self, url: &str, opts: &FormatOptions) -> Result<(), EngineError> {
        debug!("Downloading with yt-dlp: {}", url);
        let args = Self::fetch_args(url, opts);
        self.run("download", &args, self.settings.fetch_timeout())
            .await?;
        Ok(())
    }
}
