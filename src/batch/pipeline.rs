use super::stats::DownloadStats;
use crate::{
    config::Config,
    media::{
        output_template, sanitize_filename, FetchExecutor, FileChecker, FormatOptions,
        MediaEngine, MediaMetadata, MetadataProbe, TaskOutcome, MAX_FILENAME_LENGTH,
    },
};
use std::sync::Arc;
use tracing::info;

/// Probe, dedupe against the save directory, fetch, and record exactly one
/// outcome per URL.
pub struct TaskPipeline {
    config: Arc<Config>,
    probe: MetadataProbe,
    fetcher: FetchExecutor,
    files: Arc<dyn FileChecker>,
}

impl TaskPipeline {
    pub fn new(
        config: Arc<Config>,
        engine: Arc<dyn MediaEngine>,
        files: Arc<dyn FileChecker>,
    ) -> Self {
        Self {
            config,
            probe: MetadataProbe::new(Arc::clone(&engine)),
            fetcher: FetchExecutor::new(engine),
            files,
        }
    }

    /// Processes one URL and records its outcome in `stats` exactly once.
    pub async fn run(&self, url: &str, stats: &DownloadStats) -> TaskOutcome {
        let outcome = self.process(url).await;
        stats.record(outcome);
        outcome
    }

    async fn process(&self, url: &str) -> TaskOutcome {
        let base_opts =
            FormatOptions::resolve(self.config.quality(), self.config.audio_only()).tolerant();

        let Some(metadata) = self.probe.probe(url, &base_opts).await else {
            return TaskOutcome::Failed;
        };

        let title = metadata.title_or_unknown();
        let stem = file_stem(&metadata);
        let save_dir = self.config.save_dir();
        let target = save_dir.join(format!("{}.{}", stem, self.config.output_extension()));

        if self.files.exists(&target) {
            info!("[SKIP] Already exists: {}", title);
            return TaskOutcome::Skipped;
        }

        let opts = base_opts.with_output_template(output_template(save_dir, &stem));

        info!("[START] {}", title);
        if self.fetcher.fetch(url, &opts).await {
            info!("[DONE] {}", title);
            TaskOutcome::Success
        } else {
            TaskOutcome::Failed
        }
    }
}

/// File name without extension. A title that sanitizes to nothing falls back
/// to the engine id, then to `Unknown`.
fn file_stem(metadata: &MediaMetadata) -> String {
    [Some(metadata.title_or_unknown()), metadata.id.as_deref()]
        .into_iter()
        .flatten()
        .map(|raw| sanitize_filename(raw, MAX_FILENAME_LENGTH))
        .find(|stem| !stem.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}
