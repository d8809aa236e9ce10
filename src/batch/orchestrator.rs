use super::{
    pipeline::TaskPipeline,
    stats::{DownloadStats, StatsSnapshot},
};
use crate::{
    config::Config,
    media::{FileChecker, FsFileChecker, MediaEngine},
};
use anyhow::{Context, Result};
use std::{future::Future, sync::Arc, time::Instant};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The URL list was empty; nothing ran and no report was produced.
    NoWork,
    Completed(StatsSnapshot),
    /// Shutdown fired before every task finished. No report is produced.
    Interrupted,
}

pub struct Orchestrator {
    config: Arc<Config>,
    pipeline: Arc<TaskPipeline>,
}

impl Orchestrator {
    pub fn new(config: Config, engine: Arc<dyn MediaEngine>) -> Self {
        Self::with_file_checker(config, engine, Arc::new(FsFileChecker))
    }

    pub fn with_file_checker(
        config: Config,
        engine: Arc<dyn MediaEngine>,
        files: Arc<dyn FileChecker>,
    ) -> Self {
        let config = Arc::new(config);
        let pipeline = TaskPipeline::new(Arc::clone(&config), engine, files);

        Self {
            config,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Runs the batch until every URL is done or `shutdown` resolves. Each call
    /// starts from empty statistics.
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> Result<RunStatus> {
        let urls = self.config.urls();
        if urls.is_empty() {
            warn!("No URLs to download.");
            return Ok(RunStatus::NoWork);
        }

        let workers = self.config.max_workers();
        info!(
            "Starting download of {} URL(s) with {} worker(s)",
            urls.len(),
            workers
        );

        tokio::fs::create_dir_all(self.config.save_dir())
            .await
            .with_context(|| {
                format!(
                    "Failed to create save directory {}",
                    self.config.save_dir().display()
                )
            })?;

        let start = Instant::now();
        let stats = Arc::new(DownloadStats::new());
        let semaphore = Arc::new(Semaphore::new(workers));
        // Dropping the set aborts whatever is still running, which also kills
        // the engine processes those tasks own.
        let mut tasks = JoinSet::new();

        for url in urls {
            let url = url.clone();
            let pipeline = Arc::clone(&self.pipeline);
            let stats = Arc::clone(&stats);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        error!("Worker pool closed before {} could start: {}", url, e);
                        stats.record_failure();
                        return;
                    }
                };
                pipeline.run(&url, &stats).await;
            });
        }

        let join_all = async {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    // The pipeline records its own outcome; a task that died
                    // before doing so still has to be counted.
                    error!("Download task aborted: {}", e);
                    stats.record_failure();
                }
            }
        };

        let interrupted = tokio::select! {
            _ = join_all => false,
            _ = shutdown => true,
        };

        if interrupted {
            warn!("Download interrupted by user.");
            tasks.abort_all();
            return Ok(RunStatus::Interrupted);
        }

        let elapsed = start.elapsed().as_secs_f64();
        Ok(RunStatus::Completed(stats.report(elapsed)))
    }
}
