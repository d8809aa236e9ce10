use crate::media::TaskOutcome;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

const RULE: &str = "========================================";

/// Outcome counters shared by every task of a run.
#[derive(Debug, Default)]
pub struct DownloadStats {
    success: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl StatsSnapshot {
    pub fn total(&self) -> usize {
        self.success + self.failed + self.skipped
    }
}

impl DownloadStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record(&self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Success => self.record_success(),
            TaskOutcome::Skipped => self.record_skip(),
            TaskOutcome::Failed => self.record_failure(),
        }
    }

    /// Only meaningful once every task has finished; the orchestrator joins
    /// all of them before calling this.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            success: self.success.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
        }
    }

    pub fn report(&self, elapsed_secs: f64) -> StatsSnapshot {
        let snapshot = self.snapshot();
        for line in render_report(&snapshot, elapsed_secs) {
            info!("{}", line);
        }
        snapshot
    }
}

pub fn render_report(snapshot: &StatsSnapshot, elapsed_secs: f64) -> Vec<String> {
    vec![
        RULE.to_string(),
        "DOWNLOAD SUMMARY:".to_string(),
        format!("Processed:    {}", snapshot.total()),
        format!("  Successful: {}", snapshot.success),
        format!("  Skipped:    {}", snapshot.skipped),
        format!("  Failed:     {}", snapshot.failed),
        format!("Elapsed time: {:.2}s", elapsed_secs),
        RULE.to_string(),
    ]
}
