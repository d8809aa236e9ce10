use super::{format::FormatOptions, types::MediaMetadata};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },

    #[error("{operation} timed out after {secs}s")]
    TimedOut { operation: &'static str, secs: u64 },

    #[error("{0}")]
    Failed(String),

    #[error("failed to parse media metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// External media-extraction engine. Implementations do the network work;
/// callers only see metadata or a completed write.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Human-readable name of the engine
    fn name(&self) -> &'static str;

    /// Resolve metadata without transferring media. `Ok(None)` means the
    /// engine finished but produced no info object.
    async fn extract_info(
        &self,
        url: &str,
        opts: &FormatOptions,
    ) -> Result<Option<MediaMetadata>, EngineError>;

    /// Transfer media for `url`, writing it where `opts.output_template` says.
    async fn download(&self, url: &str, opts: &FormatOptions) -> Result<(), EngineError>;
}
