//! Per-item boundaries around the engine. Neither type ever returns an
//! error: failures are logged here and turned into `None` / `false`, so a
//! broken URL cannot take its sibling tasks down with it.

use super::{engine::MediaEngine, format::FormatOptions, types::MediaMetadata};
use std::sync::Arc;
use tracing::{debug, error};

pub struct MetadataProbe {
    engine: Arc<dyn MediaEngine>,
}

impl MetadataProbe {
    pub fn new(engine: Arc<dyn MediaEngine>) -> Self {
        Self { engine }
    }

    pub async fn probe(&self, url: &str, opts: &FormatOptions) -> Option<MediaMetadata> {
        match self.engine.extract_info(url, opts).await {
            Ok(Some(metadata)) => {
                debug!(
                    "{} resolved {}: title={:?} id={:?} uploader={:?} duration={:?}",
                    self.engine.name(),
                    url,
                    metadata.title,
                    metadata.id,
                    metadata.author,
                    metadata.duration
                );
                Some(metadata)
            }
            Ok(None) => {
                error!(
                    "Failed to extract info for {}: Unable to extract video info",
                    url
                );
                None
            }
            Err(e) => {
                error!("Failed to extract info for {}: {}", url, e);
                None
            }
        }
    }
}

pub struct FetchExecutor {
    engine: Arc<dyn MediaEngine>,
}

impl FetchExecutor {
    pub fn new(engine: Arc<dyn MediaEngine>) -> Self {
        Self { engine }
    }

    pub async fn fetch(&self, url: &str, opts: &FormatOptions) -> bool {
        match self.engine.download(url, opts).await {
            Ok(()) => true,
            Err(e) => {
                error!("Download failed for {}: {}", url, e);
                false
            }
        }
    }
}
