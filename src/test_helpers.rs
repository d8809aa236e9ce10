//! Shared test helpers: a scripted in-memory engine and a log capture.

use crate::media::{EngineError, FormatOptions, MediaEngine, MediaMetadata};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tracing::subscriber::DefaultGuard;

#[derive(Debug, Clone)]
pub(crate) enum ProbeBehavior {
    Found(MediaMetadata),
    NoInfo,
    Error(String),
    Panic,
}

/// Engine double. Unscripted URLs resolve with the URL as title and download
/// successfully. Tracks call counts and peak concurrency.
#[derive(Default)]
pub(crate) struct FakeEngine {
    probes: HashMap<String, ProbeBehavior>,
    fetch_errors: HashMap<String, String>,
    delay: Option<Duration>,
    write_ext: Option<&'static str>,
    probe_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_probe(mut self, url: &str, behavior: ProbeBehavior) -> Self {
        self.probes.insert(url.to_string(), behavior);
        self
    }

    pub(crate) fn with_title(self, url: &str, title: &str) -> Self {
        self.with_probe(
            url,
            ProbeBehavior::Found(MediaMetadata {
                title: Some(title.to_string()),
                id: Some(format!("id-{title}")),
                ..MediaMetadata::default()
            }),
        )
    }

    pub(crate) fn with_fetch_error(mut self, url: &str, message: &str) -> Self {
        self.fetch_errors
            .insert(url.to_string(), message.to_string());
        self
    }

    /// Every engine call sleeps this long, so tasks overlap.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Successful downloads create an empty file at the output template,
    /// with `%(ext)s` replaced by `ext`.
    pub(crate) fn writing_files(mut self, ext: &'static str) -> Self {
        self.write_ext = Some(ext);
        self
    }

    pub(crate) fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaEngine for FakeEngine {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn extract_info(
        &self,
        url: &str,
        opts: &FormatOptions,
    ) -> Result<Option<MediaMetadata>, EngineError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        assert!(opts.ignore_errors, "probe must run error-tolerant");
        self.enter().await;

        match self.probes.get(url) {
            Some(ProbeBehavior::Found(metadata)) => Ok(Some(metadata.clone())),
            Some(ProbeBehavior::NoInfo) => Ok(None),
            Some(ProbeBehavior::Error(message)) => Err(EngineError::Failed(message.clone())),
            Some(ProbeBehavior::Panic) => panic!("engine blew up on {url}"),
            None => Ok(Some(MediaMetadata {
                title: Some(url.to_string()),
                ..MediaMetadata::default()
            })),
        }
    }

    async fn download(&self, url: &str, opts: &FormatOptions) -> Result<(), EngineError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await;

        if let Some(message) = self.fetch_errors.get(url) {
            return Err(EngineError::Failed(message.clone()));
        }
        if let (Some(ext), Some(template)) = (self.write_ext, &opts.output_template) {
            let path = template.replace("%(ext)s", ext).replace("%%", "%");
            std::fs::write(path, b"").map_err(|e| EngineError::Failed(e.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Log lines emitted on the current thread while this value is alive.
pub(crate) struct CapturedLogs {
    buffer: SharedBuffer,
    _guard: DefaultGuard,
}

impl CapturedLogs {
    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.buffer.0.lock().unwrap()).into_owned()
    }

    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }
}

/// Installs a thread-local subscriber. Use with the default current-thread
/// `#[tokio::test]` runtime so spawned tasks log into the same capture.
pub(crate) fn capture_logs() -> CapturedLogs {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    CapturedLogs {
        buffer,
        _guard: tracing::subscriber::set_default(subscriber),
    }
}
