mod engine;
mod format;
mod probe;
mod types;
mod utils;
mod ytdlp;

#[cfg(test)]
pub use engine::EngineError;
pub use engine::MediaEngine;
pub use format::FormatOptions;
pub use probe::{FetchExecutor, MetadataProbe};
pub use types::{MediaMetadata, TaskOutcome};
pub use utils::{
    output_template, sanitize_filename, FileChecker, FsFileChecker, MAX_FILENAME_LENGTH,
};
pub use ytdlp::YtDlpEngine;
