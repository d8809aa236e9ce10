use crate::config::Quality;

pub const VIDEO_CONTAINER: &str = "mp4";
pub const AUDIO_CODEC: &str = "mp3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Merge separate streams into this container.
    Video { container: &'static str },
    /// Extract the audio track and convert it to this codec.
    Audio { codec: &'static str },
}

/// Engine options for one task. Built fresh per task and never mutated in
/// place; the builder methods return modified copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub format: String,
    pub target: OutputTarget,
    pub ignore_errors: bool,
    pub no_warnings: bool,
    pub output_template: Option<String>,
}

impl FormatOptions {
    fn new(format: String, target: OutputTarget) -> Self {
        Self {
            format,
            target,
            ignore_errors: false,
            no_warnings: false,
            output_template: None,
        }
    }

    /// Resolves the format policy for a run. Audio-only ignores `quality`.
    pub fn resolve(quality: Quality, audio_only: bool) -> Self {
        if audio_only {
            return Self::new(
                "bestaudio/best".to_string(),
                OutputTarget::Audio { codec: AUDIO_CODEC },
            );
        }

        let format = match quality {
            Quality::Best => format!(
                "bestvideo[ext={VIDEO_CONTAINER}]+bestaudio[ext=m4a]/best[ext={VIDEO_CONTAINER}]"
            ),
            Quality::Worst => format!("worst[ext={VIDEO_CONTAINER}]"),
            Quality::MaxHeight(height) => format!("best[height<={height}][ext={VIDEO_CONTAINER}]"),
        };

        Self::new(
            format,
            OutputTarget::Video {
                container: VIDEO_CONTAINER,
            },
        )
    }

    /// Per-item error tolerance used for both the probe and the fetch.
    pub fn tolerant(&self) -> Self {
        Self {
            ignore_errors: true,
            no_warnings: true,
            ..self.clone()
        }
    }

    pub fn with_output_template(&self, template: String) -> Self {
        Self {
            output_template: Some(template),
            ..self.clone()
        }
    }
}
