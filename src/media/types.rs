use serde::Deserialize;

/// Subset of the engine's JSON info dump that the pipeline uses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "uploader")]
    pub author: Option<String>,
    pub duration: Option<f64>,
}

impl MediaMetadata {
    pub fn title_or_unknown(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Skipped,
    Failed,
}
