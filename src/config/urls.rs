use std::{io::ErrorKind, path::Path};

/// Trims every line and drops blanks and `#` comments.
pub fn filter_urls<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

/// Reads a newline-delimited URL list. A missing or unreadable file is
/// reported on stderr and yields an empty list; logging is not initialised
/// yet when this runs.
pub fn load_urls(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => filter_urls(content.lines()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            eprintln!("Error: file '{}' not found", path.display());
            Vec::new()
        }
        Err(e) => {
            eprintln!("Error reading '{}': {}", path.display(), e);
            Vec::new()
        }
    }
}
