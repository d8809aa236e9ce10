use std::path::Path;

pub const MAX_FILENAME_LENGTH: usize = 100;

/// Byte budget for a stem. Leaves room under the usual 255-byte name limit for
/// the extension and the engine's `.fNNN.ext.part` temporaries.
const MAX_FILENAME_BYTES: usize = 200;

const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Replaces characters that are invalid in file names on common filesystems
/// with `_`, caps the result at `max_length` characters (and never splits a
/// character to fit the byte budget) and trims it.
pub fn sanitize_filename(name: &str, max_length: usize) -> String {
    let mut safe = String::new();
    for c in name.chars().take(max_length) {
        let c = if INVALID_FILENAME_CHARS.contains(&c) { '_' } else { c };
        if safe.len() + c.len_utf8() > MAX_FILENAME_BYTES {
            break;
        }
        safe.push(c);
    }
    safe.trim().to_string()
}

/// Output template handed to the engine: `<save_dir>/<stem>.%(ext)s`. The
/// engine treats `%` as a template field marker anywhere in the path, so
/// literal ones are doubled.
pub fn output_template(save_dir: &Path, stem: &str) -> String {
    let base = save_dir.join(stem).to_string_lossy().replace('%', "%%");
    format!("{base}.%(ext)s")
}

pub trait FileChecker: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

pub struct FsFileChecker;

impl FileChecker for FsFileChecker {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
