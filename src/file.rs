// src/file.rs

use std::{fs, path::{Path, PathBuf}};

pub fn ensure_directory(dir: &Path) -> Result<(), std::io::Error> {
    if dir.exists() && !dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Filesystem-safe stem from a singer's display name. Letters and digits
/// (Unicode, so diacritics survive) pass through, whitespace runs collapse
/// to one underscore, `-`/`_` are kept, everything else is dropped.
pub fn sanitize_singer_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
            last_us = false;
        } else if ch.is_whitespace() {
            if !last_us {
                out.push('_');
                last_us = true;
            }
        } else if ch == '-' || ch == '_' {
            if !(last_us && ch == '_') {
                out.push(ch);
            }
            last_us = ch == '_';
        }
    }
    out.trim_matches('_').to_string()
}

/// Output path for one singer: `{name}_{id}.txt` under `dir`. The id suffix
/// keeps paths unique even when two singers share a display name, which is
/// what lets workers write without any cross-task locking.
pub fn singer_output_path(dir: &Path, singer_name: &str, singer_id: u32) -> PathBuf {
    let stem = sanitize_singer_filename(singer_name);
    let stem = if stem.is_empty() { "singer".to_string() } else { stem };
    dir.join(format!("{}_{}.txt", stem, singer_id))
}
