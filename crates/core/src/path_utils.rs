//! Path utilities for FileTracker
//!
//! Handles tilde expansion and data path resolution.

use std::path::PathBuf;

/// Expands a leading tilde (~) to the user's home directory.
/// Examples:
/// "~/data/history.json" -> "/home/me/data/history.json"
/// "data/history.json" -> "data/history.json" (no change)
pub fn expand_tilde(path: &str) -> String {
    let Some(rest) = path.strip_prefix('~') else {
        return path.to_string();
    };
    if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\')) {
        // ~otheruser is left alone
        return path.to_string();
    }

    match dirs::home_dir() {
        Some(home) => format!("{}{}", home.to_string_lossy(), rest),
        None => path.to_string(),
    }
}

/// Helper to convert a potentially tilde-containing string into a PathBuf.
pub fn get_path(path: &str) -> PathBuf {
    PathBuf::from(expand_tilde(path))
}

/// Resolves a configured path against the working directory when relative.
pub fn ensure_absolute(path: &str) -> PathBuf {
    let p = get_path(path);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir().map(|cwd| cwd.join(&p)).unwrap_or(p)
    }
}
