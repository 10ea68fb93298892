//! Heuristic scan of a free-text message for file references.
//!
//! This is advisory: unresolvable tokens are silently dropped, and both
//! false positives and false negatives are tolerated. Matching stays
//! literal, no globbing or fuzzy resolution.

use std::path::{Path, PathBuf};

use crate::path;

/// Extensions that mark a bare token as a path candidate.
const RECOGNIZED_EXTENSIONS: [&str; 6] = [".css", ".html", ".js", ".py", ".json", ".md"];

/// Characters stripped from token edges before resolution.
const EDGE_CHARS: [char; 3] = ['\'', '"', ','];

/// Guesses which files a user message references.
///
/// Tokenizes on whitespace; a token is a candidate if it contains a path
/// separator or one of the recognized extensions. Candidates are
/// canonicalized; tokens that fail to resolve are dropped. Returns paths in
/// order of first appearance (duplicates allowed, dedup happens downstream
/// via content markers).
pub fn guess_paths(message: &str) -> Vec<PathBuf> {
    message
        .split_whitespace()
        .filter(|word| {
            word.contains('/')
                || RECOGNIZED_EXTENSIONS.iter().any(|ext| word.contains(ext))
        })
        .filter_map(|word| {
            let trimmed = word.trim_matches(&EDGE_CHARS[..]);
            path::canonicalize(Path::new(trimmed)).ok()
        })
        .collect()
}
