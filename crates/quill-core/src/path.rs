//! Path canonicalization.
//!
//! Policy: canonicalization delegates to the filesystem and therefore
//! *fails* for nonexistent paths with [`QuillError::InvalidPath`]. Every
//! downstream consumer (reference scanner, edit filter) only ever operates
//! on files that exist, which keeps the canonical form idempotent.

use std::path::{Path, PathBuf};

use crate::error::{QuillError, Result};

/// Returns the canonical, absolute form of `path`.
///
/// Fails with [`QuillError::InvalidPath`] when the path does not exist or
/// cannot be resolved.
pub fn canonicalize(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|_| QuillError::invalid_path(path.display().to_string()))
}
