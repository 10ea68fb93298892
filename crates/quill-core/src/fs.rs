//! Local file access.

use std::path::Path;

use crate::error::{QuillError, Result};

/// Reads a file as UTF-8 text.
///
/// A missing file maps to [`QuillError::NotFound`]; any other failure
/// (permissions, invalid UTF-8) maps to [`QuillError::Io`].
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => QuillError::not_found(path.display().to_string()),
        _ => QuillError::io(format!("{} ('{}')", err, path.display())),
    })
}

/// Writes `content` to `path`, creating any missing parent directories.
///
/// The file is overwritten in place; the single-writer usage pattern of
/// this tool does not require an atomic rename.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.md");
        let content = "# Notes\n\nline one\nline two\n";

        write_file(&file, content).unwrap();
        assert_eq!(read_file(&file).unwrap(), content);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a/b/c/deep.txt");

        write_file(&file, "deep").unwrap();
        assert_eq!(read_file(&file).unwrap(), "deep");
    }

    #[test]
    fn test_write_overwrites_prior_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");

        write_file(&file, "old content, quite long").unwrap();
        write_file(&file, "new").unwrap();
        assert_eq!(read_file(&file).unwrap(), "new");
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(err.is_not_found());
    }
}
