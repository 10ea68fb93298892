//! Exact-snippet diff editing.
//!
//! Matching is literal substring containment, replacement hits only the
//! first occurrence by byte offset. Exact-match is a deliberate, auditable
//! contract; there is no fuzzy or semantic fallback.

use std::path::Path;

use crate::context::SessionContext;
use crate::error::Result;
use crate::fs;
use crate::session::MessageRole;

/// Outcome of an attempted diff edit.
///
/// Both variants are soft results; only an unreadable file is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The first occurrence was replaced and the file persisted.
    Applied,
    /// The expected snippet was absent; nothing was written. Carries the
    /// expected snippet and the full actual content so the operator can
    /// reconcile manually.
    SnippetNotFound {
        expected: String,
        actual: String,
    },
}

/// Replaces the first occurrence of `original` in the file at `path` with
/// `new`, persisting through the session write path (which records the
/// result in the conversation history).
///
/// `path` is assumed canonical and is read fresh; a missing or unreadable
/// file fails with the accessor's error. A no-match performs no write and
/// returns [`EditOutcome::SnippetNotFound`].
pub fn apply_edit(
    ctx: &mut SessionContext,
    path: &Path,
    original: &str,
    new: &str,
) -> Result<EditOutcome> {
    let content = fs::read_file(path)?;

    let Some(offset) = content.find(original) else {
        tracing::warn!(path = %path.display(), "snippet not found, no changes made");
        return Ok(EditOutcome::SnippetNotFound {
            expected: original.to_string(),
            actual: content,
        });
    };

    let mut updated = String::with_capacity(content.len() - original.len() + new.len());
    updated.push_str(&content[..offset]);
    updated.push_str(new);
    updated.push_str(&content[offset + original.len()..]);

    ctx.create_file(path, &updated)?;
    ctx.history.push(
        MessageRole::Assistant,
        format!("Applied diff edit to '{}'", path.display()),
    );

    Ok(EditOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn setup(content: &str) -> (tempfile::TempDir, SessionContext, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.py");
        std::fs::write(&file, content).unwrap();
        let ctx = SessionContext::with_session_dir(dir.path().join("session"));
        (dir, ctx, file)
    }

    #[test]
    fn test_apply_edit_replaces_snippet() {
        let (_dir, mut ctx, file) = setup("def foo():\n    return 1\n");

        let outcome = apply_edit(&mut ctx, &file, "return 1", "return 2").unwrap();

        assert_eq!(outcome, EditOutcome::Applied);
        assert_eq!(
            fs::read_file(&file).unwrap(),
            "def foo():\n    return 2\n"
        );
    }

    #[test]
    fn test_apply_edit_leaves_rest_of_file_untouched() {
        let (_dir, mut ctx, file) = setup("header\nneedle\nfooter\n");

        apply_edit(&mut ctx, &file, "needle", "thread").unwrap();

        assert_eq!(fs::read_file(&file).unwrap(), "header\nthread\nfooter\n");
    }

    #[test]
    fn test_apply_edit_replaces_only_first_occurrence() {
        let (_dir, mut ctx, file) = setup("a = 0\na = 0\na = 0\n");

        apply_edit(&mut ctx, &file, "a = 0", "a = 1").unwrap();

        assert_eq!(fs::read_file(&file).unwrap(), "a = 1\na = 0\na = 0\n");
    }

    #[test]
    fn test_reapplying_edit_is_reported_no_op() {
        let (_dir, mut ctx, file) = setup("def foo():\n    return 1\n");

        apply_edit(&mut ctx, &file, "return 1", "return 2").unwrap();
        let second = apply_edit(&mut ctx, &file, "return 1", "return 2").unwrap();

        match second {
            EditOutcome::SnippetNotFound { expected, actual } => {
                assert_eq!(expected, "return 1");
                assert_eq!(actual, "def foo():\n    return 2\n");
            }
            other => panic!("expected SnippetNotFound, got {other:?}"),
        }
        assert_eq!(
            fs::read_file(&file).unwrap(),
            "def foo():\n    return 2\n"
        );
    }

    #[test]
    fn test_apply_edit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = SessionContext::with_session_dir(dir.path().join("session"));

        let err = apply_edit(&mut ctx, &dir.path().join("gone.py"), "a", "b").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_apply_edit_records_history() {
        let (_dir, mut ctx, file) = setup("x = 1\n");

        apply_edit(&mut ctx, &file, "x = 1", "x = 2").unwrap();

        assert!(ctx.history.contains_marker("Applied diff edit to"));
    }
}
