//! Session-scoped state shared by every component.
//!
//! All mutable session state (the conversation history and the session
//! directory for newly created files) lives in an explicit context object
//! that is passed to each operation. There are no process-wide singletons.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs;
use crate::path;
use crate::session::{ConversationHistory, MessageRole, generate_session_label};

/// Mutable per-session state: conversation history plus the directory used
/// for files whose declared path does not already exist on disk.
#[derive(Debug)]
pub struct SessionContext {
    /// The conversation history sent to the inference endpoint.
    pub history: ConversationHistory,
    /// Default destination directory for newly created files.
    pub session_dir: PathBuf,
}

impl SessionContext {
    /// Creates a context with a freshly generated three-word session label
    /// as the session directory (relative to the working directory).
    pub fn new() -> Self {
        Self::with_session_dir(PathBuf::from(generate_session_label()))
    }

    /// Creates a context with an explicit session directory.
    pub fn with_session_dir(session_dir: PathBuf) -> Self {
        Self {
            history: ConversationHistory::new(),
            session_dir,
        }
    }

    /// Creates (or overwrites) a file and records the action in the history.
    ///
    /// A path that does not yet exist on disk is redirected into the session
    /// directory, keeping model-invented paths from scattering files across
    /// the tree. Returns the path actually written.
    ///
    /// Two synthetic messages are appended on success: an assistant message
    /// announcing the write, and a system message carrying the full new
    /// content so the model stays aware of the state it just created.
    pub fn create_file(&mut self, path: &Path, content: &str) -> Result<PathBuf> {
        let target = if path.exists() {
            path.to_path_buf()
        } else {
            match path.file_name() {
                Some(name) => self.session_dir.join(name),
                None => path.to_path_buf(),
            }
        };

        fs::write_file(&target, content)?;
        tracing::info!(path = %target.display(), bytes = content.len(), "wrote file");

        self.history.push(
            MessageRole::Assistant,
            format!("Created/updated file at '{}'", target.display()),
        );
        // The file exists now, so canonicalization cannot fail spuriously;
        // fall back to the literal path if it does. The content message is
        // appended unconditionally: after a rewrite the history must carry
        // the new bytes even though the file's marker is already present.
        let recorded = path::canonicalize(&target).unwrap_or_else(|_| target.clone());
        self.history.push(
            MessageRole::System,
            format!(
                "{}:\n\n{}",
                ConversationHistory::file_marker(&recorded),
                content
            ),
        );

        Ok(target)
    }

    /// Ensures a file's content is present in the conversation history.
    ///
    /// `path` must already be canonical. The content is read from disk and
    /// injected as a system message unless its marker is already recorded.
    pub fn ensure_file_in_context(&mut self, path: &Path) -> Result<()> {
        let marker = ConversationHistory::file_marker(path);
        if self.history.contains_marker(&marker) {
            return Ok(());
        }
        let content = fs::read_file(path)?;
        self.history.record_file_content(path, &content);
        Ok(())
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
