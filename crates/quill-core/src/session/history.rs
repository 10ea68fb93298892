//! Append-only conversation history.
//!
//! The history is the entire context window sent to the inference endpoint.
//! File contents are injected as system messages and deduplicated by a
//! literal marker string, so the same file is never inserted twice across
//! turns.

use std::path::Path;

use crate::prompt::SYSTEM_PROMPT;
use crate::session::message::{ConversationMessage, MessageRole};

/// An ordered, append-only sequence of role-tagged messages.
///
/// A new history starts with the fixed behavioral system prompt. Messages
/// are never removed or reordered; the store grows for the session lifetime.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: Vec<ConversationMessage>,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationHistory {
    /// Creates a history seeded with the behavioral system prompt.
    pub fn new() -> Self {
        Self {
            messages: vec![ConversationMessage::new(MessageRole::System, SYSTEM_PROMPT)],
        }
    }

    /// Appends a message. Pure append, no validation.
    pub fn push(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(ConversationMessage::new(role, content));
    }

    /// Returns all messages in append order.
    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Number of messages currently recorded.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if the history holds no messages (never the case after `new`).
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Checks whether any recorded message contains the given substring.
    ///
    /// Linear scan; the store is bounded by human-session length, so the
    /// O(n*m) cost is acceptable.
    pub fn contains_marker(&self, marker: &str) -> bool {
        self.messages.iter().any(|msg| msg.content.contains(marker))
    }

    /// Marker string identifying an injected file-content block.
    pub fn file_marker(path: &Path) -> String {
        format!("Content of file '{}'", path.display())
    }

    /// Injects a file's content as a system message unless the marker is
    /// already present. Returns true if a message was appended.
    pub fn record_file_content(&mut self, path: &Path, content: &str) -> bool {
        let marker = Self::file_marker(path);
        if self.contains_marker(&marker) {
            return false;
        }
        self.push(MessageRole::System, format!("{marker}:\n\n{content}"));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_new_history_seeds_system_prompt() {
        let history = ConversationHistory::new();
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].role, MessageRole::System);
        assert!(history.messages()[0].content.contains("assistant_reply"));
    }

    #[test]
    fn test_push_preserves_order() {
        let mut history = ConversationHistory::new();
        history.push(MessageRole::User, "first");
        history.push(MessageRole::Assistant, "second");

        let messages = history.messages();
        assert_eq!(messages[1].content, "first");
        assert_eq!(messages[2].content, "second");
    }

    #[test]
    fn test_contains_marker() {
        let mut history = ConversationHistory::new();
        assert!(!history.contains_marker("Content of file '/tmp/a.py'"));

        history.push(MessageRole::System, "Content of file '/tmp/a.py':\n\nx = 1");
        assert!(history.contains_marker("Content of file '/tmp/a.py'"));
    }

    #[test]
    fn test_record_file_content_deduplicates() {
        let mut history = ConversationHistory::new();
        let path = PathBuf::from("/tmp/app.py");

        assert!(history.record_file_content(&path, "print('hi')"));
        let len_after_first = history.len();

        assert!(!history.record_file_content(&path, "print('hi')"));
        assert_eq!(history.len(), len_after_first);
    }
}
