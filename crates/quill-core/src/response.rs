//! The schema-constrained structured response.
//!
//! One complete streamed reply parses into a [`StructuredResponse`].
//! Validation is two-phase: serde deserialization enforces field types,
//! while enumerated optional fields (`assistant_reply`, the two file-action
//! lists) default silently when absent.

use serde::{Deserialize, Serialize};

use crate::error::{QuillError, Result};

/// A request to create (or overwrite) a file with full content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileToCreate {
    pub path: String,
    pub content: String,
}

/// A request to replace one exact snippet of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileToEdit {
    /// Target file; rewritten to canonical absolute form during validation.
    pub path: String,
    /// Exact text expected to be present in the file.
    pub original_snippet: String,
    /// Replacement text.
    pub new_snippet: String,
}

/// The validated object parsed from one complete streamed reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredResponse {
    /// Main textual reply. Absent in the raw JSON defaults to empty.
    #[serde(default)]
    pub assistant_reply: String,
    /// Files to create, applied unconditionally.
    #[serde(default)]
    pub files_to_create: Vec<FileToCreate>,
    /// Proposed edits, gated on human confirmation.
    #[serde(default)]
    pub files_to_edit: Vec<FileToEdit>,
}

impl StructuredResponse {
    /// Builds a recovered response carrying an error description and no
    /// file actions. Used when a turn fails non-fatally (malformed reply,
    /// transport failure) so the session can continue.
    pub fn recovered(reason: impl Into<String>) -> Self {
        Self {
            assistant_reply: reason.into(),
            ..Self::default()
        }
    }
}

/// Parses one fully accumulated reply as a [`StructuredResponse`].
///
/// Type-level mismatches (e.g. `files_to_edit` holding strings) surface as
/// [`QuillError::MalformedResponse`]; absent optional fields default away.
pub fn parse_structured_response(text: &str) -> Result<StructuredResponse> {
    serde_json::from_str(text).map_err(|err| QuillError::malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let raw = r#"{
            "assistant_reply": "done",
            "files_to_create": [{"path": "a.txt", "content": "hi"}],
            "files_to_edit": [{"path": "b.py", "original_snippet": "x", "new_snippet": "y"}]
        }"#;

        let parsed = parse_structured_response(raw).unwrap();
        assert_eq!(parsed.assistant_reply, "done");
        assert_eq!(parsed.files_to_create.len(), 1);
        assert_eq!(parsed.files_to_edit[0].new_snippet, "y");
    }

    #[test]
    fn test_missing_assistant_reply_defaults_to_empty() {
        let parsed = parse_structured_response(r#"{"files_to_create": []}"#).unwrap();
        assert_eq!(parsed.assistant_reply, "");
        assert!(parsed.files_to_create.is_empty());
        assert!(parsed.files_to_edit.is_empty());
    }

    #[test]
    fn test_null_action_lists_are_rejected_but_absent_default() {
        // Absent lists default; an explicit wrong type is a schema violation.
        let parsed = parse_structured_response(r#"{"assistant_reply": "ok"}"#).unwrap();
        assert!(parsed.files_to_edit.is_empty());

        let err = parse_structured_response(r#"{"files_to_edit": "nope"}"#).unwrap_err();
        assert!(matches!(err, QuillError::MalformedResponse(_)));
    }

    #[test]
    fn test_invalid_json_is_malformed_response() {
        let err = parse_structured_response("this is not json").unwrap_err();
        assert!(matches!(err, QuillError::MalformedResponse(_)));
    }

    #[test]
    fn test_recovered_response_has_no_file_actions() {
        let recovered = StructuredResponse::recovered("Failed to parse JSON response");
        assert_eq!(recovered.assistant_reply, "Failed to parse JSON response");
        assert!(recovered.files_to_create.is_empty());
        assert!(recovered.files_to_edit.is_empty());
    }
}
