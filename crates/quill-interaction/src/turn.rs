//! The per-turn pipeline.
//!
//! One turn: inject referenced file contents, append the user message,
//! stream the reply, parse it with turn-level recovery, filter the proposed
//! edits down to readable canonical paths, and record the assistant reply.

use std::path::Path;

use quill_core::error::{QuillError, Result};
use quill_core::response::{FileToEdit, StructuredResponse};
use quill_core::session::MessageRole;
use quill_core::{SessionContext, path, scanner};

use crate::ollama_api_agent::{FragmentSink, OllamaApiAgent};

/// Runs one complete turn against the inference endpoint.
///
/// Transport failures and syntactically invalid replies degrade to a
/// recovered [`StructuredResponse`] carrying the error text with no file
/// actions; the session continues. A structurally invalid reply (valid
/// JSON, wrong field types) is a hard error for the turn and applies no
/// side effects.
pub async fn run_turn(
    ctx: &mut SessionContext,
    agent: &OllamaApiAgent,
    user_message: &str,
    sink: &mut dyn FragmentSink,
) -> Result<StructuredResponse> {
    inject_referenced_files(ctx, user_message);
    ctx.history.push(MessageRole::User, user_message);

    let accumulated = match agent.chat_stream(ctx.history.messages(), sink).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "turn failed at transport");
            return Ok(StructuredResponse::recovered(format!(
                "Ollama API error: {err}"
            )));
        }
    };

    let mut response = match parse_turn_reply(&accumulated)? {
        Some(parsed) => parsed,
        None => {
            return Ok(StructuredResponse::recovered(
                "Failed to parse JSON response from assistant",
            ));
        }
    };

    response.files_to_edit = filter_edit_requests(ctx, response.files_to_edit);

    ctx.history
        .push(MessageRole::Assistant, response.assistant_reply.clone());

    Ok(response)
}

/// Parses the accumulated reply text.
///
/// Returns `Ok(None)` when the text is not valid JSON at all (recovered,
/// non-fatal) and `Err` when it is valid JSON that violates the response
/// schema (fatal for the turn).
fn parse_turn_reply(accumulated: &str) -> Result<Option<StructuredResponse>> {
    let value: serde_json::Value = match serde_json::from_str(accumulated) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "assistant reply is not valid JSON");
            return Ok(None);
        }
    };

    serde_json::from_value(value)
        .map(Some)
        .map_err(|err| QuillError::malformed(err.to_string()))
}

/// Filters proposed edits down to entries whose file exists, resolves, and
/// has its content recorded in the conversation history.
///
/// Surviving entries have their path rewritten to canonical form. Dropped
/// entries are advisory warnings, not errors.
pub fn filter_edit_requests(ctx: &mut SessionContext, edits: Vec<FileToEdit>) -> Vec<FileToEdit> {
    edits
        .into_iter()
        .filter_map(|mut edit| {
            let canonical = match path::canonicalize(Path::new(&edit.path)) {
                Ok(canonical) => canonical,
                Err(_) => {
                    tracing::warn!(path = %edit.path, "skipping edit with invalid path");
                    return None;
                }
            };
            if ctx.ensure_file_in_context(&canonical).is_err() {
                tracing::warn!(path = %canonical.display(), "skipping edit, file unreadable");
                return None;
            }
            edit.path = canonical.display().to_string();
            Some(edit)
        })
        .collect()
}

fn inject_referenced_files(ctx: &mut SessionContext, user_message: &str) {
    for candidate in scanner::guess_paths(user_message) {
        if let Err(err) = ctx.ensure_file_in_context(&candidate) {
            tracing::warn!(path = %candidate.display(), error = %err, "could not inject referenced file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_turn_reply_recovers_on_invalid_json() {
        let parsed = parse_turn_reply("definitely { not json").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn test_parse_turn_reply_defaults_missing_reply() {
        let parsed = parse_turn_reply(r#"{"files_to_create": []}"#).unwrap().unwrap();
        assert_eq!(parsed.assistant_reply, "");
    }

    #[test]
    fn test_parse_turn_reply_rejects_schema_violation() {
        let err = parse_turn_reply(r#"{"assistant_reply": 42}"#).unwrap_err();
        assert!(matches!(err, QuillError::MalformedResponse(_)));
    }

    #[test]
    fn test_filter_keeps_readable_edit_and_rewrites_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.py");
        std::fs::write(&file, "def foo():\n    return 1\n").unwrap();
        let mut ctx = SessionContext::with_session_dir(dir.path().join("session"));

        let kept = filter_edit_requests(
            &mut ctx,
            vec![FileToEdit {
                path: file.display().to_string(),
                original_snippet: "return 1".into(),
                new_snippet: "return 2".into(),
            }],
        );

        assert_eq!(kept.len(), 1);
        let canonical = path::canonicalize(&file).unwrap();
        assert_eq!(kept[0].path, canonical.display().to_string());
        assert!(
            ctx.history
                .contains_marker(&quill_core::session::ConversationHistory::file_marker(
                    &canonical
                ))
        );
    }

    #[test]
    fn test_filter_drops_nonexistent_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = SessionContext::with_session_dir(dir.path().join("session"));

        let kept = filter_edit_requests(
            &mut ctx,
            vec![FileToEdit {
                path: dir.path().join("ghost.py").display().to_string(),
                original_snippet: "a".into(),
                new_snippet: "b".into(),
            }],
        );

        assert!(kept.is_empty());
    }
}
