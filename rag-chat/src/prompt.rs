//! Prompt builder: system instructions, trimmed history and a context-augmented final turn.

use tracing::warn;

use crate::error::PromptError;
use crate::types::{ChatTurn, Citation, Role};

/// System instructions sent as the first message of every completion.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions using only the provided context. \
If the context does not contain the answer, say that you do not know. \
Support every factual claim with an inline citation written as [citation: <excerpt>], \
where <excerpt> is copied verbatim from the cited source text.";

/// Builds the message list for the completion call.
///
/// The last history turn is replaced by a user turn of the form
/// `Context: ...\n\nQuestion: ...\n\nCitations: ...`; earlier turns are kept verbatim.
///
/// # Errors
/// [`PromptError::EmptyHistory`] if `history` is empty.
pub fn build(
    history: &[ChatTurn],
    context: &str,
    citations: &[Citation],
) -> Result<Vec<ChatTurn>, PromptError> {
    let (last, earlier) = history.split_last().ok_or(PromptError::EmptyHistory)?;

    if last.role != Role::User {
        warn!(role = last.role.as_str(), "final history turn is not from the user");
    }

    let cited = citations
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = Vec::with_capacity(history.len() + 1);
    out.push(ChatTurn::new(Role::System, SYSTEM_PROMPT));
    out.extend(earlier.iter().cloned());
    out.push(ChatTurn::user(format!(
        "Context: {context}\n\nQuestion: {}\n\nCitations: {cited}",
        last.content
    )));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cite(text: &str, id: &str) -> Citation {
        Citation {
            text: text.into(),
            chunk_id: id.into(),
            metadata: None,
        }
    }

    #[test]
    fn replaces_last_turn_and_keeps_earlier_ones() {
        let history = vec![
            ChatTurn::user("hi"),
            ChatTurn::new(Role::Assistant, "hello"),
            ChatTurn::user("What is alpha?"),
        ];
        let cites = [cite("alpha is first", "c1"), cite("beta", "c2")];
        let out = build(&history, "alpha is first\nbeta", &cites).unwrap();

        assert_eq!(out.len(), 4);
        assert_eq!(out[0].role, Role::System);
        assert_eq!(out[0].content, SYSTEM_PROMPT);
        assert_eq!(out[1], history[0]);
        assert_eq!(out[2], history[1]);
        assert_eq!(
            out[3].content,
            "Context: alpha is first\nbeta\n\nQuestion: What is alpha?\n\nCitations: alpha is first, beta"
        );
        assert_eq!(out[3].role, Role::User);
    }

    #[test]
    fn empty_history_is_rejected() {
        assert_eq!(build(&[], "", &[]), Err(PromptError::EmptyHistory));
    }

    #[test]
    fn system_prompt_describes_marker_format() {
        assert!(SYSTEM_PROMPT.contains("[citation: <excerpt>]"));
        assert!(SYSTEM_PROMPT.contains("only the provided context"));
    }

    #[test]
    fn non_user_last_turn_is_still_substituted() {
        let out = build(&[ChatTurn::new(Role::Assistant, "x")], "ctx", &[]).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].role, Role::User);
        assert!(out[1].content.starts_with("Context: ctx\n\nQuestion: x"));
    }
}
