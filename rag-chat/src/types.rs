//! Wire-level data model shared by the pipeline and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// Provenance copied from the matched chunk's metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl CitationMetadata {
    pub fn is_empty(&self) -> bool {
        self.file_name.is_none() && self.page_number.is_none() && self.timestamp.is_none()
    }
}

/// Pointer from an answer back to one retrieved chunk.
///
/// `text` is always present; it is empty when the match carried no chunk text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub text: String,
    pub chunk_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CitationMetadata>,
}

/// A bare `{role, content}` turn: the shape of incoming history and of prompt messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// A message as shown to the client, optionally carrying resolved citations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
}

impl Message {
    pub fn assistant(content: impl Into<String>, citations: Option<Vec<Citation>>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            citations,
        }
    }

    /// Drops citations, keeping role and content.
    pub fn turn(&self) -> ChatTurn {
        ChatTurn::new(self.role, self.content.clone())
    }
}

/// Body of `POST /api/chat`.
///
/// Unknown fields on history turns (for example citations echoed back by the
/// client) are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatTurn>,
    pub query: String,
}

/// Uniform result envelope. Always produced, success or not.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Content of the assistant message returned on any failure.
pub const FALLBACK_MESSAGE: &str = "An error occurred while processing your request.";

impl ChatResponse {
    pub fn ok(message: Message) -> Self {
        Self {
            success: true,
            message,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Message::assistant(FALLBACK_MESSAGE, None),
            error: Some(error.into()),
        }
    }
}
