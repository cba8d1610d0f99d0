//! Completion boundary and its implementation over the shared LLM service.

use std::{future::Future, pin::Pin};

use ai_llm_service::{
    ChatMessage, ChatRole, CompletionOptions, service_profiles::LlmServiceProfiles,
};

use crate::error::CompletionError;
use crate::types::{ChatTurn, Role};

/// Sampling knobs for one completion call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletionParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// Generates assistant text for a message list.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatTurn],
        params: CompletionParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>>;
}

fn to_llm_role(role: Role) -> ChatRole {
    match role {
        Role::User => ChatRole::User,
        Role::Assistant => ChatRole::Assistant,
        Role::System => ChatRole::System,
    }
}

impl CompletionProvider for LlmServiceProfiles {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatTurn],
        params: CompletionParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>> {
        Box::pin(async move {
            let msgs: Vec<ChatMessage> = messages
                .iter()
                .map(|t| ChatMessage::new(to_llm_role(t.role), t.content.clone()))
                .collect();
            let opts = CompletionOptions {
                temperature: Some(params.temperature),
                max_tokens: Some(params.max_tokens),
            };
            Ok(LlmServiceProfiles::complete(self, &msgs, opts).await?)
        })
    }
}
