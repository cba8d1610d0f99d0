//! Shared LLM service for the RAG chat backend.
//!
//! Wraps the OpenAI and Ollama REST APIs behind one facade,
//! [`service_profiles::LlmServiceProfiles`], with two profiles: **chat**
//! (multi-turn completions) and **embedding** (text → vector). Configuration is
//! read from the environment via [`config::default_config`]; every failure is
//! reported as [`error_handler::AiLlmError`].

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use chat::{ChatMessage, ChatRole, CompletionOptions};
pub use error_handler::AiLlmError;
