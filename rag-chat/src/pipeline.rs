//! Request orchestration: embed → retrieve → assemble → prompt → complete → resolve.
//!
//! Every request ends in a [`ChatResponse`]. Failures at any stage are logged
//! with their stage and full cause, then collapsed into the fallback envelope.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use rag_store::{EmbeddingsProvider, VectorIndex};
use tracing::{debug, error, info, instrument, warn};

use crate::cfg::ChatPipelineConfig;
use crate::citations::used_citations;
use crate::context::assemble;
use crate::error::{PipelineError, rejected_body};
use crate::llm::CompletionProvider;
use crate::prompt;
use crate::types::{ChatRequest, ChatResponse, ChatTurn, Message, Role};

const REQUEST_SHAPE: &str = "{messages: [{role, content}], query}";

/// Lifecycle of one chat request. `Failed` is reachable from every other state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Embedding,
    Retrieving,
    Assembling,
    Completing,
    Resolved,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Received => "received",
            PipelineStage::Embedding => "embedding",
            PipelineStage::Retrieving => "retrieving",
            PipelineStage::Assembling => "assembling",
            PipelineStage::Completing => "completing",
            PipelineStage::Resolved => "resolved",
            PipelineStage::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retrieval-augmented chat pipeline over injected collaborators.
#[derive(Clone)]
pub struct ChatPipeline {
    embedder: Arc<dyn EmbeddingsProvider>,
    index: Arc<dyn VectorIndex>,
    completer: Arc<dyn CompletionProvider>,
    cfg: ChatPipelineConfig,
}

impl fmt::Debug for ChatPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatPipeline").field("cfg", &self.cfg).finish()
    }
}

impl ChatPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingsProvider>,
        index: Arc<dyn VectorIndex>,
        completer: Arc<dyn CompletionProvider>,
        cfg: ChatPipelineConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            completer,
            cfg,
        }
    }

    /// Validates a raw JSON body and answers it.
    ///
    /// A body that is not `{messages: [{role, content}], query}` fails before
    /// any external call is made.
    pub async fn handle(&self, payload: serde_json::Value) -> ChatResponse {
        match serde_json::from_value::<ChatRequest>(payload) {
            Ok(req) => self.answer(&req).await,
            Err(e) => self.reject(&e),
        }
    }

    /// Like [`ChatPipeline::handle`], for a raw request body that may not even be JSON.
    pub async fn handle_bytes(&self, body: &[u8]) -> ChatResponse {
        match serde_json::from_slice::<ChatRequest>(body) {
            Ok(req) => self.answer(&req).await,
            Err(e) => self.reject(&e),
        }
    }

    /// Answers a typed request.
    #[instrument(skip_all, fields(turns = req.messages.len()))]
    pub async fn answer(&self, req: &ChatRequest) -> ChatResponse {
        let started = Instant::now();
        match self.run(req).await {
            Ok(message) => {
                info!(
                    citations = message.citations.as_ref().map_or(0, Vec::len),
                    answer_len = message.content.len(),
                    latency_ms = started.elapsed().as_millis(),
                    "chat request resolved"
                );
                ChatResponse::ok(message)
            }
            Err(e) => self.fail(e),
        }
    }

    fn reject(&self, e: &serde_json::Error) -> ChatResponse {
        warn!(error = %e, "chat payload rejected");
        self.fail(PipelineError::Validation(rejected_body(e, REQUEST_SHAPE)))
    }

    fn fail(&self, err: PipelineError) -> ChatResponse {
        error!(
            stage = %err.stage(),
            cause = %err,
            "chat request failed"
        );
        debug!(stage = %PipelineStage::Failed, "stage transition");
        ChatResponse::failure(err.user_message())
    }

    async fn run(&self, req: &ChatRequest) -> Result<Message, PipelineError> {
        enter(PipelineStage::Received);
        let query = req.query.trim();
        if query.is_empty() {
            return Err(PipelineError::Validation("query must not be empty".into()));
        }
        let history = conversation(req);

        enter(PipelineStage::Embedding);
        let vector = self
            .timed(PipelineStage::Embedding, self.embedder.embed(&req.query))
            .await?
            .map_err(PipelineError::Embedding)?;

        enter(PipelineStage::Retrieving);
        let matches = self
            .timed(
                PipelineStage::Retrieving,
                self.index.query(vector, self.cfg.top_k, true),
            )
            .await?
            .map_err(PipelineError::IndexQuery)?;

        enter(PipelineStage::Assembling);
        let assembled = assemble(&matches);
        let messages = prompt::build(&history, &assembled.context, &assembled.citations)?;

        enter(PipelineStage::Completing);
        let content = self
            .timed(
                PipelineStage::Completing,
                self.completer.complete(&messages, self.cfg.completion),
            )
            .await?
            .map_err(PipelineError::Completion)?;

        let citations = used_citations(&content, &assembled.citations);
        enter(PipelineStage::Resolved);
        Ok(Message::assistant(content, Some(citations)))
    }

    async fn timed<T>(
        &self,
        stage: PipelineStage,
        fut: impl Future<Output = T>,
    ) -> Result<T, PipelineError> {
        tokio::time::timeout(self.cfg.call_timeout, fut)
            .await
            .map_err(|_| PipelineError::Timeout {
                stage,
                after: self.cfg.call_timeout,
            })
    }
}

fn enter(stage: PipelineStage) {
    debug!(stage = %stage, "stage transition");
}

/// History plus the query as a final user turn, unless the last turn already is that question.
fn conversation(req: &ChatRequest) -> Vec<ChatTurn> {
    let mut turns = req.messages.clone();
    let already_asked = matches!(
        turns.last(),
        Some(last) if last.role == Role::User && last.content == req.query
    );
    if !already_asked {
        turns.push(ChatTurn::user(req.query.clone()));
    }
    turns
}
