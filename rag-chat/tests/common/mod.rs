//! In-memory collaborators that count their invocations.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use rag_chat::{ChatTurn, CompletionError, CompletionParams, CompletionProvider};
use rag_store::{EmbeddingsProvider, IndexFuture, RagError, RetrievalMatch, VectorIndex};
use serde_json::Value;

#[derive(Default)]
pub struct FakeEmbedder {
    pub calls: AtomicUsize,
    pub fail: bool,
    pub delay: Option<Duration>,
    pub inputs: Mutex<Vec<String>>,
}

impl FakeEmbedder {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingsProvider for FakeEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inputs.lock().unwrap().push(text.to_string());
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            if self.fail {
                return Err(RagError::Config("embedding backend down".into()));
            }
            Ok(vec![text.chars().count() as f32, 1.0, 0.0])
        })
    }
}

#[derive(Default)]
pub struct FakeIndex {
    pub matches: Vec<RetrievalMatch>,
    pub fail_query: bool,
    pub fail_upsert_on: Option<String>,
    pub queries: Mutex<Vec<(Vec<f32>, u64, bool)>>,
    pub upserts: Mutex<Vec<(String, Vec<f32>, Value)>>,
    pub prepared: AtomicUsize,
}

impl FakeIndex {
    pub fn with_matches(matches: Vec<RetrievalMatch>) -> Self {
        Self {
            matches,
            ..Self::default()
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl VectorIndex for FakeIndex {
    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        top_k: u64,
        include_metadata: bool,
    ) -> IndexFuture<'a, Vec<RetrievalMatch>> {
        Box::pin(async move {
            self.queries
                .lock()
                .unwrap()
                .push((vector, top_k, include_metadata));
            if self.fail_query {
                return Err(RagError::Qdrant("connection refused".into()));
            }
            Ok(self.matches.iter().take(top_k as usize).cloned().collect())
        })
    }

    fn upsert<'a>(
        &'a self,
        id: &'a str,
        vector: Vec<f32>,
        metadata: Value,
    ) -> IndexFuture<'a, ()> {
        Box::pin(async move {
            if self.fail_upsert_on.as_deref() == Some(id) {
                return Err(RagError::Qdrant("write rejected".into()));
            }
            self.upserts
                .lock()
                .unwrap()
                .push((id.to_string(), vector, metadata));
            Ok(())
        })
    }

    fn prepare<'a>(&'a self) -> IndexFuture<'a, ()> {
        Box::pin(async move {
            self.prepared.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

#[derive(Default)]
pub struct FakeCompleter {
    pub reply: String,
    pub fail: bool,
    pub seen: Mutex<Vec<(Vec<ChatTurn>, CompletionParams)>>,
}

impl FakeCompleter {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.into(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl CompletionProvider for FakeCompleter {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatTurn],
        params: CompletionParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>> {
        Box::pin(async move {
            self.seen.lock().unwrap().push((messages.to_vec(), params));
            if self.fail {
                return Err(CompletionError::Other("model overloaded".into()));
            }
            Ok(self.reply.clone())
        })
    }
}

pub fn hit(id: &str, score: f32, text: &str) -> RetrievalMatch {
    RetrievalMatch {
        id: id.into(),
        score,
        metadata: serde_json::json!({ "text": text }),
    }
}
