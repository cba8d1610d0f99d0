//! Serves the router on an ephemeral port with in-memory collaborators and
//! exercises every route over real HTTP.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use api::{AppState, router};
use rag_chat::{
    ChatPipelineConfig, ChatTurn, CompletionError, CompletionParams, CompletionProvider,
    IngestConfig,
};
use rag_store::{EmbeddingsProvider, IndexFuture, RagError, RetrievalMatch, VectorIndex};
use serde_json::{Value, json};

struct Embedder {
    fail: bool,
    calls: AtomicUsize,
}

impl EmbeddingsProvider for Embedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RagError::Config("down".into()));
            }
            Ok(vec![text.len() as f32, 0.5])
        })
    }
}

struct Index {
    fail: bool,
    upserts: AtomicUsize,
}

impl VectorIndex for Index {
    fn query<'a>(
        &'a self,
        _vector: Vec<f32>,
        top_k: u64,
        _include_metadata: bool,
    ) -> IndexFuture<'a, Vec<RetrievalMatch>> {
        Box::pin(async move {
            if self.fail {
                return Err(RagError::Qdrant("unreachable".into()));
            }
            let all = vec![
                RetrievalMatch {
                    id: "c1".into(),
                    score: 0.9,
                    metadata: json!({"text": "alpha is first", "fileName": "a.txt"}),
                },
                RetrievalMatch {
                    id: "c2".into(),
                    score: 0.4,
                    metadata: json!({"text": "beta is second"}),
                },
            ];
            Ok(all.into_iter().take(top_k as usize).collect())
        })
    }

    fn upsert<'a>(&'a self, _id: &'a str, _vector: Vec<f32>, _metadata: Value) -> IndexFuture<'a, ()> {
        Box::pin(async move {
            if self.fail {
                return Err(RagError::Qdrant("unreachable".into()));
            }
            self.upserts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

struct Completer;

impl CompletionProvider for Completer {
    fn complete<'a>(
        &'a self,
        _messages: &'a [ChatTurn],
        _params: CompletionParams,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>> {
        Box::pin(async { Ok("Alpha leads [citation: alpha is first].".to_string()) })
    }
}

struct Server {
    base: String,
    embedder: Arc<Embedder>,
    index: Arc<Index>,
    http: reqwest::Client,
}

async fn spawn(fail_embed: bool, fail_index: bool) -> Server {
    let embedder = Arc::new(Embedder {
        fail: fail_embed,
        calls: AtomicUsize::new(0),
    });
    let index = Arc::new(Index {
        fail: fail_index,
        upserts: AtomicUsize::new(0),
    });
    let state = AppState::new(
        embedder.clone(),
        index.clone(),
        Arc::new(Completer),
        None,
        ChatPipelineConfig::default(),
        IngestConfig::default(),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(Arc::new(state))).await.unwrap();
    });

    Server {
        base: format!("http://{addr}"),
        embedder,
        index,
        http: reqwest::Client::new(),
    }
}

impl Server {
    async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .http
            .post(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

#[tokio::test]
async fn chat_returns_cited_answer() {
    let s = spawn(false, false).await;
    let (status, body) = s
        .post_json(
            "/api/chat",
            json!({"messages": [{"role": "user", "content": "Who leads?"}], "query": "Who leads?"}),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"]["role"], "assistant");
    assert_eq!(
        body["message"]["citations"],
        json!([{"text": "alpha is first", "chunkId": "c1", "metadata": {"fileName": "a.txt"}}])
    );
}

#[tokio::test]
async fn chat_failures_still_answer_200() {
    let s = spawn(true, false).await;
    let (status, body) = s
        .post_json(
            "/api/chat",
            json!({"messages": [{"role": "user", "content": "q"}], "query": "q"}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to generate embedding");
    assert_eq!(
        body["message"]["content"],
        "An error occurred while processing your request."
    );

    let resp = s
        .http
        .post(format!("{}/api/chat", s.base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid request: body is not valid JSON");
    assert_eq!(s.embedder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn embed_route_returns_vector_or_500() {
    let ok = spawn(false, false).await;
    let (status, body) = ok.post_json("/api/embed", json!({"text": "abcd"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["embedding"], json!([4.0, 0.5]));

    let (status, _) = ok.post_json("/api/embed", json!({"txt": "abcd"})).await;
    assert_eq!(status, 400);

    let bad = spawn(true, false).await;
    let (status, body) = bad.post_json("/api/embed", json!({"text": "abcd"})).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to generate embedding");
}

#[tokio::test]
async fn search_route_returns_results_or_500() {
    let ok = spawn(false, false).await;
    let (status, body) = ok.post_json("/api/search", json!({"vector": [0.1, 0.2]})).await;
    assert_eq!(status, 200);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], "c1");
    assert_eq!(results[0]["metadata"]["text"], "alpha is first");

    let bad = spawn(false, true).await;
    let (status, body) = bad.post_json("/api/search", json!({"vector": [0.1]})).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to search vectors");
}

#[tokio::test]
async fn ingest_route_reports_chunk_count() {
    let s = spawn(false, false).await;
    let (status, body) = s
        .post_json(
            "/api/ingest",
            json!({"content": "y".repeat(1500), "fileName": "doc.txt"}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true, "chunks": 2}));
    assert_eq!(s.index.upserts.load(Ordering::SeqCst), 2);

    let (status, body) = s
        .post_json("/api/ingest", json!({"content": "abc", "fileName": ""}))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);

    let bad = spawn(false, true).await;
    let (status, body) = bad
        .post_json("/api/ingest", json!({"content": "abc", "fileName": "x.txt"}))
        .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to store chunk");
}

#[tokio::test]
async fn health_without_llm_is_ok() {
    let s = spawn(false, false).await;
    let resp = s.http.get(format!("{}/health", s.base)).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"success": true, "data": []}));
}
