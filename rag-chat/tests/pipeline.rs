mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{FakeCompleter, FakeEmbedder, FakeIndex, hit};
use rag_chat::{
    ChatPipeline, ChatPipelineConfig, ChatRequest, ChatTurn, FALLBACK_MESSAGE, Role,
    prompt::SYSTEM_PROMPT,
};
use serde_json::json;

struct Harness {
    embedder: Arc<FakeEmbedder>,
    index: Arc<FakeIndex>,
    completer: Arc<FakeCompleter>,
    pipeline: ChatPipeline,
}

fn harness(
    embedder: FakeEmbedder,
    index: FakeIndex,
    completer: FakeCompleter,
    cfg: ChatPipelineConfig,
) -> Harness {
    let embedder = Arc::new(embedder);
    let index = Arc::new(index);
    let completer = Arc::new(completer);
    let pipeline = ChatPipeline::new(embedder.clone(), index.clone(), completer.clone(), cfg);
    Harness {
        embedder,
        index,
        completer,
        pipeline,
    }
}

fn ask(query: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![ChatTurn::user(query)],
        query: query.into(),
    }
}

#[tokio::test]
async fn answers_with_resolved_citation() {
    let h = harness(
        FakeEmbedder::default(),
        FakeIndex::with_matches(vec![hit("c1", 0.92, "alpha is first")]),
        FakeCompleter::replying("It is [citation: alpha]."),
        ChatPipelineConfig::default(),
    );

    let resp = h.pipeline.answer(&ask("What is alpha?")).await;

    assert!(resp.success);
    assert_eq!(resp.error, None);
    assert_eq!(resp.message.role, Role::Assistant);
    assert_eq!(resp.message.content, "It is [citation: alpha].");
    let cites = resp.message.citations.expect("citations attached");
    assert_eq!(cites.len(), 1);
    assert_eq!(cites[0].chunk_id, "c1");
    assert_eq!(cites[0].text, "alpha is first");

    assert_eq!(h.embedder.calls(), 1);
    assert_eq!(h.index.query_count(), 1);
    assert_eq!(h.completer.calls(), 1);
}

#[tokio::test]
async fn queries_index_with_top_three_and_metadata() {
    let h = harness(
        FakeEmbedder::default(),
        FakeIndex::with_matches(vec![
            hit("c1", 0.9, "one"),
            hit("c2", 0.8, "two"),
            hit("c3", 0.7, "three"),
            hit("c4", 0.6, "four"),
        ]),
        FakeCompleter::replying("ok"),
        ChatPipelineConfig::default(),
    );

    let resp = h.pipeline.answer(&ask("count")).await;
    assert!(resp.success);

    let queries = h.index.queries.lock().unwrap();
    let (vector, top_k, include_metadata) = &queries[0];
    assert_eq!(*vector, vec![5.0, 1.0, 0.0]);
    assert_eq!(*top_k, 3);
    assert!(*include_metadata);

    let seen = h.completer.seen.lock().unwrap();
    let (messages, params) = &seen[0];
    assert_eq!(params.max_tokens, 500);
    assert_eq!(
        messages.last().unwrap().content,
        "Context: one\ntwo\nthree\n\nQuestion: count\n\nCitations: one, two, three"
    );
}

#[tokio::test]
async fn prompt_keeps_history_and_appends_query() {
    let h = harness(
        FakeEmbedder::default(),
        FakeIndex::with_matches(vec![hit("c1", 0.5, "ctx")]),
        FakeCompleter::replying("fine"),
        ChatPipelineConfig::default(),
    );
    let req = ChatRequest {
        messages: vec![
            ChatTurn::user("hello"),
            ChatTurn::new(Role::Assistant, "hi there"),
        ],
        query: "and now?".into(),
    };

    assert!(h.pipeline.answer(&req).await.success);

    let seen = h.completer.seen.lock().unwrap();
    let messages = &seen[0].0;
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0], ChatTurn::new(Role::System, SYSTEM_PROMPT));
    assert_eq!(messages[1], ChatTurn::user("hello"));
    assert_eq!(messages[2], ChatTurn::new(Role::Assistant, "hi there"));
    assert!(messages[3].content.contains("Question: and now?"));
    assert_eq!(h.embedder.inputs.lock().unwrap()[0], "and now?");
}

#[tokio::test]
async fn unreferenced_citations_are_not_attached() {
    let h = harness(
        FakeEmbedder::default(),
        FakeIndex::with_matches(vec![hit("c1", 0.5, "alpha")]),
        FakeCompleter::replying("No idea [citation: omega]."),
        ChatPipelineConfig::default(),
    );

    let resp = h.pipeline.answer(&ask("q")).await;
    assert!(resp.success);
    assert_eq!(resp.message.citations, Some(vec![]));
    assert_eq!(resp.message.content, "No idea [citation: omega].");
}

#[tokio::test]
async fn embedding_failure_short_circuits() {
    let h = harness(
        FakeEmbedder::failing(),
        FakeIndex::with_matches(vec![hit("c1", 0.5, "alpha")]),
        FakeCompleter::replying("unused"),
        ChatPipelineConfig::default(),
    );

    let resp = h.pipeline.answer(&ask("q")).await;

    assert!(!resp.success);
    assert_eq!(resp.message.role, Role::Assistant);
    assert_eq!(resp.message.content, FALLBACK_MESSAGE);
    assert_eq!(resp.message.citations, None);
    assert_eq!(resp.error.as_deref(), Some("Failed to generate embedding"));
    assert_eq!(h.index.query_count(), 0);
    assert_eq!(h.completer.calls(), 0);
}

#[tokio::test]
async fn index_failure_skips_completion() {
    let index = FakeIndex {
        fail_query: true,
        ..FakeIndex::default()
    };
    let h = harness(
        FakeEmbedder::default(),
        index,
        FakeCompleter::replying("unused"),
        ChatPipelineConfig::default(),
    );

    let resp = h.pipeline.answer(&ask("q")).await;
    assert!(!resp.success);
    assert_eq!(resp.error.as_deref(), Some("Failed to search vectors"));
    assert_eq!(h.completer.calls(), 0);
}

#[tokio::test]
async fn completion_failure_returns_fallback() {
    let h = harness(
        FakeEmbedder::default(),
        FakeIndex::with_matches(vec![hit("c1", 0.5, "alpha")]),
        FakeCompleter::failing(),
        ChatPipelineConfig::default(),
    );

    let resp = h.pipeline.answer(&ask("q")).await;
    assert!(!resp.success);
    assert_eq!(resp.message.content, FALLBACK_MESSAGE);
    assert_eq!(resp.error.as_deref(), Some("Failed to generate completion"));
}

#[tokio::test]
async fn invalid_role_is_rejected_before_any_call() {
    let h = harness(
        FakeEmbedder::default(),
        FakeIndex::default(),
        FakeCompleter::replying("unused"),
        ChatPipelineConfig::default(),
    );

    let resp = h
        .pipeline
        .handle(json!({
            "messages": [{"role": "wizard", "content": "hi"}],
            "query": "hi"
        }))
        .await;

    assert!(!resp.success);
    assert_eq!(
        resp.error.as_deref(),
        Some("Invalid request: expected {messages: [{role, content}], query}")
    );
    assert_eq!(h.embedder.calls(), 0);
    assert_eq!(h.index.query_count(), 0);
    assert_eq!(h.completer.calls(), 0);
}

#[tokio::test]
async fn malformed_payloads_fail_validation() {
    let h = harness(
        FakeEmbedder::default(),
        FakeIndex::default(),
        FakeCompleter::replying("unused"),
        ChatPipelineConfig::default(),
    );

    for body in [
        json!({"messages": [], "query": "   "}),
        json!({"messages": "nope", "query": "q"}),
        json!({"messages": [{"role": "user", "content": 5}], "query": "q"}),
        json!({"messages": []}),
        json!([1, 2, 3]),
    ] {
        let resp = h.pipeline.handle(body).await;
        assert!(!resp.success);
        assert_eq!(resp.message.content, FALLBACK_MESSAGE);
    }
    assert_eq!(h.embedder.calls(), 0);
}

#[tokio::test]
async fn unparsable_body_reports_no_parser_position() {
    let h = harness(
        FakeEmbedder::default(),
        FakeIndex::default(),
        FakeCompleter::replying("unused"),
        ChatPipelineConfig::default(),
    );

    let resp = h.pipeline.handle_bytes(b"{\"messages\": [\n  {oops").await;
    assert!(!resp.success);
    assert_eq!(resp.error.as_deref(), Some("Invalid request: body is not valid JSON"));

    let resp = h
        .pipeline
        .handle_bytes(b"{\"messages\": [{\"role\": \"bot\", \"content\": \"x\"}], \"query\": \"q\"}")
        .await;
    let err = resp.error.unwrap_or_default();
    assert!(!err.contains("line"), "{err}");
    assert!(!err.contains("column"), "{err}");
    assert_eq!(h.embedder.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_embedding_times_out() {
    let cfg = ChatPipelineConfig {
        call_timeout: Duration::from_millis(50),
        ..ChatPipelineConfig::default()
    };
    let h = harness(
        FakeEmbedder::slow(Duration::from_secs(5)),
        FakeIndex::default(),
        FakeCompleter::replying("unused"),
        cfg,
    );

    let resp = h.pipeline.answer(&ask("q")).await;
    assert!(!resp.success);
    assert_eq!(resp.error.as_deref(), Some("Request timed out"));
    assert_eq!(h.index.query_count(), 0);
}

#[tokio::test]
async fn envelope_serializes_in_wire_shape() {
    let h = harness(
        FakeEmbedder::default(),
        FakeIndex::with_matches(vec![hit("c1", 0.9, "alpha is first")]),
        FakeCompleter::replying("[citation: alpha]"),
        ChatPipelineConfig::default(),
    );

    let resp = h
        .pipeline
        .handle(json!({"messages": [{"role": "user", "content": "a?"}], "query": "a?"}))
        .await;
    let v = serde_json::to_value(&resp).unwrap();

    assert_eq!(v["success"], true);
    assert!(v.get("error").is_none());
    assert_eq!(
        v["message"]["citations"],
        json!([{"text": "alpha is first", "chunkId": "c1"}])
    );
}
