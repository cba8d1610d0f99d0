//! Turns ranked index matches into a context block plus a parallel citation list.

use rag_store::RetrievalMatch;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{Citation, CitationMetadata};

/// Output of [`assemble`]: `context` is the citation texts joined by newlines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssembledContext {
    pub context: String,
    pub citations: Vec<Citation>,
}

/// Builds one citation per match, in rank order.
///
/// Missing or ill-typed metadata never aborts assembly: text falls back to `""`,
/// chunk id falls back to the match id and bad provenance fields are dropped.
pub fn assemble(matches: &[RetrievalMatch]) -> AssembledContext {
    let citations: Vec<Citation> = matches.iter().map(citation_from_match).collect();
    let context = citations
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    debug!(
        matches = matches.len(),
        context_chars = context.chars().count(),
        "context assembled"
    );

    AssembledContext { context, citations }
}

fn citation_from_match(m: &RetrievalMatch) -> Citation {
    let meta = m.metadata.as_object();

    let text = meta
        .and_then(|o| pick_str(o, &["text"]))
        .unwrap_or_default()
        .to_string();
    let chunk_id = meta
        .and_then(|o| pick_str(o, &["chunkId", "chunk_id"]))
        .unwrap_or(&m.id)
        .to_string();

    let provenance = meta
        .map(|o| CitationMetadata {
            file_name: pick_str(o, &["fileName", "file_name"]).map(str::to_string),
            page_number: pick_u64(o, &["pageNumber", "page_number"]),
            timestamp: pick_str(o, &["timestamp"]).map(str::to_string),
        })
        .filter(|p| !p.is_empty());

    Citation {
        text,
        chunk_id,
        metadata: provenance,
    }
}

/// First string value among `keys`.
fn pick_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_str))
}

fn pick_u64(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_u64))
}
