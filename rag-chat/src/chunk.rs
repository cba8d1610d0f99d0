//! Fixed-size, non-overlapping text chunking.
//!
//! Sizes are counted in `char`s, so a slice boundary never falls inside a
//! code point. Joining the chunks of a document in order gives the document back.

use std::num::NonZeroUsize;

use serde::Serialize;

/// Default chunk size used by ingestion.
pub const DEFAULT_CHUNK_CHARS: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Splits `content` into consecutive slices of at most `max_chars` characters.
///
/// The last slice holds the remainder; empty input yields no slices.
pub fn chunk(content: &str, max_chars: NonZeroUsize) -> Vec<&str> {
    let max = max_chars.get();
    let mut out = Vec::with_capacity(content.len() / max + 1);
    let mut start = 0;
    let mut count = 0;

    for (byte_idx, _) in content.char_indices() {
        if count == max {
            out.push(&content[start..byte_idx]);
            start = byte_idx;
            count = 0;
        }
        count += 1;
    }
    if start < content.len() {
        out.push(&content[start..]);
    }
    out
}

/// A chunk with a stable, offset-derived identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Position within the document, starting at 0.
    pub index: usize,
    /// Char offset of the first character within the document.
    pub offset: usize,
    /// `"<document_id>#<offset>"`.
    pub chunk_id: String,
    pub text: String,
}

/// Chunks a document and attaches index, offset and id to every slice.
pub fn chunk_document(document_id: &str, content: &str, max_chars: NonZeroUsize) -> Vec<Chunk> {
    let mut offset = 0;
    chunk(content, max_chars)
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let c = Chunk {
                index,
                offset,
                chunk_id: format!("{document_id}#{offset}"),
                text: text.to_string(),
            };
            offset += text.chars().count();
            c
        })
        .collect()
}
