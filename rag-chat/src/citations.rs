//! Resolution of inline `[citation: <excerpt>]` markers in generated text.
//!
//! Each marker is matched against the assembled citations by substring: the
//! first citation (in rank order) whose text contains the excerpt wins. A
//! marker nothing matches is passed through as plain text, so resolution
//! never fails and concatenating the segment literals always gives back the
//! input.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{CaptureMatches, Regex};

use crate::types::Citation;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[citation: (.*?)\]").expect("citation marker pattern is valid")
});

/// One piece of generated text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'t, 'c> {
    /// Verbatim text, including unresolved markers.
    Text(&'t str),
    /// A marker resolved to `citation`, which sits at `index` in the citation list.
    Citation {
        index: usize,
        citation: &'c Citation,
        /// The full `[citation: ...]` marker.
        marker: &'t str,
        excerpt: &'t str,
    },
}

impl<'t> Segment<'t, '_> {
    /// The exact slice of the input this segment covers.
    pub fn literal(&self) -> &'t str {
        match self {
            Segment::Text(s) => s,
            Segment::Citation { marker, .. } => marker,
        }
    }
}

/// Lazy left-to-right iterator returned by [`resolve`].
pub struct Segments<'t, 'c> {
    text: &'t str,
    citations: &'c [Citation],
    markers: CaptureMatches<'static, 't>,
    pos: usize,
    pending: Option<Segment<'t, 'c>>,
}

/// Splits `text` into plain and citation segments.
pub fn resolve<'t, 'c>(text: &'t str, citations: &'c [Citation]) -> Segments<'t, 'c> {
    Segments {
        text,
        citations,
        markers: MARKER.captures_iter(text),
        pos: 0,
        pending: None,
    }
}

fn lookup<'c>(citations: &'c [Citation], excerpt: &str) -> Option<(usize, &'c Citation)> {
    citations
        .iter()
        .enumerate()
        .find(|(_, c)| c.text.contains(excerpt))
}

impl<'t, 'c> Iterator for Segments<'t, 'c> {
    type Item = Segment<'t, 'c>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(seg) = self.pending.take() {
            return Some(seg);
        }

        let Some(caps) = self.markers.next() else {
            if self.pos < self.text.len() {
                let rest = &self.text[self.pos..];
                self.pos = self.text.len();
                return Some(Segment::Text(rest));
            }
            return None;
        };

        let whole = caps.get(0)?;
        let marker = whole.as_str();
        let excerpt = caps.get(1).map_or("", |m| m.as_str());

        let seg = match lookup(self.citations, excerpt) {
            Some((index, citation)) => Segment::Citation {
                index,
                citation,
                marker,
                excerpt,
            },
            None => Segment::Text(marker),
        };

        let before = &self.text[self.pos..whole.start()];
        self.pos = whole.end();
        if before.is_empty() {
            Some(seg)
        } else {
            self.pending = Some(seg);
            Some(Segment::Text(before))
        }
    }
}

/// Distinct citations referenced by resolved markers, in citation-list order.
pub fn used_citations(text: &str, citations: &[Citation]) -> Vec<Citation> {
    let used: BTreeSet<usize> = resolve(text, citations)
        .filter_map(|seg| match seg {
            Segment::Citation { index, .. } => Some(index),
            Segment::Text(_) => None,
        })
        .collect();
    used.into_iter().map(|i| citations[i].clone()).collect()
}
