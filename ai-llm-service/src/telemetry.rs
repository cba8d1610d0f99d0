use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Targets rendered by [`layer`]: the LLM client plus the RAG crates built on it.
pub const TARGET_PREFIXES: &[&str] = &["ai_llm_service", "rag_store", "rag_chat", "api"];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2026-10-16T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

fn is_own_target(target: &str) -> bool {
    TARGET_PREFIXES
        .iter()
        .any(|p| target == *p || target.starts_with(&format!("{p}::")))
}

/// Formatting layer that renders only events emitted by the RAG service crates.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line`
/// - Span close events, so `#[instrument]`ed calls report their duration
/// - ANSI colors only when stdout is a terminal
///
/// Uses a per-layer filter, so other layers on the same registry are unaffected.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_ours = filter::filter_fn(|meta| is_own_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_ours)
}

/// Per-crate level directives, e.g. `rag_chat=debug`.
pub fn level_directives(level: Level) -> Vec<Directive> {
    let lvl = level.as_str().to_lowercase();
    TARGET_PREFIXES
        .iter()
        .filter_map(|p| Directive::from_str(&format!("{p}={lvl}")).ok())
        .collect()
}

/// `EnvFilter` from `RUST_LOG` when set; otherwise `default` with `level`
/// applied to the service crates.
///
/// With `default = "warn"` and `level = Level::INFO`, third-party crates log at WARN
/// while pipeline stages log at INFO.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        level_directives(level)
            .into_iter()
            .fold(EnvFilter::new(default), |f, d| f.add_directive(d))
    })
}
