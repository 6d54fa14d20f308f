//! Tracing helpers for binaries embedding the answer engine.
//!
//! Provides a workspace-scoped formatting layer and `EnvFilter` helpers
//! so a composition root can render the pipeline's own events at a
//! raised level without drowning in dependency noise.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefixes of the pipeline's own crates.
const TARGETS: &[&str] = &["answer_engine", "llm_providers", "semantic_cache"];

/// RFC3339 UTC timer implemented via `chrono` (no extra features).
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        // Keep timestamps compact: no fractional seconds, Z-suffix
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Builds a **pipeline-scoped** formatting layer that renders only events
/// emitted by the workspace's own crates.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line` and target
/// - Span close events (duration at the end of spans)
/// - ANSI colors only when stdout is a terminal
///
/// The per-event filter means the layer does not affect logs from other
/// crates; compose it in the binary together with your global subscriber.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    // Accept only events originating in the pipeline's crates.
    let only_pipeline = filter::filter_fn(|meta| {
        TARGETS
            .iter()
            .any(|target| meta.target().starts_with(target))
    });

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_filter(only_pipeline)
}

/// Builds a level directive for one pipeline crate, e.g. `answer_engine=debug`.
fn level_directive(target: &str, level: Level) -> Directive {
    let s = format!("{target}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).expect("valid level directive")
}

/// Creates an `EnvFilter` from the environment or the given fallback,
/// then raises the level for every pipeline crate.
///
/// Example: `env_filter_with_level("info", Level::DEBUG)` keeps the world
/// at INFO while the pipeline's own crates log at DEBUG.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    for target in TARGETS {
        filter = filter.add_directive(level_directive(target, level));
    }
    filter
}
