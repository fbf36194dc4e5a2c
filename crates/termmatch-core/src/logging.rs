//! Structured logging schema and field name constants for termmatch.
//!
//! All crates use these constants for consistent structured logging
//! fields, so log aggregation tools can query by standardized names
//! across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-row iteration, high-volume data (candidate rows) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for a resolution batch. Format: UUIDv7 (time-ordered).
pub const BATCH_ID: &str = "batch_id";

/// Subsystem originating the log event.
/// Values: "engine", "db", "remote"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "matcher", "expander", "result_cache", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "resolve", "find_matches", "expand_ancestors"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Search term being resolved.
pub const SEARCH_TERM: &str = "search_term";

/// Concept id being expanded.
pub const CONCEPT_ID: &str = "concept_id";

/// Vocabulary filter in effect.
pub const VOCABULARY_ID: &str = "vocabulary_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or query.
pub const RESULT_COUNT: &str = "result_count";

/// Whether a cache lookup hit.
pub const CACHE_HIT: &str = "cache_hit";

/// Number of cache rows removed by a bulk clear.
pub const ROWS_DELETED: &str = "rows_deleted";

/// Initialize tracing with an env-filter subscriber.
///
/// Intended for binaries and examples; library code only emits events.
/// Respects `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
