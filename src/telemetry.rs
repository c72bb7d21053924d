//! Telemetry metric name constants.
//!
//! Centralised metric names for heimdall operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `heimdall_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` - adapter name (e.g. "openai", "groq")
//! - `operation` - capability invoked ("complete" or "embed")
//! - `status` - outcome: "ok" or "error"
//! - `direction` - token direction: "prompt" or "completion"

/// Total adapter calls dispatched through the registry.
///
/// Labels: `provider`, `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "heimdall_requests_total";

/// Adapter call duration in seconds.
///
/// Labels: `provider`, `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "heimdall_request_duration_seconds";

/// Adapter failures that moved the chain on to the next provider.
///
/// Labels: `provider`, `operation`.
pub const FALLBACKS_TOTAL: &str = "heimdall_fallbacks_total";

/// Total tokens consumed.
///
/// Labels: `provider`, `direction` ("prompt" | "completion").
pub const TOKENS_TOTAL: &str = "heimdall_tokens_total";

/// Total response cache hits.
///
/// Labels: `operation` (the cache tag).
pub const CACHE_HITS_TOTAL: &str = "heimdall_cache_hits_total";

/// Total response cache misses, including misses caused by store errors.
///
/// Labels: `operation` (the cache tag).
pub const CACHE_MISSES_TOTAL: &str = "heimdall_cache_misses_total";

/// Cache store operations that failed and were swallowed.
///
/// Labels: `operation` ("get" | "set" | "delete" | "scan").
pub const CACHE_ERRORS_TOTAL: &str = "heimdall_cache_errors_total";
