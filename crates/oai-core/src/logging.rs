//! Structured logging field name constants.
//!
//! Every `tracing` event emitted by the client uses these names so log
//! aggregation can query requests consistently.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | WARN  | Non-success HTTP status, empty access token |
//! | INFO  | Client construction |
//! | DEBUG | One event per request, per decoded body and per JSON repair |
//! | TRACE | Per stream chunk |

// ─── Request fields ────────────────────────────────────────────────────────

/// HTTP method ("GET", "POST", "DELETE").
pub const METHOD: &str = "method";

/// API path suffix, e.g. "/chat/completions".
pub const PATH: &str = "path";

/// Absolute request URI.
pub const URI: &str = "uri";

/// Whether the request was sent with a stream handler.
pub const STREAMING: &str = "streaming";

/// Number of multipart form fields.
pub const FIELD_COUNT: &str = "field_count";

// ─── Response fields ───────────────────────────────────────────────────────

/// HTTP status code.
pub const STATUS: &str = "status";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Bytes received (cumulative for streams).
pub const BYTES: &str = "bytes";

/// Fragments delivered in one stream callback.
pub const FRAGMENT_COUNT: &str = "fragment_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
