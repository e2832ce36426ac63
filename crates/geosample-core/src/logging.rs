//! Structured logging schema and field name constants for geosample.
//!
//! All crates use these field names for consistent structured logging so log
//! aggregation tools can query by standardized names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Operation failed, outcome recorded as failed |
//! | WARN  | Recoverable issue, operation degraded or skipped an item |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-document iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "db", "config"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "entries", "codec", "memory_store"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "save", "find_one", "search", "list_all"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Store id of the entry being operated on.
pub const ENTRY_ID: &str = "entry_id";

/// Business key of the entry being operated on.
pub const EXTERNAL_ID: &str = "external_id";

/// Collection name a store call targets.
pub const COLLECTION: &str = "collection";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of documents a query matched.
pub const RESULT_COUNT: &str = "result_count";

/// Number of matched documents that decoded into entries.
pub const DECODED_COUNT: &str = "decoded_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Final operation status recorded on the job.
pub const STATUS: &str = "status";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
