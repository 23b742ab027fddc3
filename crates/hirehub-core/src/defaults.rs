//! Centralized default constants for the HireHub system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// EMBEDDING
// =============================================================================

/// Default embedding model name (Ollama).
///
/// `all-minilm` is the Ollama build of all-MiniLM-L6-v2, the
/// sentence-transformer the stored position and applicant vectors were
/// produced with. Changing the model (or [`EMBED_DIMENSION`]) invalidates
/// every persisted vector and requires a full re-embed pass.
pub const EMBED_MODEL: &str = "all-minilm";

/// Embedding vector dimension for all-minilm.
///
/// Position and applicant vectors share this dimension so they are
/// comparable in the same metric space.
pub const EMBED_DIMENSION: usize = 384;

/// Timeout for embedding requests (seconds).
pub const EMBED_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// INFERENCE / NARRATION
// =============================================================================

/// Default generation model for match narration.
pub const NARRATOR_MODEL: &str = "openai/gpt-oss-20b";

/// Timeout for a single narration round-trip (seconds).
///
/// Narration runs once per ranked candidate, so worst-case request
/// latency is `top_n` times this value. Keep it tight.
pub const NARRATOR_TIMEOUT_SECS: u64 = 30;

/// Sampling temperature for narration requests.
pub const NARRATOR_TEMPERATURE: f32 = 0.5;

/// Token cap for a single narration response.
pub const NARRATOR_MAX_TOKENS: u32 = 500;

// =============================================================================
// RANKING
// =============================================================================

/// Default number of candidates returned by a ranking request.
pub const DEFAULT_TOP_N: i64 = 10;

/// Hard cap on `top_n` accepted by the matches endpoint.
///
/// Bounds both the ranking scan output and, more importantly, the number
/// of sequential narrator round-trips a single request can trigger.
pub const MAX_TOP_N: i64 = 50;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list endpoints.
pub const PAGE_LIMIT: i64 = 50;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://localhost:11434";
