//! # hirehub-matching
//!
//! The AI matching core of HireHub: embedding refresh, cosine-distance
//! ranking, and LLM match narration.
//!
//! The pipeline has three stages:
//!
//! 1. [`EmbeddingService`] keeps each position's and applicant's stored
//!    vector in sync with its source text, as an explicit second phase
//!    after every save.
//! 2. [`ranker`] orders stored applicant vectors by cosine distance to a
//!    position's vector.
//! 3. [`MatchNarrator`] optionally asks a `GenerationBackend` for a
//!    per-candidate fit assessment.
//!
//! [`MatchService`] ties the three together behind the repository traits
//! from `hirehub-core`, so it runs identically against PostgreSQL or the
//! in-memory test fakes.

pub mod embedding_service;
pub mod narrator;
pub mod ranker;
pub mod service;

#[cfg(test)]
mod test_support;

pub use embedding_service::{EmbeddingService, ReEmbedReport};
pub use narrator::MatchNarrator;
pub use ranker::{cosine_distance, rank_by_distance};
pub use service::MatchService;
