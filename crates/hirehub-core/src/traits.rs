//! Core traits for HireHub abstractions.
//!
//! These traits define the interfaces concrete implementations must
//! satisfy, enabling pluggable backends and testability. The matching
//! services in `hirehub-matching` depend only on these traits, never on
//! the PostgreSQL implementations directly.

use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// POSITION REPOSITORY
// =============================================================================

/// Repository for job position CRUD and embedding storage.
#[async_trait]
pub trait PositionRepository: Send + Sync {
    /// Insert a new position.
    async fn insert(&self, req: CreatePositionRequest) -> Result<Uuid>;

    /// Fetch a position by ID.
    async fn fetch(&self, id: Uuid) -> Result<JobPosition>;

    /// Fetch a position by ID, returning `None` when it does not exist.
    async fn fetch_optional(&self, id: Uuid) -> Result<Option<JobPosition>>;

    /// List positions.
    async fn list(&self, req: ListPositionsRequest) -> Result<Vec<JobPosition>>;

    /// Apply a partial update.
    async fn update(&self, id: Uuid, req: UpdatePositionRequest) -> Result<()>;

    /// Delete a position. Applicants referencing it are detached, not
    /// deleted.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Write only the embedding column for a position.
    ///
    /// This is the no-retrigger path of the two-phase save: nothing
    /// observes this write, so refreshing an embedding can never recurse
    /// into another refresh.
    async fn set_embedding(&self, id: Uuid, vector: &Vector) -> Result<()>;

    /// List all position IDs (for bulk re-embedding).
    async fn list_all_ids(&self) -> Result<Vec<Uuid>>;
}

// =============================================================================
// APPLICANT REPOSITORY
// =============================================================================

/// Repository for applicant CRUD, embedding storage, and the
/// candidate-vector query the ranker consumes.
#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    /// Insert a new applicant.
    async fn insert(&self, req: CreateApplicantRequest) -> Result<Uuid>;

    /// Fetch an applicant by ID.
    async fn fetch(&self, id: Uuid) -> Result<Applicant>;

    /// List applicants with search, filtering, and ordering.
    async fn list(&self, req: ListApplicantsRequest) -> Result<Vec<Applicant>>;

    /// Apply a partial update.
    async fn update(&self, id: Uuid, req: UpdateApplicantRequest) -> Result<()>;

    /// Delete an applicant.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Write only the embedding column for an applicant (no-retrigger
    /// path, see [`PositionRepository::set_embedding`]).
    async fn set_embedding(&self, id: Uuid, vector: &Vector) -> Result<()>;

    /// All applicants with a stored embedding, as (id, vector) pairs,
    /// optionally restricted to those assigned to a given position.
    ///
    /// Applicants without a vector are excluded here, not ranked last:
    /// "no embedding" means "not a candidate". This query is the seam
    /// where a pgvector-indexed nearest-neighbor scan can replace the
    /// in-process ranking without touching the service contract.
    async fn list_embedded(&self, position_id: Option<Uuid>) -> Result<Vec<(Uuid, Vector)>>;

    /// List all applicant IDs (for bulk re-embedding).
    async fn list_all_ids(&self) -> Result<Vec<Uuid>>;
}

// =============================================================================
// INFERENCE BACKENDS
// =============================================================================

/// Backend for embedding generation.
///
/// Implementations are pure functions of their input text given a fixed
/// model version: same text in, same vector out. Instances are shared
/// process-wide and must be safe for concurrent use.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Generate embeddings for the given texts.
    ///
    /// Returns one vector per input text.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>>;

    /// Expected dimension of embedding vectors.
    fn dimension(&self) -> usize;

    /// Model name being used.
    fn model_name(&self) -> &str;
}

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Model name being used.
    fn model_name(&self) -> &str;
}
