//! Embedding refresh: the explicit two-phase write that keeps stored
//! vectors in sync with their source text.
//!
//! Phase one is the ordinary record save, performed by the caller through
//! the repositories. Phase two is an explicit call into this service,
//! which re-derives the embedding text, runs the embedding backend, and
//! writes the vector through `set_embedding` — a single-column update
//! nothing observes, so a refresh can never cascade into another refresh.
//!
//! Refresh is best-effort by contract: the record save has already
//! committed by the time phase two runs, and an embedding failure must
//! never unwind it. Callers on the save path use the `*_or_warn`
//! variants, which log at WARN and swallow the error; the record is then
//! simply not a ranking candidate until a later save succeeds.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use hirehub_core::{
    applicant_embedding_text, position_embedding_text, ApplicantRepository,
    EmbeddingBackend, Error, PositionRepository, Result, Vector,
};

/// Outcome counts from a bulk re-embed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReEmbedReport {
    pub positions_embedded: usize,
    pub applicants_embedded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Service that refreshes stored embeddings for positions and applicants.
#[derive(Clone)]
pub struct EmbeddingService {
    positions: Arc<dyn PositionRepository>,
    applicants: Arc<dyn ApplicantRepository>,
    backend: Arc<dyn EmbeddingBackend>,
}

impl EmbeddingService {
    pub fn new(
        positions: Arc<dyn PositionRepository>,
        applicants: Arc<dyn ApplicantRepository>,
        backend: Arc<dyn EmbeddingBackend>,
    ) -> Self {
        Self {
            positions,
            applicants,
            backend,
        }
    }

    /// Recompute and store the embedding for a position.
    ///
    /// The vector is derived from the title/description/requirements
    /// template, so any save that touched those fields must be followed
    /// by a refresh. Returns `true` when a vector was written.
    #[instrument(skip(self), fields(subsystem = "matching", component = "embedding_service", op = "refresh_position"))]
    pub async fn refresh_position(&self, id: Uuid) -> Result<bool> {
        let position = self.positions.fetch(id).await?;
        let text = position_embedding_text(&position);

        let vector = self.embed_one(text).await?;
        self.positions.set_embedding(id, &vector).await?;

        debug!(
            position_id = %id,
            model = self.backend.model_name(),
            "position embedding refreshed"
        );
        Ok(true)
    }

    /// Recompute and store the embedding for an applicant.
    ///
    /// An empty resume is a guard, not a clear: the refresh is skipped
    /// and any previously stored vector stays in place. A non-empty
    /// resume always recomputes, even if the text is unchanged.
    /// Returns `true` when a vector was written.
    #[instrument(skip(self), fields(subsystem = "matching", component = "embedding_service", op = "refresh_applicant"))]
    pub async fn refresh_applicant(&self, id: Uuid) -> Result<bool> {
        let applicant = self.applicants.fetch(id).await?;
        let text = applicant_embedding_text(&applicant);
        if text.trim().is_empty() {
            debug!(applicant_id = %id, "empty resume, embedding left untouched");
            return Ok(false);
        }

        let vector = self.embed_one(text.to_string()).await?;
        self.applicants.set_embedding(id, &vector).await?;

        debug!(
            applicant_id = %id,
            model = self.backend.model_name(),
            "applicant embedding refreshed"
        );
        Ok(true)
    }

    /// Best-effort position refresh for the save path: logs at WARN on
    /// failure instead of propagating, so a save never unwinds.
    pub async fn refresh_position_or_warn(&self, id: Uuid) {
        if let Err(e) = self.refresh_position(id).await {
            warn!(
                position_id = %id,
                error = %e,
                "position embedding refresh failed, record saved without vector"
            );
        }
    }

    /// Best-effort applicant refresh for the save path.
    pub async fn refresh_applicant_or_warn(&self, id: Uuid) {
        if let Err(e) = self.refresh_applicant(id).await {
            warn!(
                applicant_id = %id,
                error = %e,
                "applicant embedding refresh failed, record saved without vector"
            );
        }
    }

    /// Re-embed every position and applicant.
    ///
    /// For migrating to a new embedding model: stored vectors from
    /// different models are not comparable, so a model change requires
    /// this full pass. Individual failures are counted, not fatal.
    #[instrument(skip(self), fields(subsystem = "matching", component = "embedding_service", op = "re_embed_all"))]
    pub async fn re_embed_all(&self) -> Result<ReEmbedReport> {
        let start = Instant::now();
        let mut report = ReEmbedReport::default();

        for id in self.positions.list_all_ids().await? {
            match self.refresh_position(id).await {
                Ok(true) => report.positions_embedded += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        position_id = %id,
                        error = %e,
                        "re-embed failed for position"
                    );
                }
            }
        }

        for id in self.applicants.list_all_ids().await? {
            match self.refresh_applicant(id).await {
                Ok(true) => report.applicants_embedded += 1,
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        applicant_id = %id,
                        error = %e,
                        "re-embed failed for applicant"
                    );
                }
            }
        }

        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            positions = report.positions_embedded,
            applicants = report.applicants_embedded,
            skipped = report.skipped,
            failed = report.failed,
            "re-embed pass complete"
        );
        Ok(report)
    }

    /// Embed a single text and validate the vector dimension before it
    /// can reach storage.
    async fn embed_one(&self, text: String) -> Result<Vector> {
        let expected = self.backend.dimension();
        let mut vectors = self.backend.embed_texts(&[text]).await?;
        let vector = vectors
            .pop()
            .ok_or_else(|| Error::Embedding("backend returned no vectors".to_string()))?;

        let got = vector.as_slice().len();
        if got != expected {
            return Err(Error::Embedding(format!(
                "dimension mismatch: expected {expected}, got {got}"
            )));
        }
        Ok(vector)
    }
}
