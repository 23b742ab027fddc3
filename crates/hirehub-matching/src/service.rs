//! Ranking orchestration: position lookup, candidate scan, optional
//! narration.
//!
//! The contract favors graceful degradation over failure. A ranking
//! request always returns an ordered (possibly empty) list: a missing
//! position or one without a stored vector yields `[]`, applicants
//! without vectors simply are not candidates, and narrator failures
//! surface as error text inside the affected slot. The only fast
//! failure is malformed input (`top_n <= 0`).

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument};
use uuid::Uuid;

use hirehub_core::{
    ApplicantRepository, Error, JobPosition, MatchResult, PositionRepository, RankedCandidate,
    Result,
};

use crate::narrator::MatchNarrator;
use crate::ranker::rank_by_distance;

/// Service answering "who are the best candidates for this position?".
#[derive(Clone)]
pub struct MatchService {
    positions: Arc<dyn PositionRepository>,
    applicants: Arc<dyn ApplicantRepository>,
    narrator: MatchNarrator,
}

impl MatchService {
    pub fn new(
        positions: Arc<dyn PositionRepository>,
        applicants: Arc<dyn ApplicantRepository>,
        narrator: MatchNarrator,
    ) -> Self {
        Self {
            positions,
            applicants,
            narrator,
        }
    }

    /// Rank all embedded applicants against a position's stored vector.
    ///
    /// Returns up to `top_n` candidates ordered by ascending cosine
    /// distance. `[]` when the position does not exist or has no vector.
    /// `top_n <= 0` is a caller bug and fails fast.
    #[instrument(skip(self), fields(subsystem = "matching", component = "match_service", op = "rank"))]
    pub async fn rank_applicants_for_position(
        &self,
        position_id: Uuid,
        top_n: i64,
    ) -> Result<Vec<RankedCandidate>> {
        let (_, ranked) = self.ranked_with_position(position_id, top_n).await?;
        Ok(ranked)
    }

    /// Rank candidates and hydrate each into a full match result,
    /// narrating when requested.
    ///
    /// Narration is sequential per candidate; a candidate deleted
    /// between the scan and hydration is skipped rather than failing
    /// the whole response.
    #[instrument(skip(self), fields(subsystem = "matching", component = "match_service", op = "rank_with_narratives"))]
    pub async fn rank_with_narratives(
        &self,
        position_id: Uuid,
        top_n: i64,
        narrate: bool,
    ) -> Result<Vec<MatchResult>> {
        let start = Instant::now();
        let (position, ranked) = self.ranked_with_position(position_id, top_n).await?;
        let Some(position) = position else {
            return Ok(Vec::new());
        };

        let mut results = Vec::with_capacity(ranked.len());
        for candidate in ranked {
            let applicant = match self.applicants.fetch(candidate.applicant_id).await {
                Ok(a) => a,
                Err(Error::ApplicantNotFound(_) | Error::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };

            let narrative = if narrate {
                Some(self.narrator.narrate(&position, &applicant).await)
            } else {
                None
            };

            results.push(MatchResult {
                applicant: applicant.into(),
                distance: candidate.distance,
                narrative,
            });
        }

        debug!(
            position_id = %position_id,
            result_count = results.len(),
            narrated = narrate,
            duration_ms = start.elapsed().as_millis() as u64,
            "match request complete"
        );
        Ok(results)
    }

    async fn ranked_with_position(
        &self,
        position_id: Uuid,
        top_n: i64,
    ) -> Result<(Option<JobPosition>, Vec<RankedCandidate>)> {
        if top_n <= 0 {
            return Err(Error::InvalidInput(format!(
                "top_n must be positive, got {top_n}"
            )));
        }

        let Some(position) = self.positions.fetch_optional(position_id).await? else {
            debug!(position_id = %position_id, "position not found, empty ranking");
            return Ok((None, Vec::new()));
        };

        let Some(query) = position.embedding.clone() else {
            debug!(position_id = %position_id, "position has no embedding, empty ranking");
            return Ok((Some(position), Vec::new()));
        };

        let candidates = self.applicants.list_embedded(None).await?;
        let ranked = rank_by_distance(&query, candidates, top_n as usize);
        Ok((Some(position), ranked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding_service::EmbeddingService;
    use crate::test_support::{InMemoryApplicants, InMemoryPositions};
    use hirehub_core::{CreateApplicantRequest, CreatePositionRequest, Vector};
    use hirehub_inference::MockInferenceBackend;

    struct Fixture {
        positions: Arc<InMemoryPositions>,
        applicants: Arc<InMemoryApplicants>,
        service: MatchService,
    }

    fn fixture() -> Fixture {
        fixture_with_narrator(MatchNarrator::new(Arc::new(
            MockInferenceBackend::new().with_fixed_response("Narrated fit"),
        )))
    }

    fn fixture_with_narrator(narrator: MatchNarrator) -> Fixture {
        let positions = Arc::new(InMemoryPositions::new());
        let applicants = Arc::new(InMemoryApplicants::new());
        let service = MatchService::new(positions.clone(), applicants.clone(), narrator);
        Fixture {
            positions,
            applicants,
            service,
        }
    }

    async fn seed_position(f: &Fixture, embedding: Option<Vec<f32>>) -> Uuid {
        let id = f
            .positions
            .insert(CreatePositionRequest {
                title: "Backend Engineer".to_string(),
                description: "Services".to_string(),
                requirements: "Rust".to_string(),
                tags: String::new(),
                is_active: true,
            })
            .await
            .unwrap();
        if let Some(v) = embedding {
            f.positions.set_embedding(id, &Vector::from(v)).await.unwrap();
        }
        id
    }

    async fn seed_applicant(f: &Fixture, name: &str, embedding: Option<Vec<f32>>) -> Uuid {
        let id = f
            .applicants
            .insert(CreateApplicantRequest {
                name: name.to_string(),
                email: format!("{name}@example.com"),
                resume_text: format!("{name} resume"),
                ..Default::default()
            })
            .await
            .unwrap();
        if let Some(v) = embedding {
            f.applicants.set_embedding(id, &Vector::from(v)).await.unwrap();
        }
        id
    }

    #[tokio::test]
    async fn ranks_by_ascending_cosine_distance() {
        let f = fixture();
        let position = seed_position(&f, Some(vec![1.0, 0.0])).await;
        let a = seed_applicant(&f, "a", Some(vec![1.0, 0.0])).await;
        let b = seed_applicant(&f, "b", Some(vec![0.0, 1.0])).await;
        let c = seed_applicant(&f, "c", Some(vec![-1.0, 0.0])).await;

        let ranked = f
            .service
            .rank_applicants_for_position(position, 10)
            .await
            .unwrap();

        let ids: Vec<Uuid> = ranked.iter().map(|r| r.applicant_id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[tokio::test]
    async fn missing_position_returns_empty_list() {
        let f = fixture();
        seed_applicant(&f, "a", Some(vec![1.0, 0.0])).await;

        let ranked = f
            .service
            .rank_applicants_for_position(Uuid::now_v7(), 10)
            .await
            .unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn position_without_embedding_returns_empty_list() {
        let f = fixture();
        let position = seed_position(&f, None).await;
        seed_applicant(&f, "a", Some(vec![1.0, 0.0])).await;

        let ranked = f
            .service
            .rank_applicants_for_position(position, 10)
            .await
            .unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn applicants_without_embeddings_are_excluded() {
        let f = fixture();
        let position = seed_position(&f, Some(vec![1.0, 0.0])).await;
        let embedded = seed_applicant(&f, "a", Some(vec![1.0, 0.0])).await;
        seed_applicant(&f, "b", None).await;

        let ranked = f
            .service
            .rank_applicants_for_position(position, 10)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].applicant_id, embedded);
    }

    #[tokio::test]
    async fn nonpositive_top_n_fails_fast() {
        let f = fixture();
        let position = seed_position(&f, Some(vec![1.0, 0.0])).await;

        for bad in [0, -1, -50] {
            let err = f
                .service
                .rank_applicants_for_position(position, bad)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn top_n_bounds_result_count() {
        let f = fixture();
        let position = seed_position(&f, Some(vec![1.0, 0.0])).await;
        for i in 0..5 {
            seed_applicant(&f, &format!("a{i}"), Some(vec![1.0, i as f32 * 0.1])).await;
        }

        let ranked = f
            .service
            .rank_applicants_for_position(position, 2)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[tokio::test]
    async fn narration_disabled_leaves_slot_empty() {
        let f = fixture();
        let position = seed_position(&f, Some(vec![1.0, 0.0])).await;
        seed_applicant(&f, "a", Some(vec![1.0, 0.0])).await;

        let results = f
            .service
            .rank_with_narratives(position, 10, false)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].narrative.is_none());
    }

    #[tokio::test]
    async fn narration_enabled_fills_every_slot() {
        let f = fixture();
        let position = seed_position(&f, Some(vec![1.0, 0.0])).await;
        for i in 0..3 {
            seed_applicant(&f, &format!("a{i}"), Some(vec![1.0, i as f32 * 0.1])).await;
        }

        let results = f
            .service
            .rank_with_narratives(position, 10, true)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
        for result in &results {
            assert_eq!(result.narrative.as_deref(), Some("Narrated fit"));
        }
    }

    #[tokio::test]
    async fn narrator_failure_degrades_to_error_text_in_slot() {
        // The prompt embeds the resume text, so one candidate's generation
        // call fails while the others succeed.
        let narrator = MatchNarrator::new(Arc::new(
            MockInferenceBackend::new()
                .with_fixed_response("Good fit")
                .with_failure_for_input("a1 resume"),
        ));
        let f = fixture_with_narrator(narrator);
        let position = seed_position(&f, Some(vec![1.0, 0.0])).await;
        for i in 0..5 {
            seed_applicant(&f, &format!("a{i}"), Some(vec![1.0, i as f32 * 0.1])).await;
        }

        let results = f
            .service
            .rank_with_narratives(position, 10, true)
            .await
            .unwrap();
        assert_eq!(results.len(), 5);

        let error_slots = results
            .iter()
            .filter(|r| {
                r.narrative
                    .as_deref()
                    .is_some_and(|n| n.starts_with("Error communicating"))
            })
            .count();
        assert_eq!(error_slots, 1);
        assert!(results.iter().all(|r| r.narrative.is_some()));
    }

    #[tokio::test]
    async fn ranking_reflects_refreshed_embeddings_end_to_end() {
        // Full pipeline with the deterministic backend: save, refresh,
        // rank. An applicant whose resume matches the position's text
        // exactly must rank first.
        let f = fixture();
        let backend = MockInferenceBackend::new().with_dimension(64);
        let embeddings = EmbeddingService::new(
            f.positions.clone(),
            f.applicants.clone(),
            Arc::new(backend),
        );

        let position = seed_position(&f, None).await;
        embeddings.refresh_position(position).await.unwrap();
        let position_text =
            hirehub_core::position_embedding_text(&f.positions.fetch(position).await.unwrap());

        let twin = f
            .applicants
            .insert(CreateApplicantRequest {
                name: "Twin".to_string(),
                email: "twin@example.com".to_string(),
                resume_text: position_text,
                ..Default::default()
            })
            .await
            .unwrap();
        let other = seed_applicant(&f, "other", None).await;
        f.applicants
            .update(
                other,
                hirehub_core::UpdateApplicantRequest {
                    resume_text: Some("gardening and pottery".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        embeddings.refresh_applicant(twin).await.unwrap();
        embeddings.refresh_applicant(other).await.unwrap();

        let ranked = f
            .service
            .rank_applicants_for_position(position, 10)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].applicant_id, twin);
        assert!(ranked[0].distance < ranked[1].distance);
    }
}
