//! Cosine-distance ranking over stored embedding vectors.
//!
//! Distance here is cosine distance, `1 - cosine_similarity`, in the
//! range [0, 2]: 0 means identical direction, 1 orthogonal, 2 opposite.
//! Candidates are ordered ascending, so the best match comes first.
//!
//! The scan is brute-force over the candidate set. At current data
//! volumes that is O(N * D) per request and entirely adequate; the
//! repository's `list_embedded` query is the seam where an indexed
//! nearest-neighbor scan (pgvector `<=>`) can take over without changing
//! any caller.

use hirehub_core::{RankedCandidate, Vector};
use uuid::Uuid;

/// Cosine distance between two vectors: `1 - cosine_similarity`.
///
/// Returns a value in [0, 2]. A zero-magnitude vector has no direction
/// to compare, so it ranks at maximum distance rather than poisoning the
/// ordering with NaN.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 2.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    // Float error can push |similarity| a hair past 1.
    1.0 - similarity.clamp(-1.0, 1.0)
}

/// Rank candidates by ascending cosine distance to `query`, truncated to
/// `top_n` entries.
///
/// Ties break ascending by candidate ID. IDs are UUIDv7 and therefore
/// time-ordered, so equal-distance candidates come out oldest first and
/// the ordering is fully deterministic.
pub fn rank_by_distance(
    query: &Vector,
    candidates: Vec<(Uuid, Vector)>,
    top_n: usize,
) -> Vec<RankedCandidate> {
    let query = query.as_slice();
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|(id, vector)| RankedCandidate {
            applicant_id: id,
            distance: cosine_distance(query, vector.as_slice()),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.applicant_id.cmp(&b.applicant_id))
    });
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(x: f32, y: f32) -> Vector {
        Vector::from(vec![x, y])
    }

    #[test]
    fn distance_identical_is_zero() {
        let d = cosine_distance(&[1.0, 0.0], &[1.0, 0.0]);
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn distance_orthogonal_is_one() {
        let d = cosine_distance(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((d - 1.0).abs() < 1e-6);
    }

    #[test]
    fn distance_opposite_is_two() {
        let d = cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((d - 2.0).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = [1.0, 2.0, -0.5];
        let b = [3.0, -1.0, 0.25];
        assert_eq!(cosine_distance(&a, &b), cosine_distance(&b, &a));
        // Holds for the zero-vector special case too.
        assert_eq!(
            cosine_distance(&[0.0, 0.0, 0.0], &a),
            cosine_distance(&a, &[0.0, 0.0, 0.0])
        );
    }

    #[test]
    fn distance_ignores_magnitude() {
        let d = cosine_distance(&[0.5, 0.5], &[5.0, 5.0]);
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn distance_zero_vector_is_maximal() {
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 2.0);
        assert_eq!(cosine_distance(&[1.0, 0.0], &[0.0, 0.0]), 2.0);
    }

    #[test]
    fn rank_orders_ascending_by_distance() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let c = Uuid::now_v7();

        let query = vec2(1.0, 0.0);
        let candidates = vec![
            (c, vec2(-1.0, 0.0)),
            (a, vec2(1.0, 0.0)),
            (b, vec2(0.0, 1.0)),
        ];

        let ranked = rank_by_distance(&query, candidates, 10);
        let ids: Vec<Uuid> = ranked.iter().map(|r| r.applicant_id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert!(ranked[0].distance < 0.001);
        assert!((ranked[1].distance - 1.0).abs() < 0.001);
        assert!((ranked[2].distance - 2.0).abs() < 0.001);
    }

    #[test]
    fn rank_truncates_to_top_n() {
        let query = vec2(1.0, 0.0);
        let candidates: Vec<(Uuid, Vector)> = (0..7)
            .map(|i| (Uuid::now_v7(), vec2(1.0, i as f32 * 0.1)))
            .collect();

        let ranked = rank_by_distance(&query, candidates, 3);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn rank_breaks_ties_by_ascending_id() {
        // UUIDv7 is time-ordered, so now_v7 calls are already ascending.
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();
        assert!(first < second);

        let query = vec2(1.0, 0.0);
        // Insert in reverse order; equal distances must come back id-ascending.
        let candidates = vec![(second, vec2(2.0, 0.0)), (first, vec2(3.0, 0.0))];

        let ranked = rank_by_distance(&query, candidates, 10);
        assert_eq!(ranked[0].applicant_id, first);
        assert_eq!(ranked[1].applicant_id, second);
    }

    #[test]
    fn rank_empty_candidates_is_empty() {
        let ranked = rank_by_distance(&vec2(1.0, 0.0), vec![], 10);
        assert!(ranked.is_empty());
    }
}
