use crate::recognition::domain::match_verdict::MatchVerdict;
use crate::recognition::domain::signature_store::SignatureStore;
use crate::recognition::domain::similarity::cosine_similarity;

/// Finds the enrolled record most similar to `query`.
///
/// Linear scan in insertion order. On equal scores the earliest record
/// wins. The best match is accepted only when its score is strictly above
/// `threshold`. Malformed queries yield [`MatchVerdict::Invalid`] rather
/// than an error.
pub fn recognize(store: &SignatureStore, query: &[f32], threshold: f64) -> MatchVerdict {
    if query.is_empty() || query.iter().any(|v| !v.is_finite()) {
        return MatchVerdict::Invalid;
    }
    let Some(dimension) = store.dimension() else {
        return MatchVerdict::Empty;
    };
    if query.len() != dimension {
        return MatchVerdict::Invalid;
    }

    let records = store.all();
    let mut best_index = 0;
    let mut best_score = cosine_similarity(query, &records[0].signature);
    for (i, record) in records.iter().enumerate().skip(1) {
        let score = cosine_similarity(query, &record.signature);
        if score > best_score {
            best_score = score;
            best_index = i;
        }
    }

    log::debug!(
        "Best match '{}' at index {best_index} with score {best_score:.4}",
        records[best_index].name
    );

    if best_score > threshold {
        MatchVerdict::Recognized {
            name: records[best_index].name.clone(),
            score: best_score,
        }
    } else {
        MatchVerdict::Unrecognized { best_score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn store(entries: &[(&str, &[f32])]) -> SignatureStore {
        let mut store = SignatureStore::new();
        for (name, sig) in entries {
            store.enroll(*name, sig.to_vec()).unwrap();
        }
        store
    }

    #[test]
    fn test_empty_store_returns_empty() {
        assert_eq!(
            recognize(&SignatureStore::new(), &[1.0, 0.0], 0.5),
            MatchVerdict::Empty
        );
    }

    #[rstest]
    #[case::empty_query(&[])]
    #[case::wrong_dimension(&[1.0, 0.0, 0.0])]
    #[case::nan(&[f32::NAN, 1.0])]
    #[case::infinite(&[f32::INFINITY, 1.0])]
    fn test_malformed_query_is_invalid(#[case] query: &[f32]) {
        let s = store(&[("alice", &[1.0, 0.0])]);
        assert_eq!(recognize(&s, query, 0.5), MatchVerdict::Invalid);
    }

    #[test]
    fn test_empty_query_on_empty_store_is_invalid() {
        assert_eq!(
            recognize(&SignatureStore::new(), &[], 0.5),
            MatchVerdict::Invalid
        );
    }

    #[test]
    fn test_picks_most_similar_record() {
        let s = store(&[
            ("alice", &[1.0, 0.0]),
            ("bob", &[0.0, 1.0]),
            ("carol", &[0.7, 0.7]),
        ]);
        let verdict = recognize(&s, &[0.1, 1.0], 0.5);
        assert_eq!(verdict.name(), Some("bob"));
    }

    #[test]
    fn test_self_match_scores_one() {
        let s = store(&[("alice", &[0.3, 0.4, 0.5])]);
        match recognize(&s, &[0.3, 0.4, 0.5], 0.9) {
            MatchVerdict::Recognized { name, score } => {
                assert_eq!(name, "alice");
                assert_relative_eq!(score, 1.0, epsilon = 1e-9);
            }
            other => panic!("expected recognition, got {other:?}"),
        }
    }

    #[test]
    fn test_score_equal_to_threshold_is_rejected() {
        let s = store(&[("alice", &[1.0, 0.0])]);
        // Orthogonal query scores exactly 0.0.
        assert_eq!(
            recognize(&s, &[0.0, 1.0], 0.0),
            MatchVerdict::Unrecognized { best_score: 0.0 }
        );
    }

    #[test]
    fn test_score_just_above_threshold_is_accepted() {
        let s = store(&[("alice", &[1.0, 0.0])]);
        let verdict = recognize(&s, &[0.0, 1.0], -f64::EPSILON);
        assert_eq!(verdict.name(), Some("alice"));
    }

    #[test]
    fn test_identical_scores_resolve_to_earliest_record() {
        let s = store(&[
            ("first", &[1.0, 0.0]),
            ("second", &[1.0, 0.0]),
            ("third", &[2.0, 0.0]),
        ]);
        assert_eq!(recognize(&s, &[1.0, 0.0], 0.5).name(), Some("first"));
    }

    #[test]
    fn test_later_strictly_better_record_wins() {
        let s = store(&[("first", &[1.0, 1.0]), ("second", &[1.0, 0.0])]);
        assert_eq!(recognize(&s, &[1.0, 0.0], 0.5).name(), Some("second"));
    }

    #[test]
    fn test_below_threshold_reports_best_score() {
        let s = store(&[("alice", &[1.0, 0.0]), ("bob", &[0.6, 0.8])]);
        match recognize(&s, &[0.0, 1.0], 0.9) {
            MatchVerdict::Unrecognized { best_score } => {
                assert_relative_eq!(best_score, 0.8, epsilon = 1e-6)
            }
            other => panic!("expected unrecognized, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_scores_still_tracked() {
        let s = store(&[("alice", &[-1.0, 0.0])]);
        assert_eq!(
            recognize(&s, &[1.0, 0.0], 0.5),
            MatchVerdict::Unrecognized { best_score: -1.0 }
        );
    }
}
