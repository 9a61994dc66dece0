use crate::errors::ClassifyError;
use crate::labels::LabelTable;
use std::cmp::Ordering;

/// One ranked class: its index in the score vector, label and score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPrediction {
    pub index: usize,
    pub label: String,
    pub score: f32,
}

/// Select the `k` highest scores and resolve their labels.
///
/// The result is ordered by descending score. Equal scores rank the smaller
/// class index first, and NaN ranks below every number. Selection is O(n)
/// on average followed by an O(k log k) sort of the selected entries.
#[tracing::instrument(level = "debug", skip(scores, labels), fields(classes = scores.len()))]
pub fn rank_topk(
    scores: &[f32],
    labels: &LabelTable,
    k: usize,
) -> Result<Vec<RankedPrediction>, ClassifyError> {
    if scores.len() != labels.len() {
        return Err(ClassifyError::LabelMismatch {
            scores: scores.len(),
            labels: labels.len(),
        });
    }

    if k == 0 || k > scores.len() {
        return Err(ClassifyError::InvalidArgument(format!(
            "k must be in [1, {}], got {}",
            scores.len(),
            k
        )));
    }

    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();

    ranked.select_nth_unstable_by(k - 1, rank_order);
    ranked.truncate(k);
    ranked.sort_unstable_by(rank_order);

    ranked
        .into_iter()
        .map(|(index, score)| -> Result<RankedPrediction, ClassifyError> {
            let label = labels.get(index).ok_or_else(|| {
                ClassifyError::InvalidArgument(format!("no label for class {index}"))
            })?;
            Ok(RankedPrediction {
                index,
                label: label.to_string(),
                score,
            })
        })
        .collect()
}

/// Total order: higher score first, then smaller index. NaN sorts last.
#[inline]
fn rank_order(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    let by_score = match (a.1.is_nan(), b.1.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal),
    };
    by_score.then(a.0.cmp(&b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> LabelTable {
        names.iter().copied().collect()
    }

    fn pairs(predictions: &[RankedPrediction]) -> Vec<(&str, f32)> {
        predictions
            .iter()
            .map(|p| (p.label.as_str(), p.score))
            .collect()
    }

    #[test]
    fn test_top2_of_four() {
        let scores = [0.1, 0.7, 0.05, 0.15];
        let table = labels(&["cat", "dog", "fish", "bird"]);

        let ranked = rank_topk(&scores, &table, 2).unwrap();

        assert_eq!(pairs(&ranked), vec![("dog", 0.7), ("bird", 0.15)]);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[1].index, 3);
    }

    #[test]
    fn test_tie_resolved_by_smaller_index() {
        let scores = [0.5, 0.5, 0.2];
        let table = labels(&["a", "b", "c"]);

        for _ in 0..10 {
            let ranked = rank_topk(&scores, &table, 2).unwrap();
            assert_eq!(pairs(&ranked), vec![("a", 0.5), ("b", 0.5)]);
        }
    }

    #[test]
    fn test_tie_at_selection_boundary() {
        // Only one of the three 0.3 entries fits; the smallest index wins
        let scores = [0.3, 0.9, 0.3, 0.1, 0.3];
        let table = labels(&["a", "b", "c", "d", "e"]);

        let ranked = rank_topk(&scores, &table, 2).unwrap();

        assert_eq!(pairs(&ranked), vec![("b", 0.9), ("a", 0.3)]);
    }

    #[test]
    fn test_k_equal_to_len_is_full_sort() {
        let scores = [0.2, -1.0, 3.5, 0.0, 3.5, 1.25];
        let table = labels(&["a", "b", "c", "d", "e", "f"]);

        let ranked = rank_topk(&scores, &table, scores.len()).unwrap();

        let indices: Vec<usize> = ranked.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![2, 4, 5, 0, 3, 1]);
    }

    /// No excluded score may exceed an included one, for every k
    #[test]
    fn test_selected_scores_are_the_k_largest() {
        let scores: Vec<f32> = (0..97u32)
            .map(|i| ((i * 37 + 11) % 101) as f32 / 7.0)
            .collect();
        let table: LabelTable = (0..scores.len()).map(|i| format!("class{i}")).collect();

        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());

        for k in 1..=scores.len() {
            let ranked = rank_topk(&scores, &table, k).unwrap();
            assert_eq!(ranked.len(), k);

            for window in ranked.windows(2) {
                assert!(window[0].score >= window[1].score);
            }

            let selected: Vec<f32> = ranked.iter().map(|p| p.score).collect();
            assert_eq!(selected, sorted[..k].to_vec(), "k = {k}");

            for p in &ranked {
                assert_eq!(p.label, format!("class{}", p.index));
            }
        }
    }

    #[test]
    fn test_nan_ranks_last() {
        let scores = [f32::NAN, 0.1, 0.4];
        let table = labels(&["nan", "low", "high"]);

        let ranked = rank_topk(&scores, &table, 3).unwrap();

        assert_eq!(ranked[0].label, "high");
        assert_eq!(ranked[1].label, "low");
        assert_eq!(ranked[2].label, "nan");
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let scores = [0.1, 0.2, 0.3];
        let table = labels(&["a", "b"]);

        match rank_topk(&scores, &table, 1) {
            Err(ClassifyError::LabelMismatch { scores, labels }) => {
                assert_eq!(scores, 3);
                assert_eq!(labels, 2);
            }
            other => panic!("Expected LabelMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_k_out_of_range_is_rejected() {
        let scores = [0.1, 0.2];
        let table = labels(&["a", "b"]);

        assert!(matches!(
            rank_topk(&scores, &table, 0),
            Err(ClassifyError::InvalidArgument(_))
        ));
        assert!(matches!(
            rank_topk(&scores, &table, 3),
            Err(ClassifyError::InvalidArgument(_))
        ));
        assert!(matches!(
            rank_topk(&[], &LabelTable::default(), 1),
            Err(ClassifyError::InvalidArgument(_))
        ));
    }
}
