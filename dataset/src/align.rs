use std::collections::BTreeSet;
use std::collections::HashMap;

/// Ground truth and predictions aligned over the union of their keys,
/// ready for metric computation. Keys are sorted for determinism.
#[derive(Clone, Debug)]
pub struct AlignedArrays {
    pub keys: Vec<String>,
    /// 1.0 where the key is in the ground-truth set, else 0.0.
    pub labels: Vec<f32>,
    /// Predicted score per key; keys with no prediction default to 0.
    pub scores: Vec<f32>,
}

/// Aligns a predicted location→score map against the annotated
/// ground-truth locations. Any superset policy works for the metrics
/// downstream; this uses the union of both key sets.
pub fn aligned_arrays(ground_truth: &[String], predicted: &HashMap<String, f32>) -> AlignedArrays {
    let keys: BTreeSet<&str> = ground_truth
        .iter()
        .map(String::as_str)
        .chain(predicted.keys().map(String::as_str))
        .collect();

    let mut labels = Vec::with_capacity(keys.len());
    let mut scores = Vec::with_capacity(keys.len());

    for key in &keys {
        labels.push(if ground_truth.iter().any(|g| g == key) {
            1.0
        } else {
            0.0
        });
        scores.push(predicted.get(*key).copied().unwrap_or(0.0));
    }

    AlignedArrays {
        keys: keys.into_iter().map(str::to_string).collect(),
        labels,
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions(entries: &[(&str, f32)]) -> HashMap<String, f32> {
        entries
            .iter()
            .map(|(key, score)| (key.to_string(), *score))
            .collect()
    }

    #[test]
    fn test_union_of_keys() {
        let truth = vec!["b2".to_string(), "f1".to_string()];
        let predicted = predictions(&[("b2", 0.8), ("h3", 0.1)]);

        let aligned = aligned_arrays(&truth, &predicted);

        assert_eq!(aligned.keys, vec!["b2", "f1", "h3"]);
        assert_eq!(aligned.labels, vec![1.0, 1.0, 0.0]);
        assert_eq!(aligned.scores, vec![0.8, 0.0, 0.1]);
    }

    #[test]
    fn test_missing_prediction_defaults_to_zero() {
        let truth = vec!["a1".to_string()];
        let aligned = aligned_arrays(&truth, &HashMap::new());

        assert_eq!(aligned.scores, vec![0.0]);
        assert_eq!(aligned.labels, vec![1.0]);
    }

    #[test]
    fn test_empty_inputs() {
        let aligned = aligned_arrays(&[], &HashMap::new());

        assert!(aligned.keys.is_empty());
    }
}
