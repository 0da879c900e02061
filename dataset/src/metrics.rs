//! Binary-classification quality of a saliency prediction against the
//! annotated squares. Scores are ranking quality (AUC) and agreement at
//! a threshold (accuracy); both consume the aligned arrays from
//! [`crate::align`].

/// Area under the ROC curve via the Mann-Whitney U statistic: the
/// probability that a random salient square outranks a random
/// non-salient one, with 0.5 credit for ties. Degenerate label sets
/// (all positive or all negative) return 0.5.
pub fn roc_auc(scores: &[f32], labels: &[f32]) -> f64 {
    debug_assert_eq!(scores.len(), labels.len());

    let n_pos = labels.iter().filter(|&&l| l > 0.5).count();
    let n_neg = labels.len() - n_pos;

    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut concordant = 0.0f64;

    for (s_pos, l_pos) in scores.iter().zip(labels.iter()) {
        if *l_pos < 0.5 {
            continue;
        }

        for (s_neg, l_neg) in scores.iter().zip(labels.iter()) {
            if *l_neg > 0.5 {
                continue;
            }

            if s_pos > s_neg {
                concordant += 1.0;
            } else if (s_pos - s_neg).abs() < 1e-10 {
                concordant += 0.5;
            }
        }
    }

    concordant / (n_pos as f64 * n_neg as f64)
}

/// Fraction of squares whose thresholded score agrees with the label.
pub fn accuracy(scores: &[f32], labels: &[f32], threshold: f32) -> f64 {
    debug_assert_eq!(scores.len(), labels.len());

    if scores.is_empty() {
        return 0.0;
    }

    let correct = scores
        .iter()
        .zip(labels.iter())
        .filter(|(&score, &label)| (score >= threshold) == (label > 0.5))
        .count();

    correct as f64 / scores.len() as f64
}
