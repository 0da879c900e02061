use common::{harmonic_mean, kl_divergence, softmax};
use engine::ActionValues;

/// Fixed temperature for converting evaluator scores (pawn units) into
/// relative-preference weights. Sharper than 1.0 so that a collapse of
/// the top move registers as a substantial probability drop.
pub const SOFTMAX_TEMPERATURE: f32 = 0.5;

/// Near-zero sentinel reported for the probability drop on guard paths
/// and in clamped mode, keeping downstream ratios well-defined.
pub const GUARD_EPSILON: f32 = 1e-6;

/// How an attribution was produced. Guard outcomes carry saliency 0 or
/// 1 by convention, not computation, and must not be compared
/// numerically against `Computed` results.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    Computed { specificity: f32, divergence: f32 },
    /// The perturbation left the state in an illegal configuration.
    ExposedKing,
    /// The supplied reference action is illegal in the perturbed state.
    ReferenceIllegal,
    /// The baseline and perturbed legal sets share no usable action.
    NoCommonFrame,
}

impl Outcome {
    pub fn is_guard(&self) -> bool {
        !matches!(self, Outcome::Computed { .. })
    }
}

/// Directional-mode classification of a location: a positive drop means
/// its occupant supported the reference action, a negative drop means
/// it was working against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Offense,
    Defense,
}

#[derive(Clone, Debug)]
pub struct FormulaResult {
    pub saliency: f32,
    pub probability_drop: f32,
    pub specificity: f32,
    pub divergence: f32,
    pub category: Option<Category>,
}

/// Combines the baseline and perturbed value maps into a saliency
/// score for `reference`. Both maps must cover the same action-token
/// domain (the intersection of the two legal sets) and must contain the
/// reference; degenerate cases are guarded by the caller before this
/// point.
///
/// saliency = harmonicMean(drop, K) where drop is the loss of softmax
/// preference for the reference action and K in (0, 1] measures how
/// concentrated the perturbation's effect is on that action (K -> 1
/// when the non-reference preferences are undisturbed).
pub fn attribute(
    reference: &str,
    baseline: &ActionValues,
    perturbed: &ActionValues,
    directional: bool,
) -> FormulaResult {
    assert!(
        baseline.contains(reference),
        "reference action {:?} missing from the baseline map",
        reference
    );
    debug_assert_eq!(baseline.len(), perturbed.len());

    let mut tokens: Vec<&str> = baseline.tokens().collect();
    tokens.sort_unstable();

    let base_scores: Vec<f32> = tokens
        .iter()
        .map(|t| baseline.get(t).unwrap_or(f32::NEG_INFINITY))
        .collect();
    let pert_scores: Vec<f32> = tokens
        .iter()
        .map(|t| perturbed.get(t).unwrap_or(f32::NEG_INFINITY))
        .collect();

    let p = softmax(&base_scores, SOFTMAX_TEMPERATURE);
    let q = softmax(&pert_scores, SOFTMAX_TEMPERATURE);

    let ref_idx = tokens
        .iter()
        .position(|t| *t == reference)
        .expect("reference token present in the baseline map");

    let signed_drop = p[ref_idx] - q[ref_idx];

    let divergence = remainder_divergence(&p, &q, ref_idx);
    let specificity = 1.0 / (1.0 + divergence);

    let (probability_drop, magnitude, category) = if directional {
        let category = if signed_drop < 0.0 {
            Category::Defense
        } else {
            Category::Offense
        };
        (signed_drop, signed_drop.abs().min(1.0), Some(category))
    } else {
        let clamped = signed_drop.clamp(GUARD_EPSILON, 1.0);
        (clamped, clamped, None)
    };

    FormulaResult {
        saliency: harmonic_mean(magnitude, specificity),
        probability_drop,
        specificity,
        divergence,
        category,
    }
}

/// KL divergence between the two distributions with the reference
/// action removed and the remainders renormalized. An empty or
/// mass-less remainder carries no signal and diverges by 0.
fn remainder_divergence(p: &[f32], q: &[f32], ref_idx: usize) -> f32 {
    let rest_p: Vec<f32> = without_index(p, ref_idx);
    let rest_q: Vec<f32> = without_index(q, ref_idx);

    let sum_p: f32 = rest_p.iter().sum();
    let sum_q: f32 = rest_q.iter().sum();

    if sum_p <= f32::EPSILON || sum_q <= f32::EPSILON {
        return 0.0;
    }

    let rest_p: Vec<f32> = rest_p.iter().map(|v| v / sum_p).collect();
    let rest_q: Vec<f32> = rest_q.iter().map(|v| v / sum_q).collect();

    kl_divergence(&rest_p, &rest_q)
}

fn without_index(values: &[f32], index: usize) -> Vec<f32> {
    values
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, v)| *v)
        .collect()
}
