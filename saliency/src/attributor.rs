use std::time::Duration;

use anyhow::{ensure, Result};

use engine::{ActionValues, DecisionState, Evaluation, Evaluator};

use crate::formula::{self, Category, Outcome, GUARD_EPSILON};

pub type ActionOf<E> = <<E as Evaluator>::State as DecisionState>::Action;

/// One attribution, produced per (base state, perturbed state) pair.
/// `reference_value` is the un-normalized baseline score of the
/// effective reference action; it is absent on guard paths.
#[derive(Clone, Debug)]
pub struct Attribution<A> {
    pub saliency: f32,
    pub probability_drop: f32,
    pub reference_action: A,
    pub reference_value: Option<f32>,
    pub category: Option<Category>,
    pub outcome: Outcome,
}

impl<A> Attribution<A> {
    fn guard(outcome: Outcome, saliency: f32, reference_action: A) -> Self {
        Self {
            saliency,
            probability_drop: GUARD_EPSILON,
            reference_action,
            reference_value: None,
            category: None,
            outcome,
        }
    }

    /// True when the score came from the edge-case taxonomy rather
    /// than the formula; such scores are conventions, not magnitudes.
    pub fn is_guard(&self) -> bool {
        self.outcome.is_guard()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AttributorOptions {
    /// How many top lines the evaluator reports per invocation.
    pub breadth: usize,
    /// Thinking-time budget per evaluator invocation.
    pub budget: Duration,
}

impl Default for AttributorOptions {
    fn default() -> Self {
        Self {
            breadth: 3,
            budget: Duration::from_secs(2),
        }
    }
}

/// Orchestrates one base state against its perturbations. The baseline
/// value map over the base state's full legal set is computed eagerly,
/// exactly once, and reused read-only by every `evaluate` call, so the
/// instance stays valid for the lifetime of its base state.
pub struct Attributor<'a, E: Evaluator> {
    extractor: &'a E,
    base_state: E::State,
    base_actions: Vec<ActionOf<E>>,
    baseline: ActionValues,
    options: AttributorOptions,
}

impl<'a, E: Evaluator> Attributor<'a, E> {
    pub fn new(extractor: &'a E, base_state: E::State, options: AttributorOptions) -> Result<Self> {
        ensure!(
            !base_state.is_illegal_position(),
            "base state is not a legal position"
        );

        let base_actions = base_state.legal_actions();
        ensure!(
            !base_actions.is_empty(),
            "base state has no legal actions to attribute over"
        );

        let Evaluation {
            values: baseline, ..
        } = extractor.values(&base_state, &base_actions, options.breadth, options.budget)?;

        Ok(Self {
            extractor,
            base_state,
            base_actions,
            baseline,
            options,
        })
    }

    pub fn base_state(&self) -> &E::State {
        &self.base_state
    }

    /// The cached baseline value map over the base state's full legal
    /// set.
    pub fn baseline(&self) -> &ActionValues {
        &self.baseline
    }

    /// The baseline argmax over the full legal set.
    pub fn best_action(&self) -> &ActionOf<E> {
        Self::argmax(&self.base_actions, &self.baseline)
    }

    /// Scores one perturbed state against the cached baseline.
    ///
    /// A supplied `reference` overrides the baseline argmax; supplying
    /// one that is not legal in the base state is a caller error. Guard
    /// outcomes (illegal configuration, illegalized reference, empty
    /// intersection) return sentinel attributions; evaluator failures
    /// propagate as errors.
    pub fn evaluate(
        &self,
        perturbed: &E::State,
        reference: Option<&ActionOf<E>>,
        directional: bool,
    ) -> Result<Attribution<ActionOf<E>>> {
        if let Some(reference) = reference {
            ensure!(
                self.base_actions.contains(reference),
                "reference action {} is not legal in the base state",
                reference
            );
        }

        if perturbed.is_illegal_position() {
            return Ok(Attribution::guard(
                Outcome::ExposedKing,
                0.0,
                self.effective_reference(reference),
            ));
        }

        if let Some(reference) = reference {
            if !perturbed.is_action_legal(reference) {
                return Ok(Attribution::guard(
                    Outcome::ReferenceIllegal,
                    1.0,
                    reference.clone(),
                ));
            }
        }

        let perturbed_actions = perturbed.legal_actions();
        let common: Vec<ActionOf<E>> = self
            .base_actions
            .iter()
            .filter(|action| perturbed_actions.contains(action))
            .cloned()
            .collect();

        if common.is_empty() || reference.is_some_and(|r| !common.contains(r)) {
            return Ok(Attribution::guard(
                Outcome::NoCommonFrame,
                1.0,
                self.effective_reference(reference),
            ));
        }

        let tokens: Vec<String> = common.iter().map(ToString::to_string).collect();
        let baseline_common = self
            .baseline
            .restricted_to(tokens.iter().map(String::as_str));

        let reference = reference
            .cloned()
            .unwrap_or_else(|| Self::argmax(&common, &baseline_common).clone());

        let Evaluation {
            values: perturbed_values,
            ..
        } = self.extractor.values(
            perturbed,
            &common,
            self.options.breadth,
            self.options.budget,
        )?;

        let token = reference.to_string();
        let result = formula::attribute(&token, &baseline_common, &perturbed_values, directional);

        Ok(Attribution {
            saliency: result.saliency,
            probability_drop: result.probability_drop,
            reference_value: baseline_common.get(&token),
            reference_action: reference,
            category: result.category,
            outcome: Outcome::Computed {
                specificity: result.specificity,
                divergence: result.divergence,
            },
        })
    }

    fn effective_reference(&self, supplied: Option<&ActionOf<E>>) -> ActionOf<E> {
        supplied
            .cloned()
            .unwrap_or_else(|| Self::argmax(&self.base_actions, &self.baseline).clone())
    }

    /// First-seen argmax over `pool`; actions missing from the map
    /// score negative infinity. `pool` must be non-empty.
    fn argmax<'p>(pool: &'p [ActionOf<E>], values: &ActionValues) -> &'p ActionOf<E> {
        let mut best = &pool[0];
        let mut best_score = f32::NEG_INFINITY;

        for action in pool {
            let score = values
                .get(&action.to_string())
                .unwrap_or(f32::NEG_INFINITY);
            if score > best_score {
                best_score = score;
                best = action;
            }
        }

        best
    }
}
