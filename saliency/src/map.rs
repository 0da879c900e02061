use std::collections::HashMap;
use std::fmt::Display;

use anyhow::Result;
use log::warn;

use engine::{Evaluator, EvaluatorUnavailable, Perturbable};

use crate::attributor::{ActionOf, Attribution, Attributor};
use crate::perturb::PerturbationSource;

pub type LocationOf<E> = <<E as Evaluator>::State as Perturbable>::Location;

/// What to do when the evaluator fails for one perturbation. Guard
/// outcomes are ordinary values and never reach this policy; errors
/// other than [`EvaluatorUnavailable`] always abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    Abort,
    Skip,
}

/// Per-location attributions for one base state, in the canonical
/// location order. Locations where no legal perturbation existed (or
/// that were skipped on failure) are absent rather than zero.
#[derive(Clone, Debug)]
pub struct SaliencyMap<L, A> {
    entries: Vec<(L, Attribution<A>)>,
}

impl<L: Copy + Eq + Display, A> SaliencyMap<L, A> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(L, Attribution<A>)> {
        self.entries.iter()
    }

    pub fn get(&self, location: L) -> Option<&Attribution<A>> {
        self.entries
            .iter()
            .find(|(l, _)| *l == location)
            .map(|(_, attribution)| attribution)
    }

    /// Saliency keyed by the location's string label, the shape
    /// consumed by ground-truth alignment and rendering.
    pub fn scores(&self) -> HashMap<String, f32> {
        self.entries
            .iter()
            .map(|(location, attribution)| (location.to_string(), attribution.saliency))
            .collect()
    }
}

/// Runs the full perturb-and-compare pass: one attribution per
/// location the source can perturb, against the attributor's cached
/// baseline.
pub fn compute_saliency_map<E>(
    attributor: &Attributor<'_, E>,
    source: &PerturbationSource,
    reference: Option<&ActionOf<E>>,
    directional: bool,
    policy: FailurePolicy,
) -> Result<SaliencyMap<LocationOf<E>, ActionOf<E>>>
where
    E: Evaluator,
    E::State: Perturbable,
{
    let mut entries = Vec::new();

    for (perturbed, location) in source.process(attributor.base_state()) {
        match attributor.evaluate(&perturbed, reference, directional) {
            Ok(attribution) => entries.push((location, attribution)),
            Err(err) if policy == FailurePolicy::Skip && err.is::<EvaluatorUnavailable>() => {
                warn!("skipping location {}: {}", location, err);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(SaliencyMap { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributor::AttributorOptions;
    use crate::formula::Outcome;
    use crate::testing::{FakeEvaluator, FakeState};

    fn base() -> FakeState {
        FakeState::new("base", &["e2e4", "d2d4"])
            .with_removal('x', FakeState::new("no-x", &["e2e4", "d2d4"]))
            .with_removal('z', FakeState::illegal("no-z"))
    }

    fn evaluator() -> FakeEvaluator {
        FakeEvaluator::new()
            .with_response("base", &[("e2e4", 0.5), ("d2d4", 0.3)])
            .with_response("no-x", &[("e2e4", -1.0), ("d2d4", 0.3)])
    }

    #[test]
    fn test_map_covers_perturbable_locations_in_order() {
        let evaluator = evaluator();
        let attributor =
            Attributor::new(&evaluator, base(), AttributorOptions::default()).unwrap();

        let map = compute_saliency_map(
            &attributor,
            &PerturbationSource::removal(),
            None,
            false,
            FailurePolicy::Abort,
        )
        .unwrap();

        let locations: Vec<char> = map.iter().map(|(location, _)| *location).collect();
        assert_eq!(locations, vec!['x', 'z']);

        assert!(map.get('x').unwrap().saliency > 0.0);
        assert_eq!(map.get('z').unwrap().outcome, Outcome::ExposedKing);
        assert!(map.get('y').is_none());
    }

    #[test]
    fn test_skip_exposed_source_omits_the_location() {
        let evaluator = evaluator();
        let attributor =
            Attributor::new(&evaluator, base(), AttributorOptions::default()).unwrap();

        let map = compute_saliency_map(
            &attributor,
            &PerturbationSource::removal().with_skip_exposed(true),
            None,
            false,
            FailurePolicy::Abort,
        )
        .unwrap();

        assert_eq!(map.len(), 1);
        assert!(map.get('z').is_none());
    }

    #[test]
    fn test_skip_policy_drops_failing_location() {
        let evaluator = evaluator().with_failure_on("no-x");
        let attributor =
            Attributor::new(&evaluator, base(), AttributorOptions::default()).unwrap();

        let map = compute_saliency_map(
            &attributor,
            &PerturbationSource::removal(),
            None,
            false,
            FailurePolicy::Skip,
        )
        .unwrap();

        assert!(map.get('x').is_none());
        // The guard-path location is unaffected by the failure.
        assert_eq!(map.get('z').unwrap().outcome, Outcome::ExposedKing);
    }

    #[test]
    fn test_abort_policy_propagates_the_failure() {
        let evaluator = evaluator().with_failure_on("no-x");
        let attributor =
            Attributor::new(&evaluator, base(), AttributorOptions::default()).unwrap();

        let result = compute_saliency_map(
            &attributor,
            &PerturbationSource::removal(),
            None,
            false,
            FailurePolicy::Abort,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_scores_keyed_by_location_label() {
        let evaluator = evaluator();
        let attributor =
            Attributor::new(&evaluator, base(), AttributorOptions::default()).unwrap();

        let map = compute_saliency_map(
            &attributor,
            &PerturbationSource::removal(),
            None,
            false,
            FailurePolicy::Abort,
        )
        .unwrap();

        let scores = map.scores();
        assert_eq!(scores.len(), 2);
        assert!(scores.contains_key("x"));
        assert!(scores.contains_key("z"));
    }
}
