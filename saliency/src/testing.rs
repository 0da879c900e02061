//! Scripted state/evaluator doubles shared by the unit tests.

use std::cell::Cell;
use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;

use engine::{
    ActionValues, DecisionState, Evaluation, Evaluator, EvaluatorUnavailable, Perturbable,
};

#[derive(Clone, Debug, PartialEq)]
pub struct FakeState {
    pub name: String,
    pub actions: Vec<String>,
    pub illegal: bool,
    removals: Vec<(char, FakeState)>,
    additions: Vec<(char, FakeState)>,
}

impl FakeState {
    pub fn new(name: &str, actions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
            illegal: false,
            removals: Vec::new(),
            additions: Vec::new(),
        }
    }

    pub fn illegal(name: &str) -> Self {
        Self {
            illegal: true,
            ..Self::new(name, &[])
        }
    }

    pub fn with_removal(mut self, location: char, state: FakeState) -> Self {
        self.removals.push((location, state));
        self
    }

    pub fn with_addition(mut self, location: char, state: FakeState) -> Self {
        self.additions.push((location, state));
        self
    }
}

impl DecisionState for FakeState {
    type Action = String;

    fn legal_actions(&self) -> Vec<String> {
        self.actions.clone()
    }

    fn is_action_legal(&self, action: &String) -> bool {
        self.actions.contains(action)
    }

    fn is_illegal_position(&self) -> bool {
        self.illegal
    }
}

impl Perturbable for FakeState {
    type Location = char;

    fn locations() -> Vec<char> {
        vec!['x', 'y', 'z']
    }

    fn remove_occupant(&self, location: char) -> Option<Self> {
        self.removals
            .iter()
            .find(|(l, _)| *l == location)
            .map(|(_, s)| s.clone())
    }

    fn add_occupant(&self, location: char) -> Option<Self> {
        self.additions
            .iter()
            .find(|(l, _)| *l == location)
            .map(|(_, s)| s.clone())
    }
}

/// Replays canned scores per state name; unknown candidates fall back
/// to negative infinity like the strict extractor policy.
pub struct FakeEvaluator {
    responses: HashMap<String, Vec<(String, f32)>>,
    fail_on: Option<String>,
    pub calls: Cell<usize>,
}

impl FakeEvaluator {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fail_on: None,
            calls: Cell::new(0),
        }
    }

    pub fn with_response(mut self, state: &str, scores: &[(&str, f32)]) -> Self {
        self.responses.insert(
            state.to_string(),
            scores
                .iter()
                .map(|(token, score)| (token.to_string(), *score))
                .collect(),
        );
        self
    }

    pub fn with_failure_on(mut self, state: &str) -> Self {
        self.fail_on = Some(state.to_string());
        self
    }
}

impl Evaluator for FakeEvaluator {
    type State = FakeState;

    fn values(
        &self,
        state: &FakeState,
        candidates: &[String],
        _breadth: usize,
        _budget: Duration,
    ) -> Result<Evaluation<String>> {
        self.calls.set(self.calls.get() + 1);

        if self.fail_on.as_deref() == Some(state.name.as_str()) {
            return Err(EvaluatorUnavailable::new("scripted failure").into());
        }

        let scored = self.responses.get(&state.name).cloned().unwrap_or_default();

        let mut values = ActionValues::new();
        let mut best: Option<String> = None;
        let mut best_score = f32::NEG_INFINITY;

        for candidate in candidates {
            let score = scored
                .iter()
                .find(|(token, _)| token == candidate)
                .map(|(_, score)| *score)
                .unwrap_or(f32::NEG_INFINITY);
            values.insert(candidate.clone(), score);

            if score > best_score {
                best_score = score;
                best = Some(candidate.clone());
            }
        }

        Ok(Evaluation { values, best })
    }
}
