use std::time::Duration;

use anyhow::Result;

use crate::{ActionValues, DecisionState};

/// The outcome of one evaluator invocation: scores for the requested
/// candidates and the argmax over them (first-seen wins on ties).
/// `best` is None when no candidate received a finite score.
#[derive(Clone, Debug)]
pub struct Evaluation<A> {
    pub values: ActionValues,
    pub best: Option<A>,
}

/// The move-evaluator boundary. Implementations wrap an expensive,
/// stateful engine; a failed or timed-out engine surfaces as
/// [`crate::EvaluatorUnavailable`] and is never retried internally.
pub trait Evaluator {
    type State: DecisionState;

    /// Scores the candidate actions of `state`. `breadth` bounds how
    /// many top lines the underlying engine reports and `budget` caps
    /// its thinking time. The returned map's keys are exactly the
    /// candidate set; candidates the engine did not report receive the
    /// implementation's documented default.
    fn values(
        &self,
        state: &Self::State,
        candidates: &[<Self::State as DecisionState>::Action],
        breadth: usize,
        budget: Duration,
    ) -> Result<Evaluation<<Self::State as DecisionState>::Action>>;
}
