use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use shakmaty::uci::UciMove;

use engine::{ActionValues, DecisionState, Evaluation, Evaluator};

use crate::parse::{InfoLine, Score};
use crate::position::PositionFen;
use crate::process::UciEngine;

/// Forced results clamp to this magnitude instead of an unbounded mate
/// score, so softmax weights downstream stay finite and non-zero.
pub const MATE_VALUE: f32 = 40.0;

/// Score assigned to a candidate the engine did not report.
///
/// `NegativeInfinity` (the default) means an unreported candidate is
/// never judged optimal and carries no softmax weight; `Zero` treats it
/// as a neutral move, which can change the argmax under sparse MultiPV
/// reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnscoredPolicy {
    #[default]
    NegativeInfinity,
    Zero,
}

impl UnscoredPolicy {
    fn value(self) -> f32 {
        match self {
            UnscoredPolicy::NegativeInfinity => f32::NEG_INFINITY,
            UnscoredPolicy::Zero => 0.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExtractorOptions {
    pub unscored: UnscoredPolicy,
}

/// Wraps one engine subprocess behind a mutex, implementing
/// [`Evaluator`] for any state that renders to FEN. The mutex
/// serializes access to the single loaded position; fan-out across
/// threads takes one extractor per worker.
pub struct ScoreExtractor<S> {
    engine: Mutex<UciEngine>,
    options: ExtractorOptions,
    _state: PhantomData<fn(S)>,
}

impl<S> ScoreExtractor<S> {
    pub fn new(engine: UciEngine, options: ExtractorOptions) -> Self {
        Self {
            engine: Mutex::new(engine),
            options,
            _state: PhantomData,
        }
    }

    pub fn spawn(path: impl AsRef<Path>, options: ExtractorOptions) -> Result<Self> {
        Ok(Self::new(UciEngine::spawn(path)?, options))
    }
}

impl<S> Evaluator for ScoreExtractor<S>
where
    S: DecisionState<Action = UciMove> + PositionFen,
{
    type State = S;

    fn values(
        &self,
        state: &S,
        candidates: &[UciMove],
        breadth: usize,
        budget: Duration,
    ) -> Result<Evaluation<UciMove>> {
        let infos = self
            .engine
            .lock()
            .analyse(&state.position_fen(), breadth, budget)?;

        Ok(collect_values(&infos, candidates, self.options.unscored))
    }
}

/// Restricts the engine's report to the candidate set. UCI scores are
/// already relative to the side to move in the analysed position, which
/// is the single fixed perspective required here; centipawns scale down
/// to pawn units.
fn collect_values(
    infos: &[InfoLine],
    candidates: &[UciMove],
    unscored: UnscoredPolicy,
) -> Evaluation<UciMove> {
    let mut reported: HashMap<&str, f32> = HashMap::new();
    for info in infos {
        reported.insert(info.head.as_str(), score_value(info.score));
    }

    let mut values = ActionValues::new();
    let mut best: Option<UciMove> = None;
    let mut best_score = f32::NEG_INFINITY;

    for action in candidates {
        let token = action.to_string();
        let score = reported
            .get(token.as_str())
            .copied()
            .unwrap_or_else(|| unscored.value());
        values.insert(token, score);

        if score > best_score {
            best_score = score;
            best = Some(action.clone());
        }
    }

    Evaluation { values, best }
}

fn score_value(score: Score) -> f32 {
    match score {
        Score::Centipawns(cp) => cp as f32 / 100.0,
        Score::Mate(n) if n >= 0 => MATE_VALUE,
        Score::Mate(_) => -MATE_VALUE,
    }
}
