//! Scoring of candidate nodes against a weak objective.
use serde::{Serialize, Deserialize};

use crate::{IndexSet, NodeId};
use crate::cache::{Evaluator, SampleCache};
use crate::objective::WeakObjective;
use crate::sample::{DataVector, OutputKind, Ternary, Values};


/// The score of a candidate node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    /// Scored node.
    pub node: NodeId,
    /// Objective value.
    pub score: f64,
    /// Best threshold for a real node, `None` for a boolean node.
    pub threshold: Option<f64>,
}


/// Scores `node` on `indices`.
///
/// A boolean node is scored on its own predictions.
/// A real node is scored by its best threshold.
pub fn score_candidate<E, O>(
    cache: &mut SampleCache,
    evaluator: &E,
    node: NodeId,
    indices: &IndexSet,
    objective: &mut O,
) -> CandidateScore
    where E: Evaluator + ?Sized,
          O: WeakObjective + ?Sized,
{
    match evaluator.output_kind(node) {
        OutputKind::Ternary => {
            let predictions = cache.get_samples(evaluator, node, indices);
            objective.set_predictions(&predictions);
            let score = objective.compute_objective();
            CandidateScore { node, score, threshold: None }
        },
        OutputKind::Real => {
            let split = cache.find_best_threshold(
                evaluator, node, indices, objective
            );
            CandidateScore {
                node,
                score: split.score,
                threshold: Some(split.threshold),
            }
        },
    }
}


/// Scores every node in `candidates` and returns the best one.
/// Among equal scores the earliest candidate wins.
/// Returns `None` if `candidates` is empty.
pub fn best_candidate<E, O>(
    cache: &mut SampleCache,
    evaluator: &E,
    candidates: &[NodeId],
    indices: &IndexSet,
    objective: &mut O,
) -> Option<CandidateScore>
    where E: Evaluator + ?Sized,
          O: WeakObjective + ?Sized,
{
    let mut best: Option<CandidateScore> = None;
    for &node in candidates {
        let score = score_candidate(cache, evaluator, node, indices, objective);
        log::trace!("candidate {node} scored {}", score.score);
        if best.map_or(true, |b| score.score > b.score) {
            best = Some(score);
        }
    }
    best
}


/// Converts real samples into ternary predictions:
/// `true` above `threshold`, missing for `NaN`.
pub fn apply_threshold(samples: &DataVector, threshold: f64) -> DataVector {
    let predictions = samples.reals()
        .map(|(_, x)| {
            if x.is_nan() {
                Ternary::Missing
            } else {
                Ternary::from(x > threshold)
            }
        })
        .collect();
    DataVector::owned(samples.indices().clone(), Values::Ternary(predictions))
}
