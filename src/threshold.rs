//! Best-threshold search over a sorted real candidate.
//!
//! The search starts with every instance in the negative branch,
//! walks the sorted values from the largest down,
//! and moves one instance at a time to the positive branch.
//! Each move is an `O(1)` update of the objective,
//! so the whole sweep costs `O(|indices|)` updates.
use serde::{Serialize, Deserialize};

use std::fmt;

use crate::{IndexSet, NodeId};
use crate::cache::{Evaluator, SampleCache};
use crate::objective::WeakObjective;
use crate::sample::{DataVector, SortedValues, Ternary, Value};


/// The threshold picked by [`find_best_threshold`] and its score.
/// Instances with a value strictly greater than `threshold`
/// go to the positive branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSplit {
    /// Split point.
    pub threshold: f64,
    /// Objective value of the split.
    pub score: f64,
}


impl fmt::Display for ThresholdSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x > {} (score {})", self.threshold, self.score)
    }
}


/// Finds the threshold on `sorted` that maximizes `objective`
/// over `indices`.
///
/// `sorted` holds the non-missing `(instance, value)` pairs of the
/// candidate on `indices`, in ascending order.
/// Instances absent from `sorted` stay in the negative branch.
///
/// Every midpoint between two consecutive distinct values is a candidate,
/// even when it scores below the all-negative split.
/// Ties between equally good midpoints are broken
/// by taking the median of the tied midpoints,
/// so the result does not depend on the sweep direction.
/// With fewer than two distinct values there is no midpoint,
/// and the all-negative score comes back with the largest value
/// (`0` when `sorted` is empty).
pub fn find_best_threshold<O>(
    objective: &mut O,
    indices: &IndexSet,
    sorted: &SortedValues,
) -> ThresholdSplit
    where O: WeakObjective + ?Sized,
{
    let negative = DataVector::constant(
        indices.clone(), Value::Ternary(Ternary::False)
    );
    objective.set_predictions(&negative);

    let Some(&(_, largest)) = sorted.iter().next_back() else {
        let score = objective.compute_objective();
        return ThresholdSplit { threshold: 0f64, score };
    };

    let baseline = objective.compute_objective();
    let mut best = f64::NEG_INFINITY;
    let mut candidates = Vec::new();
    let mut previous = largest;

    for &(i, value) in sorted.iter().rev() {
        if value < previous {
            let score = objective.compute_objective();
            if score >= best {
                if score > best { candidates.clear(); }
                best = score;
                candidates.push((value + previous) / 2f64);
            }
        }
        objective.flip_prediction(i);
        previous = value;
    }

    // no candidate only when every value is the same.
    match candidates.get(candidates.len() / 2) {
        Some(&threshold) => ThresholdSplit { threshold, score: best },
        None => ThresholdSplit { threshold: largest, score: baseline },
    }
}


impl SampleCache {
    /// Fetches the sorted values of the real `node` on `indices`
    /// and runs [`find_best_threshold`] on them.
    pub fn find_best_threshold<E, O>(
        &mut self,
        evaluator: &E,
        node: NodeId,
        indices: &IndexSet,
        objective: &mut O,
    ) -> ThresholdSplit
        where E: Evaluator + ?Sized,
              O: WeakObjective + ?Sized,
    {
        let sorted = self.get_sorted_values(evaluator, node, indices);
        find_best_threshold(objective, indices, &sorted)
    }
}
