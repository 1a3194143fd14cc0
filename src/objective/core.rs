use serde::{Serialize, Deserialize};

use std::fmt;

use crate::IndexSet;
use crate::sample::{DataVector, Ternary};


/// Lifecycle of a weak objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveState {
    /// No prediction has been consumed yet.
    Uninitialized,
    /// The aggregates match the current branch assignment.
    UpToDate,
    /// An instance has been flipped since the last score.
    Dirty,
}


/// The value emitted by a terminal branch or leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Vote {
    /// No instance, or no weight, reached the leaf.
    Missing,
    /// Weighted mean of real targets.
    Real(f64),
    /// Weighted probability of the positive class.
    Probability(f64),
    /// Weighted class distribution.
    Distribution(Vec<f64>),
    /// Per-label vote in `{-1, 0, +1}`.
    Labels(Vec<f64>),
}


impl Vote {
    /// Returns `true` for `Vote::Missing`.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}


/// An incremental scorer of weak hypotheses.
///
/// All the variants share one state machine:
/// `set_predictions` brings the objective up to date,
/// `flip_prediction` makes it dirty,
/// and `compute_objective` brings it up to date again.
pub trait WeakObjective {
    /// Returns the name of the objective.
    fn name(&self) -> &str;


    /// Returns the current state.
    fn state(&self) -> ObjectiveState;


    /// Rebuilds the per-branch aggregates from the ternary predictions
    /// of a candidate on its index set, in `O(|indices|)`.
    fn set_predictions(&mut self, predictions: &DataVector);


    /// Moves instance `index` from the negative branch
    /// to the positive branch.
    /// The instance must currently be in the negative branch.
    fn flip_prediction(&mut self, index: usize);


    /// Returns the score of the current branch assignment.
    /// Larger is better.
    fn compute_objective(&mut self) -> f64;


    /// Returns the vote of a leaf holding `indices`.
    /// Returns `Vote::Missing` for an empty index set.
    fn compute_vote(&self, indices: &IndexSet) -> Vote;
}


impl fmt::Debug for dyn WeakObjective + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakObjective")
            .field("name", &self.name())
            .field("state", &self.state())
            .finish()
    }
}


/// The branch of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Branch {
    Negative = 0,
    Positive = 1,
    Missing = 2,
}


impl Branch {
    pub(crate) const ALL: [Branch; 3] = [
        Branch::Negative, Branch::Positive, Branch::Missing,
    ];

    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}


impl From<Ternary> for Branch {
    #[inline(always)]
    fn from(t: Ternary) -> Self {
        match t {
            Ternary::False   => Self::Negative,
            Ternary::True    => Self::Positive,
            Ternary::Missing => Self::Missing,
        }
    }
}


/// Per-instance weights, `1.0` when absent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Weights<'a>(Option<&'a [f64]>);


impl<'a> Weights<'a> {
    #[inline(always)]
    pub(crate) fn new(weights: Option<&'a [f64]>) -> Self {
        Self(weights)
    }

    #[inline(always)]
    pub(crate) fn get(&self, i: usize) -> f64 {
        self.0.map_or(1f64, |w| w[i])
    }
}
