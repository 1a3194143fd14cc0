use fixedbitset::FixedBitSet;

use crate::IndexSet;
use crate::sample::DataVector;
use super::core::*;


const PLUS: usize = 0;
const MINUS: usize = 1;


#[inline(always)]
fn sign(x: f64) -> f64 {
    if x > 0f64 {
        1f64
    } else if x < 0f64 {
        -1f64
    } else {
        0f64
    }
}


/// AdaBoost.MH edge for multi-label supervision.
///
/// `mu[b][l][s]` holds the weight of the instances in branch `b`
/// whose label `l` has sign `s`.
/// The correlation of label `l` with the split is
/// `r_l = (mu[+][l][+] - mu[+][l][-]) - (mu[-][l][+] - mu[-][l][-])`,
/// the vote on label `l` is `v_l = sign(r_l)`,
/// and the score is `Σ_l v_l · r_l / W`.
pub struct MultiLabelObjective<'a> {
    labels: &'a [FixedBitSet],
    n_labels: usize,
    weights: Option<&'a [f64]>,
    mu: [Vec<[f64; 2]>; 3],
    total_weight: f64,
    state: ObjectiveState,
}


impl<'a> MultiLabelObjective<'a> {
    /// Construct a new instance of `MultiLabelObjective`.
    ///
    /// `weights` holds the weight of instance `i` on label `l`
    /// at position `i * n_labels + l`.
    pub fn new(
        labels: &'a [FixedBitSet],
        n_labels: usize,
        weights: Option<&'a [f64]>,
    ) -> Self
    {
        assert!(n_labels > 0, "At least one label is required");
        Self {
            labels,
            n_labels,
            weights,
            mu: [
                vec![[0f64; 2]; n_labels],
                vec![[0f64; 2]; n_labels],
                vec![[0f64; 2]; n_labels],
            ],
            total_weight: 0f64,
            state: ObjectiveState::Uninitialized,
        }
    }


    #[inline(always)]
    fn weight(&self, i: usize, l: usize) -> f64 {
        self.weights.map_or(1f64, |w| w[i * self.n_labels + l])
    }


    #[inline(always)]
    fn label_sign(&self, i: usize, l: usize) -> usize {
        if self.labels[i].contains(l) { PLUS } else { MINUS }
    }


    fn correlations(&self) -> Vec<f64> {
        let pos = &self.mu[Branch::Positive.index()];
        let neg = &self.mu[Branch::Negative.index()];
        pos.iter()
            .zip(neg)
            .map(|(p, n)| (p[PLUS] - p[MINUS]) - (n[PLUS] - n[MINUS]))
            .collect()
    }


    /// Returns the per-label votes `v_l` of the current split.
    pub fn vote_table(&self) -> Vec<f64> {
        self.correlations()
            .into_iter()
            .map(sign)
            .collect()
    }
}


impl WeakObjective for MultiLabelObjective<'_> {
    fn name(&self) -> &str {
        "Multi-label edge"
    }


    fn state(&self) -> ObjectiveState {
        self.state
    }


    fn set_predictions(&mut self, predictions: &DataVector) {
        self.mu.iter_mut()
            .for_each(|m| m.iter_mut().for_each(|c| *c = [0f64; 2]));
        self.total_weight = 0f64;
        for (i, prediction) in predictions.ternaries() {
            let b = Branch::from(prediction).index();
            for l in 0..self.n_labels {
                let w = self.weight(i, l);
                let s = self.label_sign(i, l);
                self.mu[b][l][s] += w;
                self.total_weight += w;
            }
        }
        self.state = ObjectiveState::UpToDate;
    }


    fn flip_prediction(&mut self, index: usize) {
        let neg = Branch::Negative.index();
        let pos = Branch::Positive.index();
        for l in 0..self.n_labels {
            let w = self.weight(index, l);
            let s = self.label_sign(index, l);
            self.mu[neg][l][s] -= w;
            self.mu[pos][l][s] += w;
        }
        self.state = ObjectiveState::Dirty;
    }


    fn compute_objective(&mut self) -> f64 {
        self.state = ObjectiveState::UpToDate;
        if self.total_weight <= 0f64 { return 0f64; }
        let edge = self.correlations()
            .into_iter()
            .map(|r| sign(r) * r)
            .sum::<f64>();
        edge / self.total_weight
    }


    fn compute_vote(&self, indices: &IndexSet) -> Vote {
        let mut sums = vec![0f64; self.n_labels];
        let mut total = 0f64;
        for i in indices {
            for (l, sum) in sums.iter_mut().enumerate() {
                let w = self.weight(i, l);
                total += w;
                if self.labels[i].contains(l) {
                    *sum += w;
                } else {
                    *sum -= w;
                }
            }
        }
        if total <= 0f64 { return Vote::Missing; }
        Vote::Labels(sums.into_iter().map(sign).collect())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{Ternary, Value, Values};
    use approx::assert_relative_eq;

    fn label_sets(sets: &[&[usize]], n_labels: usize) -> Vec<FixedBitSet> {
        sets.iter()
            .map(|set| {
                let mut bits = FixedBitSet::with_capacity(n_labels);
                set.iter().for_each(|&l| bits.insert(l));
                bits
            })
            .collect()
    }

    #[test]
    fn test_perfect_split() {
        // label 0 follows the split, label 1 is its negation.
        let labels = label_sets(&[&[1], &[1], &[0], &[0]], 2);
        let mut objective = MultiLabelObjective::new(&labels, 2, None);
        objective.set_predictions(&DataVector::owned(
            IndexSet::full(4),
            Values::Ternary(vec![
                Ternary::False, Ternary::False, Ternary::True, Ternary::True,
            ]),
        ));
        let result = objective.compute_objective();
        assert_relative_eq!(1.0, result, epsilon = 1e-12);

        let result = objective.vote_table();
        let expect = vec![1.0, -1.0];
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");
    }

    #[test]
    fn test_flip_matches_rebuild() {
        let labels = label_sets(&[&[0], &[0, 1], &[], &[1]], 2);
        let weights = [0.1, 0.2, 0.3, 0.1, 0.05, 0.05, 0.1, 0.1];
        let indices = IndexSet::full(4);

        let mut incremental = MultiLabelObjective::new(&labels, 2, Some(&weights));
        incremental.set_predictions(&DataVector::constant(
            indices.clone(), Value::Ternary(Ternary::False),
        ));
        incremental.flip_prediction(1);
        incremental.flip_prediction(3);

        let mut rebuilt = MultiLabelObjective::new(&labels, 2, Some(&weights));
        rebuilt.set_predictions(&DataVector::owned(
            indices,
            Values::Ternary(vec![
                Ternary::False, Ternary::True, Ternary::False, Ternary::True,
            ]),
        ));

        let result = incremental.compute_objective();
        let expect = rebuilt.compute_objective();
        assert_relative_eq!(expect, result, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_branch_does_not_correlate() {
        let labels = label_sets(&[&[0], &[0]], 1);
        let mut objective = MultiLabelObjective::new(&labels, 1, None);
        objective.set_predictions(&DataVector::constant(
            IndexSet::full(2), Value::Ternary(Ternary::Missing),
        ));
        let result = objective.compute_objective();
        assert_eq!(0.0, result, "expected 0.0, got {result}.");
    }

    #[test]
    fn test_vote() {
        let labels = label_sets(&[&[0], &[0, 1], &[0]], 3);
        let objective = MultiLabelObjective::new(&labels, 3, None);
        let result = objective.compute_vote(&IndexSet::full(3));
        let expect = Vote::Labels(vec![1.0, -1.0, -1.0]);
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");

        let result = objective.compute_vote(&IndexSet::empty());
        assert!(result.is_missing());
    }
}
