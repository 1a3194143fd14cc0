use crate::IndexSet;
use crate::sample::DataVector;
use super::core::*;


/// Weighted mean and sum of squared deviations,
/// updated in place so that large offsets do not cancel.
#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    weight: f64,
    mean: f64,
    m2: f64,
}


impl Moments {
    #[inline(always)]
    fn push(&mut self, y: f64, w: f64) {
        let weight = self.weight + w;
        if weight <= 0f64 { return; }
        let delta = y - self.mean;
        self.weight = weight;
        self.mean += w * delta / weight;
        self.m2 += w * delta * (y - self.mean);
    }


    #[inline(always)]
    fn pop(&mut self, y: f64, w: f64) {
        let weight = self.weight - w;
        if weight <= 0f64 {
            *self = Self::default();
            return;
        }
        let delta = y - self.mean;
        self.weight = weight;
        self.mean -= w * delta / weight;
        self.m2 -= w * delta * (y - self.mean);
    }


    /// `W · Var`, clamped at zero.
    #[inline]
    fn spread(&self) -> f64 {
        if self.weight <= 0f64 { return 0f64; }
        self.m2.max(0f64)
    }
}


/// Variance-reduction objective for real targets.
///
/// The score is the negative weighted sum of the branch variances,
/// `-(Σ_b W_b · Var_b)`, over the negative, positive and missing branches.
pub struct RegressionObjective<'a> {
    targets: &'a [f64],
    weights: Weights<'a>,
    branches: [Moments; 3],
    state: ObjectiveState,
}


impl<'a> RegressionObjective<'a> {
    /// Construct a new instance of `RegressionObjective`.
    /// Instances with a `NaN` target are ignored.
    pub fn new(targets: &'a [f64], weights: Option<&'a [f64]>) -> Self {
        Self {
            targets,
            weights: Weights::new(weights),
            branches: [Moments::default(); 3],
            state: ObjectiveState::Uninitialized,
        }
    }
}


impl WeakObjective for RegressionObjective<'_> {
    fn name(&self) -> &str {
        "Variance reduction"
    }


    fn state(&self) -> ObjectiveState {
        self.state
    }


    fn set_predictions(&mut self, predictions: &DataVector) {
        self.branches = [Moments::default(); 3];
        for (i, prediction) in predictions.ternaries() {
            let y = self.targets[i];
            if y.is_nan() { continue; }
            let b = Branch::from(prediction).index();
            self.branches[b].push(y, self.weights.get(i));
        }
        self.state = ObjectiveState::UpToDate;
    }


    fn flip_prediction(&mut self, index: usize) {
        let y = self.targets[index];
        if !y.is_nan() {
            let w = self.weights.get(index);
            self.branches[Branch::Negative.index()].pop(y, w);
            self.branches[Branch::Positive.index()].push(y, w);
        }
        self.state = ObjectiveState::Dirty;
    }


    fn compute_objective(&mut self) -> f64 {
        self.state = ObjectiveState::UpToDate;
        -self.branches.iter()
            .map(Moments::spread)
            .sum::<f64>()
    }


    fn compute_vote(&self, indices: &IndexSet) -> Vote {
        let mut moments = Moments::default();
        for i in indices {
            let y = self.targets[i];
            if y.is_nan() { continue; }
            moments.push(y, self.weights.get(i));
        }
        if moments.weight <= 0f64 { return Vote::Missing; }
        Vote::Real(moments.mean)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{Ternary, Value};
    use approx::assert_relative_eq;

    #[test]
    fn test_flip_matches_rebuild() {
        let targets = [1.0, 2.0, 10.0, 11.0];
        let weights = [1.0, 2.0, 1.0, 0.5];
        let indices = IndexSet::full(4);

        let mut incremental = RegressionObjective::new(&targets, Some(&weights));
        incremental.set_predictions(
            &DataVector::constant(indices.clone(), Value::Ternary(Ternary::False))
        );
        incremental.flip_prediction(2);
        incremental.flip_prediction(3);
        assert_eq!(incremental.state(), ObjectiveState::Dirty);

        let mut rebuilt = RegressionObjective::new(&targets, Some(&weights));
        rebuilt.set_predictions(&DataVector::owned(
            indices,
            crate::sample::Values::Ternary(vec![
                Ternary::False, Ternary::False, Ternary::True, Ternary::True,
            ]),
        ));

        let result = incremental.compute_objective();
        let expect = rebuilt.compute_objective();
        assert_relative_eq!(expect, result, epsilon = 1e-9);
        assert_eq!(incremental.state(), ObjectiveState::UpToDate);
    }

    #[test]
    fn test_perfect_split_scores_zero() {
        let targets = [1.0, 1.0, 5.0, 5.0];
        let mut objective = RegressionObjective::new(&targets, None);
        objective.set_predictions(&DataVector::owned(
            IndexSet::full(4),
            crate::sample::Values::Ternary(vec![
                Ternary::False, Ternary::False, Ternary::True, Ternary::True,
            ]),
        ));
        let result = objective.compute_objective();
        assert_relative_eq!(0.0, result, epsilon = 1e-12);
    }

    #[test]
    fn test_large_offset_keeps_precision() {
        let offset = 1e9;
        let targets = [1.0, 2.0, 3.0, 4.0].map(|y| offset + y);
        let indices = IndexSet::full(4);

        let mut objective = RegressionObjective::new(&targets, None);
        objective.set_predictions(
            &DataVector::constant(indices, Value::Ternary(Ternary::False))
        );
        let result = objective.compute_objective();
        assert_relative_eq!(-5.0, result, epsilon = 1e-6);

        // each branch holds two values 1 apart.
        objective.flip_prediction(3);
        objective.flip_prediction(2);
        let result = objective.compute_objective();
        assert_relative_eq!(-1.0, result, epsilon = 1e-6);

        // back to a single branch.
        objective.flip_prediction(1);
        objective.flip_prediction(0);
        let result = objective.compute_objective();
        assert_relative_eq!(-5.0, result, epsilon = 1e-6);
    }

    #[test]
    fn test_vote() {
        let targets = [1.0, f64::NAN, 4.0];
        let weights = [1.0, 5.0, 2.0];
        let objective = RegressionObjective::new(&targets, Some(&weights));

        let result = objective.compute_vote(&IndexSet::full(3));
        assert_eq!(Vote::Real(3.0), result, "expected 3.0, got {result:?}.");

        let result = objective.compute_vote(&IndexSet::empty());
        assert!(result.is_missing());

        let result = objective.compute_vote(&IndexSet::explicit(vec![1]));
        assert!(result.is_missing());
    }
}
