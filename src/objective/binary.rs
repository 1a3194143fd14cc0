use crate::IndexSet;
use crate::sample::{DataVector, Ternary};
use super::core::*;


/// Accuracy objective for binary labels.
///
/// A positive prediction on a `true` label is correct,
/// and so is a negative prediction on a `false` label.
/// The score is `max(correct, error) / (correct + error + missing)`,
/// so a candidate and its negation score alike.
pub struct BinaryObjective<'a> {
    labels: &'a [bool],
    weights: Weights<'a>,
    correct: f64,
    error: f64,
    missing: f64,
    state: ObjectiveState,
}


impl<'a> BinaryObjective<'a> {
    /// Construct a new instance of `BinaryObjective`.
    pub fn new(labels: &'a [bool], weights: Option<&'a [f64]>) -> Self {
        Self {
            labels,
            weights: Weights::new(weights),
            correct: 0f64,
            error: 0f64,
            missing: 0f64,
            state: ObjectiveState::Uninitialized,
        }
    }


    /// Returns the `(correct, error, missing)` weights.
    pub fn weights(&self) -> (f64, f64, f64) {
        (self.correct, self.error, self.missing)
    }
}


impl WeakObjective for BinaryObjective<'_> {
    fn name(&self) -> &str {
        "Binary accuracy"
    }


    fn state(&self) -> ObjectiveState {
        self.state
    }


    fn set_predictions(&mut self, predictions: &DataVector) {
        self.correct = 0f64;
        self.error = 0f64;
        self.missing = 0f64;
        for (i, prediction) in predictions.ternaries() {
            let w = self.weights.get(i);
            match prediction {
                Ternary::Missing => { self.missing += w; },
                Ternary::True if self.labels[i] => { self.correct += w; },
                Ternary::False if !self.labels[i] => { self.correct += w; },
                _ => { self.error += w; },
            }
        }
        self.state = ObjectiveState::UpToDate;
    }


    fn flip_prediction(&mut self, index: usize) {
        let w = self.weights.get(index);
        if self.labels[index] {
            self.error -= w;
            self.correct += w;
        } else {
            self.correct -= w;
            self.error += w;
        }
        self.state = ObjectiveState::Dirty;
    }


    fn compute_objective(&mut self) -> f64 {
        self.state = ObjectiveState::UpToDate;
        let total = self.correct + self.error + self.missing;
        if total <= 0f64 { return 0f64; }
        self.correct.max(self.error) / total
    }


    fn compute_vote(&self, indices: &IndexSet) -> Vote {
        let mut total = 0f64;
        let mut positive = 0f64;
        for i in indices {
            let w = self.weights.get(i);
            total += w;
            if self.labels[i] { positive += w; }
        }
        if total <= 0f64 { return Vote::Missing; }
        Vote::Probability(positive / total)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{Value, Values};

    #[test]
    fn test_set_predictions() {
        let labels = [true, false, true, false];
        let mut objective = BinaryObjective::new(&labels, None);
        objective.set_predictions(&DataVector::owned(
            IndexSet::full(4),
            Values::Ternary(vec![
                Ternary::True, Ternary::True, Ternary::False, Ternary::Missing,
            ]),
        ));
        let result = objective.weights();
        let expect = (1.0, 2.0, 1.0);
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");

        let result = objective.compute_objective();
        let expect = 0.5;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
    }

    #[test]
    fn test_flip() {
        let labels = [true, false];
        let weights = [2.0, 3.0];
        let mut objective = BinaryObjective::new(&labels, Some(&weights));
        objective.set_predictions(&DataVector::constant(
            IndexSet::full(2), Value::Ternary(Ternary::False),
        ));
        assert_eq!((3.0, 2.0, 0.0), objective.weights());

        objective.flip_prediction(0);
        assert_eq!(objective.state(), ObjectiveState::Dirty);
        assert_eq!((5.0, 0.0, 0.0), objective.weights());

        let result = objective.compute_objective();
        assert_eq!(1.0, result, "expected 1.0, got {result}.");
    }

    #[test]
    fn test_empty_total() {
        let labels: [bool; 0] = [];
        let mut objective = BinaryObjective::new(&labels, None);
        objective.set_predictions(&DataVector::constant(
            IndexSet::empty(), Value::Ternary(Ternary::False),
        ));
        assert_eq!(0.0, objective.compute_objective());
        assert!(objective.compute_vote(&IndexSet::empty()).is_missing());
    }

    #[test]
    fn test_vote() {
        let labels = [true, false, true, true];
        let objective = BinaryObjective::new(&labels, None);
        let result = objective.compute_vote(&IndexSet::full(4));
        let expect = Vote::Probability(0.75);
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");
    }
}
