use crate::IndexSet;
use crate::sample::DataVector;
use super::core::*;


/// Entropy (natural log) of a weighted histogram.
fn entropy(histogram: &[f64], total: f64) -> f64 {
    if total <= 0f64 { return 0f64; }
    histogram.iter()
        .filter(|&&w| w > 0f64)
        .map(|&w| {
            let p = w / total;
            -p * p.ln()
        })
        .sum()
}


/// Entropy-reduction objective for class labels.
///
/// The score is `H(all) - Σ_b (W_b / W) · H(b)`.
/// With [`InformationGainObjective::normalized`] the score becomes
/// the symmetric uncertainty `2 · IG / (H(labels) + H(split))`.
pub struct InformationGainObjective<'a> {
    labels: &'a [Option<usize>],
    n_classes: usize,
    weights: Weights<'a>,
    normalized: bool,
    histograms: [Vec<f64>; 3],
    totals: [f64; 3],
    entropies: [f64; 3],
    state: ObjectiveState,
}


impl<'a> InformationGainObjective<'a> {
    /// Construct a new instance of `InformationGainObjective`.
    /// Instances without a label are ignored.
    pub fn new(
        labels: &'a [Option<usize>],
        n_classes: usize,
        weights: Option<&'a [f64]>,
    ) -> Self
    {
        assert!(n_classes > 0, "At least one class is required");
        Self {
            labels,
            n_classes,
            weights: Weights::new(weights),
            normalized: false,
            histograms: [
                vec![0f64; n_classes],
                vec![0f64; n_classes],
                vec![0f64; n_classes],
            ],
            totals: [0f64; 3],
            entropies: [0f64; 3],
            state: ObjectiveState::Uninitialized,
        }
    }


    /// Score by the normalized information gain.
    /// Default is `false`.
    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }


    fn refresh_entropies(&mut self) {
        for b in Branch::ALL {
            let b = b.index();
            self.entropies[b] = entropy(&self.histograms[b], self.totals[b]);
        }
    }


    fn score(&self) -> f64 {
        let total = self.totals.iter().sum::<f64>();
        if total <= 0f64 { return 0f64; }

        let overall = (0..self.n_classes)
            .map(|k| self.histograms.iter().map(|h| h[k]).sum::<f64>())
            .collect::<Vec<_>>();
        let h_labels = entropy(&overall, total);

        let conditional = self.totals.iter()
            .zip(&self.entropies)
            .map(|(w, h)| (w / total) * h)
            .sum::<f64>();
        let gain = h_labels - conditional;

        if !self.normalized { return gain; }

        let h_split = entropy(&self.totals, total);
        let denominator = h_labels + h_split;
        if denominator <= 0f64 { return 0f64; }
        2f64 * gain / denominator
    }
}


impl WeakObjective for InformationGainObjective<'_> {
    fn name(&self) -> &str {
        if self.normalized {
            "Normalized information gain"
        } else {
            "Information gain"
        }
    }


    fn state(&self) -> ObjectiveState {
        self.state
    }


    fn set_predictions(&mut self, predictions: &DataVector) {
        self.histograms.iter_mut()
            .for_each(|h| h.iter_mut().for_each(|w| *w = 0f64));
        self.totals = [0f64; 3];
        for (i, prediction) in predictions.ternaries() {
            let Some(k) = self.labels[i] else { continue; };
            let b = Branch::from(prediction).index();
            let w = self.weights.get(i);
            self.histograms[b][k] += w;
            self.totals[b] += w;
        }
        self.refresh_entropies();
        self.state = ObjectiveState::UpToDate;
    }


    fn flip_prediction(&mut self, index: usize) {
        if let Some(k) = self.labels[index] {
            let w = self.weights.get(index);
            let neg = Branch::Negative.index();
            let pos = Branch::Positive.index();
            self.histograms[neg][k] -= w;
            self.totals[neg] -= w;
            self.histograms[pos][k] += w;
            self.totals[pos] += w;
        }
        self.state = ObjectiveState::Dirty;
    }


    fn compute_objective(&mut self) -> f64 {
        if self.state == ObjectiveState::Dirty {
            self.refresh_entropies();
        }
        self.state = ObjectiveState::UpToDate;
        self.score()
    }


    fn compute_vote(&self, indices: &IndexSet) -> Vote {
        let mut histogram = vec![0f64; self.n_classes];
        let mut total = 0f64;
        for i in indices {
            let Some(k) = self.labels[i] else { continue; };
            let w = self.weights.get(i);
            histogram[k] += w;
            total += w;
        }
        if total <= 0f64 { return Vote::Missing; }
        histogram.iter_mut().for_each(|w| *w /= total);
        Vote::Distribution(histogram)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{Ternary, Value, Values};
    use approx::assert_relative_eq;

    fn split(predictions: Vec<Ternary>) -> DataVector {
        DataVector::owned(
            IndexSet::full(predictions.len()),
            Values::Ternary(predictions),
        )
    }

    #[test]
    fn test_perfect_split() {
        let labels = [Some(0), Some(0), Some(1), Some(1)];
        let mut objective = InformationGainObjective::new(&labels, 2, None);
        objective.set_predictions(&split(vec![
            Ternary::False, Ternary::False, Ternary::True, Ternary::True,
        ]));
        let result = objective.compute_objective();
        let expect = 2f64.ln();
        assert_relative_eq!(expect, result, epsilon = 1e-12);

        let mut objective = objective.normalized(true);
        let result = objective.compute_objective();
        assert_relative_eq!(1.0, result, epsilon = 1e-12);
    }

    #[test]
    fn test_flip_refreshes_entropy() {
        let labels = [Some(0), Some(1), Some(1), None];
        let mut objective = InformationGainObjective::new(&labels, 2, None);
        objective.set_predictions(&DataVector::constant(
            IndexSet::full(4), Value::Ternary(Ternary::False),
        ));
        assert_relative_eq!(0.0, objective.compute_objective(), epsilon = 1e-12);

        objective.flip_prediction(1);
        objective.flip_prediction(2);
        objective.flip_prediction(3);
        assert_eq!(objective.state(), ObjectiveState::Dirty);

        let result = objective.compute_objective();
        let h = -(1f64 / 3f64) * (1f64 / 3f64).ln()
            - (2f64 / 3f64) * (2f64 / 3f64).ln();
        assert_relative_eq!(h, result, epsilon = 1e-12);
    }

    #[test]
    fn test_normalized_degenerate() {
        let labels = [Some(0), Some(0)];
        let mut objective = InformationGainObjective::new(&labels, 2, None)
            .normalized(true);
        objective.set_predictions(&DataVector::constant(
            IndexSet::full(2), Value::Ternary(Ternary::False),
        ));
        let result = objective.compute_objective();
        assert_eq!(0.0, result, "expected 0.0, got {result}.");
    }

    #[test]
    fn test_vote() {
        let labels = [Some(0), Some(2), Some(2), None];
        let objective = InformationGainObjective::new(&labels, 3, None);
        let result = objective.compute_vote(&IndexSet::full(4));
        let expect = Vote::Distribution(vec![1.0 / 3.0, 0.0, 2.0 / 3.0]);
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");

        let result = objective.compute_vote(&IndexSet::explicit(vec![3]));
        assert!(result.is_missing());
    }
}
