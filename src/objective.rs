//! Incremental scorers for weak hypotheses.
//!
//! A [`WeakObjective`] consumes the ternary predictions of a candidate
//! on an index set, keeps per-branch aggregates,
//! and updates them in place when the threshold search
//! flips a single instance from the negative to the positive branch.
//!
//! - [`RegressionObjective`] scores by variance reduction.
//! - [`BinaryObjective`] scores by correct/error/missing weights.
//! - [`InformationGainObjective`] scores by label-entropy reduction.
//! - [`MultiLabelObjective`] scores by the AdaBoost.MH edge
//!   of a per-label vote table.

/// Provides the `WeakObjective` trait and shared types.
pub mod core;
/// Provides the variance-reduction objective.
pub mod regression;
/// Provides the binary classification objective.
pub mod binary;
/// Provides the information-gain objective.
pub mod information_gain;
/// Provides the multi-label objective.
pub mod multi_label;


pub use self::core::{WeakObjective, ObjectiveState, Vote};
pub use regression::RegressionObjective;
pub use binary::BinaryObjective;
pub use information_gain::InformationGainObjective;
pub use multi_label::MultiLabelObjective;

use fixedbitset::FixedBitSet;


/// Supervision of a learning run, one variant per objective.
#[derive(Debug, Clone, Copy)]
pub enum Supervision<'a> {
    /// Real targets. `NaN` targets are ignored.
    Real(&'a [f64]),
    /// Binary labels.
    Binary(&'a [bool]),
    /// Class labels in `0..n_classes`. `None` labels are ignored.
    Class {
        /// Label per instance.
        labels: &'a [Option<usize>],
        /// Number of classes.
        n_classes: usize,
    },
    /// Label sets; bit `l` of the `i`-th set is on
    /// iff instance `i` carries label `l`.
    MultiLabel {
        /// Label set per instance.
        labels: &'a [FixedBitSet],
        /// Number of labels.
        n_labels: usize,
    },
}


/// Construct the objective matching `supervision`.
///
/// `weights` holds one weight per instance,
/// except for [`Supervision::MultiLabel`]
/// where it holds one weight per `(instance, label)` pair, row-major.
/// Missing weights default to `1.0`.
pub fn make_objective<'a>(
    supervision: Supervision<'a>,
    weights: Option<&'a [f64]>,
) -> Box<dyn WeakObjective + 'a>
{
    match supervision {
        Supervision::Real(targets) => {
            Box::new(RegressionObjective::new(targets, weights))
        },
        Supervision::Binary(labels) => {
            Box::new(BinaryObjective::new(labels, weights))
        },
        Supervision::Class { labels, n_classes } => {
            Box::new(InformationGainObjective::new(labels, n_classes, weights))
        },
        Supervision::MultiLabel { labels, n_labels } => {
            Box::new(MultiLabelObjective::new(labels, n_labels, weights))
        },
    }
}
