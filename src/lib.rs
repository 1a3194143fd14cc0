#![warn(missing_docs)]

//!
//! A crate that provides an adaptive sample cache
//! for boosting-style learners that build and score
//! many candidate expressions over one training population.
//!
//! The crate consists of three layers.
//!
//! - The sample cache
//!     [`SampleCache`] serves the per-instance values of expression nodes
//!     restricted to an [`IndexSet`].
//!     It materializes the population-wide vectors of the most demanded nodes,
//!     keeps a "sorted by value" index for the nodes searched most often,
//!     and evicts the least demanded entries under a byte budget.
//!
//! - Weak objectives
//!     A [`WeakObjective`] scores a candidate split incrementally.
//!     This crate provides [`RegressionObjective`], [`BinaryObjective`],
//!     [`InformationGainObjective`], and [`MultiLabelObjective`].
//!
//! - Threshold search
//!     [`find_best_threshold`] sweeps the sorted values of a real candidate
//!     and returns the threshold that maximizes the objective.
//!
//! # Example
//! ```no_run
//! use boostcache::prelude::*;
//!
//! let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//! let inputs = Inputs::from_columns(vec![("x", Values::Real(xs))]);
//! let mut pool = ExprPool::for_inputs(&inputs);
//! let mut cache = SampleCacheBuilder::new(inputs)
//!     .budget_megabytes(64)
//!     .build();
//!
//! let labels = [false, false, true, true, true];
//! let mut objective = BinaryObjective::new(&labels, None);
//!
//! let x = pool.input(0);
//! let split = cache.find_best_threshold(
//!     &pool, x, &IndexSet::full(5), &mut objective
//! );
//! assert_eq!(split.threshold, 2.5);
//! ```

pub mod constants;
pub mod error;
pub mod index_set;
pub mod sample;
pub mod expr;
pub mod cache;
pub mod objective;
pub mod threshold;
pub mod scoring;

pub mod prelude;


pub use error::{Error, Result};
pub use index_set::IndexSet;

pub use sample::{
    Ternary,
    OutputKind,
    Value,
    Values,
    DataVector,
    Inputs,
    SortedValues,
};

pub use expr::{
    Expr,
    ExprPool,
    NodeId,
    UnaryOp,
    BinaryOp,
};

pub use cache::{
    CacheConfig,
    CacheStats,
    Evaluator,
    SampleCache,
    SampleCacheBuilder,
};

pub use objective::{
    make_objective,
    Supervision,
    WeakObjective,
    ObjectiveState,
    Vote,
    RegressionObjective,
    BinaryObjective,
    InformationGainObjective,
    MultiLabelObjective,
};

pub use threshold::{find_best_threshold, ThresholdSplit};
pub use scoring::{
    apply_threshold,
    best_candidate,
    score_candidate,
    CandidateScore,
};
