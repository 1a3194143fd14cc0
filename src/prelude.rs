//! Exports the cache, the weak objectives and the search functions.
//!
pub use crate::cache::{
    // Cache
    SampleCache,
    SampleCacheBuilder,
    CacheConfig,
    CacheStats,

    // Node evaluation
    Evaluator,
};


pub use crate::expr::{
    Expr,
    ExprPool,
    NodeId,
    UnaryOp,
    BinaryOp,
};


pub use crate::sample::{
    Inputs,
    Values,
    Value,
    Ternary,
    OutputKind,
    DataVector,
    SortedValues,
};


pub use crate::objective::{
    // Weak objective trait
    WeakObjective,
    ObjectiveState,
    Vote,

    // Variants
    RegressionObjective,
    BinaryObjective,
    InformationGainObjective,
    MultiLabelObjective,

    // Factory
    Supervision,
    make_objective,
};


pub use crate::threshold::{
    find_best_threshold,
    ThresholdSplit,
};


pub use crate::scoring::{
    score_candidate,
    best_candidate,
    CandidateScore,
};


pub use crate::index_set::IndexSet;
