//! Per-instance value vectors.
//!
//! - [`Values`] is a dense vector of ternary or real outputs.
//! - [`DataVector`] is the values of a node restricted to an
//!   [`IndexSet`](crate::IndexSet),
//!   either a view into a population-wide vector or compact values.
//! - [`Inputs`] holds the always-resident input vectors.
//! - [`SortedValues`] is the "sorted by value" index
//!   used by the threshold search.

// Provides ternary/real values.
pub(crate) mod values;
// Provides the data vector struct.
pub(crate) mod data_vector;
// Provides the input vectors.
pub(crate) mod inputs;
// Provides the sorted index.
pub(crate) mod sorted;


pub use values::{Ternary, OutputKind, Value, Values};
pub use data_vector::DataVector;
pub use inputs::Inputs;
pub use sorted::SortedValues;
