use crate::{IndexSet, NodeId, SampleCache};
use crate::sample::{OutputKind, Values};


/// Computes the outputs of expression nodes on a cache miss.
///
/// `compute` receives the cache itself so that composite nodes
/// can fetch their children through it.
pub trait Evaluator {
    /// Returns the output kind of `node`.
    fn output_kind(&self, node: NodeId) -> OutputKind;


    /// Returns `Some(j)` if `node` is the `j`-th input variable.
    /// Input nodes are served from the always-resident input vectors
    /// and never computed.
    fn input_variable(&self, node: NodeId) -> Option<usize>;


    /// Computes the values of `node` on `indices`.
    /// The `k`-th value belongs to the `k`-th instance of `indices`.
    fn compute(&self, cache: &mut SampleCache, node: NodeId, indices: &IndexSet)
        -> Values;
}
