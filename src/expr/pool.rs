use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{
    Evaluator,
    IndexSet,
    SampleCache,
};
use crate::sample::{DataVector, Inputs, OutputKind, Ternary, Values};
use super::{Expr, NodeId, UnaryOp, BinaryOp};


/// Arena of interned expressions.
///
/// Nodes are looked up by structural hash, with an equality check
/// on hash collision, so structurally identical expressions
/// always map to the same [`NodeId`].
#[derive(Debug, Clone, Default)]
pub struct ExprPool {
    nodes: Vec<Expr>,
    kinds: Vec<OutputKind>,
    buckets: HashMap<u64, Vec<NodeId>>,
    input_kinds: Vec<OutputKind>,
}


impl ExprPool {
    /// Construct an empty pool over inputs of the given kinds.
    pub fn new(input_kinds: Vec<OutputKind>) -> Self {
        Self { input_kinds, ..Self::default() }
    }


    /// Construct an empty pool over `inputs`.
    pub fn for_inputs(inputs: &Inputs) -> Self {
        let kinds = (0..inputs.n_variables())
            .map(|j| inputs.kind(j))
            .collect();
        Self::new(kinds)
    }


    /// Interns `expr` and returns its id.
    /// Returns the existing id if a structurally identical node
    /// is already in the pool.
    pub fn intern(&mut self, expr: Expr) -> NodeId {
        let hash = structural_hash(&expr);
        if let Some(bucket) = self.buckets.get(&hash) {
            let found = bucket.iter()
                .copied()
                .find(|id| self.nodes[id.index()] == expr);
            if let Some(id) = found { return id; }
        }

        let kind = self.infer_kind(&expr);
        let id = NodeId(
            u32::try_from(self.nodes.len())
                .expect("the pool cannot hold more than u32::MAX nodes")
        );
        self.nodes.push(expr);
        self.kinds.push(kind);
        self.buckets.entry(hash).or_default().push(id);
        id
    }


    /// The `j`-th input variable.
    pub fn input(&mut self, j: usize) -> NodeId {
        self.intern(Expr::Input(j))
    }


    /// Interns every input variable, in order.
    pub fn input_nodes(&mut self) -> Vec<NodeId> {
        (0..self.input_kinds.len()).map(|j| self.input(j)).collect()
    }


    /// A real constant.
    pub fn constant(&mut self, c: f64) -> NodeId {
        self.intern(Expr::Constant(c))
    }


    /// `op(a)`.
    pub fn unary(&mut self, op: UnaryOp, a: NodeId) -> NodeId {
        self.intern(Expr::Unary(op, a))
    }


    /// `op(a, b)`.
    pub fn binary(&mut self, op: BinaryOp, a: NodeId, b: NodeId) -> NodeId {
        self.intern(Expr::Binary(op, a, b))
    }


    /// `a > threshold`.
    pub fn greater_than(&mut self, a: NodeId, threshold: f64) -> NodeId {
        self.intern(Expr::GreaterThan(a, threshold))
    }


    /// `not a`.
    pub fn not(&mut self, a: NodeId) -> NodeId {
        self.intern(Expr::Not(a))
    }


    /// `a and b`.
    pub fn and(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.intern(Expr::And(a, b))
    }


    /// `a or b`.
    pub fn or(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.intern(Expr::Or(a, b))
    }


    /// Returns the node of id `id`.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Expr {
        &self.nodes[id.index()]
    }


    /// Returns the number of interned nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }


    /// Returns `true` if the pool has no node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }


    fn infer_kind(&self, expr: &Expr) -> OutputKind {
        let expect = |id: NodeId, kind: OutputKind| {
            assert!(
                id.index() < self.nodes.len(),
                "child {id} is not in the pool"
            );
            let found = self.kinds[id.index()];
            assert_eq!(
                kind, found,
                "child {id} of {expr:?} must be {kind}, got {found}"
            );
        };

        match *expr {
            Expr::Input(j) => {
                assert!(
                    j < self.input_kinds.len(),
                    "input variable {j} does not exist"
                );
                self.input_kinds[j]
            },
            Expr::Constant(_) => OutputKind::Real,
            Expr::Unary(_, a) => {
                expect(a, OutputKind::Real);
                OutputKind::Real
            },
            Expr::Binary(_, a, b) => {
                expect(a, OutputKind::Real);
                expect(b, OutputKind::Real);
                OutputKind::Real
            },
            Expr::GreaterThan(a, _) => {
                expect(a, OutputKind::Real);
                OutputKind::Ternary
            },
            Expr::Not(a) => {
                expect(a, OutputKind::Ternary);
                OutputKind::Ternary
            },
            Expr::And(a, b) | Expr::Or(a, b) => {
                expect(a, OutputKind::Ternary);
                expect(b, OutputKind::Ternary);
                OutputKind::Ternary
            },
        }
    }
}


impl Evaluator for ExprPool {
    #[inline]
    fn output_kind(&self, node: NodeId) -> OutputKind {
        self.kinds[node.index()]
    }


    #[inline]
    fn input_variable(&self, node: NodeId) -> Option<usize> {
        match *self.get(node) {
            Expr::Input(j) => Some(j),
            _ => None,
        }
    }


    fn compute(&self, cache: &mut SampleCache, node: NodeId, indices: &IndexSet)
        -> Values
    {
        match *self.get(node) {
            Expr::Input(j) => {
                let vector = Arc::clone(cache.inputs().vector(j));
                DataVector::view(indices.clone(), vector).to_values()
            },
            Expr::Constant(c) => Values::Real(vec![c; indices.len()]),
            Expr::Unary(op, a) => {
                let a = cache.get_samples(self, a, indices);
                let values = a.reals()
                    .map(|(_, x)| op.apply(x))
                    .collect();
                Values::Real(values)
            },
            Expr::Binary(op, a, b) => {
                let a = cache.get_samples(self, a, indices);
                let b = cache.get_samples(self, b, indices);
                let values = a.reals()
                    .zip(b.reals())
                    .map(|((_, x), (_, y))| op.apply(x, y))
                    .collect();
                Values::Real(values)
            },
            Expr::GreaterThan(a, threshold) => {
                let a = cache.get_samples(self, a, indices);
                let values = a.reals()
                    .map(|(_, x)| {
                        if x.is_nan() {
                            Ternary::Missing
                        } else {
                            Ternary::from(x > threshold)
                        }
                    })
                    .collect();
                Values::Ternary(values)
            },
            Expr::Not(a) => {
                let a = cache.get_samples(self, a, indices);
                let values = a.ternaries()
                    .map(|(_, t)| t.not())
                    .collect();
                Values::Ternary(values)
            },
            Expr::And(a, b) => {
                let a = cache.get_samples(self, a, indices);
                let b = cache.get_samples(self, b, indices);
                let values = a.ternaries()
                    .zip(b.ternaries())
                    .map(|((_, x), (_, y))| x.and(y))
                    .collect();
                Values::Ternary(values)
            },
            Expr::Or(a, b) => {
                let a = cache.get_samples(self, a, indices);
                let b = cache.get_samples(self, b, indices);
                let values = a.ternaries()
                    .zip(b.ternaries())
                    .map(|((_, x), (_, y))| x.or(y))
                    .collect();
                Values::Ternary(values)
            },
        }
    }
}


fn structural_hash(expr: &Expr) -> u64 {
    let mut hasher = DefaultHasher::new();
    expr.hash(&mut hasher);
    hasher.finish()
}
