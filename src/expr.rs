//! A small interned expression language.
//!
//! Expressions are stored in an [`ExprPool`] arena and referred to
//! by a stable [`NodeId`].
//! Interning is structural: two independently built expressions
//! with the same operator, children and constants get the same `NodeId`,
//! hence share one cache entry.

// Provides the operators.
pub(crate) mod op;
// Provides the arena.
pub(crate) mod pool;


pub use op::{UnaryOp, BinaryOp};
pub use pool::ExprPool;

use serde::{Serialize, Deserialize};

use std::fmt;
use std::hash::{Hash, Hasher};


/// Stable identity of an interned expression node.
/// Ids are handed out in creation order.
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize,
)]
pub struct NodeId(pub(crate) u32);


impl NodeId {
    /// Returns the position of the node in its pool.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}


impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}


/// An expression node.
/// Children are referred to by `NodeId`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Expr {
    /// The `j`-th input variable.
    Input(usize),
    /// A real constant.
    Constant(f64),
    /// `op(child)` on a real child.
    Unary(UnaryOp, NodeId),
    /// `op(lhs, rhs)` on real children.
    Binary(BinaryOp, NodeId, NodeId),
    /// `child > threshold`; missing when `child` is missing.
    GreaterThan(NodeId, f64),
    /// Three-valued negation.
    Not(NodeId),
    /// Three-valued conjunction.
    And(NodeId, NodeId),
    /// Three-valued disjunction.
    Or(NodeId, NodeId),
}


impl Expr {
    /// Returns the children of this node.
    pub fn children(&self) -> Vec<NodeId> {
        match *self {
            Self::Input(_) | Self::Constant(_) => Vec::new(),
            Self::Unary(_, a)
                | Self::GreaterThan(a, _)
                | Self::Not(a) => vec![a],
            Self::Binary(_, a, b)
                | Self::And(a, b)
                | Self::Or(a, b) => vec![a, b],
        }
    }
}


// Constants compare by bit pattern so that `Eq` and `Hash` agree.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Input(a), Self::Input(b)) => a == b,
            (Self::Constant(a), Self::Constant(b)) => {
                a.to_bits() == b.to_bits()
            },
            (Self::Unary(op1, a1), Self::Unary(op2, a2)) => {
                op1 == op2 && a1 == a2
            },
            (Self::Binary(op1, a1, b1), Self::Binary(op2, a2, b2)) => {
                op1 == op2 && a1 == a2 && b1 == b2
            },
            (Self::GreaterThan(a1, t1), Self::GreaterThan(a2, t2)) => {
                a1 == a2 && t1.to_bits() == t2.to_bits()
            },
            (Self::Not(a1), Self::Not(a2)) => a1 == a2,
            (Self::And(a1, b1), Self::And(a2, b2)) => a1 == a2 && b1 == b2,
            (Self::Or(a1, b1), Self::Or(a2, b2)) => a1 == a2 && b1 == b2,
            _ => false,
        }
    }
}


impl Eq for Expr {}


impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Input(j) => j.hash(state),
            Self::Constant(c) => c.to_bits().hash(state),
            Self::Unary(op, a) => { op.hash(state); a.hash(state); },
            Self::Binary(op, a, b) => {
                op.hash(state); a.hash(state); b.hash(state);
            },
            Self::GreaterThan(a, t) => {
                a.hash(state); t.to_bits().hash(state);
            },
            Self::Not(a) => a.hash(state),
            Self::And(a, b) | Self::Or(a, b) => {
                a.hash(state); b.hash(state);
            },
        }
    }
}
