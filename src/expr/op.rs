use serde::{Serialize, Deserialize};

use std::fmt;


/// Unary operators on reals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `-x`.
    Neg,
    /// `|x|`.
    Abs,
    /// `ln(x)`, missing for `x <= 0`.
    Log,
    /// `x * x`.
    Square,
}


impl UnaryOp {
    /// Applies the operator. Missing inputs yield missing outputs.
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        if x.is_nan() { return f64::NAN; }
        match self {
            Self::Neg => -x,
            Self::Abs => x.abs(),
            Self::Log => if x > 0f64 { x.ln() } else { f64::NAN },
            Self::Square => x * x,
        }
    }
}


/// Binary operators on reals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `x + y`.
    Add,
    /// `x - y`.
    Sub,
    /// `x * y`.
    Mul,
    /// `x / y`, missing for `y == 0`.
    Div,
}


impl BinaryOp {
    /// Applies the operator. Missing inputs yield missing outputs.
    #[inline]
    pub fn apply(self, x: f64, y: f64) -> f64 {
        if x.is_nan() || y.is_nan() { return f64::NAN; }
        match self {
            Self::Add => x + y,
            Self::Sub => x - y,
            Self::Mul => x * y,
            Self::Div => if y == 0f64 { f64::NAN } else { x / y },
        }
    }
}


impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Neg => "neg",
            Self::Abs => "abs",
            Self::Log => "log",
            Self::Square => "square",
        };
        write!(f, "{name}")
    }
}


impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        };
        write!(f, "{name}")
    }
}
