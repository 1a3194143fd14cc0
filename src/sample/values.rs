use serde::{Serialize, Deserialize};

use std::fmt;
use std::mem;


/// Three-valued boolean.
/// Packed as `0/1/2 = false/true/missing`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ternary {
    /// `false`.
    False = 0,
    /// `true`.
    True = 1,
    /// Unknown value.
    Missing = 2,
}


impl Ternary {
    /// Returns `true` if `self` is `Ternary::Missing`.
    #[inline(always)]
    pub fn is_missing(self) -> bool {
        self == Self::Missing
    }


    /// Negation. `Missing` stays missing.
    #[inline]
    pub fn not(self) -> Self {
        match self {
            Self::False   => Self::True,
            Self::True    => Self::False,
            Self::Missing => Self::Missing,
        }
    }


    /// Kleene conjunction.
    #[inline]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, Self::True) => Self::True,
            _ => Self::Missing,
        }
    }


    /// Kleene disjunction.
    #[inline]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, Self::False) => Self::False,
            _ => Self::Missing,
        }
    }
}


impl From<bool> for Ternary {
    #[inline(always)]
    fn from(b: bool) -> Self {
        if b { Self::True } else { Self::False }
    }
}


impl From<Option<bool>> for Ternary {
    #[inline(always)]
    fn from(b: Option<bool>) -> Self {
        b.map_or(Self::Missing, Self::from)
    }
}


/// Output kind of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKind {
    /// Three-valued boolean outputs.
    Ternary,
    /// Real outputs. `NaN` stands for a missing value.
    Real,
}


impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ternary => "ternary",
            Self::Real => "real",
        };
        write!(f, "{name}")
    }
}


/// A single per-instance value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A ternary value.
    Ternary(Ternary),
    /// A real value.
    Real(f64),
}


impl Value {
    /// Returns the kind of this value.
    #[inline]
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::Ternary(_) => OutputKind::Ternary,
            Self::Real(_) => OutputKind::Real,
        }
    }


    /// Returns `true` for `Ternary::Missing` and `NaN`.
    #[inline]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Ternary(t) => t.is_missing(),
            Self::Real(x) => x.is_nan(),
        }
    }


    /// Returns the real value, if any.
    #[inline]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(x) => Some(*x),
            Self::Ternary(_) => None,
        }
    }


    /// Returns the ternary value, if any.
    #[inline]
    pub fn as_ternary(&self) -> Option<Ternary> {
        match self {
            Self::Ternary(t) => Some(*t),
            Self::Real(_) => None,
        }
    }


    /// Equality where two missing values are equal.
    #[inline]
    pub(crate) fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            },
            (Self::Ternary(a), Self::Ternary(b)) => a == b,
            _ => false,
        }
    }
}


impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Real(x)
    }
}


impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Ternary(Ternary::from(b))
    }
}


impl From<Ternary> for Value {
    fn from(t: Ternary) -> Self {
        Self::Ternary(t)
    }
}


/// A dense vector of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Values {
    /// Ternary values.
    Ternary(Vec<Ternary>),
    /// Real values.
    Real(Vec<f64>),
}


impl Values {
    /// Returns an empty vector of the given kind.
    pub fn with_capacity(kind: OutputKind, capacity: usize) -> Self {
        match kind {
            OutputKind::Ternary => Self::Ternary(Vec::with_capacity(capacity)),
            OutputKind::Real => Self::Real(Vec::with_capacity(capacity)),
        }
    }


    /// Returns the kind of the values.
    #[inline]
    pub fn kind(&self) -> OutputKind {
        match self {
            Self::Ternary(_) => OutputKind::Ternary,
            Self::Real(_) => OutputKind::Real,
        }
    }


    /// Returns the number of values.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Ternary(v) => v.len(),
            Self::Real(v) => v.len(),
        }
    }


    /// Returns `true` if there is no value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Returns the `position`-th value.
    #[inline]
    pub fn get(&self, position: usize) -> Value {
        match self {
            Self::Ternary(v) => Value::Ternary(v[position]),
            Self::Real(v) => Value::Real(v[position]),
        }
    }


    /// Appends a value. Panics if the kinds differ.
    #[inline]
    pub fn push(&mut self, value: Value) {
        match (self, value) {
            (Self::Ternary(v), Value::Ternary(t)) => v.push(t),
            (Self::Real(v), Value::Real(x)) => v.push(x),
            (values, value) => panic!(
                "cannot push a {} value into {} values",
                value.kind(), values.kind(),
            ),
        }
    }


    /// Returns the number of bytes the payload occupies.
    #[inline]
    pub fn byte_size(&self) -> usize {
        match self {
            Self::Ternary(v) => v.len() * mem::size_of::<Ternary>(),
            Self::Real(v) => v.len() * mem::size_of::<f64>(),
        }
    }


    /// Returns the real slice. Panics on ternary values.
    #[inline]
    pub fn as_reals(&self) -> &[f64] {
        match self {
            Self::Real(v) => &v[..],
            Self::Ternary(_) => panic!("expected real values"),
        }
    }


    /// Returns the ternary slice. Panics on real values.
    #[inline]
    pub fn as_ternaries(&self) -> &[Ternary] {
        match self {
            Self::Ternary(v) => &v[..],
            Self::Real(_) => panic!("expected ternary values"),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ternary_logic() {
        use Ternary::*;
        let cases = [
            (True,    False,   False,   True),
            (True,    Missing, Missing, True),
            (False,   Missing, False,   Missing),
            (Missing, Missing, Missing, Missing),
        ];
        for (a, b, and, or) in cases {
            let result = a.and(b);
            assert_eq!(and, result, "{a:?} and {b:?}: expected {and:?}, got {result:?}.");
            let result = a.or(b);
            assert_eq!(or, result, "{a:?} or {b:?}: expected {or:?}, got {result:?}.");
        }
        assert_eq!(Missing.not(), Missing);
        assert_eq!(True.not(), False);
    }

    #[test]
    fn test_byte_size() {
        let reals = Values::Real(vec![0.0; 10]);
        let result = reals.byte_size();
        let expect = 80;
        assert_eq!(expect, result, "expected {expect}, got {result}.");

        let ternaries = Values::Ternary(vec![Ternary::True; 10]);
        let result = ternaries.byte_size();
        let expect = 10;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
    }

    #[test]
    fn test_missing_values_are_same() {
        let a = Value::Real(f64::NAN);
        let b = Value::Real(f64::NAN);
        assert!(a.same(&b));
        assert!(!Value::Real(1.0).same(&Value::Ternary(Ternary::True)));
    }
}
