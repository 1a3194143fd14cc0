use std::sync::Arc;

use crate::IndexSet;
use super::values::*;


#[derive(Debug, Clone)]
enum Storage {
    // Population-wide values, indexed by instance id.
    View(Arc<Values>),
    // Compact values, indexed by position in the index set.
    Owned(Values),
}


/// The values of a node restricted to an [`IndexSet`].
///
/// A `DataVector` is either a view into a population-wide vector
/// (a cache hit) or freshly computed compact values (a cache miss).
/// Both forms iterate identically.
#[derive(Debug, Clone)]
pub struct DataVector {
    indices: IndexSet,
    storage: Storage,
}


impl DataVector {
    /// A view of `values` (indexed by instance id)
    /// restricted to `indices`.
    #[inline]
    pub fn view(indices: IndexSet, values: Arc<Values>) -> Self {
        Self { indices, storage: Storage::View(values), }
    }


    /// Compact values; the `k`-th value belongs to
    /// the `k`-th instance of `indices`.
    #[inline]
    pub fn owned(indices: IndexSet, values: Values) -> Self {
        assert_eq!(
            indices.len(), values.len(),
            "one value per instance is required"
        );
        Self { indices, storage: Storage::Owned(values), }
    }


    /// The same `value` for every instance of `indices`.
    pub fn constant(indices: IndexSet, value: Value) -> Self {
        let n = indices.len();
        let values = match value {
            Value::Ternary(t) => Values::Ternary(vec![t; n]),
            Value::Real(x) => Values::Real(vec![x; n]),
        };
        Self::owned(indices, values)
    }


    /// Returns the index set.
    #[inline]
    pub fn indices(&self) -> &IndexSet {
        &self.indices
    }


    /// Returns the number of instances.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }


    /// Returns `true` if there is no instance.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }


    /// Returns the kind of the values.
    #[inline]
    pub fn kind(&self) -> OutputKind {
        self.values().kind()
    }


    /// Returns `true` if this vector is a view into a shared vector.
    #[inline]
    pub fn is_view(&self) -> bool {
        matches!(self.storage, Storage::View(_))
    }


    #[inline(always)]
    fn values(&self) -> &Values {
        match &self.storage {
            Storage::View(values) => values,
            Storage::Owned(values) => values,
        }
    }


    /// Iterates over `(instance, value)` pairs
    /// in the order of the index set.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Value)> + '_ {
        let values = self.values();
        let is_view = self.is_view();
        self.indices.iter()
            .enumerate()
            .map(move |(position, i)| {
                let at = if is_view { i } else { position };
                (i, values.get(at))
            })
    }


    /// Iterates over `(instance, value)` pairs of a real vector.
    /// Panics on ternary vectors.
    pub fn reals(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        let values = self.values().as_reals();
        let is_view = self.is_view();
        self.indices.iter()
            .enumerate()
            .map(move |(position, i)| {
                (i, values[if is_view { i } else { position }])
            })
    }


    /// Iterates over `(instance, value)` pairs of a ternary vector.
    /// Panics on real vectors.
    pub fn ternaries(&self) -> impl Iterator<Item = (usize, Ternary)> + '_ {
        let values = self.values().as_ternaries();
        let is_view = self.is_view();
        self.indices.iter()
            .enumerate()
            .map(move |(position, i)| {
                (i, values[if is_view { i } else { position }])
            })
    }


    /// Copies the values into a compact vector,
    /// in the order of the index set.
    pub fn to_values(&self) -> Values {
        match &self.storage {
            Storage::Owned(values) => values.clone(),
            Storage::View(values) => {
                let mut out = Values::with_capacity(
                    values.kind(), self.len()
                );
                self.indices.iter().for_each(|i| out.push(values.get(i)));
                out
            },
        }
    }
}


impl PartialEq for DataVector {
    /// Two vectors are equal when they cover the same index set
    /// with the same values. Missing values compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices
            && self.kind() == other.kind()
            && self.iter()
                .zip(other.iter())
                .all(|((_, a), (_, b))| a.same(&b))
    }
}
