//! Defines `IndexSet`, an immutable handle to a subset of
//! the training population `[0, N)`.
//!
//! Every call to the cache or to a weak objective takes an `IndexSet`
//! instead of copying the examples themselves.
//! Cloning an `IndexSet` is cheap: clones share the same storage.
use fixedbitset::FixedBitSet;
use rand::Rng;
use rand::seq::index;
use serde::{Serialize, Deserialize};

use std::fmt;
use std::iter::Copied;
use std::ops::Range;
use std::slice;
use std::sync::Arc;

use crate::sample::{DataVector, Ternary};


/// A subset of the training population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexSet {
    /// A contiguous range of instances.
    Range(Range<usize>),
    /// An explicit collection of distinct instances.
    /// `ascending` records whether `indices` is strictly increasing.
    Explicit {
        /// The instance ids.
        indices: Arc<[usize]>,
        /// `true` if `indices` is strictly increasing.
        ascending: bool,
    },
}


impl IndexSet {
    /// The whole population `[0, n_instances)`.
    #[inline]
    pub fn full(n_instances: usize) -> Self {
        Self::Range(0..n_instances)
    }


    /// A contiguous range of instances.
    #[inline]
    pub fn range(range: Range<usize>) -> Self {
        Self::Range(range)
    }


    /// An explicit set of instances.
    /// The ids must be distinct; they may come in any order.
    pub fn explicit(indices: Vec<usize>) -> Self {
        let ascending = indices.windows(2).all(|w| w[0] < w[1]);
        debug_assert!(
            ascending || {
                let mut sorted = indices.clone();
                sorted.sort_unstable();
                sorted.windows(2).all(|w| w[0] < w[1])
            },
            "an explicit index set must not contain duplicates"
        );
        Self::Explicit { indices: indices.into(), ascending, }
    }


    /// The empty set.
    #[inline]
    pub fn empty() -> Self {
        Self::Range(0..0)
    }


    /// Returns the number of instances in this set.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Range(range) => range.len(),
            Self::Explicit { indices, .. } => indices.len(),
        }
    }


    /// Returns `true` if this set has no instance.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Iterates over the instance ids in the order of this set.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        match self {
            Self::Range(range) => Iter::Range(range.clone()),
            Self::Explicit { indices, .. } => {
                Iter::Slice(indices.iter().copied())
            },
        }
    }


    /// Returns `true` if this set enumerates `[0, n_instances)`
    /// in ascending order.
    /// Only such sets yield vectors that can be stored
    /// as a population-wide cache entry.
    pub fn is_full(&self, n_instances: usize) -> bool {
        match self {
            Self::Range(range) => range.start == 0 && range.end == n_instances,
            Self::Explicit { indices, ascending } => {
                *ascending
                    && indices.len() == n_instances
                    && indices.last().map_or(true, |&i| i + 1 == n_instances)
            },
        }
    }


    /// Returns the membership bitmap of this set
    /// over a population of size `n_instances`.
    pub fn membership(&self, n_instances: usize) -> FixedBitSet {
        let mut bits = FixedBitSet::with_capacity(n_instances);
        match self {
            Self::Range(range) => bits.insert_range(range.clone()),
            Self::Explicit { indices, .. } => {
                indices.iter().for_each(|&i| bits.insert(i));
            },
        }
        bits
    }


    /// Draws `size` distinct instances of this set uniformly at random.
    /// The result is ascending.
    pub fn subsample<R: Rng + ?Sized>(&self, size: usize, rng: &mut R)
        -> Self
    {
        let size = size.min(self.len());
        let positions = index::sample(rng, self.len(), size);
        let mut indices = match self {
            Self::Range(range) => positions.into_iter()
                .map(|p| range.start + p)
                .collect::<Vec<_>>(),
            Self::Explicit { indices, .. } => positions.into_iter()
                .map(|p| indices[p])
                .collect::<Vec<_>>(),
        };
        indices.sort_unstable();
        Self::Explicit { indices: indices.into(), ascending: true, }
    }


    /// Partitions this set by the ternary values of `predictions`
    /// into the `(negative, positive, missing)` subsets.
    /// Each subset keeps the relative order of `self`.
    pub fn split_by(&self, predictions: &DataVector) -> (Self, Self, Self) {
        assert_eq!(
            predictions.indices(), self,
            "predictions must be computed on the set being split"
        );
        let mut negatives = Vec::new();
        let mut positives = Vec::new();
        let mut missings  = Vec::new();
        for (i, prediction) in predictions.ternaries() {
            match prediction {
                Ternary::False   => negatives.push(i),
                Ternary::True    => positives.push(i),
                Ternary::Missing => missings.push(i),
            }
        }
        let ascending = self.is_ascending();
        let wrap = |indices: Vec<usize>| Self::Explicit {
            indices: indices.into(), ascending,
        };
        (wrap(negatives), wrap(positives), wrap(missings))
    }


    #[inline]
    fn is_ascending(&self) -> bool {
        match self {
            Self::Range(_) => true,
            Self::Explicit { ascending, .. } => *ascending,
        }
    }
}


impl<'a> IntoIterator for &'a IndexSet {
    type Item = usize;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


impl From<Range<usize>> for IndexSet {
    fn from(range: Range<usize>) -> Self {
        Self::Range(range)
    }
}


impl From<Vec<usize>> for IndexSet {
    fn from(indices: Vec<usize>) -> Self {
        Self::explicit(indices)
    }
}


impl fmt::Display for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(range) => {
                write!(f, "[{}, {})", range.start, range.end)
            },
            Self::Explicit { indices, .. } => {
                write!(f, "{{{} instances}}", indices.len())
            },
        }
    }
}


/// Iterator over the instance ids of an [`IndexSet`].
pub enum Iter<'a> {
    /// Iterates over a range.
    Range(Range<usize>),
    /// Iterates over an explicit slice.
    Slice(Copied<slice::Iter<'a, usize>>),
}


impl Iterator for Iter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        match self {
            Self::Range(range) => range.next(),
            Self::Slice(iter) => iter.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Range(range) => range.size_hint(),
            Self::Slice(iter) => iter.size_hint(),
        }
    }
}


impl ExactSizeIterator for Iter<'_> {}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_full_is_full() {
        let set = IndexSet::full(5);
        let result = set.is_full(5);
        let expect = true;
        assert_eq!(expect, result, "expected {expect}, got {result}.");

        let result = set.is_full(6);
        let expect = false;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
    }

    #[test]
    fn test_explicit_full_requires_order() {
        let ordered = IndexSet::explicit(vec![0, 1, 2, 3]);
        assert!(ordered.is_full(4));

        let shuffled = IndexSet::explicit(vec![2, 0, 3, 1]);
        assert!(!shuffled.is_full(4));

        let partial = IndexSet::explicit(vec![0, 1, 3]);
        assert!(!partial.is_full(4));
    }

    #[test]
    fn test_membership() {
        let set = IndexSet::explicit(vec![4, 1, 7]);
        let bits = set.membership(8);
        let result = bits.ones().collect::<Vec<_>>();
        let expect = vec![1, 4, 7];
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");

        let set = IndexSet::range(2..5);
        let result = set.membership(8).ones().collect::<Vec<_>>();
        let expect = vec![2, 3, 4];
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");
    }

    #[test]
    fn test_iteration_order() {
        let set = IndexSet::explicit(vec![3, 0, 2]);
        let result = set.iter().collect::<Vec<_>>();
        let expect = vec![3, 0, 2];
        assert_eq!(expect, result, "expected {expect:?}, got {result:?}.");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_subsample() {
        let mut rng = StdRng::seed_from_u64(1234);
        let set = IndexSet::range(10..30);
        let sub = set.subsample(5, &mut rng);

        assert_eq!(sub.len(), 5);
        let ids = sub.iter().collect::<Vec<_>>();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|i| (10..30).contains(i)));

        let all = set.subsample(100, &mut rng);
        assert_eq!(all.len(), 20);
    }

    #[test]
    fn test_split_by() {
        use crate::sample::Values;
        let set = IndexSet::explicit(vec![1, 3, 4, 6]);
        let predictions = DataVector::owned(
            set.clone(),
            Values::Ternary(vec![
                Ternary::True, Ternary::Missing, Ternary::False, Ternary::True,
            ]),
        );
        let (neg, pos, miss) = set.split_by(&predictions);
        assert_eq!(neg.iter().collect::<Vec<_>>(), vec![4]);
        assert_eq!(pos.iter().collect::<Vec<_>>(), vec![1, 6]);
        assert_eq!(miss.iter().collect::<Vec<_>>(), vec![3]);
    }
}
