use fixedbitset::FixedBitSet;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use std::cmp::Ordering;
use std::mem;

use super::DataVector;


// Below this size the sort runs on the calling thread.
const PARALLEL_SORT_THRESHOLD: usize = 1 << 14;


/// `(instance, value)` pairs sorted ascending by value,
/// ties broken by ascending instance id.
/// Missing values are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortedValues {
    pairs: Vec<(usize, f64)>,
}


impl SortedValues {
    /// Sort the non-missing values of a real `DataVector`.
    pub fn from_samples(samples: &DataVector) -> Self {
        let mut pairs = samples.reals()
            .filter(|(_, x)| !x.is_nan())
            .collect::<Vec<_>>();

        if pairs.len() < PARALLEL_SORT_THRESHOLD {
            pairs.sort_unstable_by(compare);
        } else {
            pairs.par_sort_unstable_by(compare);
        }
        Self { pairs }
    }


    /// Construct from pairs that are already sorted.
    pub(crate) fn from_sorted(pairs: Vec<(usize, f64)>) -> Self {
        debug_assert!(
            pairs.windows(2).all(|w| compare(&w[0], &w[1]).is_lt())
        );
        Self { pairs }
    }


    /// Keeps the pairs whose instance is in `members`.
    /// The relative order is preserved, so the result is sorted.
    /// This runs in `O(self.len())`.
    pub fn filter(&self, members: &FixedBitSet) -> Self {
        let pairs = self.pairs.iter()
            .copied()
            .filter(|(i, _)| members.contains(*i))
            .collect();
        Self::from_sorted(pairs)
    }


    /// Returns the number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }


    /// Returns `true` if there is no pair.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }


    /// Returns the sorted pairs.
    #[inline]
    pub fn pairs(&self) -> &[(usize, f64)] {
        &self.pairs[..]
    }


    /// Iterates over the pairs in ascending order.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &(usize, f64)> + '_ {
        self.pairs.iter()
    }


    /// Returns the number of bytes the pairs occupy.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.pairs.len() * mem::size_of::<(usize, f64)>()
    }
}


#[inline(always)]
fn compare(a: &(usize, f64), b: &(usize, f64)) -> Ordering {
    a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))
}
