use std::sync::Arc;

use crate::constants::SENTINEL_DEMAND;
use crate::sample::{SortedValues, Values};


/// The cache entry of a node.
#[derive(Debug, Clone, Default)]
pub(crate) struct CacheEntry {
    // Population-wide values, indexed by instance id.
    pub(crate) materialized: Option<Arc<Values>>,
    // Population-wide sorted index.
    pub(crate) sorted: Option<Arc<SortedValues>>,
    // `SENTINEL_DEMAND` for pinned entries,
    // the total number of requested instances otherwise.
    pub(crate) demand: i64,
    // Bytes owned by this entry.
    pub(crate) bytes: usize,
    // `true` for an input variable, whose vector is owned by `Inputs`.
    pub(crate) input: bool,
}


impl CacheEntry {
    /// The pinned entry of an input variable.
    /// Its vector is shared with `Inputs` and is not counted here.
    pub(crate) fn input(vector: Arc<Values>) -> Self {
        Self {
            materialized: Some(vector),
            sorted: None,
            demand: SENTINEL_DEMAND,
            bytes: 0,
            input: true,
        }
    }


    #[inline(always)]
    pub(crate) fn is_pinned(&self) -> bool {
        self.demand == SENTINEL_DEMAND
    }


    /// Returns `true` if this entry holds a payload.
    #[inline(always)]
    pub(crate) fn is_resident(&self) -> bool {
        self.materialized.is_some() || self.sorted.is_some()
    }


    /// Returns `true` if this entry can be chosen by eviction.
    #[inline(always)]
    pub(crate) fn is_evictable(&self) -> bool {
        !self.is_pinned() && !self.input && self.is_resident()
    }


    #[inline(always)]
    pub(crate) fn add_demand(&mut self, n: usize) {
        if !self.is_pinned() {
            self.demand = self.demand.saturating_add(n as i64);
        }
    }


    /// Recomputes the owned bytes from the payloads.
    pub(crate) fn owned_bytes(&self) -> usize {
        let materialized = if self.input {
            0
        } else {
            self.materialized.as_ref().map_or(0, |v| v.byte_size())
        };
        let sorted = self.sorted.as_ref().map_or(0, |s| s.byte_size());
        materialized + sorted
    }


    /// Drops the payloads and returns the number of bytes released.
    pub(crate) fn drop_payloads(&mut self) -> usize {
        let released = self.bytes;
        if !self.input {
            self.materialized = None;
        }
        self.sorted = None;
        self.bytes = 0;
        released
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_demand_is_frozen() {
        let mut entry = CacheEntry::input(Arc::new(Values::Real(vec![1.0])));
        entry.add_demand(100);
        assert!(entry.is_pinned());
        assert!(!entry.is_evictable());

        let mut entry = CacheEntry::default();
        entry.add_demand(7);
        entry.add_demand(3);
        let result = entry.demand;
        let expect = 10;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
    }

    #[test]
    fn test_input_bytes_are_not_owned() {
        let mut entry = CacheEntry::input(Arc::new(Values::Real(vec![1.0; 4])));
        assert_eq!(entry.owned_bytes(), 0);

        entry.sorted = Some(Arc::new(SortedValues::default()));
        entry.bytes = entry.owned_bytes();
        let released = entry.drop_payloads();
        assert_eq!(released, 0);
        assert!(entry.materialized.is_some());
    }
}
