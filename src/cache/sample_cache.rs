use log::{debug, trace, warn};

use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use crate::{IndexSet, NodeId};
use crate::constants::{MAX_EVICTION_ROUNDS, SENTINEL_DEMAND};
use crate::sample::{
    DataVector,
    Inputs,
    OutputKind,
    SortedValues,
    Values,
};
use super::{CacheConfig, CacheStats, Evaluator};
use super::entry::CacheEntry;


/// Adaptive cache of per-instance node outputs.
///
/// A `SampleCache` is created once per learning run
/// over a fixed population of `N` instances.
/// It owns the input vectors and one entry per node ever queried.
///
/// - Every query adds the number of requested instances
///   to the node's *demand*.
/// - A node queried over the whole population is materialized
///   once its demand exceeds both `N` and the hysteresis threshold.
/// - When the byte budget is exceeded,
///   the resident entries with the smallest demand are evicted
///   and the threshold rises to twice the largest evicted demand.
///
/// Caching never changes results: every query returns
/// exactly what recomputing the node from the inputs would return.
///
/// A `SampleCache` has no internal locking;
/// share it between threads behind a single mutex.
pub struct SampleCache {
    inputs: Inputs,
    entries: HashMap<NodeId, CacheEntry>,
    config: CacheConfig,
    used_bytes: usize,
    eviction_threshold: i64,
    stats: CacheStats,
}


impl SampleCache {
    /// Construct a new cache over `inputs`.
    pub fn new(inputs: Inputs, config: CacheConfig) -> Self {
        assert!(config.eviction_batch > 0, "Eviction batch must be positive");
        let used_bytes = inputs.byte_size();
        Self {
            inputs,
            entries: HashMap::new(),
            config,
            used_bytes,
            eviction_threshold: 0,
            stats: CacheStats::default(),
        }
    }


    /// Construct a new cache with an unlimited budget.
    pub fn unlimited(inputs: Inputs) -> Self {
        Self::new(inputs, CacheConfig::default())
    }


    /// Returns the population size `N`.
    #[inline]
    pub fn n_instances(&self) -> usize {
        self.inputs.n_instances()
    }


    /// Returns the input vectors.
    #[inline]
    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }


    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> CacheConfig {
        self.config
    }


    /// Returns the number of bytes currently resident.
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }


    /// Returns the byte budget. `0` means unlimited.
    #[inline]
    pub fn budget_bytes(&self) -> usize {
        self.config.budget_bytes
    }


    /// Returns the current hysteresis threshold.
    #[inline]
    pub fn eviction_threshold(&self) -> i64 {
        self.eviction_threshold
    }


    /// Changes the byte budget and evicts if needed.
    pub fn set_budget_bytes(&mut self, bytes: usize) {
        self.config.budget_bytes = bytes;
        self.enforce_budget();
    }


    /// Returns `true` if the population-wide vector of `node` is resident.
    pub fn is_cached(&self, node: NodeId) -> bool {
        self.entries.get(&node)
            .is_some_and(|entry| entry.materialized.is_some())
    }


    /// Returns `true` if the population-wide sorted index of `node`
    /// is resident.
    pub fn has_sorted(&self, node: NodeId) -> bool {
        self.entries.get(&node)
            .is_some_and(|entry| entry.sorted.is_some())
    }


    /// Returns the demand of `node`,
    /// `-1` for a pinned node and `None` for a node never seen.
    pub fn demand(&self, node: NodeId) -> Option<i64> {
        self.entries.get(&node).map(|entry| entry.demand)
    }


    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            used_bytes: self.used_bytes,
            budget_bytes: self.config.budget_bytes,
            eviction_threshold: self.eviction_threshold,
            ..self.stats
        }
    }


    /// Print the counters as a table.
    pub fn print_stats(&self) {
        self.stats().print();
    }


    /// Returns the values of `node` on `indices`.
    ///
    /// The result is a view into the population-wide vector
    /// if `node` is resident, and freshly computed values otherwise.
    pub fn get_samples<E>(
        &mut self,
        evaluator: &E,
        node: NodeId,
        indices: &IndexSet,
    ) -> DataVector
        where E: Evaluator + ?Sized,
    {
        self.entry_mut(evaluator, node).add_demand(indices.len());
        self.fetch_samples(evaluator, node, indices)
    }


    /// Returns the sorted `(instance, value)` pairs of a real `node`
    /// on `indices`. Missing values are left out.
    ///
    /// If the population-wide sorted index of `node` is resident
    /// and `indices` is a strict subset, the index is filtered
    /// through a membership bitmap instead of being sorted again.
    pub fn get_sorted_values<E>(
        &mut self,
        evaluator: &E,
        node: NodeId,
        indices: &IndexSet,
    ) -> Arc<SortedValues>
        where E: Evaluator + ?Sized,
    {
        assert_eq!(
            evaluator.output_kind(node), OutputKind::Real,
            "only real nodes can be sorted by value"
        );
        let n_instances = self.n_instances();
        let full = indices.is_full(n_instances);

        let entry = self.entry_mut(evaluator, node);
        entry.add_demand(indices.len());

        if let Some(sorted) = &entry.sorted {
            let sorted = Arc::clone(sorted);
            self.stats.hits += 1;
            if full { return sorted; }
            let members = indices.membership(n_instances);
            return Arc::new(sorted.filter(&members));
        }

        let demand = entry.demand;
        let samples = self.fetch_samples(evaluator, node, indices);
        let sorted = SortedValues::from_samples(&samples);

        if full && (demand == SENTINEL_DEMAND || self.should_cache(demand)) {
            let sorted = Arc::new(sorted);
            debug!(
                "caching the sorted index of {node} \
                ({} pairs, demand {demand})",
                sorted.len(),
            );
            self.stats.sorted += 1;
            let payload = Arc::clone(&sorted);
            self.update_entry(node, |entry| entry.sorted = Some(payload));
            self.enforce_budget();
            return sorted;
        }
        Arc::new(sorted)
    }


    /// Materializes the population-wide vector of `node`.
    /// If `removable` is `false`, the entry is pinned
    /// and will never be evicted.
    pub fn cache_node<E>(&mut self, evaluator: &E, node: NodeId, removable: bool)
        where E: Evaluator + ?Sized,
    {
        let n_instances = self.n_instances();
        let entry = self.entry_mut(evaluator, node);
        if !removable {
            entry.demand = SENTINEL_DEMAND;
        }

        if entry.materialized.is_none() {
            self.stats.misses += 1;
            let full = IndexSet::full(n_instances);
            let values = evaluator.compute(self, node, &full);
            self.store_materialized(node, Arc::new(values));
        }
        self.enforce_budget();
    }


    /// Drops the payloads of `node` and unpins it.
    /// Input variables stay resident.
    pub fn uncache_node(&mut self, node: NodeId) {
        let Some(entry) = self.entries.get_mut(&node) else { return; };
        if entry.input { return; }

        let released = entry.drop_payloads();
        if entry.is_pinned() {
            entry.demand = 0;
        }
        self.used_bytes -= released;
        self.debug_check();
    }


    /// Drops every entry but the input variables,
    /// and resets the hysteresis threshold.
    pub fn clear(&mut self) {
        self.entries.retain(|_, entry| entry.input);
        self.entries.values_mut()
            .for_each(|entry| { entry.drop_payloads(); });
        self.used_bytes = self.inputs.byte_size();
        self.eviction_threshold = 0;
        self.debug_check();
    }


    /// Evicts entries until the budget holds.
    ///
    /// Each round evicts, in ascending order of demand,
    /// up to `eviction_batch` resident entries that are not pinned,
    /// then raises the hysteresis threshold to twice the largest
    /// demand evicted.
    /// If only pinned data remains, the budget is left exceeded.
    pub fn enforce_budget(&mut self) {
        let budget = self.config.budget_bytes;
        if budget == 0 || self.used_bytes <= budget { return; }

        for _ in 0..MAX_EVICTION_ROUNDS {
            if self.used_bytes <= budget { break; }

            let candidates = self.eviction_candidates();
            if candidates.is_empty() {
                warn!(
                    "sample cache uses {} bytes of pinned data, \
                    over the budget of {budget} bytes",
                    self.used_bytes,
                );
                break;
            }

            self.stats.eviction_rounds += 1;
            let mut largest = 0;
            for (demand, node) in candidates {
                if self.used_bytes <= budget { break; }
                let released = self.evict(node);
                largest = largest.max(demand);
                trace!("evicted {node} (demand {demand}, {released} bytes)");
            }

            self.eviction_threshold = self.eviction_threshold
                .max(largest.saturating_mul(2));
            debug!(
                "eviction round done: {} bytes used, threshold {}",
                self.used_bytes, self.eviction_threshold,
            );
        }
    }


    fn entry_mut<E>(&mut self, evaluator: &E, node: NodeId) -> &mut CacheEntry
        where E: Evaluator + ?Sized,
    {
        let inputs = &self.inputs;
        self.entries.entry(node)
            .or_insert_with(|| match evaluator.input_variable(node) {
                Some(j) => CacheEntry::input(Arc::clone(inputs.vector(j))),
                None => CacheEntry::default(),
            })
    }


    fn fetch_samples<E>(
        &mut self,
        evaluator: &E,
        node: NodeId,
        indices: &IndexSet,
    ) -> DataVector
        where E: Evaluator + ?Sized,
    {
        let n_instances = self.n_instances();
        let entry = self.entry_mut(evaluator, node);
        if let Some(values) = &entry.materialized {
            let values = Arc::clone(values);
            self.stats.hits += 1;
            return DataVector::view(indices.clone(), values);
        }

        let demand = entry.demand;
        self.stats.misses += 1;
        let values = evaluator.compute(self, node, indices);

        if indices.is_full(n_instances) && self.should_cache(demand) {
            let values = Arc::new(values);
            debug!(
                "caching {node} ({} bytes, demand {demand})",
                values.byte_size(),
            );
            self.store_materialized(node, Arc::clone(&values));
            self.enforce_budget();
            return DataVector::view(indices.clone(), values);
        }
        DataVector::owned(indices.clone(), values)
    }


    #[inline]
    fn should_cache(&self, demand: i64) -> bool {
        demand != SENTINEL_DEMAND
            && demand > self.eviction_threshold
            && demand > self.n_instances() as i64
    }


    fn store_materialized(&mut self, node: NodeId, values: Arc<Values>) {
        self.stats.materialized += 1;
        self.update_entry(node, |entry| entry.materialized = Some(values));
    }


    // Applies `update` to the entry of `node`
    // and keeps `used_bytes` exact.
    fn update_entry<F>(&mut self, node: NodeId, update: F)
        where F: FnOnce(&mut CacheEntry),
    {
        let entry = self.entries.entry(node).or_default();
        let before = entry.bytes;
        update(entry);
        entry.bytes = entry.owned_bytes();
        self.used_bytes = self.used_bytes - before + entry.bytes;
        self.debug_check();
    }


    // The `eviction_batch` evictable entries of smallest demand,
    // ascending. Ties are broken by creation order.
    fn eviction_candidates(&self) -> Vec<(i64, NodeId)> {
        let batch = self.config.eviction_batch;
        let mut heap = BinaryHeap::with_capacity(batch + 1);
        for (&node, entry) in self.entries.iter() {
            if !entry.is_evictable() { continue; }
            heap.push((entry.demand, node));
            if heap.len() > batch {
                heap.pop();
            }
        }
        heap.into_sorted_vec()
    }


    fn evict(&mut self, node: NodeId) -> usize {
        let released = match self.entries.get_mut(&node) {
            Some(entry) => entry.drop_payloads(),
            None => 0,
        };
        self.used_bytes -= released;
        self.stats.evictions += 1;
        self.debug_check();
        released
    }


    /// Recomputes the resident bytes from scratch.
    pub(crate) fn recompute_used_bytes(&self) -> usize {
        self.inputs.byte_size()
            + self.entries.values()
                .map(CacheEntry::owned_bytes)
                .sum::<usize>()
    }


    /// Returns `true` if the byte accounting is exact.
    pub(crate) fn check_consistency(&self) -> bool {
        self.entries.values().all(|entry| entry.bytes == entry.owned_bytes())
            && self.used_bytes == self.recompute_used_bytes()
    }


    #[inline(always)]
    fn debug_check(&self) {
        debug_assert!(
            self.check_consistency(),
            "byte accounting drifted: tracked {}, actual {}",
            self.used_bytes, self.recompute_used_bytes(),
        );
    }
}
