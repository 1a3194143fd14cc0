//! Constants shared across the crate.

/// Cache budget in bytes set as default.
/// `0` means the cache is unlimited and eviction never runs.
pub const DEFAULT_BUDGET_BYTES:   usize = 0;
/// The number of entries evicted per round, at most.
pub const DEFAULT_EVICTION_BATCH: usize = 10;
/// Upper bound on the eviction rounds of a single `enforce_budget` call.
pub const MAX_EVICTION_ROUNDS:    usize = 1_000;
/// Bytes in a megabyte, for `SampleCacheBuilder::budget_megabytes`.
pub const BYTES_PER_MEGABYTE:     usize = 1 << 20;

/// Demand value of an entry that must never be evicted.
pub const SENTINEL_DEMAND: i64 = -1;
