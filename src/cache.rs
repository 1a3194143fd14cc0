//! The adaptive sample cache.
//!
//! [`SampleCache`] materializes, reuses and evicts the per-instance
//! value vectors of expression nodes under a byte budget,
//! and keeps a population-wide "sorted by value" index
//! for the nodes searched by threshold most often.

// Provides the evaluator trait.
pub(crate) mod evaluator;
// Provides the configuration and its builder.
pub(crate) mod config;
// Provides the cache entries.
pub(crate) mod entry;
// Provides the counters.
pub(crate) mod stats;
// Provides the cache itself.
pub(crate) mod sample_cache;


pub use evaluator::Evaluator;
pub use config::{CacheConfig, SampleCacheBuilder};
pub use stats::CacheStats;
pub use sample_cache::SampleCache;
