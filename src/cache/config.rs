use serde::{Serialize, Deserialize};

use crate::constants::{
    BYTES_PER_MEGABYTE,
    DEFAULT_BUDGET_BYTES,
    DEFAULT_EVICTION_BATCH,
};
use crate::error::{Error, Result};
use crate::sample::Inputs;
use super::SampleCache;


/// The tunable knobs of a [`SampleCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Byte budget. `0` means unlimited: eviction never runs.
    pub budget_bytes: usize,
    /// Maximal number of entries evicted per round.
    pub eviction_batch: usize,
}


impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            budget_bytes: DEFAULT_BUDGET_BYTES,
            eviction_batch: DEFAULT_EVICTION_BATCH,
        }
    }
}


impl CacheConfig {
    /// Parse a configuration such as
    /// `{"budget_bytes": 1048576, "eviction_batch": 10}`.
    /// Missing fields take their default value.
    pub fn from_json<S: AsRef<str>>(json: S) -> Result<Self> {
        let config: Self = serde_json::from_str(json.as_ref())?;
        if config.eviction_batch == 0 {
            return Err(Error::InvalidConfig(
                "`eviction_batch` must be positive".into()
            ));
        }
        Ok(config)
    }


    /// Returns `true` if the budget is unlimited.
    #[inline]
    pub fn is_unlimited(&self) -> bool {
        self.budget_bytes == 0
    }
}


/// A struct that builds [`SampleCache`].
///
/// # Example
///
/// ```no_run
/// use boostcache::{Inputs, SampleCacheBuilder};
/// # fn inputs() -> Inputs { unimplemented!() }
/// let cache = SampleCacheBuilder::new(inputs())
///     .budget_megabytes(512)
///     .eviction_batch(10)
///     .build();
/// ```
pub struct SampleCacheBuilder {
    inputs: Inputs,
    config: CacheConfig,
}


impl SampleCacheBuilder {
    /// Construct a new instance of [`SampleCacheBuilder`]
    /// with an unlimited budget.
    pub fn new(inputs: Inputs) -> Self {
        Self { inputs, config: CacheConfig::default(), }
    }


    /// Set the byte budget. `0` means unlimited.
    #[inline]
    pub fn budget_bytes(mut self, bytes: usize) -> Self {
        self.config.budget_bytes = bytes;
        self
    }


    /// Set the budget in megabytes. `0` means unlimited.
    #[inline]
    pub fn budget_megabytes(mut self, megabytes: usize) -> Self {
        self.config.budget_bytes = megabytes.checked_mul(BYTES_PER_MEGABYTE)
            .expect("The budget (bytes) cannot be represented as usize");
        self
    }


    /// Set the maximal number of entries evicted per round.
    /// Default value is `10`.
    pub fn eviction_batch(mut self, batch: usize) -> Self {
        assert!(batch > 0, "Eviction batch must be positive");
        self.config.eviction_batch = batch;
        self
    }


    /// Replace the whole configuration.
    pub fn config(mut self, config: CacheConfig) -> Self {
        assert!(config.eviction_batch > 0, "Eviction batch must be positive");
        self.config = config;
        self
    }


    /// Build a `SampleCache`.
    /// This method consumes `self`.
    pub fn build(self) -> SampleCache {
        SampleCache::new(self.inputs, self.config)
    }
}
