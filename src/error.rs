//! Errors raised at the ingestion boundary of the crate.
//! The cache, the weak objectives and the threshold search never fail;
//! only building [`Inputs`](crate::Inputs) from external data
//! and parsing a [`CacheConfig`](crate::CacheConfig) do.
use polars::prelude::PolarsError;
use thiserror::Error;

use crate::sample::OutputKind;

/// Error type of this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised while reading a `polars::DataFrame`.
    #[error("Error from the underlying Polars DataFrame library: {0}")]
    Polars(#[from] PolarsError),

    /// Error raised while parsing a JSON configuration.
    #[error("Failed to parse the cache configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A column whose dtype is neither numeric nor boolean.
    #[error("The column `{name}` has an unsupported dtype `{dtype}`")]
    UnsupportedDtype {
        /// Column name.
        name: String,
        /// Column dtype, formatted.
        dtype: String,
    },

    /// A training object decomposed into a different number of values
    /// than the first one.
    #[error(
        "Object #{object} decomposes into {found} values, \
        but the first object has {expected}"
    )]
    ArityMismatch {
        /// Position of the offending object.
        object: usize,
        /// Number of variables of the first object.
        expected: usize,
        /// Number of variables of the offending object.
        found: usize,
    },

    /// A variable of a training object changed its kind.
    #[error(
        "Variable #{variable} of object #{object} is {found:?}, \
        but the first object has {expected:?}"
    )]
    KindMismatch {
        /// Position of the offending object.
        object: usize,
        /// Position of the offending variable.
        variable: usize,
        /// Kind of the variable in the first object.
        expected: OutputKind,
        /// Kind of the variable in the offending object.
        found: OutputKind,
    },

    /// A configuration value out of its domain.
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

/// Result type of this crate.
pub type Result<T> = std::result::Result<T, Error>;
