// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partition planner.

use event_catalog::{CatalogError, Namespace};
use partition_cache::CacheError;
use trial_oracle::OracleError;

/// Errors that can occur while partitioning one namespace bucket.
#[derive(Debug, thiserror::Error)]
pub enum PartitionError {
    /// An input event is not in the catalog for its namespace.
    #[error("unknown {namespace} event '{event}'")]
    UnknownEvent { namespace: Namespace, event: String },

    /// An algorithm name did not parse.
    #[error("unknown algorithm '{0}' (expected 'greedy' or 'cached')")]
    UnknownAlgorithm(String),

    /// The greedy search was configured with zero retries.
    #[error("retry budget must be at least 1")]
    InvalidRetryBudget,

    /// A partition does not cover its input bucket exactly once.
    #[error("{namespace} partition does not cover its input: {detail}")]
    CoverageMismatch { namespace: Namespace, detail: String },

    /// The feasibility oracle or exact subsystem failed.
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// The partition cache failed.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// An event name could not be interpreted.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
