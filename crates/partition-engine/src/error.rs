// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partitioning engine.

/// Errors that can occur while serving a partition request.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A namespace partitioner failed.
    #[error("partition error: {0}")]
    PartitionError(#[from] partition_planner::PartitionError),

    /// The event catalog could not be built.
    #[error("catalog error: {0}")]
    CatalogError(#[from] event_catalog::CatalogError),

    /// The partition cache failed outside a partitioner.
    #[error("cache error: {0}")]
    CacheError(#[from] partition_cache::CacheError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
