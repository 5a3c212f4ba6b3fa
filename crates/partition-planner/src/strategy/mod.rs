// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`BucketPartitioner`] trait and its implementations.

pub mod counter;
pub mod exact;
pub mod greedy;
pub mod misc;

use crate::{Partition, PartitionError};
use event_catalog::Namespace;
use std::fmt;
use std::str::FromStr;

/// Trait for per-namespace partitioners.
///
/// Each partitioner takes the events routed to its namespace, in input
/// order, and produces a [`Partition`] covering them exactly once. An
/// empty bucket yields an empty partition without touching any
/// subsystem.
pub trait BucketPartitioner {
    /// Human-readable name of this partitioner.
    fn name(&self) -> &str;

    /// The namespace this partitioner handles.
    fn namespace(&self) -> Namespace;

    /// Partitions `bucket`.
    fn partition(&mut self, bucket: &[String]) -> Result<Partition, PartitionError>;
}

/// How counter events are partitioned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Run the randomized greedy search and reconcile with the cache.
    #[default]
    Greedy,
    /// Return the cached partition only; never consult the oracle.
    Cached,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Cached => "cached",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = PartitionError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "cached" => Ok(Self::Cached),
            _ => Err(PartitionError::UnknownAlgorithm(s.to_string())),
        }
    }
}
