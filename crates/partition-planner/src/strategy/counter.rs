// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Counter partitioning with the persistent cache in front of it.
//!
//! # Policy
//!
//! With [`Algorithm::Greedy`] a fresh partition `P` is always computed and
//! the cached entry `C` for the same signature is looked up:
//!
//! | Cache state | Stored afterwards | Returned (`prefer_latest = false`) |
//! |---|---|---|
//! | `C` empty | `P` | `P` |
//! | `|P| < |C|` | `P` | `P` |
//! | `|P| >= |C|` | `C` (unchanged) | `C` |
//!
//! `prefer_latest = true` always returns `P`; the cache rule is the same,
//! so it never stores a worse partition.
//!
//! With [`Algorithm::Cached`] only the lookup runs. A miss yields an
//! empty partition; the oracle is never consulted.

use crate::strategy::greedy::{GreedyPartitioner, GreedyStats};
use crate::strategy::{Algorithm, BucketPartitioner};
use crate::{Partition, PartitionError};
use event_catalog::Namespace;
use partition_cache::{PartitionCache, Signature};
use rand::Rng;
use trial_oracle::FeasibilityOracle;

/// What the cache contributed to the last counter partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheDecision {
    /// The bucket was empty; the cache was not consulted.
    #[default]
    Skipped,
    /// No entry existed; the fresh partition was stored.
    Stored,
    /// The fresh partition beat the cached one and replaced it.
    Replaced,
    /// The cached partition was at least as good and was kept.
    Kept,
    /// Cache-only mode found an entry.
    Hit,
    /// Cache-only mode found nothing.
    Miss,
}

impl CacheDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Stored => "stored",
            Self::Replaced => "replaced",
            Self::Kept => "kept",
            Self::Hit => "hit",
            Self::Miss => "miss",
        }
    }
}

impl std::fmt::Display for CacheDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Greedy counter partitioning reconciled with a [`PartitionCache`].
pub struct CounterPartitioner<'a, O: FeasibilityOracle + ?Sized, R: Rng + ?Sized> {
    greedy: GreedyPartitioner<'a, O, R>,
    cache: &'a PartitionCache,
    algorithm: Algorithm,
    prefer_latest: bool,
    decision: CacheDecision,
}

impl<'a, O: FeasibilityOracle + ?Sized, R: Rng + ?Sized> CounterPartitioner<'a, O, R> {
    pub fn new(greedy: GreedyPartitioner<'a, O, R>, cache: &'a PartitionCache) -> Self {
        Self {
            greedy,
            cache,
            algorithm: Algorithm::default(),
            prefer_latest: false,
            decision: CacheDecision::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_prefer_latest(mut self, prefer_latest: bool) -> Self {
        self.prefer_latest = prefer_latest;
        self
    }

    /// Cache outcome of the most recent call.
    pub fn decision(&self) -> CacheDecision {
        self.decision
    }

    /// Search statistics of the most recent call. All zero in cache-only
    /// mode.
    pub fn greedy_stats(&self) -> GreedyStats {
        self.greedy.stats()
    }

    fn cached_only(&mut self, signature: &Signature) -> Result<Partition, PartitionError> {
        let cached = self.cache.lookup(signature)?;
        if cached.is_empty() {
            tracing::warn!("no cached partition for {signature}; counter events dropped");
            self.decision = CacheDecision::Miss;
        } else {
            self.decision = CacheDecision::Hit;
        }
        Ok(Partition::from_texts(Namespace::Counter, &cached))
    }

    fn reconcile(&mut self, signature: &Signature, bucket: &[String]) -> Result<Partition, PartitionError> {
        let fresh = self.greedy.partition(bucket)?;
        let cached = Partition::from_texts(Namespace::Counter, &self.cache.lookup(signature)?);

        self.decision = if cached.is_empty() {
            CacheDecision::Stored
        } else if fresh.num_groups() < cached.num_groups() {
            CacheDecision::Replaced
        } else {
            CacheDecision::Kept
        };

        if self.decision != CacheDecision::Kept {
            self.cache.replace(signature, &fresh.to_texts())?;
        }
        tracing::debug!(
            "cache {signature}: fresh {} vs cached {} group(s) → {}",
            fresh.num_groups(),
            cached.num_groups(),
            self.decision,
        );

        if self.prefer_latest || self.decision != CacheDecision::Kept {
            Ok(fresh)
        } else {
            Ok(cached)
        }
    }
}

impl<O: FeasibilityOracle + ?Sized, R: Rng + ?Sized> BucketPartitioner for CounterPartitioner<'_, O, R> {
    fn name(&self) -> &str {
        match self.algorithm {
            Algorithm::Greedy => "greedy+cache",
            Algorithm::Cached => "cache-only",
        }
    }

    fn namespace(&self) -> Namespace {
        Namespace::Counter
    }

    fn partition(&mut self, bucket: &[String]) -> Result<Partition, PartitionError> {
        self.decision = CacheDecision::Skipped;
        if bucket.is_empty() {
            return Ok(Partition::empty(Namespace::Counter));
        }
        self.greedy.validate(bucket)?;

        let signature = Signature::new(Namespace::Counter, bucket);
        match self.algorithm {
            Algorithm::Cached => self.cached_only(&signature),
            Algorithm::Greedy => self.reconcile(&signature, bucket),
        }
    }
}
