// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The partitioning engine.
//!
//! ```text
//! events
//!   │  NamespaceRouter::route
//!   ▼
//! Buckets ──► ExactPartitioner   (device-domain)
//!         ──► MiscPartitioner    (misc)
//!         ──► CounterPartitioner (counter, greedy + cache)
//!   │
//!   │  coverage check, merge_partitions
//!   ▼
//! FinalResult
//! ```
//!
//! Device-domain and misc buckets are partitioned before the counter
//! bucket, so a validation failure there never reaches the cache. The
//! merge always runs in namespace order: counter, device-domain, misc.

use crate::{EngineConfig, EngineError, PartitionMetrics};
use event_catalog::{EventCatalog, HardwareProfile, Namespace};
use partition_cache::PartitionCache;
use partition_planner::{
    merge_partitions, Algorithm, BucketPartitioner, CacheDecision, CounterPartitioner,
    ExactPartitioner, GreedyPartitioner, Group, MiscPartitioner, NamespaceRouter, Partition,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;
use trial_oracle::{DomainSubsystem, ExactSubsystem, FeasibilityOracle, SlotOracle};

/// The result of a single partition request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FinalResult {
    /// Merged groups, each the `:`-joined text of its events.
    pub groups: Vec<String>,
    /// Per-request metrics.
    pub metrics: PartitionMetrics,
}

/// The partitioning engine.
///
/// Owns the catalog, the counter oracle, the device subsystem and the
/// random source. Every request takes `&mut self`, so requests against
/// one engine are serialised.
///
/// # Example
/// ```
/// use event_catalog::HardwareProfile;
/// use partition_cache::PartitionCache;
/// use partition_engine::{EngineConfig, PartitionEngine};
/// use partition_planner::Algorithm;
///
/// let profile = HardwareProfile::from_json(r#"{
///     "name": "demo",
///     "counters": { "num_slots": 2, "events": [
///         { "name": "PAPI_TOT_CYC" }, { "name": "PAPI_TOT_INS" }
///     ] }
/// }"#).unwrap();
/// let config = EngineConfig { seed: Some(1), ..Default::default() };
/// let mut engine = PartitionEngine::from_profile(config, &profile).unwrap();
/// let cache = PartitionCache::temporary().unwrap();
///
/// let result = engine
///     .partition(&cache, &["PAPI_TOT_INS", "PAPI_TOT_CYC", "tag"], Algorithm::Greedy, false)
///     .unwrap();
/// assert_eq!(result.groups, vec!["PAPI_TOT_CYC:PAPI_TOT_INS:tag"]);
/// ```
pub struct PartitionEngine<O: FeasibilityOracle, X: ExactSubsystem> {
    config: EngineConfig,
    router: NamespaceRouter,
    catalog: EventCatalog,
    oracle: O,
    subsystem: X,
    rng: StdRng,
}

impl PartitionEngine<SlotOracle, DomainSubsystem> {
    /// Builds an engine whose catalog, oracle and subsystem all come from
    /// a hardware profile.
    pub fn from_profile(config: EngineConfig, profile: &HardwareProfile) -> Result<Self, EngineError> {
        if profile.device_subsystem != config.device_subsystem {
            tracing::warn!(
                "profile '{}' names device subsystem '{}' but the router expects '{}'",
                profile.name,
                profile.device_subsystem,
                config.device_subsystem,
            );
        }
        let catalog = EventCatalog::populate(profile)?;
        Self::new(
            config,
            catalog,
            SlotOracle::from_profile(profile),
            DomainSubsystem::from_profile(profile),
        )
    }
}

impl<O: FeasibilityOracle, X: ExactSubsystem> PartitionEngine<O, X> {
    /// Creates an engine from explicit parts.
    pub fn new(
        config: EngineConfig,
        catalog: EventCatalog,
        oracle: O,
        subsystem: X,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        tracing::info!(
            "engine created: retry budget {}, seed {}",
            config.retry_budget,
            config.seed.map_or_else(|| "entropy".to_string(), |s| s.to_string()),
        );
        Ok(Self {
            router: config.router(),
            config,
            catalog,
            oracle,
            subsystem,
            rng,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn subsystem(&self) -> &X {
        &self.subsystem
    }

    /// Partitions `events` with the configured default algorithm and
    /// prefer-latest setting.
    pub fn partition_with_defaults<S: AsRef<str>>(
        &mut self,
        cache: &PartitionCache,
        events: &[S],
    ) -> Result<FinalResult, EngineError> {
        let algorithm = self.config.parse_algorithm()?;
        let prefer_latest = self.config.prefer_latest;
        self.partition(cache, events, algorithm, prefer_latest)
    }

    /// Splits `events` into the fewest co-measurable groups this engine can
    /// find.
    ///
    /// Steps:
    /// 1. Route every event to its namespace bucket.
    /// 2. Partition the device-domain bucket through the exact subsystem.
    /// 3. Put the misc bucket into a single group.
    /// 4. Partition the counter bucket per `algorithm`, reconciling with
    ///    `cache`.
    /// 5. Check each partition covers its bucket, then merge positionally.
    ///
    /// Either the full result is returned or the first error; there is no
    /// partial result.
    pub fn partition<S: AsRef<str>>(
        &mut self,
        cache: &PartitionCache,
        events: &[S],
        algorithm: Algorithm,
        prefer_latest: bool,
    ) -> Result<FinalResult, EngineError> {
        let start = Instant::now();
        let buckets = self.router.route(events);
        let mut metrics = PartitionMetrics::new(algorithm, prefer_latest);

        let greedy = GreedyPartitioner::new(&self.catalog, &mut self.oracle, &mut self.rng)
            .with_retry_budget(self.config.retry_budget);
        let mut counter = CounterPartitioner::new(greedy, cache)
            .with_algorithm(algorithm)
            .with_prefer_latest(prefer_latest);
        let mut exact = ExactPartitioner::new(&self.catalog, &self.subsystem);
        let mut misc = MiscPartitioner::new();

        let mut partitions: Vec<Partition> = Vec::with_capacity(3);
        {
            let partitioners: [&mut dyn BucketPartitioner; 3] = [&mut exact, &mut misc, &mut counter];
            for partitioner in partitioners {
                let bucket = buckets.get(partitioner.namespace());
                let partition = partitioner.partition(bucket)?;
                metrics.record_namespace(
                    partition.namespace,
                    partitioner.name(),
                    bucket.len(),
                    partition.num_groups(),
                );
                partitions.push(partition);
            }
        }
        metrics.greedy = counter.greedy_stats();
        metrics.cache_decision = counter.decision();

        for partition in &partitions {
            // A cache-only miss deliberately contributes nothing.
            if metrics.cache_decision == CacheDecision::Miss
                && partition.namespace == Namespace::Counter
            {
                continue;
            }
            partition.validate_coverage(buckets.get(partition.namespace))?;
        }

        partitions.sort_by_key(|p| p.namespace);
        let groups: Vec<String> = merge_partitions(&partitions)
            .iter()
            .map(Group::to_text)
            .collect();

        metrics.finalise(start.elapsed(), groups.len());
        tracing::info!("{}", metrics.summary());

        Ok(FinalResult { groups, metrics })
    }
}

impl<O: FeasibilityOracle, X: ExactSubsystem> std::fmt::Debug for PartitionEngine<O, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionEngine")
            .field("router", &self.router)
            .field("retry_budget", &self.config.retry_budget)
            .field("seed", &self.config.seed)
            .field("catalog", &self.catalog.summary())
            .finish()
    }
}
