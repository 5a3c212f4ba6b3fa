// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-request partitioning metrics.
//!
//! [`PartitionMetrics`] records how each namespace was partitioned, how
//! much oracle work the greedy search did, and what the cache contributed.

use event_catalog::Namespace;
use partition_planner::{Algorithm, CacheDecision, GreedyStats};
use std::time::Duration;

/// Metrics for a single namespace bucket.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NamespaceMetrics {
    pub namespace: Namespace,
    /// Name of the partitioner that handled the bucket.
    pub partitioner: String,
    /// Events routed to this namespace.
    pub events: usize,
    /// Groups in this namespace's partition.
    pub groups: usize,
}

/// Aggregate metrics for one partition request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PartitionMetrics {
    /// Counter algorithm used for the request.
    pub algorithm: Algorithm,
    pub prefer_latest: bool,
    /// Per-namespace results, in merge order.
    pub namespaces: Vec<NamespaceMetrics>,
    /// Greedy search statistics. All zero when the search did not run.
    pub greedy: GreedyStats,
    /// What the cache contributed to the counter partition.
    pub cache_decision: CacheDecision,
    /// Groups in the merged result.
    pub final_groups: usize,
    /// Wall-clock time for the whole request.
    pub total_duration: Duration,
}

impl PartitionMetrics {
    /// Creates an empty metrics container.
    pub fn new(algorithm: Algorithm, prefer_latest: bool) -> Self {
        Self {
            algorithm,
            prefer_latest,
            namespaces: Vec::new(),
            greedy: GreedyStats::default(),
            cache_decision: CacheDecision::default(),
            final_groups: 0,
            total_duration: Duration::ZERO,
        }
    }

    /// Records the result for one namespace.
    pub fn record_namespace(
        &mut self,
        namespace: Namespace,
        partitioner: &str,
        events: usize,
        groups: usize,
    ) {
        self.namespaces.push(NamespaceMetrics {
            namespace,
            partitioner: partitioner.to_string(),
            events,
            groups,
        });
        self.namespaces.sort_by_key(|m| m.namespace);
    }

    /// Finalises metrics with the total wall-clock time and merged group count.
    pub fn finalise(&mut self, total: Duration, final_groups: usize) {
        self.total_duration = total;
        self.final_groups = final_groups;
    }

    /// Metrics for `namespace`, if it was recorded.
    pub fn namespace(&self, namespace: Namespace) -> Option<&NamespaceMetrics> {
        self.namespaces.iter().find(|m| m.namespace == namespace)
    }

    /// Total input events across namespaces.
    pub fn total_events(&self) -> usize {
        self.namespaces.iter().map(|m| m.events).sum()
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let per_ns: Vec<String> = self
            .namespaces
            .iter()
            .filter(|m| m.events > 0)
            .map(|m| format!("{} {}→{}", m.namespace, m.events, m.groups))
            .collect();

        format!(
            "Partition: {:.2}ms total, {} events → {} groups [{}], \
             {} ({}), {} trials, {} probes, cache {}",
            self.total_duration.as_secs_f64() * 1000.0,
            self.total_events(),
            self.final_groups,
            per_ns.join(", "),
            self.algorithm,
            if self.prefer_latest { "prefer latest" } else { "prefer best" },
            self.greedy.trials,
            self.greedy.probes,
            self.cache_decision,
        )
    }
}
