// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partition-planner
//!
//! Splits a requested event set into the fewest groups that can each be
//! measured in a single pass.
//!
//! # Pipeline
//!
//! ```text
//!  events ──► NamespaceRouter ──► Buckets
//!                                   │
//!          ┌────────────────────────┼───────────────────────┐
//!          ▼                        ▼                       ▼
//!  CounterPartitioner        ExactPartitioner        MiscPartitioner
//!  (greedy + cache)          (device subsystem)      (single group)
//!          │                        │                       │
//!          └──────────► merge_partitions (zip-longest) ◄────┘
//! ```
//!
//! # Partitioners
//!
//! | Partitioner | Namespace | Subsystem | Result |
//! |---|---|---|---|
//! | [`GreedyPartitioner`] | counter | feasibility oracle | best of N shuffled first-fit trials |
//! | [`CounterPartitioner`] | counter | oracle + cache | greedy, reconciled with the cache |
//! | [`ExactPartitioner`] | device-domain | exact subsystem | the subsystem's own grouping |
//! | [`MiscPartitioner`] | misc | none | one group, input order |
//!
//! All of them implement [`BucketPartitioner`], so a caller can drive the
//! three namespaces uniformly.
//!
//! # Example
//! ```
//! use event_catalog::EventCatalog;
//! use partition_planner::{BucketPartitioner, GreedyPartitioner};
//! use rand::{rngs::StdRng, SeedableRng};
//! use trial_oracle::SlotOracle;
//!
//! let names: Vec<String> = ["PAPI_A", "PAPI_B", "PAPI_C"].map(String::from).to_vec();
//! let catalog = EventCatalog::from_events(names.clone(), vec![]).unwrap();
//! let mut oracle = names
//!     .iter()
//!     .fold(SlotOracle::new(2), |o, n| o.with_event(n, vec![0, 1]));
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! let partition = GreedyPartitioner::new(&catalog, &mut oracle, &mut rng)
//!     .partition(&names)
//!     .unwrap();
//! assert_eq!(partition.num_groups(), 2);
//! ```

mod error;
mod group;
mod merge;
mod router;
pub mod strategy;

pub use error::PartitionError;
pub use group::{Group, Partition};
pub use merge::merge_partitions;
pub use router::{Buckets, NamespaceRouter, DEFAULT_COUNTER_PREFIX, DEFAULT_DEVICE_SUBSYSTEM};
pub use strategy::counter::{CacheDecision, CounterPartitioner};
pub use strategy::exact::ExactPartitioner;
pub use strategy::greedy::{GreedyPartitioner, GreedyStats, DEFAULT_RETRY_BUDGET};
pub use strategy::misc::MiscPartitioner;
pub use strategy::{Algorithm, BucketPartitioner};
