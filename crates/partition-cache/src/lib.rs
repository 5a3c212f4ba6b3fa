// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # partition-cache
//!
//! A persistent store of the best partition found so far for each exact
//! input event set.
//!
//! - [`Signature`]: the canonical identity of an input event set: its
//!   events sorted and `:`-joined, scoped to one namespace.
//! - [`PartitionCache`]: a sled database holding one tree per namespace
//!   and one row per group. [`PartitionCache::replace`] swaps an entry's
//!   rows in a single atomic batch.
//!
//! The cache only stores and returns group text. Deciding *whether* to
//! replace an entry is the partitioner's job.
//!
//! # Example
//! ```
//! use event_catalog::Namespace;
//! use partition_cache::{PartitionCache, Signature};
//!
//! let cache = PartitionCache::temporary().unwrap();
//! let sig = Signature::new(Namespace::Counter, ["Y", "X"]);
//! assert_eq!(sig.as_str(), "X:Y");
//!
//! cache.replace(&sig, &["X:Y".to_string()]).unwrap();
//! assert_eq!(cache.lookup(&sig).unwrap(), vec!["X:Y".to_string()]);
//! ```

mod cache;
mod error;
mod signature;

pub use cache::{CacheEntry, PartitionCache};
pub use error::CacheError;
pub use signature::Signature;
