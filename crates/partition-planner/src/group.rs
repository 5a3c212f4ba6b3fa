// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partitions: the output of every bucket partitioner.
//!
//! A [`Partition`] is an ordered list of [`Group`]s. Each group is a set of
//! events that can be measured together in one pass. The textual form of a
//! group is its events joined with `:`, which is also what the cache stores
//! and what the caller finally receives.

use crate::PartitionError;
use event_catalog::{Namespace, EVENT_DELIMITER};
use std::collections::HashMap;
use std::fmt;

/// A set of events measurable together.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Group {
    events: Vec<String>,
}

impl Group {
    pub fn new(events: Vec<String>) -> Self {
        Self { events }
    }

    /// Parses the `:`-joined text form.
    pub fn parse(text: &str) -> Self {
        Self {
            events: text.split(EVENT_DELIMITER).map(str::to_string).collect(),
        }
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Appends every event of `other`, keeping order.
    pub fn extend(&mut self, other: &Group) {
        self.events.extend(other.events.iter().cloned());
    }

    /// The `:`-joined text form.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                write!(f, "{EVENT_DELIMITER}")?;
            }
            f.write_str(event)?;
        }
        Ok(())
    }
}

/// The partition of one namespace bucket.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Partition {
    /// Namespace the events belong to.
    pub namespace: Namespace,
    /// Ordered list of groups.
    pub groups: Vec<Group>,
}

impl Partition {
    /// An empty partition, the result for an empty bucket.
    pub fn empty(namespace: Namespace) -> Self {
        Self {
            namespace,
            groups: Vec::new(),
        }
    }

    pub fn from_groups(namespace: Namespace, groups: Vec<Group>) -> Self {
        Self { namespace, groups }
    }

    /// Rebuilds a partition from group text, e.g. a cache entry.
    pub fn from_texts<S: AsRef<str>>(namespace: Namespace, texts: &[S]) -> Self {
        Self {
            namespace,
            groups: texts.iter().map(|t| Group::parse(t.as_ref())).collect(),
        }
    }

    /// Number of groups. This is the cost being minimised.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Total events across all groups.
    pub fn total_events(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Text form of each group, in order.
    pub fn to_texts(&self) -> Vec<String> {
        self.groups.iter().map(Group::to_text).collect()
    }

    /// Checks that the groups cover `bucket` exactly: no group is empty and
    /// every input event appears as many times as it was supplied.
    pub fn validate_coverage<S: AsRef<str>>(&self, bucket: &[S]) -> Result<(), PartitionError> {
        let mismatch = |detail: String| PartitionError::CoverageMismatch {
            namespace: self.namespace,
            detail,
        };

        let mut remaining: HashMap<&str, usize> = HashMap::new();
        for event in bucket {
            *remaining.entry(event.as_ref()).or_default() += 1;
        }

        for (i, group) in self.groups.iter().enumerate() {
            if group.is_empty() {
                return Err(mismatch(format!("group {i} is empty")));
            }
            for event in group.events() {
                match remaining.get_mut(event.as_str()) {
                    Some(n) if *n > 0 => *n -= 1,
                    _ => return Err(mismatch(format!("group {i} has extra event '{event}'"))),
                }
            }
        }

        let mut missing: Vec<&str> = remaining
            .into_iter()
            .filter(|&(_, n)| n > 0)
            .map(|(e, _)| e)
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(mismatch(format!("missing event(s) {missing:?}")));
        }
        Ok(())
    }

    /// Returns a human-readable summary of the partition.
    pub fn summary(&self) -> String {
        let sizes: Vec<usize> = self.groups.iter().map(Group::len).collect();
        format!(
            "{} partition: {} event(s) in {} group(s), group sizes: {:?}",
            self.namespace,
            self.total_events(),
            self.num_groups(),
            sizes,
        )
    }
}
