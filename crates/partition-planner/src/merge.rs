// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Positional merge of per-namespace partitions.
//!
//! Groups from different namespaces never compete for the same hardware,
//! so the i-th groups of every partition can share a pass. The merge is a
//! zip-longest: result group `i` is the concatenation of group `i` of each
//! partition that has one, in the order the partitions are given.

use crate::{Group, Partition};

/// Zip-longest merge of `partitions`.
///
/// The result has as many groups as the largest input partition.
pub fn merge_partitions<'a, I>(partitions: I) -> Vec<Group>
where
    I: IntoIterator<Item = &'a Partition>,
{
    let mut merged: Vec<Group> = Vec::new();
    for partition in partitions {
        for (i, group) in partition.groups.iter().enumerate() {
            match merged.get_mut(i) {
                Some(slot) => slot.extend(group),
                None => merged.push(group.clone()),
            }
        }
    }
    merged
}
