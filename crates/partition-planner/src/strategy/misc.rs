// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Misc events: never split.
//!
//! Anything the router does not recognise is an opaque tag. All of them go
//! into a single group, in input order, with no validation.

use crate::strategy::BucketPartitioner;
use crate::{Group, Partition, PartitionError};
use event_catalog::Namespace;

/// One group holding every misc event.
#[derive(Debug, Clone, Default)]
pub struct MiscPartitioner;

impl MiscPartitioner {
    pub fn new() -> Self {
        Self
    }
}

impl BucketPartitioner for MiscPartitioner {
    fn name(&self) -> &str {
        "single-group"
    }

    fn namespace(&self) -> Namespace {
        Namespace::Misc
    }

    fn partition(&mut self, bucket: &[String]) -> Result<Partition, PartitionError> {
        if bucket.is_empty() {
            return Ok(Partition::empty(Namespace::Misc));
        }
        Ok(Partition::from_groups(
            Namespace::Misc,
            vec![Group::new(bucket.to_vec())],
        ))
    }
}
